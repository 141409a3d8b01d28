/*
 *  Copyright (C) 2025  Markus Elias Gerber
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  You should have received a copy of the GNU General Public License
 *  along with this program.  If not, see <https://www.gnu.org/licenses/>.
 */

mod fifo;
mod lru;

pub use fifo::FifoReplacementModule;
pub use lru::LruReplacementModule;

/// Replacement policy of a bounded set of slots (cache lines of one set or physical frames)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ReplacementPolicy {
    Fifo,
    Lru,
}

/// Tracks the order in which the slots `[0, slot_count)` should be reclaimed
pub trait ReplacementModule {
    /// Called if an occupied `slot` was referenced again
    fn touch(&mut self, slot: usize);

    /// Called after `slot` was (re)filled with a new occupant
    fn install(&mut self, slot: usize);

    /// Returns the slot that should be reclaimed next.
    ///
    /// Only meaningful once every slot is occupied.
    fn victim(&self) -> usize;
}

/// Replacement module that is selected at runtime by a [`ReplacementPolicy`]
#[derive(Debug, Clone)]
pub enum AnyReplacementModule {
    Fifo(FifoReplacementModule),
    Lru(LruReplacementModule),
}

impl AnyReplacementModule {
    pub fn new(policy: ReplacementPolicy, slot_count: usize) -> Self {
        match policy {
            ReplacementPolicy::Fifo => Self::Fifo(FifoReplacementModule::new(slot_count)),
            ReplacementPolicy::Lru => Self::Lru(LruReplacementModule::new(slot_count)),
        }
    }

    pub fn policy(&self) -> ReplacementPolicy {
        match self {
            Self::Fifo(_) => ReplacementPolicy::Fifo,
            Self::Lru(_) => ReplacementPolicy::Lru,
        }
    }
}

impl ReplacementModule for AnyReplacementModule {
    #[inline]
    fn touch(&mut self, slot: usize) {
        match self {
            Self::Fifo(inner) => inner.touch(slot),
            Self::Lru(inner) => inner.touch(slot),
        }
    }

    #[inline]
    fn install(&mut self, slot: usize) {
        match self {
            Self::Fifo(inner) => inner.install(slot),
            Self::Lru(inner) => inner.install(slot),
        }
    }

    #[inline]
    fn victim(&self) -> usize {
        match self {
            Self::Fifo(inner) => inner.victim(),
            Self::Lru(inner) => inner.victim(),
        }
    }
}
