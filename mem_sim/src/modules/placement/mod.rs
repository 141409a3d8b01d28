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

mod best_fit;
mod first_fit;
mod worst_fit;

pub use best_fit::BestFitPlacementModule;
pub use first_fit::FirstFitPlacementModule;
pub use worst_fit::WorstFitPlacementModule;

use crate::allocator::BlockList;

/// Decides which free block of a [`BlockList`] should hold a new allocation
pub trait PlacementModule {
    /// Returns the address of the free block that should be used to
    /// allocate `size` bytes or `None` if this strategy finds no candidate.
    ///
    /// The returned block has to be free and at least `size` bytes long.
    fn find_block(&self, blocks: &BlockList, size: usize) -> Option<usize>;
}

/// Placement strategy that can be chosen per allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum PlacementStrategy {
    FirstFit,
    BestFit,
    WorstFit,
}

impl PlacementStrategy {
    pub(crate) fn find_block(&self, blocks: &BlockList, size: usize) -> Option<usize> {
        match self {
            PlacementStrategy::FirstFit => FirstFitPlacementModule.find_block(blocks, size),
            PlacementStrategy::BestFit => BestFitPlacementModule.find_block(blocks, size),
            PlacementStrategy::WorstFit => WorstFitPlacementModule.find_block(blocks, size),
        }
    }
}
