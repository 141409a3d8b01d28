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

use core::fmt;
use std::collections::BTreeSet;

use log::debug;

use super::{FrameNumber, PageTableRegistry, ProcessId};
use crate::{
    config::PagingConfig,
    modules::replacement::{AnyReplacementModule, ReplacementModule, ReplacementPolicy},
    stats::PagingStats,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FrameOwner {
    pub pid: ProcessId,
    pub vpn: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Frame {
    owner: Option<FrameOwner>,
}

impl Frame {
    #[inline]
    pub fn is_used(&self) -> bool {
        self.owner.is_some()
    }

    #[inline]
    pub fn owner(&self) -> Option<FrameOwner> {
        self.owner
    }
}

/// RAM as a fixed number of page sized frames
pub struct PhysicalMemory {
    page_size: usize,
    offset_bits: u32,

    frames: Vec<Frame>,
    /// frames `[next_free, frames.len())` were never handed out
    next_free: usize,
    replacement: AnyReplacementModule,

    /// processes whose page tables are notified on eviction
    registered: BTreeSet<ProcessId>,

    page_faults: u64,
    page_hits: u64,
}

impl PhysicalMemory {
    /// See [`PagingConfig`] for the requirements on `config`
    pub fn new(config: PagingConfig) -> Self {
        debug_assert!(config.ram_size.is_power_of_two(), "ram size has to be a power of two");
        debug_assert!(config.page_size.is_power_of_two(), "page size has to be a power of two");
        debug_assert!(config.ram_size > config.page_size, "ram has to hold more than one page");

        let frame_count = config.frame_count();
        log::info!(
            "Created physical memory: {} frames of {} bytes, policy={:?}",
            frame_count,
            config.page_size,
            config.policy
        );

        Self {
            page_size: config.page_size,
            offset_bits: config.page_size.trailing_zeros(),
            frames: vec![Frame::default(); frame_count],
            next_free: 0,
            replacement: AnyReplacementModule::new(config.policy, frame_count),
            registered: BTreeSet::new(),
            page_faults: 0,
            page_hits: 0,
        }
    }

    /// Registers `pid` so that evictions of its frames are routed to its page table
    pub fn register(&mut self, pid: ProcessId) {
        self.registered.insert(pid);
    }

    #[inline]
    pub fn is_registered(&self, pid: ProcessId) -> bool {
        self.registered.contains(&pid)
    }

    /// Marks `frame` as recently used. Has no effect with FIFO replacement.
    pub fn touch(&mut self, frame: FrameNumber) {
        self.replacement.touch(frame);
    }

    /// Hands out a frame for page `vpn` of process `pid`.
    ///
    /// Unused frames are handed out first. After that a frame is reclaimed by
    /// the replacement policy and, if its previous owner is registered, the
    /// owner's page is invalidated through `registry` before the frame is reassigned.
    pub fn allocate<R: PageTableRegistry>(
        &mut self,
        pid: ProcessId,
        vpn: u64,
        registry: &mut R,
    ) -> FrameNumber {
        let frame = if self.next_free < self.frames.len() {
            let frame = self.next_free;
            self.next_free += 1;
            frame
        } else {
            let victim = self.replacement.victim();
            if let Some(owner) = self.frames[victim].owner {
                if self.registered.contains(&owner.pid) {
                    debug!(
                        "Evicting frame {} from pid {} (vpn {})",
                        victim, owner.pid, owner.vpn
                    );
                    registry.invalidate(owner.pid, owner.vpn);
                }
            }
            victim
        };

        self.replacement.install(frame);
        self.frames[frame].owner = Some(FrameOwner { pid, vpn });

        frame
    }

    #[inline]
    pub(crate) fn record_fault(&mut self) {
        self.page_faults += 1;
    }

    #[inline]
    pub(crate) fn record_hit(&mut self) {
        self.page_hits += 1;
    }

    #[inline]
    pub fn page_faults(&self) -> u64 {
        self.page_faults
    }

    #[inline]
    pub fn page_hits(&self) -> u64 {
        self.page_hits
    }

    #[inline]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[inline]
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    #[inline]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Number of frames that were handed out at least once
    #[inline]
    pub fn frames_used(&self) -> usize {
        self.next_free
    }

    #[inline]
    pub fn policy(&self) -> ReplacementPolicy {
        self.replacement.policy()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn stats(&self) -> PagingStats {
        PagingStats {
            page_faults: self.page_faults,
            page_hits: self.page_hits,
            frames_used: self.frames_used(),
            frame_count: self.frame_count(),
        }
    }

    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PhysicalMemory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Physical RAM Status ---")?;
        writeln!(f, "Frames Used: {}/{}", self.frames_used(), self.frame_count())?;
        for (index, frame) in self.frames.iter().enumerate() {
            if let Some(owner) = frame.owner {
                writeln!(f, " Frame {}: PID {} (VPN {})", index, owner.pid, owner.vpn)?;
            }
        }
        writeln!(f, "Hits: {} | Faults: {}", self.page_hits, self.page_faults)
    }
}
