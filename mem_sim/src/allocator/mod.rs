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

mod block_list;

use core::fmt;
use std::collections::HashMap;

use log::{debug, trace};

pub use block_list::{Block, BlockList};

use crate::{
    modules::placement::{PlacementModule, PlacementStrategy},
    stats::AllocatorStats,
};

/// Identifies one allocation of a [`SegmentAllocator`].
///
/// Ids are handed out in increasing order starting at `1` and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AllocationId(u64);

impl AllocationId {
    #[inline]
    pub(crate) fn from_raw(id: u64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AllocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Heap placement model over the address range `[0, capacity)`.
///
/// Only metadata is tracked, there is no backing memory.
pub struct SegmentAllocator {
    capacity: usize,
    used: usize,
    blocks: BlockList,

    /// maps every live allocation to the address of its block
    allocations: HashMap<AllocationId, usize>,
    next_id: u64,

    attempts: u64,
    hits: u64,
}

impl SegmentAllocator {
    pub fn new(capacity: usize) -> Self {
        log::info!("Created segment allocator with capacity={} bytes", capacity);

        Self {
            capacity,
            used: 0,
            blocks: BlockList::new(capacity),
            allocations: HashMap::new(),
            next_id: 1,
            attempts: 0,
            hits: 0,
        }
    }

    /// Allocates `size` bytes using `strategy`.
    ///
    /// Returns `Err(())` if the strategy finds no suitable free block.
    /// Zero sized requests always fail.
    pub fn allocate(&mut self, size: usize, strategy: PlacementStrategy) -> Result<AllocationId, ()> {
        self.attempts += 1;
        let address = strategy.find_block(&self.blocks, size);
        self.place(address, size)
    }

    /// Same as [`SegmentAllocator::allocate`] but with a custom placement module
    pub fn allocate_with<P: PlacementModule>(&mut self, size: usize, placement: &P) -> Result<AllocationId, ()> {
        self.attempts += 1;
        let address = placement.find_block(&self.blocks, size);
        self.place(address, size)
    }

    #[inline]
    pub fn allocate_first_fit(&mut self, size: usize) -> Result<AllocationId, ()> {
        self.allocate(size, PlacementStrategy::FirstFit)
    }

    #[inline]
    pub fn allocate_best_fit(&mut self, size: usize) -> Result<AllocationId, ()> {
        self.allocate(size, PlacementStrategy::BestFit)
    }

    #[inline]
    pub fn allocate_worst_fit(&mut self, size: usize) -> Result<AllocationId, ()> {
        self.allocate(size, PlacementStrategy::WorstFit)
    }

    fn place(&mut self, address: Option<usize>, size: usize) -> Result<AllocationId, ()> {
        let address = match address {
            Some(address) if size > 0 => address,
            _ => {
                trace!("Allocation of {} bytes failed", size);
                return Err(());
            }
        };

        let id = AllocationId::from_raw(self.next_id);
        if !self.blocks.occupy(address, size, id) {
            // placement module returned a block that can not hold `size` bytes
            debug!("Placement chose unusable block at {} for {} bytes", address, size);
            return Err(());
        }

        self.next_id += 1;
        self.hits += 1;
        self.used += size;
        self.allocations.insert(id, address);

        trace!("Allocated {} bytes at {} with id {}", size, address, id);
        Ok(id)
    }

    /// Releases the allocation `id`. Unknown or already freed ids are ignored.
    pub fn free(&mut self, id: AllocationId) {
        let address = match self.allocations.remove(&id) {
            Some(address) => address,
            None => {
                trace!("Ignored free of unknown id {}", id);
                return;
            }
        };

        if let Some(released) = self.blocks.release(address) {
            self.used -= released;
            trace!("Freed id {} ({} bytes at {})", id, released, address);
        }
    }

    /// Looks up the block of a live allocation
    pub fn block_of(&self, id: AllocationId) -> Option<&Block> {
        self.allocations
            .get(&id)
            .and_then(|address| self.blocks.get(*address))
    }

    pub fn blocks(&self) -> &BlockList {
        &self.blocks
    }

    #[inline]
    pub fn total_memory(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn used_memory(&self) -> usize {
        self.used
    }

    #[inline]
    pub fn free_memory(&self) -> usize {
        self.capacity - self.used
    }

    /// Percentage of successful allocations over the lifetime of this allocator
    pub fn alloc_success_rate(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        (self.hits as f64 / self.attempts as f64) * 100.0
    }

    /// `1 - largest_free_block / total_free`, `0` if nothing is free
    pub fn external_fragmentation(&self) -> f64 {
        let total_free = self.free_memory();
        match self.blocks.largest_free() {
            Some(largest) if total_free > 0 => 1.0 - (largest.length() as f64 / total_free as f64),
            _ => 0.0,
        }
    }

    pub fn stats(&self) -> AllocatorStats {
        AllocatorStats {
            total: self.total_memory(),
            used: self.used_memory(),
            attempts: self.attempts,
            hits: self.hits,
            success_rate: self.alloc_success_rate(),
            external_fragmentation: self.external_fragmentation(),
        }
    }

    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SegmentAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Memory Dump ---")?;
        for block in self.blocks.iter() {
            write!(
                f,
                "[{} - {}] Size: {}",
                block.address(),
                block.last_address(),
                block.length()
            )?;
            match block.owner() {
                None => writeln!(f, " (FREE)")?,
                Some(id) => writeln!(f, " (ID: {})", id)?,
            }
        }
        Ok(())
    }
}

static_assertions::assert_impl_all!(SegmentAllocator: Send, Sync);
