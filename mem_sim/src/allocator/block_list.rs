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

use std::collections::{BTreeMap, BTreeSet};

use super::AllocationId;

/// A contiguous run of the managed address range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Block {
    address: usize,
    length: usize,
    owner: Option<AllocationId>,
}

impl Block {
    #[inline]
    pub fn address(&self) -> usize {
        self.address
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Address of the last byte of this block
    #[inline]
    pub fn last_address(&self) -> usize {
        self.address + self.length - 1
    }

    #[inline]
    pub fn is_free(&self) -> bool {
        self.owner.is_none()
    }

    /// Id of the allocation that currently owns this block
    #[inline]
    pub fn owner(&self) -> Option<AllocationId> {
        self.owner
    }
}

/// Partition of `[0, capacity)` into blocks, ordered by address.
///
/// Blocks are keyed by their start address which stays stable while a block
/// is split (the prefix keeps it) or merged (the predecessor keeps it).
/// Free blocks are additionally indexed by `(length, address)`.
pub struct BlockList {
    blocks: BTreeMap<usize, Block>,
    free_index: BTreeSet<(usize, usize)>,
}

impl BlockList {
    pub(crate) fn new(capacity: usize) -> Self {
        let mut list = Self {
            blocks: BTreeMap::new(),
            free_index: BTreeSet::new(),
        };

        if capacity > 0 {
            list.blocks.insert(
                0,
                Block {
                    address: 0,
                    length: capacity,
                    owner: None,
                },
            );
            list.free_index.insert((capacity, 0));
        }

        list
    }

    /// Iterates over all blocks in address order
    pub fn iter(&self) -> impl Iterator<Item = &Block> + '_ {
        self.blocks.values()
    }

    /// Iterates over all free blocks ordered by `(length, address)`
    pub fn iter_free(&self) -> impl DoubleEndedIterator<Item = &Block> + '_ {
        self.free_index.iter().map(|(_, addr)| &self.blocks[addr])
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn get(&self, address: usize) -> Option<&Block> {
        self.blocks.get(&address)
    }

    /// Smallest free block with `length >= size`, lowest address on ties
    pub fn smallest_free_at_least(&self, size: usize) -> Option<&Block> {
        self.free_index
            .range((size, 0)..)
            .next()
            .map(|(_, addr)| &self.blocks[addr])
    }

    pub fn largest_free(&self) -> Option<&Block> {
        self.iter_free().next_back()
    }

    /// Turns the first `size` bytes of the free block at `address` into an
    /// allocated block owned by `id`. The rest of the block stays free.
    ///
    /// Returns `false` if there is no free block at `address` that can hold `size` bytes.
    pub(crate) fn occupy(&mut self, address: usize, size: usize, id: AllocationId) -> bool {
        let block = match self.blocks.get_mut(&address) {
            Some(block) if block.is_free() && block.length >= size && size > 0 => block,
            _ => return false,
        };

        self.free_index.remove(&(block.length, address));

        let remainder = block.length - size;
        block.length = size;
        block.owner = Some(id);

        if remainder > 0 {
            let remainder_addr = address + size;
            log::trace!(
                "Split block at {}: allocated {} bytes, {} bytes remain free at {}",
                address,
                size,
                remainder,
                remainder_addr
            );

            self.blocks.insert(
                remainder_addr,
                Block {
                    address: remainder_addr,
                    length: remainder,
                    owner: None,
                },
            );
            self.free_index.insert((remainder, remainder_addr));
        }

        true
    }

    /// Marks the allocated block at `address` as free and merges it with
    /// free neighbours.
    ///
    /// Returns the length of the released block (before merging) or `None`
    /// if there is no allocated block at `address`.
    pub(crate) fn release(&mut self, address: usize) -> Option<usize> {
        let block = self.blocks.get_mut(&address)?;
        block.owner.take()?;
        let released = block.length;

        let mut start = address;
        let mut length = released;

        // merge with successor
        let next_addr = address + released;
        if let Some(next_len) = self
            .blocks
            .get(&next_addr)
            .filter(|next| next.is_free())
            .map(|next| next.length)
        {
            self.free_index.remove(&(next_len, next_addr));
            self.blocks.remove(&next_addr);
            length += next_len;
        }

        // merge with predecessor
        if let Some((prev_addr, prev_len)) = self
            .blocks
            .range(..address)
            .next_back()
            .filter(|(_, prev)| prev.is_free())
            .map(|(&addr, prev)| (addr, prev.length))
        {
            self.free_index.remove(&(prev_len, prev_addr));
            self.blocks.remove(&address);
            start = prev_addr;
            length += prev_len;
        }

        if length != released {
            log::trace!(
                "Coalesced released block at {} into free block [{}, {})",
                address,
                start,
                start + length
            );
        }

        if let Some(merged) = self.blocks.get_mut(&start) {
            merged.length = length;
        }
        self.free_index.insert((length, start));

        Some(released)
    }
}
