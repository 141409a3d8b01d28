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

/// Splits physical addresses into tag, set index and offset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressLayout {
    offset_bits: u32,
    index_bits: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    pub tag: u64,
    pub set_index: usize,
    pub offset: u64,
}

impl AddressLayout {
    /// `block_size` and `num_sets` have to be powers of two
    pub fn new(block_size: usize, num_sets: usize) -> Self {
        debug_assert!(block_size.is_power_of_two(), "block size has to be a power of two");
        debug_assert!(num_sets.is_power_of_two(), "set count has to be a power of two");

        Self {
            offset_bits: block_size.trailing_zeros(),
            index_bits: num_sets.trailing_zeros(),
        }
    }

    #[inline]
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    #[inline]
    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    #[inline]
    pub fn decode(&self, address: u64) -> DecodedAddress {
        DecodedAddress {
            tag: address >> (self.offset_bits + self.index_bits),
            set_index: ((address >> self.offset_bits) & ((1u64 << self.index_bits) - 1)) as usize,
            offset: address & ((1u64 << self.offset_bits) - 1),
        }
    }
}
