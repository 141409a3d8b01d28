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

use super::PlacementModule;
use crate::allocator::BlockList;

/// Takes the largest free block.
///
/// If even the largest block is too small no other block can be,
/// so there is nothing else to search.
pub struct WorstFitPlacementModule;

impl PlacementModule for WorstFitPlacementModule {
    fn find_block(&self, blocks: &BlockList, size: usize) -> Option<usize> {
        blocks
            .largest_free()
            .filter(|block| block.length() >= size)
            .map(|block| block.address())
    }
}
