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

/// Takes the free block with the lowest address that is big enough
pub struct FirstFitPlacementModule;

impl PlacementModule for FirstFitPlacementModule {
    fn find_block(&self, blocks: &BlockList, size: usize) -> Option<usize> {
        blocks
            .iter()
            .find(|block| block.is_free() && block.length() >= size)
            .map(|block| block.address())
    }
}
