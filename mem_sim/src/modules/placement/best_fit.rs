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

/// Takes the smallest free block that is big enough.
/// Ties are broken by the lowest address.
pub struct BestFitPlacementModule;

impl PlacementModule for BestFitPlacementModule {
    fn find_block(&self, blocks: &BlockList, size: usize) -> Option<usize> {
        blocks.smallest_free_at_least(size).map(|block| block.address())
    }
}

#[cfg(test)]
mod test {
    use super::BestFitPlacementModule;
    use crate::modules::placement::{test::build_block_list, PlacementModule};

    #[test]
    fn test_best_fit_takes_smallest_sufficient() {
        let list = build_block_list(&[(50, true), (10, false), (200, true), (10, false), (100, true)]);

        assert_eq!(BestFitPlacementModule.find_block(&list, 10), Some(0));
        assert_eq!(BestFitPlacementModule.find_block(&list, 51), Some(270));
        assert_eq!(BestFitPlacementModule.find_block(&list, 101), Some(60));
        assert_eq!(BestFitPlacementModule.find_block(&list, 201), None);
    }

    #[test]
    fn test_best_fit_tie_breaks_on_address() {
        let list = build_block_list(&[(10, false), (64, true), (10, false), (64, true), (10, false)]);

        assert_eq!(BestFitPlacementModule.find_block(&list, 64), Some(10));
        assert_eq!(BestFitPlacementModule.find_block(&list, 1), Some(10));
    }
}
