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

use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::init_test_logger;
use crate::{allocator::test::check_allocator_integrity, AllocationId, PlacementStrategy, SegmentAllocator};

const STRATEGIES: [PlacementStrategy; 3] = [
    PlacementStrategy::FirstFit,
    PlacementStrategy::BestFit,
    PlacementStrategy::WorstFit,
];

#[test]
fn test_allocator_random_operations() {
    init_test_logger();
    const SEED: u64 = 8_212_467_300_551_839_749;
    const CAPACITY: usize = 4096;

    let mut rand = SmallRng::seed_from_u64(SEED);
    let mut allocator = SegmentAllocator::new(CAPACITY);
    let mut live: Vec<AllocationId> = Vec::new();
    let mut last_id = 0;

    for _ in 0..2000 {
        if live.is_empty() || rand.gen_bool(0.6) {
            let size = rand.gen_range(1..=256);
            let strategy = STRATEGIES[rand.gen_range(0..STRATEGIES.len())];

            if let Ok(id) = allocator.allocate(size, strategy) {
                assert!(id.get() > last_id, "ids have to increase");
                last_id = id.get();
                assert_eq!(allocator.block_of(id).map(|b| b.length()), Some(size));
                live.push(id);
            }
        } else {
            let id = live.swap_remove(rand.gen_range(0..live.len()));
            allocator.free(id);
            assert!(allocator.block_of(id).is_none());
        }

        check_allocator_integrity(&allocator);
    }

    for id in live.drain(..) {
        allocator.free(id);
    }
    check_allocator_integrity(&allocator);
    assert_eq!(allocator.blocks().len(), 1, "everything should be coalesced again");
    assert_eq!(allocator.used_memory(), 0);
}

#[test]
fn test_best_and_worst_fit_against_linear_search() {
    init_test_logger();
    const SEED: u64 = 1_530_648_209_117_922_411;

    let mut rand = SmallRng::seed_from_u64(SEED);
    let mut allocator = SegmentAllocator::new(2048);
    let mut live: Vec<AllocationId> = Vec::new();

    // fragment the range
    for _ in 0..64 {
        if let Ok(id) = allocator.allocate_first_fit(rand.gen_range(1..=48)) {
            live.push(id);
        }
    }
    for i in (0..live.len()).rev().step_by(2) {
        allocator.free(live.swap_remove(i));
    }

    for _ in 0..200 {
        let size = rand.gen_range(1..=96);
        let free: Vec<(usize, usize)> = allocator
            .blocks()
            .iter()
            .filter(|b| b.is_free())
            .map(|b| (b.length(), b.address()))
            .collect();

        let expected_best = free.iter().filter(|(len, _)| *len >= size).min().map(|(_, addr)| *addr);
        let largest = free.iter().max_by_key(|(len, addr)| (*len, *addr));
        let expected_worst = largest.filter(|(len, _)| *len >= size).map(|(_, addr)| *addr);

        let strategy = if rand.gen_bool(0.5) { PlacementStrategy::BestFit } else { PlacementStrategy::WorstFit };
        let expected = match strategy {
            PlacementStrategy::BestFit => expected_best,
            _ => expected_worst,
        };

        match allocator.allocate(size, strategy) {
            Ok(id) => {
                assert_eq!(allocator.block_of(id).map(|b| b.address()), expected);
                if rand.gen_bool(0.5) {
                    allocator.free(id);
                }
            }
            Err(()) => assert_eq!(expected, None),
        }

        check_allocator_integrity(&allocator);
    }
}
