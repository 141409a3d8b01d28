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

use env_logger::{Builder, Env};
use mem_sim::{
    cache::CacheHierarchy, paging::PagingSystem, HierarchyConfig, IntegratedConfig,
    IntegratedSystem, PagingConfig, PlacementStrategy, ReplacementPolicy, SegmentAllocator,
};

fn print_header(title: &str) {
    println!("\n--- {} ---", title);
}

fn run_allocator() {
    print_header("Allocator");
    let mut heap = SegmentAllocator::new(1000);

    let a = heap.allocate(100, PlacementStrategy::FirstFit);
    let b = heap.allocate(50, PlacementStrategy::BestFit);
    println!("allocated: {:?} {:?}", a, b);

    if let Ok(id) = a {
        heap.free(id);
        println!("freed: {}", id);
    }

    // does not fit anywhere
    if heap.allocate(2000, PlacementStrategy::WorstFit).is_err() {
        println!("allocation of 2000 bytes failed");
    }

    print!("{}", heap);
    println!("{}", heap.stats());
    print_json(&heap.stats());
}

fn run_caches() {
    print_header("Cache Hierarchy");
    let mut caches = CacheHierarchy::new(HierarchyConfig::shared(64, 256, 16, 2, ReplacementPolicy::Fifo));

    for (address, is_write) in [(0, false), (0, true), (64, false), (128, false), (0, false), (300, true)] {
        let outcome = caches.access(address, is_write);
        println!("{} @ {} -> {:?}", if is_write { "WRITE" } else { "READ" }, address, outcome);
    }

    print!("{}", caches);
    print!("{}", caches.stats());
    print_json(&caches.stats());
}

fn run_paging() {
    print_header("Virtual Memory");
    let mut paging = PagingSystem::new(PagingConfig {
        ram_size: 32,
        page_size: 16,
        policy: ReplacementPolicy::Lru,
    });

    for virtual_address in [0, 16, 32, 0] {
        let physical_address = paging.translate(1, virtual_address);
        println!("PID 1 | VA {} -> PA {}", virtual_address, physical_address);
    }

    print!("{}", paging.physical());
    print_json(&paging.stats());
}

fn run_integrated() {
    print_header("Integrated (VM + Cache)");
    let mut system = IntegratedSystem::new(IntegratedConfig::lru(256, 64, 128, 512, 16, 2));

    for (pid, virtual_address, is_write) in [(1, 0x1000, false), (2, 0x1004, true), (1, 0x1008, false), (3, 0x40, false)] {
        let outcome = system.access(pid, virtual_address, is_write);
        println!(
            "Processed PID {} VA {} ({}) -> {:?}",
            pid,
            virtual_address,
            if is_write { "W" } else { "R" },
            outcome
        );
    }

    print!("{}", system);
    print!("{}", system.caches().stats());
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{}", json),
        Err(err) => log::warn!("Could not serialize stats: {}", err),
    }
}

fn main() {
    Builder::from_env(Env::default())
        .format_module_path(false)
        .init();

    run_allocator();
    run_caches();
    run_paging();
    run_integrated();
}
