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

mod allocator;
mod config;
mod stats;
mod system;

pub mod cache;
pub mod modules;
pub mod paging;

#[cfg(test)]
mod test;

pub use crate::allocator::{AllocationId, Block, BlockList, SegmentAllocator};
pub use crate::system::{AccessOutcome, IntegratedSystem};
pub use config::{CacheConfig, HierarchyConfig, IntegratedConfig, PagingConfig};
pub use modules::{placement::PlacementStrategy, replacement::ReplacementPolicy};
pub use stats::{AllocatorStats, CacheStats, HierarchyStats, PagingStats};
