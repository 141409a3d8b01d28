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

use crate::modules::replacement::ReplacementPolicy;

/// Geometry of one cache level.
///
/// `size`, `block_size` and `associativity` have to be powers of two and
/// `associativity <= size / block_size`. This is not checked in release builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// total size in bytes
    pub size: usize,
    /// bytes per line
    pub block_size: usize,
    /// lines per set
    pub associativity: usize,
    pub policy: ReplacementPolicy,
}

impl CacheConfig {
    #[inline]
    pub fn num_sets(&self) -> usize {
        self.size / (self.block_size * self.associativity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HierarchyConfig {
    pub l1: CacheConfig,
    pub l2: CacheConfig,
}

impl HierarchyConfig {
    /// Two levels that only differ in their total size
    pub fn shared(
        l1_size: usize,
        l2_size: usize,
        block_size: usize,
        associativity: usize,
        policy: ReplacementPolicy,
    ) -> Self {
        let level = |size| CacheConfig {
            size,
            block_size,
            associativity,
            policy,
        };

        Self {
            l1: level(l1_size),
            l2: level(l2_size),
        }
    }
}

/// `ram_size` and `page_size` have to be powers of two and `ram_size > page_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    pub ram_size: usize,
    pub page_size: usize,
    pub policy: ReplacementPolicy,
}

impl PagingConfig {
    #[inline]
    pub fn frame_count(&self) -> usize {
        self.ram_size / self.page_size
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntegratedConfig {
    pub paging: PagingConfig,
    pub caches: HierarchyConfig,
}

impl IntegratedConfig {
    /// Setup where every engine evicts by LRU
    pub fn lru(
        ram_size: usize,
        page_size: usize,
        l1_size: usize,
        l2_size: usize,
        block_size: usize,
        associativity: usize,
    ) -> Self {
        Self {
            paging: PagingConfig {
                ram_size,
                page_size,
                policy: ReplacementPolicy::Lru,
            },
            caches: HierarchyConfig::shared(
                l1_size,
                l2_size,
                block_size,
                associativity,
                ReplacementPolicy::Lru,
            ),
        }
    }
}
