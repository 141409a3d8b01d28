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

use core::fmt;

use static_assertions::const_assert;

use super::Cache;
use crate::{config::HierarchyConfig, stats::HierarchyStats};

pub const L1_HIT_CYCLES: u32 = 1;
pub const L2_HIT_CYCLES: u32 = 10;
pub const RAM_ACCESS_CYCLES: u32 = 100;

const_assert!(L1_HIT_CYCLES < L2_HIT_CYCLES);
const_assert!(L2_HIT_CYCLES < RAM_ACCESS_CYCLES);

/// Outcome of one access to a [`CacheHierarchy`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HierarchyAccess {
    pub l1_hit: bool,
    /// `None` if L2 was not probed because L1 hit
    pub l2_hit: Option<bool>,
}

/// Two independent cache levels.
///
/// Every L1 miss is forwarded to L2. There is no inclusion or write back between the levels.
pub struct CacheHierarchy {
    l1: Cache,
    l2: Cache,
}

impl CacheHierarchy {
    pub fn new(config: HierarchyConfig) -> Self {
        Self::from_caches(Cache::new(config.l1), Cache::new(config.l2))
    }

    pub fn from_caches(l1: Cache, l2: Cache) -> Self {
        Self { l1, l2 }
    }

    pub fn access(&mut self, physical_address: u64, is_write: bool) -> HierarchyAccess {
        if self.l1.access(physical_address, is_write) {
            return HierarchyAccess {
                l1_hit: true,
                l2_hit: None,
            };
        }

        HierarchyAccess {
            l1_hit: false,
            l2_hit: Some(self.l2.access(physical_address, is_write)),
        }
    }

    #[inline]
    pub fn l1(&self) -> &Cache {
        &self.l1
    }

    #[inline]
    pub fn l2(&self) -> &Cache {
        &self.l2
    }

    /// Derives the average access time from the hit rates of both levels.
    ///
    /// The L2 miss rate is the local one (among the accesses L2 received).
    pub fn stats(&self) -> HierarchyStats {
        let l1 = self.l1.stats();
        let l2 = self.l2.stats();

        let l1_miss_penalty = L2_HIT_CYCLES as f64 + l2.miss_rate() * RAM_ACCESS_CYCLES as f64;
        let average_access_time = L1_HIT_CYCLES as f64 + l1.miss_rate() * l1_miss_penalty;

        HierarchyStats {
            l1,
            l2,
            l1_miss_penalty,
            average_access_time,
        }
    }
}

impl fmt::Display for CacheHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[L1 DUMP]")?;
        write!(f, "{}", self.l1)?;
        writeln!(f, "[L2 DUMP]")?;
        write!(f, "{}", self.l2)
    }
}
