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

/// Snapshot of the counters of a [`crate::SegmentAllocator`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AllocatorStats {
    pub total: usize,
    pub used: usize,
    pub attempts: u64,
    pub hits: u64,
    /// in percent
    pub success_rate: f64,
    /// fraction in `[0, 1)`
    pub external_fragmentation: f64,
}

impl fmt::Display for AllocatorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total: {} | Used: {} | Success: {}% | Ext Frag: {}%",
            self.total,
            self.used,
            self.success_rate,
            self.external_fragmentation * 100.0
        )
    }
}

/// Snapshot of the counters of a [`crate::cache::Cache`]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

impl CacheStats {
    #[inline]
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Local miss rate, `0` if this cache was never accessed
    pub fn miss_rate(&self) -> f64 {
        match self.accesses() {
            0 => 0.0,
            accesses => self.misses as f64 / accesses as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct HierarchyStats {
    pub l1: CacheStats,
    pub l2: CacheStats,
    /// cycles
    pub l1_miss_penalty: f64,
    /// cycles
    pub average_access_time: f64,
}

impl fmt::Display for HierarchyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "========== Hierarchical Stats ==========")?;
        writeln!(f, "L1 Cache:")?;
        writeln!(f, "  Hits:             {}", self.l1.hits)?;
        writeln!(f, "  Misses:           {}", self.l1.misses)?;
        writeln!(f, "  Hit Rate:         {:.2}%", self.l1.hit_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "L2 Cache:")?;
        writeln!(f, "  Hits:             {}", self.l2.hits)?;
        writeln!(f, "  Misses:           {}", self.l2.misses)?;
        writeln!(f, "  Local Hit Rate:   {:.2}%", self.l2.hit_rate * 100.0)?;
        writeln!(f)?;
        writeln!(f, "Performance Metrics:")?;
        writeln!(f, "  L1 Miss Penalty:  {:.2} cycles", self.l1_miss_penalty)?;
        writeln!(f, "  Avg Access Time:  {:.2} cycles", self.average_access_time)?;
        writeln!(f, "========================================")
    }
}

/// Snapshot of the counters of a [`crate::paging::PhysicalMemory`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PagingStats {
    pub page_faults: u64,
    pub page_hits: u64,
    pub frames_used: usize,
    pub frame_count: usize,
}
