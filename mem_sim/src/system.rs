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

use crate::{
    cache::{CacheHierarchy, HierarchyAccess},
    config::IntegratedConfig,
    paging::{PagingSystem, ProcessId},
};

/// Outcome of one access to an [`IntegratedSystem`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AccessOutcome {
    pub physical_address: u64,
    pub cache: HierarchyAccess,
}

/// Virtual memory in front of a two level cache:
/// every access is translated first and the physical address then goes to the caches
pub struct IntegratedSystem {
    paging: PagingSystem,
    caches: CacheHierarchy,
}

impl IntegratedSystem {
    pub fn new(config: IntegratedConfig) -> Self {
        Self {
            paging: PagingSystem::new(config.paging),
            caches: CacheHierarchy::new(config.caches),
        }
    }

    pub fn access(&mut self, pid: ProcessId, virtual_address: u64, is_write: bool) -> AccessOutcome {
        let physical_address = self.paging.translate(pid, virtual_address);
        let cache = self.caches.access(physical_address, is_write);

        log::trace!(
            "pid={} va={} -> pa={} ({})",
            pid,
            virtual_address,
            physical_address,
            if is_write { "W" } else { "R" }
        );

        AccessOutcome {
            physical_address,
            cache,
        }
    }

    #[inline]
    pub fn paging(&self) -> &PagingSystem {
        &self.paging
    }

    #[inline]
    pub fn caches(&self) -> &CacheHierarchy {
        &self.caches
    }

    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for IntegratedSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.caches)?;
        writeln!(f, "[PHYSICAL RAM DUMP]")?;
        write!(f, "{}", self.paging.physical())
    }
}

#[cfg(test)]
mod test {
    use super::IntegratedSystem;
    use crate::{cache::HierarchyAccess, config::IntegratedConfig};

    #[test]
    fn test_translated_address_reaches_caches() {
        // 4 frames of 64 bytes, L1 128 bytes, L2 512 bytes, 16 byte blocks, 2 ways
        let mut system = IntegratedSystem::new(IntegratedConfig::lru(256, 64, 128, 512, 16, 2));

        let first = system.access(1, 0x1000, false);
        assert_eq!(first.physical_address, 0);
        assert_eq!(first.cache, HierarchyAccess { l1_hit: false, l2_hit: Some(false) });

        // another process maps to frame 1, a different cache block
        let second = system.access(2, 0x1000 + 4, true);
        assert_eq!(second.physical_address, 64 + 4);
        assert!(!second.cache.l1_hit);

        // same block as the first access
        let third = system.access(1, 0x1000 + 8, false);
        assert_eq!(third.physical_address, 8);
        assert_eq!(third.cache, HierarchyAccess { l1_hit: true, l2_hit: None });

        assert_eq!(system.paging().stats().page_faults, 2);
        assert_eq!(system.paging().stats().page_hits, 1);
        assert_eq!(system.caches().l1().hits(), 1);
        assert_eq!(system.caches().l2().misses(), 2);
    }

    #[test]
    fn test_dump_contains_all_parts() {
        let mut system = IntegratedSystem::new(IntegratedConfig::lru(64, 16, 32, 64, 16, 1));
        system.access(1, 0, true);

        let dump = system.dump();
        assert!(dump.contains("[L1 DUMP]"));
        assert!(dump.contains("[L2 DUMP]"));
        assert!(dump.contains("[PHYSICAL RAM DUMP]"));
        assert!(dump.contains(" Frame 0: PID 1 (VPN 0)"));
        assert!(dump.contains("Set: 0 | Tag:0 | PhysAddr:0 | modified"));
    }
}
