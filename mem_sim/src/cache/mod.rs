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

mod address;
mod hierarchy;

use core::fmt;

use log::trace;

pub use address::{AddressLayout, DecodedAddress};
pub use hierarchy::{
    CacheHierarchy, HierarchyAccess, L1_HIT_CYCLES, L2_HIT_CYCLES, RAM_ACCESS_CYCLES,
};

use crate::{
    config::CacheConfig,
    modules::replacement::{AnyReplacementModule, ReplacementModule, ReplacementPolicy},
    stats::CacheStats,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CacheLine {
    valid: bool,
    tag: u64,
    physical_address: u64,
    modified: bool,
}

impl CacheLine {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    #[inline]
    pub fn tag(&self) -> u64 {
        self.tag
    }

    /// Address of the access that loaded this line
    #[inline]
    pub fn physical_address(&self) -> u64 {
        self.physical_address
    }

    #[inline]
    pub fn is_modified(&self) -> bool {
        self.modified
    }
}

struct CacheSet {
    lines: Vec<CacheLine>,

    /// `None` for direct mapped caches
    replacement: Option<AnyReplacementModule>,
}

impl CacheSet {
    fn new(associativity: usize, policy: ReplacementPolicy) -> Self {
        let replacement = if associativity > 1 {
            Some(AnyReplacementModule::new(policy, associativity))
        } else {
            None
        };

        Self {
            lines: vec![CacheLine::default(); associativity],
            replacement,
        }
    }

    fn find(&self, tag: u64) -> Option<usize> {
        self.lines.iter().position(|line| line.valid && line.tag == tag)
    }

    fn hit(&mut self, way: usize, is_write: bool) {
        if is_write {
            self.lines[way].modified = true;
        }
        if let Some(replacement) = &mut self.replacement {
            replacement.touch(way);
        }
    }

    /// empty line if there is one, otherwise the victim of the policy
    fn fill_target(&self) -> usize {
        self.lines
            .iter()
            .position(|line| !line.valid)
            .unwrap_or_else(|| self.replacement.as_ref().map_or(0, |r| r.victim()))
    }

    /// The new occupant starts clean unless it is filled by a write
    fn install(&mut self, way: usize, tag: u64, physical_address: u64, is_write: bool) {
        self.lines[way] = CacheLine {
            valid: true,
            tag,
            physical_address,
            modified: is_write,
        };
        if let Some(replacement) = &mut self.replacement {
            replacement.install(way);
        }
    }
}

/// Set associative cache that only tracks tags
pub struct Cache {
    layout: AddressLayout,
    sets: Vec<CacheSet>,
    associativity: usize,
    policy: ReplacementPolicy,

    hits: u64,
    misses: u64,
}

impl Cache {
    /// See [`CacheConfig`] for the requirements on `config`
    pub fn new(config: CacheConfig) -> Self {
        debug_assert!(config.size.is_power_of_two(), "cache size has to be a power of two");
        debug_assert!(config.associativity.is_power_of_two(), "associativity has to be a power of two");
        debug_assert!(
            config.associativity <= config.size / config.block_size,
            "associativity exceeds line count"
        );

        let num_sets = config.num_sets();
        log::info!(
            "Created cache: size={} block={} ways={} sets={} policy={:?}",
            config.size,
            config.block_size,
            config.associativity,
            num_sets,
            config.policy
        );

        Self {
            layout: AddressLayout::new(config.block_size, num_sets),
            sets: (0..num_sets)
                .map(|_| CacheSet::new(config.associativity, config.policy))
                .collect(),
            associativity: config.associativity,
            policy: config.policy,
            hits: 0,
            misses: 0,
        }
    }

    /// Accesses `physical_address` and returns `true` on a hit.
    ///
    /// A miss always fills a line with the new tag.
    pub fn access(&mut self, physical_address: u64, is_write: bool) -> bool {
        let decoded = self.layout.decode(physical_address);
        let set = &mut self.sets[decoded.set_index];

        if let Some(way) = set.find(decoded.tag) {
            self.hits += 1;
            set.hit(way, is_write);
            trace!("Cache hit: addr={} set={} way={}", physical_address, decoded.set_index, way);
            return true;
        }

        self.misses += 1;
        let way = set.fill_target();
        if set.lines[way].valid {
            trace!(
                "Cache evict: set={} way={} tag={}",
                decoded.set_index,
                way,
                set.lines[way].tag
            );
        }
        set.install(way, decoded.tag, physical_address, is_write);
        trace!("Cache miss: addr={} set={} way={}", physical_address, decoded.set_index, way);

        false
    }

    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits
    }

    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// `hits / (hits + misses)`, `0` if there was no access yet
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            accesses => self.hits as f64 / accesses as f64,
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            hit_rate: self.hit_rate(),
        }
    }

    #[inline]
    pub fn num_sets(&self) -> usize {
        self.sets.len()
    }

    #[inline]
    pub fn associativity(&self) -> usize {
        self.associativity
    }

    #[inline]
    pub fn policy(&self) -> ReplacementPolicy {
        self.policy
    }

    #[inline]
    pub fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// All lines of set `set_index`, `None` if there is no such set
    pub fn set(&self, set_index: usize) -> Option<&[CacheLine]> {
        self.sets.get(set_index).map(|set| set.lines.as_slice())
    }

    /// Every valid line together with the index of its set
    pub fn valid_lines(&self) -> impl Iterator<Item = (usize, &CacheLine)> + '_ {
        self.sets.iter().enumerate().flat_map(|(set_index, set)| {
            set.lines
                .iter()
                .filter(|line| line.valid)
                .map(move |line| (set_index, line))
        })
    }

    pub fn dump(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Cache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Cache Dump ---")?;
        for (set_index, line) in self.valid_lines() {
            write!(
                f,
                "Set: {} | Tag:{} | PhysAddr:{}",
                set_index, line.tag, line.physical_address
            )?;
            if line.modified {
                write!(f, " | modified")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "------------------")
    }
}

#[cfg(test)]
mod test {
    use super::Cache;
    use crate::{config::CacheConfig, modules::replacement::ReplacementPolicy};

    fn cache(size: usize, block_size: usize, associativity: usize, policy: ReplacementPolicy) -> Cache {
        Cache::new(CacheConfig {
            size,
            block_size,
            associativity,
            policy,
        })
    }

    #[test]
    fn test_direct_mapped_scenario() {
        for policy in [ReplacementPolicy::Fifo, ReplacementPolicy::Lru] {
            let mut cache = cache(32, 16, 1, policy);
            assert_eq!(cache.num_sets(), 2);

            assert!(!cache.access(0, false));
            assert!(cache.access(0, false));
            assert!(!cache.access(16, false));

            assert_eq!(cache.hits(), 1);
            assert_eq!(cache.misses(), 2);
            assert!((cache.hit_rate() - 1.0 / 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_direct_mapped_conflict() {
        let mut cache = cache(32, 16, 1, ReplacementPolicy::Lru);

        // 0 and 32 map to set 0
        assert!(!cache.access(0, true));
        assert!(!cache.access(32, false));
        assert!(!cache.access(0, false));

        // the dirty bit belongs to the evicted occupant and leaves with it
        let line = cache.set(0).unwrap()[0];
        assert_eq!(line.tag(), 0);
        assert!(!line.is_modified(), "refilled line must not inherit the modified bit");
    }

    #[test]
    fn test_associative_refill_starts_clean() {
        let mut cache = cache(64, 16, 2, ReplacementPolicy::Fifo);
        assert_eq!(cache.num_sets(), 2);

        // 0, 32 and 64 map to set 0
        assert!(!cache.access(0, true));
        assert!(!cache.access(32, true));
        assert!(!cache.access(64, false));

        let lines = cache.set(0).unwrap();
        assert_eq!(lines[0].tag(), 2);
        assert!(!lines[0].is_modified());
        assert!(lines[1].is_modified());

        // a write hit still marks the refilled line
        assert!(cache.access(64, true));
        assert!(cache.set(0).unwrap()[0].is_modified());
    }

    #[test]
    fn test_set_out_of_range() {
        let cache = cache(32, 16, 1, ReplacementPolicy::Lru);
        assert_eq!(cache.set(1).map(|lines| lines.len()), Some(1));
        assert!(cache.set(2).is_none());
    }

    #[test]
    fn test_lru_eviction() {
        // one set with two ways
        let mut cache = cache(32, 16, 2, ReplacementPolicy::Lru);
        assert_eq!(cache.num_sets(), 1);

        assert!(!cache.access(0, false)); // A
        assert!(!cache.access(16, false)); // B
        assert!(cache.access(0, false)); // A is most recent now
        assert!(!cache.access(32, false)); // C evicts B

        assert!(cache.access(0, false));
        assert!(cache.access(32, false));
        assert!(!cache.access(16, false));
    }

    #[test]
    fn test_fifo_eviction() {
        let mut cache = cache(32, 16, 2, ReplacementPolicy::Fifo);

        assert!(!cache.access(0, false)); // A
        assert!(!cache.access(16, false)); // B
        assert!(cache.access(0, false)); // hit does not save A
        assert!(!cache.access(32, false)); // C evicts A

        assert!(cache.access(16, false));
        assert!(cache.access(32, false));
        assert!(!cache.access(0, false)); // A evicts B
        assert!(!cache.access(16, false));
    }

    #[test]
    fn test_write_marks_modified() {
        let mut cache = cache(64, 16, 2, ReplacementPolicy::Lru);

        cache.access(0, false);
        cache.access(16, true);
        cache.access(0, true);

        let modified: Vec<(usize, bool)> = cache
            .valid_lines()
            .map(|(set, line)| (set, line.is_modified()))
            .collect();
        assert_eq!(modified, vec![(0, true), (1, true)]);
    }

    #[test]
    fn test_fill_prefers_empty_lines() {
        let mut cache = cache(64, 16, 4, ReplacementPolicy::Fifo);
        for addr in [0, 16, 32, 48] {
            assert!(!cache.access(addr, false));
        }
        for addr in [0, 16, 32, 48] {
            assert!(cache.access(addr, false));
        }
        assert_eq!(cache.valid_lines().count(), 4);
    }

    #[test]
    fn test_rates_without_access() {
        let cache = cache(64, 16, 2, ReplacementPolicy::Lru);
        assert_eq!(cache.hit_rate(), 0.0);
        assert_eq!(cache.stats().miss_rate(), 0.0);
    }

    #[test]
    fn test_dump_format() {
        let mut cache = cache(32, 16, 1, ReplacementPolicy::Fifo);
        cache.access(0, false);
        cache.access(17, true);

        assert_eq!(
            cache.dump(),
            "--- Cache Dump ---\nSet: 0 | Tag:0 | PhysAddr:0\nSet: 1 | Tag:0 | PhysAddr:17 | modified\n------------------\n"
        );
    }
}
