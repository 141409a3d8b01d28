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

use std::collections::BTreeMap;

use log::{debug, trace};

use super::{FrameNumber, PageTableRegistry, PhysicalMemory, ProcessId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PageTableEntry {
    frame: Option<FrameNumber>,
}

impl PageTableEntry {
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.frame.is_some()
    }

    /// Frame backing this page, `None` if the entry is invalid
    #[inline]
    pub fn frame(&self) -> Option<FrameNumber> {
        self.frame
    }
}

/// Entries are created on first reference and never removed
#[derive(Default)]
struct PageTable {
    entries: BTreeMap<u64, PageTableEntry>,
}

impl PageTable {
    fn invalidate(&mut self, vpn: u64) {
        if let Some(entry) = self.entries.get_mut(&vpn) {
            entry.frame = None;
        }
    }
}

/// Sends evictions of the translating process to its own table and all others to `others`
struct OwnerRouting<'a, R: PageTableRegistry> {
    pid: ProcessId,
    table: &'a mut PageTable,
    others: &'a mut R,
}

impl<R: PageTableRegistry> PageTableRegistry for OwnerRouting<'_, R> {
    fn invalidate(&mut self, pid: ProcessId, vpn: u64) {
        if pid == self.pid {
            self.table.invalidate(vpn);
        } else {
            self.others.invalidate(pid, vpn);
        }
    }
}

/// Page table of one process
pub struct VirtualMemory {
    pid: ProcessId,
    offset_bits: u32,
    table: PageTable,
}

impl VirtualMemory {
    /// Creates the page table of `pid` and registers it with `physical`
    pub(crate) fn new(pid: ProcessId, physical: &mut PhysicalMemory) -> Self {
        physical.register(pid);

        Self {
            pid,
            offset_bits: physical.offset_bits(),
            table: PageTable::default(),
        }
    }

    #[inline]
    pub fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Splits `virtual_address` into `(vpn, offset)`
    #[inline]
    pub fn split(&self, virtual_address: u64) -> (u64, u64) {
        (
            virtual_address >> self.offset_bits,
            virtual_address & ((1u64 << self.offset_bits) - 1),
        )
    }

    /// Translates `virtual_address` into a physical address and faults the page in if needed.
    ///
    /// `physical` has to be the memory this table was registered with and `others`
    /// has to hold every other table registered there. Evictions of pages that
    /// belong to other processes are routed to `others`.
    pub(crate) fn translate<R: PageTableRegistry>(
        &mut self,
        virtual_address: u64,
        physical: &mut PhysicalMemory,
        others: &mut R,
    ) -> u64 {
        let (vpn, offset) = self.split(virtual_address);

        if let Some(frame) = self.table.entries.entry(vpn).or_default().frame {
            physical.record_hit();
            physical.touch(frame);
            trace!("Page hit: pid={} vpn={} frame={}", self.pid, vpn, frame);
            return self.compose(frame, offset);
        }

        physical.record_fault();
        let frame = physical.allocate(
            self.pid,
            vpn,
            &mut OwnerRouting {
                pid: self.pid,
                table: &mut self.table,
                others,
            },
        );
        self.table.entries.insert(vpn, PageTableEntry { frame: Some(frame) });
        trace!("Page fault: pid={} vpn={} now in frame={}", self.pid, vpn, frame);

        self.compose(frame, offset)
    }

    /// Invalidates page `vpn` after its frame was reclaimed.
    /// The entry stays in the table so the next reference faults again.
    pub fn invalidate(&mut self, vpn: u64) {
        debug!("Invalidating pid={} vpn={}", self.pid, vpn);
        self.table.invalidate(vpn);
    }

    pub fn entry(&self, vpn: u64) -> Option<&PageTableEntry> {
        self.table.entries.get(&vpn)
    }

    /// All entries ordered by vpn
    pub fn entries(&self) -> impl Iterator<Item = (u64, &PageTableEntry)> + '_ {
        self.table.entries.iter().map(|(vpn, entry)| (*vpn, entry))
    }

    /// Number of pages that are currently backed by a frame
    pub fn resident_pages(&self) -> usize {
        self.table.entries.values().filter(|entry| entry.is_valid()).count()
    }

    #[inline]
    fn compose(&self, frame: FrameNumber, offset: u64) -> u64 {
        ((frame as u64) << self.offset_bits) | offset
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use super::VirtualMemory;
    use crate::{
        config::PagingConfig,
        modules::replacement::ReplacementPolicy,
        paging::{PhysicalMemory, ProcessId},
    };

    fn memory(ram_size: usize, page_size: usize, policy: ReplacementPolicy) -> PhysicalMemory {
        PhysicalMemory::new(PagingConfig {
            ram_size,
            page_size,
            policy,
        })
    }

    fn alone() -> BTreeMap<ProcessId, VirtualMemory> {
        BTreeMap::new()
    }

    #[test]
    fn test_single_process_lru_scenario() {
        let mut physical = memory(32, 16, ReplacementPolicy::Lru);
        let mut process = VirtualMemory::new(1, &mut physical);
        assert!(physical.is_registered(1));

        assert_eq!(process.translate(0, &mut physical, &mut alone()), 0);
        assert_eq!(process.translate(16, &mut physical, &mut alone()), 16);

        // frame 0 is least recently used
        assert_eq!(process.translate(32, &mut physical, &mut alone()), 0);
        assert_eq!(process.entry(0).map(|e| e.is_valid()), Some(false));
        assert_eq!(process.entry(2).and_then(|e| e.frame()), Some(0));

        // vpn 0 faults again and takes frame 1 from vpn 1
        assert_eq!(process.translate(0, &mut physical, &mut alone()), 16);
        assert_eq!(process.entry(1).map(|e| e.is_valid()), Some(false));
        assert_eq!(process.entry(0).and_then(|e| e.frame()), Some(1));

        assert_eq!(physical.page_faults(), 4);
        assert_eq!(physical.page_hits(), 0);
        assert_eq!(process.resident_pages(), 2);
        assert_eq!(process.entries().count(), 3);
    }

    #[test]
    fn test_hits_keep_offset_and_update_recency() {
        let mut physical = memory(32, 16, ReplacementPolicy::Lru);
        let mut process = VirtualMemory::new(1, &mut physical);

        assert_eq!(process.translate(5, &mut physical, &mut alone()), 5);
        assert_eq!(process.translate(16 + 7, &mut physical, &mut alone()), 16 + 7);
        assert_eq!(process.translate(3, &mut physical, &mut alone()), 3);
        assert_eq!(physical.page_hits(), 1);

        // vpn 0 was touched, so vpn 1 (frame 1) is evicted
        assert_eq!(process.translate(32 + 1, &mut physical, &mut alone()), 16 + 1);
        assert_eq!(process.entry(0).and_then(|e| e.frame()), Some(0));
        assert_eq!(process.entry(1).map(|e| e.is_valid()), Some(false));
    }

    #[test]
    fn test_fifo_ignores_hits() {
        let mut physical = memory(32, 16, ReplacementPolicy::Fifo);
        let mut process = VirtualMemory::new(1, &mut physical);

        process.translate(0, &mut physical, &mut alone());
        process.translate(16, &mut physical, &mut alone());
        process.translate(0, &mut physical, &mut alone());

        // oldest frame is reclaimed although it was just used
        assert_eq!(process.translate(32, &mut physical, &mut alone()), 0);
        assert_eq!(process.entry(0).map(|e| e.is_valid()), Some(false));
    }

    #[test]
    fn test_invalidate_unknown_page() {
        let mut physical = memory(32, 16, ReplacementPolicy::Lru);
        let mut process = VirtualMemory::new(1, &mut physical);

        process.invalidate(42);
        assert!(process.entry(42).is_none());
        assert_eq!(process.split(0x1234), (0x123, 0x4));
    }

    #[test]
    fn test_standalone_tables_never_share_a_frame() {
        let mut physical = memory(32, 16, ReplacementPolicy::Fifo);
        let mut others = alone();
        others.insert(1, VirtualMemory::new(1, &mut physical));
        let mut second = VirtualMemory::new(2, &mut physical);

        if let Some(first) = others.get_mut(&1) {
            assert_eq!(first.translate(0, &mut physical, &mut alone()), 0);
            assert_eq!(first.translate(16, &mut physical, &mut alone()), 16);
        }

        // pid 2 reclaims frame 0 from vpn 0 of pid 1
        assert_eq!(second.translate(0, &mut physical, &mut others), 0);
        assert_eq!(second.entry(0).and_then(|e| e.frame()), Some(0));

        let first = &others[&1];
        assert_eq!(first.entry(0).and_then(|e| e.frame()), None);
        assert_eq!(first.entry(1).and_then(|e| e.frame()), Some(1));
        assert_eq!(physical.frames()[0].owner().map(|owner| owner.pid), Some(2));
    }
}
