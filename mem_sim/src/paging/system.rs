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

use super::{PhysicalMemory, ProcessId, VirtualMemory};
use crate::{config::PagingConfig, stats::PagingStats};

/// Owns the physical memory and the page tables of all processes
/// and routes evictions between them
pub struct PagingSystem {
    physical: PhysicalMemory,
    processes: BTreeMap<ProcessId, VirtualMemory>,
}

impl PagingSystem {
    pub fn new(config: PagingConfig) -> Self {
        Self {
            physical: PhysicalMemory::new(config),
            processes: BTreeMap::new(),
        }
    }

    /// Creates the page table of `pid` if it does not exist yet
    pub fn spawn(&mut self, pid: ProcessId) -> &VirtualMemory {
        let physical = &mut self.physical;
        self.processes
            .entry(pid)
            .or_insert_with(|| VirtualMemory::new(pid, physical))
    }

    /// Translates `virtual_address` of process `pid`.
    ///
    /// Unknown processes are created on first access.
    pub fn translate(&mut self, pid: ProcessId, virtual_address: u64) -> u64 {
        // take the table out so evictions can reach all other tables
        let mut process = match self.processes.remove(&pid) {
            Some(process) => process,
            None => VirtualMemory::new(pid, &mut self.physical),
        };

        let physical_address =
            process.translate(virtual_address, &mut self.physical, &mut self.processes);
        self.processes.insert(pid, process);

        physical_address
    }

    pub fn process(&self, pid: ProcessId) -> Option<&VirtualMemory> {
        self.processes.get(&pid)
    }

    pub fn processes(&self) -> impl Iterator<Item = &VirtualMemory> + '_ {
        self.processes.values()
    }

    #[inline]
    pub fn physical(&self) -> &PhysicalMemory {
        &self.physical
    }

    pub fn stats(&self) -> PagingStats {
        self.physical.stats()
    }
}
