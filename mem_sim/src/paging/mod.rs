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

mod physical;
mod system;
mod virtual_memory;

use std::collections::BTreeMap;

pub use physical::{Frame, FrameOwner, PhysicalMemory};
pub use system::PagingSystem;
pub use virtual_memory::{PageTableEntry, VirtualMemory};

pub type ProcessId = u32;

/// Index of a frame of a [`PhysicalMemory`]
pub type FrameNumber = usize;

/// Routes eviction notifications from [`PhysicalMemory`] to the page tables of other processes
pub trait PageTableRegistry {
    /// Called once the frame backing page `vpn` of process `pid` is going to be reassigned
    fn invalidate(&mut self, pid: ProcessId, vpn: u64);
}

impl PageTableRegistry for BTreeMap<ProcessId, VirtualMemory> {
    fn invalidate(&mut self, pid: ProcessId, vpn: u64) {
        if let Some(process) = self.get_mut(&pid) {
            process.invalidate(vpn);
        }
    }
}
