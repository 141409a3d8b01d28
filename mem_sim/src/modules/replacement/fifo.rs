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

use super::ReplacementModule;

/// Rotating pointer over all slots.
///
/// Every install moves the pointer one slot further, hits do not change it.
#[derive(Debug, Clone)]
pub struct FifoReplacementModule {
    next_victim: usize,
    slot_count: usize,
}

impl FifoReplacementModule {
    pub fn new(slot_count: usize) -> Self {
        Self {
            next_victim: 0,
            slot_count,
        }
    }
}

impl ReplacementModule for FifoReplacementModule {
    fn touch(&mut self, _slot: usize) {}

    fn install(&mut self, _slot: usize) {
        self.next_victim = (self.next_victim + 1) % self.slot_count;
    }

    fn victim(&self) -> usize {
        self.next_victim
    }
}

#[cfg(test)]
mod test {
    use super::FifoReplacementModule;
    use crate::modules::replacement::ReplacementModule;

    #[test]
    fn test_fifo_ignores_hits() {
        let mut fifo = FifoReplacementModule::new(3);
        fifo.install(0);
        fifo.install(1);
        fifo.install(2);
        assert_eq!(fifo.victim(), 0);

        fifo.touch(0);
        fifo.touch(0);
        assert_eq!(fifo.victim(), 0);

        fifo.install(0);
        assert_eq!(fifo.victim(), 1);
    }
}
