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

const NIL: usize = usize::MAX;

/// Recency order over all slots as a doubly linked list stored in two index arrays.
///
/// `head` is the most recently used slot, `tail` the least recently used one.
/// Initially slot `0` is at the head and the last slot at the tail.
#[derive(Debug, Clone)]
pub struct LruReplacementModule {
    prev: Vec<usize>,
    next: Vec<usize>,
    head: usize,
    tail: usize,
}

impl LruReplacementModule {
    pub fn new(slot_count: usize) -> Self {
        let prev = (0..slot_count)
            .map(|i| if i == 0 { NIL } else { i - 1 })
            .collect();
        let next = (0..slot_count)
            .map(|i| if i + 1 == slot_count { NIL } else { i + 1 })
            .collect();

        Self {
            prev,
            next,
            head: if slot_count == 0 { NIL } else { 0 },
            tail: if slot_count == 0 { NIL } else { slot_count - 1 },
        }
    }

    /// Iterates from the most recently used to the least recently used slot
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let mut curr = self.head;
        core::iter::from_fn(move || {
            if curr == NIL {
                return None;
            }
            let item = curr;
            curr = self.next[item];
            Some(item)
        })
    }

    fn move_to_front(&mut self, slot: usize) {
        if self.head == slot {
            return;
        }

        // unlink
        let (prev, next) = (self.prev[slot], self.next[slot]);
        if prev != NIL {
            self.next[prev] = next;
        }
        if next != NIL {
            self.prev[next] = prev;
        } else {
            self.tail = prev;
        }

        // push front
        self.prev[slot] = NIL;
        self.next[slot] = self.head;
        if self.head != NIL {
            self.prev[self.head] = slot;
        }
        self.head = slot;
        if self.tail == NIL {
            self.tail = slot;
        }
    }
}

impl ReplacementModule for LruReplacementModule {
    fn touch(&mut self, slot: usize) {
        self.move_to_front(slot);
    }

    fn install(&mut self, slot: usize) {
        self.move_to_front(slot);
    }

    fn victim(&self) -> usize {
        self.tail
    }
}
