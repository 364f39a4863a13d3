//! Deferred actions on the simulation timeline
//!
//! A min-heap of `(deadline tick, sequence, action)`. The game loop pops
//! everything that is due at the start of each tick. There is no
//! per-entry cancellation; `clear` drops everything at once.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone)]
struct Entry<A> {
    deadline: u64,
    seq: u64,
    action: A,
}

impl<A> PartialEq for Entry<A> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<A> Eq for Entry<A> {}

impl<A> PartialOrd for Entry<A> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<A> Ord for Entry<A> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.deadline, self.seq).cmp(&(other.deadline, other.seq))
    }
}

/// Scheduled actions ordered by deadline, FIFO among equal deadlines
#[derive(Debug, Clone)]
pub struct Timeline<A> {
    heap: BinaryHeap<Reverse<Entry<A>>>,
    next_seq: u64,
}

impl<A> Default for Timeline<A> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }
}

impl<A> Timeline<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire at tick `deadline`
    pub fn schedule(&mut self, deadline: u64, action: A) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Entry {
            deadline,
            seq,
            action,
        }));
    }

    /// Schedule `action` `delay` ticks after `now`
    pub fn schedule_after(&mut self, now: u64, delay: u64, action: A) {
        self.schedule(now.saturating_add(delay), action);
    }

    /// Pop the earliest action whose deadline is at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<A> {
        match self.heap.peek() {
            Some(Reverse(entry)) if entry.deadline <= now => {
                self.heap.pop().map(|Reverse(entry)| entry.action)
            }
            _ => None,
        }
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.heap.peek().map(|Reverse(entry)| entry.deadline)
    }

    /// Whether any pending action satisfies `pred`
    pub fn any(&self, mut pred: impl FnMut(&A) -> bool) -> bool {
        self.heap.iter().any(|Reverse(entry)| pred(&entry.action))
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_deadline_order() {
        let mut tl = Timeline::new();
        tl.schedule(30, "c");
        tl.schedule(10, "a");
        tl.schedule(20, "b");

        assert_eq!(tl.next_deadline(), Some(10));
        assert_eq!(tl.pop_due(100), Some("a"));
        assert_eq!(tl.pop_due(100), Some("b"));
        assert_eq!(tl.pop_due(100), Some("c"));
        assert_eq!(tl.pop_due(100), None);
    }

    #[test]
    fn test_not_due_yet() {
        let mut tl = Timeline::new();
        tl.schedule_after(5, 10, 'x');
        assert_eq!(tl.pop_due(14), None);
        assert_eq!(tl.pop_due(15), Some('x'));
    }

    #[test]
    fn test_equal_deadlines_are_fifo() {
        let mut tl = Timeline::new();
        for i in 0..5 {
            tl.schedule(7, i);
        }
        let order: Vec<_> = std::iter::from_fn(|| tl.pop_due(7)).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut tl = Timeline::new();
        tl.schedule(1, ());
        tl.schedule(2, ());
        assert_eq!(tl.len(), 2);
        tl.clear();
        assert!(tl.is_empty());
        assert_eq!(tl.pop_due(u64::MAX), None);
    }

    #[test]
    fn test_any() {
        let mut tl = Timeline::new();
        tl.schedule(3, 42);
        assert!(tl.any(|&a| a == 42));
        assert!(!tl.any(|&a| a == 7));
    }
}
