use std::cmp::Ordering;

use crate::line::Line;

/// One frontier element of the k-way merge: a candidate line together with
/// the index of the merge source that produced it. Entries are ordered
/// solely by their line under the active comparator.
#[derive(Debug)]
pub struct HeapEntry {
    pub line: Line,
    pub source: usize,
}

/// Array-backed binary min-heap driven by an explicit comparison function.
///
/// `std::collections::BinaryHeap` wants a static `Ord` on the element type,
/// but the merge order here is a runtime strategy, so the sift-up/sift-down
/// machinery is spelled out instead. `pop` always returns the smallest
/// remaining value under the supplied comparison.
pub struct MinHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    items: Vec<T>,
    compare: C,
}

impl<T, C> MinHeap<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn new(compare: C) -> Self {
        Self {
            items: Vec::new(),
            compare,
        }
    }

    pub fn with_capacity(capacity: usize, compare: C) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            compare,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
        self.sift_up(self.items.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop();
        if !self.items.is_empty() {
            self.sift_down(0);
        }
        min
    }

    fn sift_up(&mut self, mut idx: usize) {
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if (self.compare)(&self.items[idx], &self.items[parent]) == Ordering::Less {
                self.items.swap(idx, parent);
                idx = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut idx: usize) {
        let len = self.items.len();
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            let mut smallest = idx;

            if left < len
                && (self.compare)(&self.items[left], &self.items[smallest]) == Ordering::Less
            {
                smallest = left;
            }
            if right < len
                && (self.compare)(&self.items[right], &self.items[smallest]) == Ordering::Less
            {
                smallest = right;
            }
            if smallest == idx {
                break;
            }
            self.items.swap(idx, smallest);
            idx = smallest;
        }
    }
}
