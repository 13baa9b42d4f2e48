//! Fixed-capacity, oldest-evicted history buffer

use std::collections::VecDeque;

/// Append-only ring buffer that drops its oldest item once full
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedHistory<T> {
    /// Create an empty history holding at most `capacity` items (min 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Append an item, returning the evicted oldest item if the buffer was full
    pub fn push(&mut self, item: T) -> Option<T> {
        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_front()
        } else {
            None
        };
        self.entries.push_back(item);
        evicted
    }

    pub fn last(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest to newest
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + ExactSizeIterator {
        self.entries.iter()
    }

    /// The newest `n` items, oldest first
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &T> {
        self.entries.iter().skip(self.entries.len().saturating_sub(n))
    }

    /// Keep only items matching the predicate, returning how many were removed
    pub fn retain<F: FnMut(&T) -> bool>(&mut self, f: F) -> usize {
        let before = self.entries.len();
        self.entries.retain(f);
        before - self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_evicts_oldest_first() {
        let mut history = BoundedHistory::new(3);
        assert_eq!(history.push(1), None);
        assert_eq!(history.push(2), None);
        assert_eq!(history.push(3), None);
        assert_eq!(history.push(4), Some(1));
        assert_eq!(history.push(5), Some(2));

        assert_eq!(history.len(), 3);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(history.last(), Some(&5));
    }

    #[test]
    fn test_never_exceeds_capacity() {
        let mut history = BoundedHistory::new(7);
        for i in 0..1000 {
            history.push(i);
            assert!(history.len() <= 7);
        }
        assert_eq!(history.iter().next(), Some(&993));
    }

    #[test]
    fn test_tail_and_retain() {
        let mut history = BoundedHistory::new(10);
        for i in 0..6 {
            history.push(i);
        }
        assert_eq!(history.tail(3).copied().collect::<Vec<_>>(), vec![3, 4, 5]);
        assert_eq!(history.tail(100).count(), 6);

        let removed = history.retain(|v| v % 2 == 0);
        assert_eq!(removed, 3);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec![0, 2, 4]);
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let mut history = BoundedHistory::new(0);
        history.push("a");
        history.push("b");
        assert_eq!(history.capacity(), 1);
        assert_eq!(history.iter().copied().collect::<Vec<_>>(), vec!["b"]);
    }
}
