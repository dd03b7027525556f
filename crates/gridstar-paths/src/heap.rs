//! Array-backed binary heap ordered by an injected comparator.
//!
//! There is no decrease-key: an element's priority is fixed once inserted.
//! To lower a priority, insert a new element and have the consumer skip the
//! stale one when it is popped (the A* closed set does exactly that). Equal
//! elements come out in whatever order the swaps leave them in.

use std::cmp::Ordering;
use std::fmt;

/// Comparator type used by [`PriorityQueue::min`] and [`PriorityQueue::max`].
pub type Comparator<T> = fn(&T, &T) -> Ordering;

fn ascending<T: Ord>(a: &T, b: &T) -> Ordering {
    a.cmp(b)
}

fn descending<T: Ord>(a: &T, b: &T) -> Ordering {
    b.cmp(a)
}

/// A priority queue that yields the element ranked lowest by its comparator.
///
/// With an ascending comparator this is a min-heap, with a descending one a
/// max-heap. Heap property: `cmp(parent, child) != Greater` for every
/// non-root element.
pub struct PriorityQueue<T, C = Comparator<T>> {
    data: Vec<T>,
    cmp: C,
}

impl<T: Ord> PriorityQueue<T> {
    /// Min-heap under `T`'s natural order.
    pub fn min() -> Self {
        Self::with_comparator(ascending::<T>)
    }

    /// Max-heap under `T`'s natural order.
    pub fn max() -> Self {
        Self::with_comparator(descending::<T>)
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::min()
    }
}

impl<T, C> PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    /// Create an empty queue ordered by `cmp`. The element for which `cmp`
    /// reports `Less` against all others is extracted first.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            data: Vec::new(),
            cmp,
        }
    }

    /// Number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The top element, if any.
    #[inline]
    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    /// Insert `value`. O(log n).
    pub fn insert(&mut self, value: T) {
        self.data.push(value);
        self.sift_up(self.data.len() - 1);
    }

    /// Remove and return the top element, or `None` if empty. O(log n).
    pub fn extract_top(&mut self) -> Option<T> {
        let last = self.data.pop()?;
        if self.data.is_empty() {
            return Some(last);
        }
        let top = std::mem::replace(&mut self.data[0], last);
        self.sift_down(0);
        Some(top)
    }

    /// Remove every element.
    pub fn clear(&mut self) {
        self.data.clear();
    }

    /// Iterate over the elements in storage order (not priority order).
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if (self.cmp)(&self.data[parent], &self.data[i]) != Ordering::Greater {
                break;
            }
            self.data.swap(parent, i);
            i = parent;
        }
    }

    fn sift_down(&mut self, mut i: usize) {
        let n = self.data.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n
                && (self.cmp)(&self.data[right], &self.data[left]) == Ordering::Less
            {
                right
            } else {
                left
            };
            if (self.cmp)(&self.data[i], &self.data[child]) != Ordering::Greater {
                break;
            }
            self.data.swap(i, child);
            i = child;
        }
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.data.len())
            .all(|i| (self.cmp)(&self.data[(i - 1) / 2], &self.data[i]) != Ordering::Greater)
    }
}

impl<T, C> Extend<T> for PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.insert(v);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for PriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("data", &self.data)
            .finish_non_exhaustive()
    }
}
