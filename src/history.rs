//! Fixed-capacity circular buffer with oldest-overwrite semantics.
//!
//! All of the engine's bounded state lives in [`BoundedHistory`] rings: the
//! frame history, the per-player attack start records and the buffered
//! connection frames of an in-flight string. The buffer is allocated once and
//! never reallocates; every index is reduced modulo capacity, so no operation
//! can touch a slot outside `[0, capacity)`.

use crate::Tick;

/// A fixed-capacity ring buffer that silently overwrites its oldest entry
/// when full.
///
/// `head` is the most recently pushed live item, `tail` the oldest. Pushing
/// into a full buffer advances both, dropping the old tail.
///
/// The element type must be `Default` because [`pop`](Self::pop) on an empty
/// buffer returns a neutral zero-value rather than failing; callers that care
/// check [`is_empty`](Self::is_empty) first.
#[derive(Debug, Clone)]
pub struct BoundedHistory<T> {
    /// Absolute slot of the newest live item.
    head: usize,
    /// Absolute slot of the oldest live item.
    tail: usize,
    /// Number of live items, `0..=capacity`.
    len: usize,
    /// The backing store, allocated once at construction.
    slots: Vec<T>,
}

impl<T: Clone + Default> BoundedHistory<T> {
    /// Creates a buffer with the given fixed capacity.
    ///
    /// Returns `None` for capacities below 2; a one-slot ring cannot hold the
    /// previous/current pair every consumer of this type needs.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Option<Self> {
        if capacity < 2 {
            tracing::error!(capacity, "history capacity must be at least 2");
            return None;
        }
        Some(Self {
            head: 0,
            tail: 0,
            len: 0,
            slots: vec![T::default(); capacity],
        })
    }

    /// The fixed capacity this buffer was created with.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live items.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no live items are stored.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends an item, overwriting the oldest entry when full.
    pub fn push(&mut self, item: T) {
        let capacity = self.capacity();
        if self.len < capacity {
            self.len += 1;
        }
        // The very first push lands on slot 0 without moving the head.
        if self.len > 1 {
            self.head = (self.head + 1) % capacity;
            if self.head == self.tail {
                self.tail = (self.tail + 1) % capacity;
            }
        }
        self.slots[self.head] = item;
    }

    /// The most recently pushed item, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn head(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        Some(&self.slots[self.head])
    }

    /// The oldest live item, or `None` when empty.
    #[inline]
    #[must_use]
    pub fn tail(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        Some(&self.slots[self.tail])
    }

    /// Absolute slot index of the most recent item.
    ///
    /// Only meaningful relative to this buffer; recorded into
    /// [`StartFrame`](crate::StartFrame) so a start record can be traced back
    /// to the snapshot that produced it while that snapshot is still live.
    #[inline]
    #[must_use]
    pub fn head_index(&self) -> usize {
        self.head
    }

    /// The item `k` positions back from the most recent one.
    ///
    /// `k = 0` is the head itself. Returns `None` once `k` reaches past the
    /// oldest live item.
    #[must_use]
    pub fn peek_from_head(&self, k: usize) -> Option<&T> {
        if k >= self.len {
            return None;
        }
        let capacity = self.capacity();
        // k < len <= capacity, so head + capacity - k cannot underflow.
        let index = (self.head + capacity - k) % capacity;
        Some(&self.slots[index])
    }

    /// Removes and returns the oldest item.
    ///
    /// On an empty buffer this returns `T::default()` instead of failing;
    /// the resolver drains rings in a loop and treats the zero-value as
    /// "nothing left".
    pub fn pop(&mut self) -> T {
        if self.len == 0 {
            return T::default();
        }
        let old_tail = self.tail;
        self.len -= 1;
        if self.tail != self.head {
            self.tail = (self.tail + 1) % self.capacity();
        }
        std::mem::take(&mut self.slots[old_tail])
    }

    /// Resets to empty without reallocating.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }
}

/// Convenience accessor used by the scheduler: the tick recorded on the most
/// recent history entry, if any.
impl BoundedHistory<crate::GameFrame> {
    /// Tick of the newest buffered frame.
    #[inline]
    #[must_use]
    pub fn head_tick(&self) -> Option<Tick> {
        self.head().map(|frame| frame.tick)
    }
}

// #########
// # TESTS #
// #########
