use crate::{Backend, error::BackendConstructionError};

use super::native_arena;

#[derive(Clone, Debug)]
pub(crate) struct RingBuffer {
    buffer: Vec<f64>,
    head: usize,
    len: usize,
}

impl RingBuffer {
    #[must_use]
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            buffer: vec![0.0; capacity],
            head: 0,
            len: 0,
        }
    }

    pub(crate) fn for_backend(
        backend: Backend,
        capacity: usize,
    ) -> Result<Self, BackendConstructionError> {
        match backend {
            Backend::Native => Ok(Self {
                buffer: native_arena(capacity, 0.0)?,
                head: 0,
                len: 0,
            }),
            Backend::Fallback => Ok(Self::new(capacity)),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Appends `value`, returning the evicted oldest value once full.
    #[inline]
    pub(crate) fn push(&mut self, value: f64) -> Option<f64> {
        if self.is_full() {
            let old = self.buffer[self.head];

            self.buffer[self.head] = value;

            self.head += 1;
            if self.head == self.capacity() {
                self.head = 0;
            }

            Some(old)
        } else {
            self.buffer[self.len] = value;
            self.len += 1;

            None
        }
    }

    /// Value at `index`, 0 being the oldest retained.
    #[inline]
    pub(crate) fn get(&self, index: usize) -> f64 {
        debug_assert!(index < self.len);
        let slot = self.head + index;
        if slot >= self.capacity() {
            self.buffer[slot - self.capacity()]
        } else {
            self.buffer[slot]
        }
    }

    #[inline]
    pub(crate) fn oldest(&self) -> Option<f64> {
        (self.len > 0).then(|| self.get(0))
    }

    #[inline]
    pub(crate) fn newest(&self) -> Option<f64> {
        (self.len > 0).then(|| self.get(self.len - 1))
    }

    /// Oldest to newest.
    pub(crate) fn iter(&self) -> impl DoubleEndedIterator<Item = f64> + '_ {
        (0..self.len).map(|index| self.get(index))
    }

    pub(crate) fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
