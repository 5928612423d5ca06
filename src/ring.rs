//! Bounded, mutex-guarded event rings.
//!
//! One ring exists per delivery stream (raw events, keymap events). The
//! worker pushes, any number of consumer threads pop; a single mutex
//! serializes both sides and consumers poll rather than wait. On overflow
//! the incoming event is dropped, so the oldest queued events survive a
//! stall on the consumer side.

use std::sync::Mutex;

/// Capacity of the per-stream rings. Power of two.
pub(crate) const RING_CAPACITY: usize = 1024;

pub(crate) struct Ring<T> {
    inner: Mutex<Inner<T>>,
}

struct Inner<T> {
    slots: Box<[T]>,
    /// Free-running producer counter; slot index is `head & (cap - 1)`.
    head: u64,
    /// Free-running consumer counter.
    tail: u64,
}

impl<T: Copy + Default> Ring<T> {
    /// Create a ring with the given capacity, which must be a power of two.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity.is_power_of_two());
        Self {
            inner: Mutex::new(Inner {
                slots: vec![T::default(); capacity].into_boxed_slice(),
                head: 0,
                tail: 0,
            }),
        }
    }

    /// Enqueue one event. Returns `false` if the ring is full, in which
    /// case the event is dropped.
    pub fn push(&self, ev: T) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let cap = inner.slots.len() as u64;
        if inner.head - inner.tail == cap {
            return false;
        }
        let idx = (inner.head & (cap - 1)) as usize;
        inner.slots[idx] = ev;
        inner.head += 1;
        true
    }

    /// Copy up to `out.len()` oldest events into `out`, removing them from
    /// the ring. Returns the number copied.
    pub fn pop_many(&self, out: &mut [T]) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let cap = inner.slots.len() as u64;
        let mut n = 0;
        while n < out.len() && inner.tail != inner.head {
            out[n] = inner.slots[(inner.tail & (cap - 1)) as usize];
            inner.tail += 1;
            n += 1;
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order() {
        let ring: Ring<u32> = Ring::new(8);
        for i in 0..5 {
            assert!(ring.push(i));
        }
        let mut out = [0u32; 8];
        assert_eq!(ring.pop_many(&mut out), 5);
        assert_eq!(&out[..5], &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn overflow_drops_newest() {
        let ring: Ring<u32> = Ring::new(4);
        for i in 0..4 {
            assert!(ring.push(i));
        }
        assert!(!ring.push(99));
        let mut out = [0u32; 8];
        assert_eq!(ring.pop_many(&mut out), 4);
        // The oldest events survive; the overflowing one is gone.
        assert_eq!(&out[..4], &[0, 1, 2, 3]);
    }

    #[test]
    fn double_overfill_pops_exactly_capacity() {
        let ring: Ring<u32> = Ring::new(4);
        for i in 0..8 {
            ring.push(i);
        }
        let mut out = [0u32; 16];
        assert_eq!(ring.pop_many(&mut out), 4);
        // First returned is the oldest event whose push succeeded.
        assert_eq!(&out[..4], &[0, 1, 2, 3]);
    }

    #[test]
    fn partial_pop_keeps_remainder() {
        let ring: Ring<u32> = Ring::new(8);
        for i in 0..6 {
            ring.push(i);
        }
        let mut small = [0u32; 2];
        assert_eq!(ring.pop_many(&mut small), 2);
        assert_eq!(small, [0, 1]);
        let mut rest = [0u32; 8];
        assert_eq!(ring.pop_many(&mut rest), 4);
        assert_eq!(&rest[..4], &[2, 3, 4, 5]);
    }

    #[test]
    fn space_reclaimed_after_pop() {
        let ring: Ring<u32> = Ring::new(4);
        for i in 0..4 {
            ring.push(i);
        }
        let mut out = [0u32; 2];
        ring.pop_many(&mut out);
        assert!(ring.push(4));
        assert!(ring.push(5));
        assert!(!ring.push(6));
        let mut rest = [0u32; 8];
        assert_eq!(ring.pop_many(&mut rest), 4);
        assert_eq!(&rest[..4], &[2, 3, 4, 5]);
    }
}
