//! Per-stream delivery policy: registered sink or bounded ring.
//!
//! Each stream owns one sink slot and one ring. When a sink is installed
//! the worker invokes it synchronously and the ring stays empty; otherwise
//! events accumulate in the ring for [`pop_many`](Dispatch::pop_many). The
//! sink `Arc` is cloned out of the slot before invocation, so replacing a
//! sink never waits for in-flight callbacks and callbacks already underway
//! complete against the sink that was registered when they started.

use std::sync::{Arc, RwLock};

use crate::ring::{Ring, RING_CAPACITY};

pub(crate) type SinkFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub(crate) struct Dispatch<T> {
    sink: RwLock<Option<SinkFn<T>>>,
    ring: Ring<T>,
}

impl<T: Copy + Default> Dispatch<T> {
    pub fn new() -> Self {
        Self {
            sink: RwLock::new(None),
            ring: Ring::new(RING_CAPACITY),
        }
    }

    /// Install or remove the sink for this stream.
    pub fn set_sink(&self, sink: Option<SinkFn<T>>) {
        *self.sink.write().unwrap() = sink;
    }

    /// Deliver one event: sink if installed, ring otherwise. A full ring
    /// drops the event.
    pub fn deliver(&self, ev: &T) {
        let sink = self.sink.read().unwrap().clone();
        match sink {
            Some(f) => f(ev),
            None => {
                let _ = self.ring.push(*ev);
            }
        }
    }

    /// Consumer-side entry point for the ring path.
    pub fn pop_many(&self, out: &mut [T]) -> usize {
        self.ring.pop_many(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn ring_path_when_no_sink() {
        let dispatch: Dispatch<u32> = Dispatch::new();
        dispatch.deliver(&7);
        dispatch.deliver(&8);
        let mut out = [0u32; 4];
        assert_eq!(dispatch.pop_many(&mut out), 2);
        assert_eq!(&out[..2], &[7, 8]);
    }

    #[test]
    fn sink_path_bypasses_ring() {
        let dispatch: Dispatch<u32> = Dispatch::new();
        let seen = Arc::new(AtomicU32::new(0));
        let seen2 = seen.clone();
        dispatch.set_sink(Some(Arc::new(move |ev: &u32| {
            seen2.fetch_add(*ev, Ordering::SeqCst);
        })));
        dispatch.deliver(&5);
        dispatch.deliver(&6);
        assert_eq!(seen.load(Ordering::SeqCst), 11);
        let mut out = [0u32; 4];
        assert_eq!(dispatch.pop_many(&mut out), 0);
    }

    #[test]
    fn clearing_sink_restores_ring_path() {
        let dispatch: Dispatch<u32> = Dispatch::new();
        dispatch.set_sink(Some(Arc::new(|_: &u32| {})));
        dispatch.deliver(&1);
        dispatch.set_sink(None);
        dispatch.deliver(&2);
        let mut out = [0u32; 4];
        assert_eq!(dispatch.pop_many(&mut out), 1);
        assert_eq!(out[0], 2);
    }
}
