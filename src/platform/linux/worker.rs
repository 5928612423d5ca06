//! Acquisition worker: waits on the multiplexer and drains ready devices.

use std::io;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, UNIX_EPOCH};

use evdev::InputEvent;
use log::{debug, warn};
use nix::sys::epoll::EpollEvent;

use super::poller::TAG_HOTPLUG;
use super::{now_ns, EngineState};
use crate::event::{Event, EventKind};

/// Multiplexer wait timeout; bounds how quickly shutdown is observed.
pub(crate) const WAIT_TIMEOUT_MS: u16 = 50;
const MAX_WAIT_EVENTS: usize = 16;

/// Worker thread body. Exits when the shutdown flag is set.
pub(crate) fn run(state: Arc<EngineState>) {
    let mut ready = vec![EpollEvent::empty(); MAX_WAIT_EVENTS];
    while !state.stop.load(Ordering::Acquire) {
        if state.rescan_pending() {
            state.scan_devices();
        }
        let n = match state.poller.wait(&mut ready, WAIT_TIMEOUT_MS) {
            Ok(n) => n,
            Err(e) => {
                warn!("readiness wait failed: {e}");
                thread::sleep(Duration::from_millis(u64::from(WAIT_TIMEOUT_MS)));
                continue;
            }
        };
        for ev in &ready[..n] {
            match ev.data() {
                TAG_HOTPLUG => state.handle_hotplug(),
                tag => state.drain_device(tag as i32),
            }
        }
    }
}

impl EngineState {
    /// Read one device until would-block, decoding and dispatching each
    /// packet. A read error ends the drain for this wake only; the
    /// descriptor is kept and retried on the next readiness.
    fn drain_device(&self, id: i32) {
        let entry = { self.registry.lock().unwrap().get(id) };
        let Some(entry) = entry else {
            return; // stale readiness after removal
        };
        let mut entry = entry.lock().unwrap();
        loop {
            match entry.device.fetch_events() {
                Ok(events) => {
                    for iev in events {
                        let Some(kind) = EventKind::from_raw(iev.event_type().0) else {
                            continue;
                        };
                        let ev = Event {
                            device_id: id,
                            kind,
                            code: iev.code(),
                            value: iev.value(),
                            timestamp_ns: timestamp_ns(&iev),
                        };
                        self.raw.deliver(&ev);
                        if kind == EventKind::Key {
                            self.keymap_fanout(&ev);
                        }
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    debug!("device {id} read error ({e}); retrying on next wake");
                    break;
                }
            }
        }
    }
}

/// Kernel packet timestamp converted verbatim to nanoseconds.
fn timestamp_ns(ev: &InputEvent) -> i64 {
    ev.timestamp()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or_else(|_| now_ns())
}
