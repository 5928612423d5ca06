//! Legacy aggregated pointer stream reader.
//!
//! Parses the classic PS/2 packet stream from `/dev/input/mice` into
//! canonical events under the reserved pseudo device id. Button edges are
//! derived by diffing each packet's button mask against the previous one;
//! motion bytes become REL X/Y (Y negated to match the kernel axis
//! orientation); the fourth byte of the extended packet form becomes a
//! wheel event.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Read};
use std::os::unix::fs::OpenOptionsExt;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;

use super::{now_ns, EngineState};
use crate::codes;
use crate::event::{Event, EventKind, LEGACY_POINTER_DEVICE_ID};

pub(crate) const LEGACY_POINTER_PATH: &str = "/dev/input/mice";

/// Packet length spoken on a read-only fd (no ImPS/2 handshake is sent).
pub(crate) const LEGACY_PACKET_LEN: usize = 3;

/// Bit 3 of the first packet byte is always set; used to resynchronize.
const PACKET_SYNC_BIT: u8 = 0x08;
const BUTTON_MASK: u8 = 0x07;
const BTN_BITS: [(u8, u16); 3] = [
    (0x01, codes::BTN_LEFT),
    (0x02, codes::BTN_RIGHT),
    (0x04, codes::BTN_MIDDLE),
];

/// Stateful PS/2 packet parser. Pure: bytes in, canonical events out.
pub(crate) struct PointerPacketParser {
    packet_len: usize,
    pkt: [u8; 4],
    have: usize,
    prev_buttons: u8,
}

impl PointerPacketParser {
    pub fn new(packet_len: usize) -> Self {
        debug_assert!((3..=4).contains(&packet_len));
        Self {
            packet_len,
            pkt: [0; 4],
            have: 0,
            prev_buttons: 0,
        }
    }

    /// Feed one byte; on packet completion, emit the decoded events.
    pub fn feed(&mut self, byte: u8, timestamp_ns: i64, emit: &mut dyn FnMut(Event)) {
        if self.have == 0 && byte & PACKET_SYNC_BIT == 0 {
            // Mid-packet byte after a lost packet boundary; wait for sync.
            return;
        }
        self.pkt[self.have] = byte;
        self.have += 1;
        if self.have < self.packet_len {
            return;
        }
        self.have = 0;

        let event = |kind, code, value| Event {
            device_id: LEGACY_POINTER_DEVICE_ID,
            kind,
            code,
            value,
            timestamp_ns,
        };

        let buttons = self.pkt[0] & BUTTON_MASK;
        let changed = buttons ^ self.prev_buttons;
        self.prev_buttons = buttons;
        for (bit, code) in BTN_BITS {
            if changed & bit != 0 {
                emit(event(
                    EventKind::Key,
                    code,
                    i32::from(buttons & bit != 0),
                ));
            }
        }

        let dx = self.pkt[1] as i8 as i32;
        let dy = self.pkt[2] as i8 as i32;
        emit(event(EventKind::Rel, codes::REL_X, dx));
        emit(event(EventKind::Rel, codes::REL_Y, -dy));
        if self.packet_len == 4 {
            let dz = self.pkt[3] as i8 as i32;
            emit(event(EventKind::Rel, codes::REL_WHEEL, dz));
        }
    }
}

/// Reader thread body. Exits when the engine stops, the stream is
/// disabled, or the stream is unavailable.
pub(crate) fn run(state: Arc<EngineState>) {
    let file = OpenOptions::new()
        .read(true)
        .custom_flags(libc::O_NONBLOCK | libc::O_CLOEXEC)
        .open(LEGACY_POINTER_PATH);
    let mut file = match file {
        Ok(f) => f,
        Err(e) => {
            debug!("legacy pointer stream unavailable: {e}");
            return;
        }
    };

    let mut parser = PointerPacketParser::new(LEGACY_PACKET_LEN);
    let mut buf = [0u8; 8];
    while !state.stop.load(Ordering::Acquire) && state.legacy_enabled.load(Ordering::Acquire) {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                for &byte in &buf[..n] {
                    // Sampled per byte so every completed packet carries a
                    // clock reading from its own decode moment.
                    parser.feed(byte, now_ns(), &mut |ev| state.raw.deliver(&ev));
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                thread::sleep(Duration::from_millis(1));
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                debug!("legacy pointer read error: {e}");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_all(parser: &mut PointerPacketParser, bytes: &[u8], ts: i64) -> Vec<Event> {
        let mut out = Vec::new();
        for &b in bytes {
            parser.feed(b, ts, &mut |ev| out.push(ev));
        }
        out
    }

    #[test]
    fn motion_packet_emits_rel_pair() {
        let mut parser = PointerPacketParser::new(3);
        // Sync bit set, no buttons, dx=5, dy=3 (wire up = screen up).
        let events = feed_all(&mut parser, &[0x08, 5, 3], 42);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventKind::Rel);
        assert_eq!(events[0].code, codes::REL_X);
        assert_eq!(events[0].value, 5);
        assert_eq!(events[1].code, codes::REL_Y);
        assert_eq!(events[1].value, -3);
        assert!(events
            .iter()
            .all(|e| e.device_id == LEGACY_POINTER_DEVICE_ID && e.timestamp_ns == 42));
    }

    #[test]
    fn negative_deltas_sign_extend() {
        let mut parser = PointerPacketParser::new(3);
        let events = feed_all(&mut parser, &[0x08, 0xFB, 0xFE], 1);
        assert_eq!(events[0].value, -5);
        assert_eq!(events[1].value, 2);
    }

    #[test]
    fn button_edges_are_diffed_not_repeated() {
        let mut parser = PointerPacketParser::new(3);

        // Left press.
        let press = feed_all(&mut parser, &[0x09, 0, 0], 1);
        assert_eq!(press[0].kind, EventKind::Key);
        assert_eq!(press[0].code, codes::BTN_LEFT);
        assert_eq!(press[0].value, 1);

        // Held: no further KEY events, only motion.
        let held = feed_all(&mut parser, &[0x09, 1, 0], 2);
        assert!(held.iter().all(|e| e.kind == EventKind::Rel));

        // Release.
        let release = feed_all(&mut parser, &[0x08, 0, 0], 3);
        assert_eq!(release[0].code, codes::BTN_LEFT);
        assert_eq!(release[0].value, 0);
    }

    #[test]
    fn simultaneous_button_changes() {
        let mut parser = PointerPacketParser::new(3);
        let events = feed_all(&mut parser, &[0x08 | 0x01 | 0x04, 0, 0], 1);
        let keys: Vec<_> = events.iter().filter(|e| e.kind == EventKind::Key).collect();
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].code, codes::BTN_LEFT);
        assert_eq!(keys[1].code, codes::BTN_MIDDLE);
        assert!(keys.iter().all(|e| e.value == 1));
    }

    #[test]
    fn wheel_byte_in_four_byte_mode() {
        let mut parser = PointerPacketParser::new(4);
        let events = feed_all(&mut parser, &[0x08, 0, 0, 0xFF], 1);
        let wheel = events.last().unwrap();
        assert_eq!(wheel.kind, EventKind::Rel);
        assert_eq!(wheel.code, codes::REL_WHEEL);
        assert_eq!(wheel.value, -1);
    }

    #[test]
    fn resyncs_on_missing_sync_bit() {
        let mut parser = PointerPacketParser::new(3);
        // Two stray bytes without the sync bit, then a clean packet.
        let events = feed_all(&mut parser, &[0x02, 0x04, 0x08, 1, 1], 1);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].value, 1);
        assert_eq!(events[1].value, -1);
    }
}
