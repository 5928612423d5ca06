//! Canonical event types emitted by the engine.
//!
//! [`Event`] is the platform-neutral record produced for every decoded
//! device packet. When the keymap layer is enabled, KEY events additionally
//! produce [`KeyEvent`] records on a separate stream.

use std::fmt;

use crate::codes;

/// Pseudo device id used for events parsed from the legacy aggregated
/// pointer stream (see [`enable_legacy_pointer`](crate::enable_legacy_pointer)).
pub const LEGACY_POINTER_DEVICE_ID: i32 = -2;

/// The kind of an input event. Maps one-to-one to the kernel packet type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    /// Synchronization marker delimiting a batch of related events.
    #[default]
    Syn,
    /// Key or button transition. `value` is 1 on press, 0 on release;
    /// higher values are key repeats.
    Key,
    /// Relative axis motion. `value` is a signed delta.
    Rel,
    /// Absolute axis sample.
    Abs,
    /// Miscellaneous (e.g. hardware scan codes).
    Msc,
}

impl EventKind {
    /// Map a raw kernel event type to a kind. Types outside the canonical
    /// model return `None` and are not delivered.
    pub fn from_raw(raw: u16) -> Option<Self> {
        match raw {
            codes::EV_SYN => Some(Self::Syn),
            codes::EV_KEY => Some(Self::Key),
            codes::EV_REL => Some(Self::Rel),
            codes::EV_ABS => Some(Self::Abs),
            codes::EV_MSC => Some(Self::Msc),
            _ => None,
        }
    }

    /// The raw kernel event type this kind corresponds to.
    pub fn raw(self) -> u16 {
        match self {
            Self::Syn => codes::EV_SYN,
            Self::Key => codes::EV_KEY,
            Self::Rel => codes::EV_REL,
            Self::Abs => codes::EV_ABS,
            Self::Msc => codes::EV_MSC,
        }
    }
}

/// A raw input event.
///
/// `code` and `value` carry the kernel packet fields verbatim; see the
/// [`codes`] module for the published code constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Event {
    /// Stable id of the originating device, or
    /// [`LEGACY_POINTER_DEVICE_ID`] for the legacy pointer stream.
    pub device_id: i32,
    /// Event kind.
    pub kind: EventKind,
    /// Code within the kind (key number, axis, …).
    pub code: u16,
    /// Payload: press/release/repeat for KEY, signed delta for REL,
    /// absolute sample for ABS.
    pub value: i32,
    /// Kernel-supplied timestamp in nanoseconds, preserved end-to-end.
    /// Streams without a kernel timestamp use a monotonic clock sample
    /// taken at decode time.
    pub timestamp_ns: i64,
}

/// Whether `code` names a pointer button.
pub fn is_mouse_button_code(code: u16) -> bool {
    matches!(
        code,
        codes::BTN_LEFT | codes::BTN_RIGHT | codes::BTN_MIDDLE | codes::BTN_SIDE | codes::BTN_EXTRA
    )
}

impl Event {
    /// Whether this is a key or button event.
    pub fn is_key(&self) -> bool {
        self.kind == EventKind::Key
    }

    /// Whether this is a key or button transition to the pressed state.
    pub fn key_down(&self) -> bool {
        self.is_key() && self.value != 0
    }

    /// Whether this is a relative-axis event.
    pub fn is_rel(&self) -> bool {
        self.kind == EventKind::Rel
    }

    /// Whether this is a pointer button press.
    pub fn button_down(&self) -> bool {
        self.is_key() && is_mouse_button_code(self.code) && self.value != 0
    }
}

/// Shift modifier bit in [`KeyEvent::mods`].
pub const MOD_SHIFT: u32 = 1 << 0;
/// Control modifier bit in [`KeyEvent::mods`].
pub const MOD_CTRL: u32 = 1 << 1;
/// Alt modifier bit in [`KeyEvent::mods`].
pub const MOD_ALT: u32 = 1 << 2;
/// Super (logo) modifier bit in [`KeyEvent::mods`].
pub const MOD_SUPER: u32 = 1 << 3;

/// Capacity of the UTF-8 text buffer carried by a [`KeyEvent`].
pub const KEY_TEXT_CAPACITY: usize = 32;

/// Bounded UTF-8 text produced by keymap interpretation.
///
/// Holds up to [`KEY_TEXT_CAPACITY`] bytes; longer input is truncated
/// silently at a character boundary.
#[derive(Clone, Copy, Default)]
pub struct KeyText {
    len: u8,
    buf: [u8; KEY_TEXT_CAPACITY],
}

impl KeyText {
    /// Build from a string, truncating silently if it does not fit.
    pub fn new(s: &str) -> Self {
        let mut end = s.len().min(KEY_TEXT_CAPACITY);
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        let mut buf = [0u8; KEY_TEXT_CAPACITY];
        buf[..end].copy_from_slice(&s.as_bytes()[..end]);
        Self { len: end as u8, buf }
    }

    /// The contained text.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.buf[..self.len as usize]).unwrap_or("")
    }

    /// Whether no text was produced.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for KeyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq for KeyText {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for KeyText {}

impl AsRef<str> for KeyText {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// A keymap-interpreted key event.
///
/// Emitted on the keymap stream for KEY events when the keymap layer is
/// enabled. The raw KEY stream is never altered by interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyEvent {
    /// Stable id of the originating device.
    pub device_id: i32,
    /// Timestamp of the underlying raw KEY event.
    pub timestamp_ns: i64,
    /// Press (`true`) or release (`false`).
    pub down: bool,
    /// Keysym after layout and modifier application.
    pub keysym: u32,
    /// Active modifiers; see the `MOD_*` constants.
    pub mods: u32,
    /// UTF-8 text produced on press; empty on release.
    pub text: KeyText,
}

impl KeyEvent {
    /// Whether all modifiers in `mask` are active.
    pub fn has_mods(&self, mask: u32) -> bool {
        self.mods & mask == mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_round_trips_through_raw() {
        for kind in [
            EventKind::Syn,
            EventKind::Key,
            EventKind::Rel,
            EventKind::Abs,
            EventKind::Msc,
        ] {
            assert_eq!(EventKind::from_raw(kind.raw()), Some(kind));
        }
        // LED (0x11) is outside the canonical model.
        assert_eq!(EventKind::from_raw(0x11), None);
    }

    #[test]
    fn key_predicates() {
        let press = Event {
            device_id: 3,
            kind: EventKind::Key,
            code: codes::KEY_Q,
            value: 1,
            timestamp_ns: 1,
        };
        assert!(press.is_key());
        assert!(press.key_down());
        assert!(!press.is_rel());
        assert!(!press.button_down());

        let button = Event {
            code: codes::BTN_LEFT,
            ..press
        };
        assert!(button.button_down());

        let release = Event { value: 0, ..press };
        assert!(!release.key_down());
    }

    #[test]
    fn key_text_truncates_at_char_boundary() {
        let exact = "a".repeat(KEY_TEXT_CAPACITY);
        assert_eq!(KeyText::new(&exact).as_str(), exact);

        let over = "a".repeat(KEY_TEXT_CAPACITY + 5);
        assert_eq!(KeyText::new(&over).as_str(), exact);

        // 31 ASCII bytes followed by a 2-byte char: the char cannot be
        // split, so only the ASCII prefix survives.
        let mixed = format!("{}é", "a".repeat(KEY_TEXT_CAPACITY - 1));
        let text = KeyText::new(&mixed);
        assert_eq!(text.as_str(), "a".repeat(KEY_TEXT_CAPACITY - 1));
    }

    #[test]
    fn key_text_empty_default() {
        let text = KeyText::default();
        assert!(text.is_empty());
        assert_eq!(text.as_str(), "");
    }

    #[test]
    fn mods_helpers() {
        let ev = KeyEvent {
            mods: MOD_SHIFT | MOD_CTRL,
            ..KeyEvent::default()
        };
        assert!(ev.has_mods(MOD_SHIFT));
        assert!(ev.has_mods(MOD_SHIFT | MOD_CTRL));
        assert!(!ev.has_mods(MOD_ALT));
    }
}
