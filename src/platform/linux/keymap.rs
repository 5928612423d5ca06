//! Keymap interpretation: raw key transitions to keysym + UTF-8 text.
//!
//! Wraps an xkbcommon keymap state built from the configured
//! rules/model/layout/variant/options names. The raw KEY stream is never
//! altered; interpretation is purely additive on its own stream.

use xkbcommon::xkb;

use crate::error::{Error, Result};
use crate::event::{Event, KeyEvent, KeyText, MOD_ALT, MOD_CTRL, MOD_SHIFT, MOD_SUPER};

/// Bias between the kernel key code space and the xkb code space.
const XKB_CODE_OFFSET: u32 = 8;

/// The RMLVO identifier strings the keymap is compiled from. Empty strings
/// select the library default for that component.
#[derive(Debug, Clone)]
pub(crate) struct KeymapNames {
    pub rules: String,
    pub model: String,
    pub layout: String,
    pub variant: String,
    pub options: String,
}

impl Default for KeymapNames {
    fn default() -> Self {
        Self {
            rules: "evdev".into(),
            model: "pc105".into(),
            layout: "us".into(),
            variant: String::new(),
            options: String::new(),
        }
    }
}

pub(crate) struct KeymapInterpreter {
    state: xkb::State,
}

// `xkb::State` wraps a raw `*mut xkb_state` with no thread-affinity of its
// own; access is always serialized behind the engine's keymap `Mutex`.
unsafe impl Send for KeymapInterpreter {}

impl KeymapInterpreter {
    /// Compile a keymap from `names` and create fresh state for it.
    pub fn new(names: &KeymapNames) -> Result<Self> {
        let context = xkb::Context::new(xkb::CONTEXT_NO_FLAGS);
        let options = if names.options.is_empty() {
            None
        } else {
            Some(names.options.clone())
        };
        let keymap = xkb::Keymap::new_from_names(
            &context,
            &names.rules,
            &names.model,
            &names.layout,
            &names.variant,
            options,
            xkb::COMPILE_NO_FLAGS,
        )
        .ok_or_else(|| {
            Error::KeymapBuild(format!(
                "rules={} model={} layout={} variant={} options={}",
                names.rules, names.model, names.layout, names.variant, names.options
            ))
        })?;
        Ok(Self {
            state: xkb::State::new(&keymap),
        })
    }

    /// Interpret one raw KEY event, updating modifier state and producing
    /// the corresponding key record. Text is filled on press only.
    pub fn process(&mut self, ev: &Event) -> KeyEvent {
        let keycode = xkb::Keycode::new(ev.code as u32 + XKB_CODE_OFFSET);
        let down = ev.value != 0;
        self.state.update_key(
            keycode,
            if down {
                xkb::KeyDirection::Down
            } else {
                xkb::KeyDirection::Up
            },
        );
        let keysym = self.state.key_get_one_sym(keycode).raw();
        let mods = self.mods();
        let text = if down {
            KeyText::new(&self.state.key_get_utf8(keycode))
        } else {
            KeyText::default()
        };
        KeyEvent {
            device_id: ev.device_id,
            timestamp_ns: ev.timestamp_ns,
            down,
            keysym,
            mods,
            text,
        }
    }

    fn mods(&self) -> u32 {
        let mut mods = 0;
        if self
            .state
            .mod_name_is_active(xkb::MOD_NAME_SHIFT, xkb::STATE_MODS_EFFECTIVE)
        {
            mods |= MOD_SHIFT;
        }
        if self
            .state
            .mod_name_is_active(xkb::MOD_NAME_CTRL, xkb::STATE_MODS_EFFECTIVE)
        {
            mods |= MOD_CTRL;
        }
        if self
            .state
            .mod_name_is_active(xkb::MOD_NAME_ALT, xkb::STATE_MODS_EFFECTIVE)
        {
            mods |= MOD_ALT;
        }
        if self
            .state
            .mod_name_is_active(xkb::MOD_NAME_LOGO, xkb::STATE_MODS_EFFECTIVE)
        {
            mods |= MOD_SUPER;
        }
        mods
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes;
    use crate::event::EventKind;

    fn key(code: u16, value: i32, ts: i64) -> Event {
        Event {
            device_id: 1,
            kind: EventKind::Key,
            code,
            value,
            timestamp_ns: ts,
        }
    }

    fn us_interpreter() -> KeymapInterpreter {
        KeymapInterpreter::new(&KeymapNames::default()).expect("us keymap should compile")
    }

    #[test]
    fn press_release_produces_text_on_press_only() {
        let mut interp = us_interpreter();

        let down = interp.process(&key(codes::KEY_Q, 1, 100));
        assert!(down.down);
        assert_eq!(down.text.as_str(), "q");
        assert_eq!(down.mods, 0);
        assert_eq!(down.keysym, xkb::keysyms::KEY_q);
        assert_eq!(down.timestamp_ns, 100);

        let up = interp.process(&key(codes::KEY_Q, 0, 200));
        assert!(!up.down);
        assert!(up.text.is_empty());
        assert_eq!(up.mods, 0);
        assert_eq!(up.timestamp_ns, 200);
    }

    #[test]
    fn shift_applies_to_letters_and_mods_bit() {
        let mut interp = us_interpreter();

        let plain = interp.process(&key(codes::KEY_A, 1, 1));
        assert_eq!(plain.text.as_str(), "a");
        interp.process(&key(codes::KEY_A, 0, 2));

        let shift = interp.process(&key(codes::KEY_LEFTSHIFT, 1, 3));
        assert!(shift.has_mods(MOD_SHIFT));
        assert!(shift.text.is_empty());

        let upper = interp.process(&key(codes::KEY_A, 1, 4));
        assert_eq!(upper.text.as_str(), "A");
        assert!(upper.has_mods(MOD_SHIFT));

        interp.process(&key(codes::KEY_A, 0, 5));
        interp.process(&key(codes::KEY_LEFTSHIFT, 0, 6));

        let lower = interp.process(&key(codes::KEY_A, 1, 7));
        assert_eq!(lower.text.as_str(), "a");
        assert_eq!(lower.mods, 0);
    }

    #[test]
    fn repeat_counts_as_press() {
        let mut interp = us_interpreter();
        interp.process(&key(codes::KEY_B, 1, 1));
        let repeat = interp.process(&key(codes::KEY_B, 2, 2));
        assert!(repeat.down);
        assert_eq!(repeat.text.as_str(), "b");
    }

    #[test]
    fn bogus_layout_fails_to_build() {
        let names = KeymapNames {
            layout: "no-such-layout-exists".into(),
            ..KeymapNames::default()
        };
        assert!(matches!(
            KeymapInterpreter::new(&names),
            Err(Error::KeymapBuild(_))
        ));
    }
}
