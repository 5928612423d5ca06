//! Published event value space: kinds, common keys, pointer buttons and
//! relative axes.
//!
//! On Linux every constant aliases the kernel's native definition exactly
//! (via the `evdev` crate), so values can be compared or passed to other
//! evdev consumers with zero translation. On other targets the constants
//! are stable integers maintained by this library, matching the kernel
//! values.

#[cfg(target_os = "linux")]
mod native {
    use evdev::{EventType, Key, MiscType, RelativeAxisType, Synchronization};

    pub const EV_SYN: u16 = EventType::SYNCHRONIZATION.0;
    pub const EV_KEY: u16 = EventType::KEY.0;
    pub const EV_REL: u16 = EventType::RELATIVE.0;
    pub const EV_ABS: u16 = EventType::ABSOLUTE.0;
    pub const EV_MSC: u16 = EventType::MISC.0;

    pub const KEY_A: u16 = Key::KEY_A.0;
    pub const KEY_B: u16 = Key::KEY_B.0;
    pub const KEY_C: u16 = Key::KEY_C.0;
    pub const KEY_D: u16 = Key::KEY_D.0;
    pub const KEY_E: u16 = Key::KEY_E.0;
    pub const KEY_F: u16 = Key::KEY_F.0;
    pub const KEY_G: u16 = Key::KEY_G.0;
    pub const KEY_H: u16 = Key::KEY_H.0;
    pub const KEY_I: u16 = Key::KEY_I.0;
    pub const KEY_J: u16 = Key::KEY_J.0;
    pub const KEY_K: u16 = Key::KEY_K.0;
    pub const KEY_L: u16 = Key::KEY_L.0;
    pub const KEY_M: u16 = Key::KEY_M.0;
    pub const KEY_N: u16 = Key::KEY_N.0;
    pub const KEY_O: u16 = Key::KEY_O.0;
    pub const KEY_P: u16 = Key::KEY_P.0;
    pub const KEY_Q: u16 = Key::KEY_Q.0;
    pub const KEY_R: u16 = Key::KEY_R.0;
    pub const KEY_S: u16 = Key::KEY_S.0;
    pub const KEY_T: u16 = Key::KEY_T.0;
    pub const KEY_U: u16 = Key::KEY_U.0;
    pub const KEY_V: u16 = Key::KEY_V.0;
    pub const KEY_W: u16 = Key::KEY_W.0;
    pub const KEY_X: u16 = Key::KEY_X.0;
    pub const KEY_Y: u16 = Key::KEY_Y.0;
    pub const KEY_Z: u16 = Key::KEY_Z.0;

    pub const KEY_ESC: u16 = Key::KEY_ESC.0;
    pub const KEY_ENTER: u16 = Key::KEY_ENTER.0;
    pub const KEY_SPACE: u16 = Key::KEY_SPACE.0;
    pub const KEY_LEFTSHIFT: u16 = Key::KEY_LEFTSHIFT.0;
    pub const KEY_RIGHTSHIFT: u16 = Key::KEY_RIGHTSHIFT.0;
    pub const KEY_LEFTCTRL: u16 = Key::KEY_LEFTCTRL.0;
    pub const KEY_RIGHTCTRL: u16 = Key::KEY_RIGHTCTRL.0;
    pub const KEY_LEFTALT: u16 = Key::KEY_LEFTALT.0;
    pub const KEY_RIGHTALT: u16 = Key::KEY_RIGHTALT.0;
    pub const KEY_LEFTMETA: u16 = Key::KEY_LEFTMETA.0;
    pub const KEY_RIGHTMETA: u16 = Key::KEY_RIGHTMETA.0;
    pub const KEY_F1: u16 = Key::KEY_F1.0;
    pub const KEY_F12: u16 = Key::KEY_F12.0;

    pub const SYN_REPORT: u16 = Synchronization::SYN_REPORT.0;
    pub const MSC_SCAN: u16 = MiscType::MSC_SCAN.0;

    pub const REL_X: u16 = RelativeAxisType::REL_X.0;
    pub const REL_Y: u16 = RelativeAxisType::REL_Y.0;
    pub const REL_HWHEEL: u16 = RelativeAxisType::REL_HWHEEL.0;
    pub const REL_WHEEL: u16 = RelativeAxisType::REL_WHEEL.0;

    pub const BTN_LEFT: u16 = Key::BTN_LEFT.0;
    pub const BTN_RIGHT: u16 = Key::BTN_RIGHT.0;
    pub const BTN_MIDDLE: u16 = Key::BTN_MIDDLE.0;
    pub const BTN_SIDE: u16 = Key::BTN_SIDE.0;
    pub const BTN_EXTRA: u16 = Key::BTN_EXTRA.0;
}

#[cfg(not(target_os = "linux"))]
mod native {
    pub const EV_SYN: u16 = 0x00;
    pub const EV_KEY: u16 = 0x01;
    pub const EV_REL: u16 = 0x02;
    pub const EV_ABS: u16 = 0x03;
    pub const EV_MSC: u16 = 0x04;

    pub const KEY_A: u16 = 30;
    pub const KEY_B: u16 = 48;
    pub const KEY_C: u16 = 46;
    pub const KEY_D: u16 = 32;
    pub const KEY_E: u16 = 18;
    pub const KEY_F: u16 = 33;
    pub const KEY_G: u16 = 34;
    pub const KEY_H: u16 = 35;
    pub const KEY_I: u16 = 23;
    pub const KEY_J: u16 = 36;
    pub const KEY_K: u16 = 37;
    pub const KEY_L: u16 = 38;
    pub const KEY_M: u16 = 50;
    pub const KEY_N: u16 = 49;
    pub const KEY_O: u16 = 24;
    pub const KEY_P: u16 = 25;
    pub const KEY_Q: u16 = 16;
    pub const KEY_R: u16 = 19;
    pub const KEY_S: u16 = 31;
    pub const KEY_T: u16 = 20;
    pub const KEY_U: u16 = 22;
    pub const KEY_V: u16 = 47;
    pub const KEY_W: u16 = 17;
    pub const KEY_X: u16 = 45;
    pub const KEY_Y: u16 = 21;
    pub const KEY_Z: u16 = 44;

    pub const KEY_ESC: u16 = 1;
    pub const KEY_ENTER: u16 = 28;
    pub const KEY_SPACE: u16 = 57;
    pub const KEY_LEFTSHIFT: u16 = 42;
    pub const KEY_RIGHTSHIFT: u16 = 54;
    pub const KEY_LEFTCTRL: u16 = 29;
    pub const KEY_RIGHTCTRL: u16 = 97;
    pub const KEY_LEFTALT: u16 = 56;
    pub const KEY_RIGHTALT: u16 = 100;
    pub const KEY_LEFTMETA: u16 = 125;
    pub const KEY_RIGHTMETA: u16 = 126;
    pub const KEY_F1: u16 = 59;
    pub const KEY_F12: u16 = 88;

    pub const SYN_REPORT: u16 = 0;
    pub const MSC_SCAN: u16 = 4;

    pub const REL_X: u16 = 0x00;
    pub const REL_Y: u16 = 0x01;
    pub const REL_HWHEEL: u16 = 0x06;
    pub const REL_WHEEL: u16 = 0x08;

    pub const BTN_LEFT: u16 = 0x110;
    pub const BTN_RIGHT: u16 = 0x111;
    pub const BTN_MIDDLE: u16 = 0x112;
    pub const BTN_SIDE: u16 = 0x113;
    pub const BTN_EXTRA: u16 = 0x114;
}

pub use native::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_match_kernel_numbering() {
        assert_eq!(EV_SYN, 0);
        assert_eq!(EV_KEY, 1);
        assert_eq!(EV_REL, 2);
        assert_eq!(EV_ABS, 3);
        assert_eq!(EV_MSC, 4);
    }

    #[test]
    fn well_known_codes() {
        assert_eq!(KEY_A, 30);
        assert_eq!(KEY_Q, 16);
        assert_eq!(KEY_LEFTSHIFT, 42);
        assert_eq!(REL_X, 0);
        assert_eq!(REL_WHEEL, 8);
        assert_eq!(BTN_LEFT, 0x110);
        assert_eq!(BTN_EXTRA, 0x114);
    }
}
