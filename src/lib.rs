//! # asyncinput
//!
//! Low-latency raw input event acquisition for latency-sensitive software
//! (games, instrumentation, input recorders, benchmarking harnesses).
//!
//! A dedicated worker thread drains the operating system's input devices
//! out-of-band from any toolkit's event pump and hands you every key,
//! button, motion and wheel packet with its kernel timestamp intact.
//!
//! ## Features
//!
//! - Hotplug-aware device discovery with an optional acceptance filter
//! - Two delivery modes per stream: a synchronous callback on the worker,
//!   or a bounded ring drained by polling from any thread
//! - Kernel per-event timestamps preserved end-to-end for latency
//!   measurement
//! - Optional keymap interpretation (keysym + UTF-8 text) on a separate
//!   stream, leaving the raw stream untouched
//! - Optional reader for the legacy aggregated pointer stream
//!
//! ## Quick Start
//!
//! ### Polling
//!
//! ```no_run
//! use asyncinput::{init, poll, shutdown, Event};
//!
//! init(0).expect("failed to start input engine");
//!
//! let mut events = [Event::default(); 64];
//! loop {
//!     let n = poll(&mut events).expect("poll failed");
//!     for ev in &events[..n] {
//!         println!("device {} {:?} code {} value {}", ev.device_id, ev.kind, ev.code, ev.value);
//!     }
//!     if n == 0 {
//!         break;
//!     }
//! }
//!
//! shutdown().unwrap();
//! ```
//!
//! ### Callback delivery
//!
//! ```no_run
//! use asyncinput::{init, register_callback, Event, EventKind};
//!
//! init(0).expect("failed to start input engine");
//!
//! register_callback(
//!     |ev: &Event| {
//!         if ev.kind == EventKind::Key && ev.value == 1 {
//!             println!("key {} down at {} ns", ev.code, ev.timestamp_ns);
//!         }
//!     },
//!     0,
//! )
//! .expect("failed to register sink");
//! ```
//!
//! The callback runs on the acquisition worker: keep it short, never
//! block, and never call back into the engine from inside it.
//!
//! ### Filtering devices
//!
//! ```no_run
//! use asyncinput::{init, set_filter};
//!
//! init(0).unwrap();
//! set_filter(|info| info.name.to_lowercase().contains("mouse")).unwrap();
//! ```
//!
//! ## Permissions
//!
//! Reading `/dev/input` devices typically requires membership in the
//! `input` group (`sudo usermod -aG input $USER`).

pub mod codes;
mod device;
mod dispatch;
mod engine;
mod error;
mod event;
mod platform;
mod ring;

pub use device::DeviceInfo;
pub use engine::{
    clear_filter, device_count, enable_keymap, enable_legacy_pointer, init, poll, poll_key_events,
    register_callback, register_key_callback, set_filter, set_keymap_names, shutdown,
    unregister_callback, unregister_key_callback, EventSink, KeyEventSink,
};
pub use error::{Error, Result};
pub use event::{
    is_mouse_button_code, Event, EventKind, KeyEvent, KeyText, KEY_TEXT_CAPACITY,
    LEGACY_POINTER_DEVICE_ID, MOD_ALT, MOD_CTRL, MOD_SHIFT, MOD_SUPER,
};
