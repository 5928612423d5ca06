//! Engine lifecycle properties that hold regardless of which input
//! devices (if any) are accessible to the test run.
//!
//! The engine is process-wide, so the whole sequence lives in one test
//! function; Rust runs separate tests concurrently and they would race on
//! the shared state.

#![cfg(target_os = "linux")]

use asyncinput::{
    clear_filter, device_count, enable_legacy_pointer, init, poll, poll_key_events,
    register_callback, set_filter, set_keymap_names, shutdown, unregister_callback, Error, Event,
    KeyEvent,
};

#[test]
fn engine_lifecycle() {
    // Operations before init report NotInitialized.
    let mut events = [Event::default(); 16];
    assert!(matches!(poll(&mut events), Err(Error::NotInitialized)));
    assert!(matches!(
        register_callback(|_: &Event| {}, 0),
        Err(Error::NotInitialized)
    ));
    assert!(matches!(
        set_filter(|_| true),
        Err(Error::NotInitialized)
    ));
    assert_eq!(device_count(), 0);

    // Reserved flags are validated before anything else.
    assert!(matches!(init(7), Err(Error::InvalidArgument(_))));

    init(0).expect("init");
    // A second init before shutdown is a success no-op.
    init(0).expect("repeated init");

    let initial_devices = device_count();

    // Argument validation on the poll paths.
    assert!(matches!(poll(&mut []), Err(Error::InvalidArgument(_))));
    let mut key_events = [KeyEvent::default(); 16];
    assert!(matches!(
        poll_key_events(&mut []),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        register_callback(|_: &Event| {}, 1),
        Err(Error::InvalidArgument(_))
    ));

    // Both ring paths drain cleanly (possibly returning queued events
    // from real devices, which is fine; they must never error).
    assert!(poll(&mut events).is_ok());
    assert!(poll_key_events(&mut key_events).is_ok());

    // Sink registration and replacement while the worker runs.
    register_callback(|_: &Event| {}, 0).expect("register sink");
    register_callback(|_: &Event| {}, 0).expect("replace sink");
    unregister_callback().expect("unregister sink");

    // A filter rejecting everything empties the registry before
    // set_filter returns; clearing it re-admits devices.
    set_filter(|_| false).expect("set rejecting filter");
    assert_eq!(device_count(), 0);
    clear_filter().expect("clear filter");
    assert_eq!(device_count(), initial_devices);

    // Keymap names can be replaced while the layer is disabled; nothing
    // is compiled until it is enabled. Without the keymap feature the
    // entry point reports NotSupported instead.
    let names_result = set_keymap_names(None, None, Some("us"), None, None);
    if cfg!(feature = "keymap") {
        names_result.expect("set keymap names");
    } else {
        assert!(matches!(names_result, Err(Error::NotSupported(_))));
    }

    // The legacy pointer reader toggles on and off; the stream being
    // absent or unreadable is not an error.
    enable_legacy_pointer(true).expect("enable legacy pointer");
    enable_legacy_pointer(false).expect("disable legacy pointer");

    shutdown().expect("shutdown");

    // After shutdown everything reports NotInitialized again and no
    // devices remain registered.
    assert_eq!(device_count(), 0);
    assert!(matches!(poll(&mut events), Err(Error::NotInitialized)));
    assert!(matches!(
        register_callback(|_: &Event| {}, 0),
        Err(Error::NotInitialized)
    ));

    // Shutdown is idempotent.
    shutdown().expect("repeated shutdown");

    // The engine can be brought up again after a full shutdown.
    init(0).expect("reinit");
    shutdown().expect("final shutdown");
}
