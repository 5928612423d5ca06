//! Engine lifecycle, registration and polling entry points.
//!
//! The engine is process-wide: one acquisition worker, one device
//! registry, one pair of delivery streams. [`init`] starts it, [`shutdown`]
//! stops it; everything in between is safe to call from any thread while
//! the worker runs.

use std::sync::Arc;

use crate::device::DeviceInfo;
use crate::error::{Error, Result};
use crate::event::{Event, KeyEvent};
use crate::platform;

/// Sink for raw events, invoked synchronously on the acquisition worker.
///
/// The event reference is valid only for the duration of the call. A sink
/// must not block and **must not call back into the engine** (`poll`,
/// `register_callback`, lifecycle operations, …) — doing so is undefined.
/// Callbacks run on the worker thread and are unordered with respect to
/// the caller's threads.
pub trait EventSink: Send + Sync {
    /// Called for each delivered event.
    fn handle(&self, event: &Event);
}

impl<F> EventSink for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn handle(&self, event: &Event) {
        self(event)
    }
}

/// Sink for keymap-interpreted events. Same restrictions as [`EventSink`].
pub trait KeyEventSink: Send + Sync {
    /// Called for each delivered key event.
    fn handle(&self, event: &KeyEvent);
}

impl<F> KeyEventSink for F
where
    F: Fn(&KeyEvent) + Send + Sync,
{
    fn handle(&self, event: &KeyEvent) {
        self(event)
    }
}

fn check_flags(flags: u32) -> Result<()> {
    if flags != 0 {
        return Err(Error::InvalidArgument(format!(
            "reserved flags must be zero, got {flags:#x}"
        )));
    }
    Ok(())
}

/// Initialize the engine: open the device nodes, start watching for
/// hotplug, and spawn the acquisition worker.
///
/// `flags` is reserved and must be 0. Calling `init` again before
/// [`shutdown`] succeeds without reinitializing anything.
pub fn init(flags: u32) -> Result<()> {
    check_flags(flags)?;
    platform::init()
}

/// Stop the worker threads and close every device handle.
///
/// Shutdown is cooperative and bounded by the multiplexer wait timeout.
/// Teardown errors are suppressed; calling `shutdown` on an engine that is
/// not running succeeds. After shutdown, `poll` and the registration
/// functions report [`Error::NotInitialized`].
pub fn shutdown() -> Result<()> {
    platform::shutdown()
}

/// Install a device acceptance predicate.
///
/// Already-open devices are re-tested on the calling thread before this
/// returns: rejected ones are closed and removed. Discovery then re-runs
/// to admit nodes the new predicate accepts. During later discovery
/// (hotplug, rescans) the predicate runs on the worker thread, so it must
/// be `Send + Sync`.
pub fn set_filter<F>(pred: F) -> Result<()>
where
    F: Fn(&DeviceInfo) -> bool + Send + Sync + 'static,
{
    platform::set_filter(Some(Arc::new(pred)))
}

/// Remove the device filter and re-admit every discoverable node.
pub fn clear_filter() -> Result<()> {
    platform::set_filter(None)
}

/// Register the raw-event sink. Replaces any previous sink; callbacks
/// already in flight complete against the sink they started with.
///
/// While a sink is installed events bypass the ring, so [`poll`] returns 0.
/// `flags` is reserved and must be 0.
pub fn register_callback<S>(sink: S, flags: u32) -> Result<()>
where
    S: EventSink + 'static,
{
    check_flags(flags)?;
    let sink = Arc::new(sink);
    platform::set_raw_sink(Some(Arc::new(move |ev: &Event| sink.handle(ev))))
}

/// Remove the raw-event sink; events queue in the ring again.
pub fn unregister_callback() -> Result<()> {
    platform::set_raw_sink(None)
}

/// Pop queued raw events into `out`, oldest first. Returns the number of
/// events copied; 0 when the ring is empty or a sink is installed.
pub fn poll(out: &mut [Event]) -> Result<usize> {
    if out.is_empty() {
        return Err(Error::InvalidArgument("output buffer is empty".into()));
    }
    platform::poll(out)
}

/// Enable or disable keymap interpretation.
///
/// Enabling compiles the keymap from the configured names (see
/// [`set_keymap_names`]); a compile failure is reported and leaves the
/// layer disabled. Disabling tears the keymap state down. The raw KEY
/// stream is unaffected either way.
pub fn enable_keymap(on: bool) -> Result<()> {
    platform::enable_keymap(on)
}

/// Replace keymap identifier strings. `None` keeps the current value.
///
/// Defaults to a US PC-105 layout. While the keymap is enabled the state
/// is rebuilt atomically: on failure the previous keymap stays active and
/// [`Error::KeymapBuild`] is returned.
pub fn set_keymap_names(
    rules: Option<&str>,
    model: Option<&str>,
    layout: Option<&str>,
    variant: Option<&str>,
    options: Option<&str>,
) -> Result<()> {
    platform::set_keymap_names(rules, model, layout, variant, options)
}

/// Register the keymap-stream sink. Same contract as
/// [`register_callback`]; `flags` is reserved and must be 0.
pub fn register_key_callback<S>(sink: S, flags: u32) -> Result<()>
where
    S: KeyEventSink + 'static,
{
    check_flags(flags)?;
    let sink = Arc::new(sink);
    platform::set_key_sink(Some(Arc::new(move |ev: &KeyEvent| sink.handle(ev))))
}

/// Remove the keymap-stream sink.
pub fn unregister_key_callback() -> Result<()> {
    platform::set_key_sink(None)
}

/// Pop queued key events into `out`, oldest first.
pub fn poll_key_events(out: &mut [KeyEvent]) -> Result<usize> {
    if out.is_empty() {
        return Err(Error::InvalidArgument("output buffer is empty".into()));
    }
    platform::poll_key_events(out)
}

/// Enable or disable the legacy aggregated pointer reader.
///
/// When enabled, a second thread parses the platform's legacy pointer
/// stream into canonical events under
/// [`LEGACY_POINTER_DEVICE_ID`](crate::LEGACY_POINTER_DEVICE_ID). If the
/// stream does not exist or is inaccessible the reader exits silently.
pub fn enable_legacy_pointer(on: bool) -> Result<()> {
    platform::enable_legacy_pointer(on)
}

/// Number of currently registered devices. 0 when the engine is not
/// running.
pub fn device_count() -> usize {
    platform::device_count()
}
