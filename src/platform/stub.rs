//! Stub backend for platforms without an implementation.

use crate::device::FilterFn;
use crate::dispatch::SinkFn;
use crate::error::{Error, Result};
use crate::event::{Event, KeyEvent};

fn unsupported<T>() -> Result<T> {
    Err(Error::NotSupported(
        "input acquisition is not implemented on this platform".into(),
    ))
}

pub(crate) fn init() -> Result<()> {
    unsupported()
}

pub(crate) fn shutdown() -> Result<()> {
    Ok(())
}

pub(crate) fn set_filter(_filter: Option<FilterFn>) -> Result<()> {
    unsupported()
}

pub(crate) fn set_raw_sink(_sink: Option<SinkFn<Event>>) -> Result<()> {
    unsupported()
}

pub(crate) fn set_key_sink(_sink: Option<SinkFn<KeyEvent>>) -> Result<()> {
    unsupported()
}

pub(crate) fn poll(_out: &mut [Event]) -> Result<usize> {
    unsupported()
}

pub(crate) fn poll_key_events(_out: &mut [KeyEvent]) -> Result<usize> {
    unsupported()
}

pub(crate) fn enable_keymap(_on: bool) -> Result<()> {
    unsupported()
}

pub(crate) fn set_keymap_names(
    _rules: Option<&str>,
    _model: Option<&str>,
    _layout: Option<&str>,
    _variant: Option<&str>,
    _options: Option<&str>,
) -> Result<()> {
    unsupported()
}

pub(crate) fn enable_legacy_pointer(_on: bool) -> Result<()> {
    unsupported()
}

pub(crate) fn device_count() -> usize {
    0
}
