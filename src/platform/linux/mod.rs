//! Linux engine backend.
//!
//! Keeps the process-wide engine state: the device registry, the epoll
//! multiplexer, the hotplug watcher, both delivery streams and the worker
//! threads. Devices are evdev nodes under `/dev/input`; reading them
//! requires membership in the `input` group on most distributions.

mod discover;
mod hotplug;
#[cfg(feature = "keymap")]
mod keymap;
mod mice;
mod poller;
mod registry;
mod worker;

use std::fs;
use std::os::fd::AsRawFd;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex, RwLock};
use std::thread;

use log::{debug, info, warn};

use discover::{open_node, parse_node_id, query_info, INPUT_DIR};
use hotplug::{HotplugChange, HotplugWatcher};
#[cfg(feature = "keymap")]
use keymap::{KeymapInterpreter, KeymapNames};
use poller::{Poller, TAG_HOTPLUG};
use registry::{DeviceEntry, Registry};

use crate::device::{DeviceInfo, FilterFn};
use crate::dispatch::{Dispatch, SinkFn};
use crate::error::{Error, Result};
use crate::event::{Event, KeyEvent};

/// Window after a failed hotplug open during which discovery is retried
/// on every worker wake.
const RESCAN_WINDOW_NS: i64 = 3_000_000_000;

static ENGINE: RwLock<Option<Arc<EngineState>>> = RwLock::new(None);

pub(crate) struct EngineState {
    stop: AtomicBool,
    poller: Poller,
    hotplug: Option<HotplugWatcher>,
    registry: Mutex<Registry>,
    raw: Dispatch<Event>,
    keys: Dispatch<KeyEvent>,
    filter: RwLock<Option<FilterFn>>,
    rescan_until_ns: AtomicI64,
    #[cfg(feature = "keymap")]
    keymap: Mutex<KeymapSlot>,
    legacy_enabled: AtomicBool,
    legacy_thread: Mutex<Option<thread::JoinHandle<()>>>,
    worker_thread: Mutex<Option<thread::JoinHandle<()>>>,
}

#[cfg(feature = "keymap")]
struct KeymapSlot {
    names: KeymapNames,
    interpreter: Option<KeymapInterpreter>,
}

/// Monotonic clock sample in nanoseconds.
pub(crate) fn now_ns() -> i64 {
    nix::time::clock_gettime(nix::time::ClockId::CLOCK_MONOTONIC)
        .map(|ts| ts.tv_sec() as i64 * 1_000_000_000 + ts.tv_nsec() as i64)
        .unwrap_or(0)
}

fn state() -> Result<Arc<EngineState>> {
    ENGINE
        .read()
        .unwrap()
        .as_ref()
        .cloned()
        .ok_or(Error::NotInitialized)
}

pub(crate) fn init() -> Result<()> {
    let mut slot = ENGINE.write().unwrap();
    if slot.is_some() {
        // Already running; a second init is a success no-op.
        return Ok(());
    }

    let poller = Poller::new()?;
    let hotplug = match HotplugWatcher::new() {
        Ok(w) => Some(w),
        Err(e) => {
            warn!("hotplug watching unavailable: {e}");
            None
        }
    };

    let state = Arc::new(EngineState {
        stop: AtomicBool::new(false),
        poller,
        hotplug,
        registry: Mutex::new(Registry::new()),
        raw: Dispatch::new(),
        keys: Dispatch::new(),
        filter: RwLock::new(None),
        rescan_until_ns: AtomicI64::new(0),
        #[cfg(feature = "keymap")]
        keymap: Mutex::new(KeymapSlot {
            names: KeymapNames::default(),
            interpreter: None,
        }),
        legacy_enabled: AtomicBool::new(false),
        legacy_thread: Mutex::new(None),
        worker_thread: Mutex::new(None),
    });

    if let Some(watcher) = &state.hotplug {
        if let Err(e) = state.poller.register(watcher.fd(), TAG_HOTPLUG) {
            warn!("hotplug watching unavailable: {e}");
        }
    }
    state.scan_devices();

    let worker_state = state.clone();
    let handle = thread::Builder::new()
        .name("asyncinput-worker".into())
        .spawn(move || worker::run(worker_state))
        .map_err(|e| Error::System(format!("worker thread: {e}")))?;
    *state.worker_thread.lock().unwrap() = Some(handle);

    info!(
        "input engine initialized with {} devices",
        state.registry.lock().unwrap().len()
    );
    *slot = Some(state);
    Ok(())
}

pub(crate) fn shutdown() -> Result<()> {
    let state = { ENGINE.write().unwrap().take() };
    let Some(state) = state else {
        return Ok(());
    };
    state.stop.store(true, Ordering::Release);
    state.legacy_enabled.store(false, Ordering::Release);
    if let Some(handle) = state.legacy_thread.lock().unwrap().take() {
        let _ = handle.join();
    }
    if let Some(handle) = state.worker_thread.lock().unwrap().take() {
        let _ = handle.join();
    }
    // Dropping the entries closes every device handle; the multiplexer and
    // hotplug watcher close with the state itself.
    state.registry.lock().unwrap().clear();
    info!("input engine shut down");
    Ok(())
}

pub(crate) fn set_filter(filter: Option<FilterFn>) -> Result<()> {
    let state = state()?;
    *state.filter.write().unwrap() = filter;
    state.reevaluate_filter();
    state.scan_devices();
    Ok(())
}

pub(crate) fn set_raw_sink(sink: Option<SinkFn<Event>>) -> Result<()> {
    state()?.raw.set_sink(sink);
    Ok(())
}

pub(crate) fn set_key_sink(sink: Option<SinkFn<KeyEvent>>) -> Result<()> {
    state()?.keys.set_sink(sink);
    Ok(())
}

pub(crate) fn poll(out: &mut [Event]) -> Result<usize> {
    Ok(state()?.raw.pop_many(out))
}

pub(crate) fn poll_key_events(out: &mut [KeyEvent]) -> Result<usize> {
    Ok(state()?.keys.pop_many(out))
}

pub(crate) fn device_count() -> usize {
    ENGINE
        .read()
        .unwrap()
        .as_ref()
        .map_or(0, |s| s.registry.lock().unwrap().len())
}

#[cfg(feature = "keymap")]
pub(crate) fn enable_keymap(on: bool) -> Result<()> {
    let state = state()?;
    let mut slot = state.keymap.lock().unwrap();
    if on {
        if slot.interpreter.is_none() {
            slot.interpreter = Some(KeymapInterpreter::new(&slot.names)?);
        }
    } else {
        slot.interpreter = None;
    }
    Ok(())
}

#[cfg(not(feature = "keymap"))]
pub(crate) fn enable_keymap(_on: bool) -> Result<()> {
    let _ = state()?;
    Err(Error::NotSupported("built without the keymap feature".into()))
}

#[cfg(feature = "keymap")]
pub(crate) fn set_keymap_names(
    rules: Option<&str>,
    model: Option<&str>,
    layout: Option<&str>,
    variant: Option<&str>,
    options: Option<&str>,
) -> Result<()> {
    let state = state()?;
    let mut slot = state.keymap.lock().unwrap();
    let mut names = slot.names.clone();
    if let Some(rules) = rules {
        names.rules = rules.into();
    }
    if let Some(model) = model {
        names.model = model.into();
    }
    if let Some(layout) = layout {
        names.layout = layout.into();
    }
    if let Some(variant) = variant {
        names.variant = variant.into();
    }
    if let Some(options) = options {
        names.options = options.into();
    }
    if slot.interpreter.is_some() {
        // Rebuild before swapping so a failed build leaves the active
        // keymap (and the previous names) untouched.
        slot.interpreter = Some(KeymapInterpreter::new(&names)?);
    }
    slot.names = names;
    Ok(())
}

#[cfg(not(feature = "keymap"))]
pub(crate) fn set_keymap_names(
    _rules: Option<&str>,
    _model: Option<&str>,
    _layout: Option<&str>,
    _variant: Option<&str>,
    _options: Option<&str>,
) -> Result<()> {
    let _ = state()?;
    Err(Error::NotSupported("built without the keymap feature".into()))
}

pub(crate) fn enable_legacy_pointer(on: bool) -> Result<()> {
    let state = state()?;
    let mut guard = state.legacy_thread.lock().unwrap();
    if on {
        state.legacy_enabled.store(true, Ordering::Release);
        if guard.is_none() {
            let thread_state = state.clone();
            let handle = thread::Builder::new()
                .name("asyncinput-mice".into())
                .spawn(move || mice::run(thread_state))
                .map_err(|e| {
                    state.legacy_enabled.store(false, Ordering::Release);
                    Error::System(format!("legacy pointer thread: {e}"))
                })?;
            *guard = Some(handle);
        }
    } else {
        state.legacy_enabled.store(false, Ordering::Release);
        if let Some(handle) = guard.take() {
            let _ = handle.join();
        }
    }
    Ok(())
}

enum Attach {
    Added,
    Rejected,
    Unavailable,
}

impl EngineState {
    fn accepts(&self, info: &DeviceInfo) -> bool {
        match self.filter.read().unwrap().as_ref() {
            Some(f) => f(info),
            None => true,
        }
    }

    /// Discovery pass: open, test and register any unregistered node.
    /// Per-node failures are silent; device-manager races are routine.
    fn scan_devices(&self) {
        let Ok(entries) = fs::read_dir(INPUT_DIR) else {
            return;
        };
        for entry in entries.flatten() {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let Some(id) = parse_node_id(name) else {
                continue;
            };
            if self.registry.lock().unwrap().contains(id) {
                continue;
            }
            self.try_attach(&entry.path(), id);
        }
    }

    fn try_attach(&self, path: &Path, id: i32) -> Attach {
        let device = match open_node(path) {
            Ok(d) => d,
            Err(e) => {
                debug!("cannot open {} ({e})", path.display());
                return Attach::Unavailable;
            }
        };
        let info = query_info(&device, path, id);
        if !self.accepts(&info) {
            debug!("filter rejected {} ({:?})", path.display(), info.name);
            return Attach::Rejected;
        }
        let fd = device.as_raw_fd();
        let entry = Arc::new(Mutex::new(DeviceEntry { device, info }));
        {
            let mut registry = self.registry.lock().unwrap();
            if !registry.insert(id, entry) {
                return Attach::Rejected; // raced, or at capacity
            }
        }
        if let Err(e) = self.poller.register(fd, id as u64) {
            warn!("cannot watch {} ({e})", path.display());
            self.registry.lock().unwrap().remove(id);
            return Attach::Rejected;
        }
        debug!("device {id} attached ({})", path.display());
        Attach::Added
    }

    fn detach(&self, id: i32) {
        let entry = { self.registry.lock().unwrap().remove(id) };
        if let Some(entry) = entry {
            let fd = entry.lock().unwrap().device.as_raw_fd();
            self.poller.unregister(fd);
            debug!("device {id} detached");
        }
    }

    /// Re-test every registered device against the current filter and
    /// detach the rejected ones. Runs on the caller's thread.
    fn reevaluate_filter(&self) {
        let ids = { self.registry.lock().unwrap().ids() };
        for id in ids {
            let entry = { self.registry.lock().unwrap().get(id) };
            let Some(entry) = entry else {
                continue;
            };
            let info = entry.lock().unwrap().info.clone();
            if !self.accepts(&info) {
                self.detach(id);
            }
        }
    }

    fn arm_rescan_window(&self) {
        self.rescan_until_ns
            .store(now_ns() + RESCAN_WINDOW_NS, Ordering::Relaxed);
    }

    fn rescan_pending(&self) -> bool {
        now_ns() < self.rescan_until_ns.load(Ordering::Relaxed)
    }

    fn handle_hotplug(&self) {
        let Some(watcher) = &self.hotplug else {
            return;
        };
        for change in watcher.drain() {
            match change {
                HotplugChange::Added(name) => {
                    let Some(id) = parse_node_id(&name) else {
                        continue;
                    };
                    if self.registry.lock().unwrap().contains(id) {
                        continue;
                    }
                    let path = Path::new(INPUT_DIR).join(&name);
                    if let Attach::Unavailable = self.try_attach(&path, id) {
                        // The device manager often fixes node permissions
                        // just after creation; keep retrying for a while.
                        self.arm_rescan_window();
                    }
                }
                HotplugChange::Removed(name) => {
                    if let Some(id) = parse_node_id(&name) {
                        self.detach(id);
                    }
                }
            }
        }
    }

    #[cfg(feature = "keymap")]
    fn keymap_fanout(&self, ev: &Event) {
        let kev = {
            let mut slot = self.keymap.lock().unwrap();
            match slot.interpreter.as_mut() {
                Some(interp) => interp.process(ev),
                None => return,
            }
        };
        self.keys.deliver(&kev);
    }

    #[cfg(not(feature = "keymap"))]
    fn keymap_fanout(&self, _ev: &Event) {}
}
