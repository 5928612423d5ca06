//! Hotplug watcher over the input device directory.

use std::os::fd::{AsFd, AsRawFd, RawFd};

use nix::sys::inotify::{AddWatchFlags, InitFlags, Inotify};

use super::discover::INPUT_DIR;
use crate::error::{Error, Result};

/// A node appeared in or vanished from the device directory. Names are
/// directory-relative (`eventN`).
pub(crate) enum HotplugChange {
    Added(String),
    Removed(String),
}

pub(crate) struct HotplugWatcher {
    inotify: Inotify,
}

impl HotplugWatcher {
    pub fn new() -> Result<Self> {
        let inotify = Inotify::init(InitFlags::IN_NONBLOCK | InitFlags::IN_CLOEXEC)
            .map_err(|e| Error::System(format!("inotify_init: {e}")))?;
        // IN_MOVED_TO as well: the device manager may create nodes under a
        // temporary name and rename them into place.
        inotify
            .add_watch(
                INPUT_DIR,
                AddWatchFlags::IN_CREATE | AddWatchFlags::IN_MOVED_TO | AddWatchFlags::IN_DELETE,
            )
            .map_err(|e| Error::System(format!("inotify watch {INPUT_DIR}: {e}")))?;
        Ok(Self { inotify })
    }

    pub fn fd(&self) -> RawFd {
        self.inotify.as_fd().as_raw_fd()
    }

    /// Drain all pending notifications. Returns when the fd would block.
    pub fn drain(&self) -> Vec<HotplugChange> {
        let mut changes = Vec::new();
        while let Ok(events) = self.inotify.read_events() {
            for ev in events {
                let Some(name) = ev.name.and_then(|n| n.into_string().ok()) else {
                    continue;
                };
                if ev
                    .mask
                    .intersects(AddWatchFlags::IN_CREATE | AddWatchFlags::IN_MOVED_TO)
                {
                    changes.push(HotplugChange::Added(name));
                } else if ev.mask.contains(AddWatchFlags::IN_DELETE) {
                    changes.push(HotplugChange::Removed(name));
                }
            }
        }
        changes
    }
}
