//! Registry of open device handles keyed by stable id.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use evdev::Device;
use log::warn;

use crate::device::DeviceInfo;

/// Upper bound on simultaneously registered devices.
pub(crate) const MAX_DEVICES: usize = 128;

pub(crate) struct DeviceEntry {
    pub device: Device,
    pub info: DeviceInfo,
}

/// Id-keyed map of shared device entries. The whole registry sits behind
/// one mutex in the engine; entries are individually locked so the worker
/// can drain a device without holding the registry.
pub(crate) struct Registry {
    devices: HashMap<i32, Arc<Mutex<DeviceEntry>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            devices: HashMap::new(),
        }
    }

    pub fn contains(&self, id: i32) -> bool {
        self.devices.contains_key(&id)
    }

    /// Insert a new entry. Refuses duplicates and additions beyond
    /// [`MAX_DEVICES`].
    pub fn insert(&mut self, id: i32, entry: Arc<Mutex<DeviceEntry>>) -> bool {
        if self.devices.contains_key(&id) {
            return false;
        }
        if self.devices.len() >= MAX_DEVICES {
            warn!("device limit ({MAX_DEVICES}) reached, ignoring device {id}");
            return false;
        }
        self.devices.insert(id, entry);
        true
    }

    pub fn remove(&mut self, id: i32) -> Option<Arc<Mutex<DeviceEntry>>> {
        self.devices.remove(&id)
    }

    pub fn get(&self, id: i32) -> Option<Arc<Mutex<DeviceEntry>>> {
        self.devices.get(&id).cloned()
    }

    pub fn ids(&self) -> Vec<i32> {
        self.devices.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn clear(&mut self) {
        self.devices.clear();
    }
}
