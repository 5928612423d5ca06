//! Device identity passed to acceptance predicates.

use std::path::PathBuf;
use std::sync::Arc;

/// Identity of an input device node, as presented to the device filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Stable id derived from the node name; constant for the device's
    /// attached lifetime.
    pub id: i32,
    /// Path of the device node.
    pub path: PathBuf,
    /// Human-readable device name reported by the kernel.
    pub name: String,
    /// Bus the device is attached to.
    pub bus_type: u16,
    /// Vendor id.
    pub vendor: u16,
    /// Product id.
    pub product: u16,
    /// Device version.
    pub version: u16,
}

pub(crate) type FilterFn = Arc<dyn Fn(&DeviceInfo) -> bool + Send + Sync>;
