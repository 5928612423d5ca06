//! Device node discovery helpers: stable ids, open flags, identity.

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};
use std::path::Path;

use evdev::Device;
use nix::fcntl::{fcntl, FcntlArg, FdFlag, OFlag};

use crate::device::DeviceInfo;

/// Directory holding the kernel's input device nodes.
pub(crate) const INPUT_DIR: &str = "/dev/input";

/// Name prefix of the per-device event nodes.
pub(crate) const NODE_PREFIX: &str = "event";

/// Derive the stable device id from a node name (`event7` → `7`).
/// Returns `None` for names outside the pattern.
pub(crate) fn parse_node_id(name: &str) -> Option<i32> {
    let suffix = name.strip_prefix(NODE_PREFIX)?;
    if suffix.is_empty() {
        return None;
    }
    suffix.parse::<i32>().ok().filter(|n| *n >= 0)
}

/// Open a device node non-blocking and close-on-exec.
pub(crate) fn open_node(path: &Path) -> io::Result<Device> {
    let device = Device::open(path)?;
    set_nonblocking_cloexec(&device)?;
    Ok(device)
}

fn set_nonblocking_cloexec(device: &Device) -> io::Result<()> {
    // The fd is owned by `device` and outlives both fcntl calls.
    let fd = unsafe { BorrowedFd::borrow_raw(device.as_raw_fd()) };

    let raw_fd = fd.as_raw_fd();
    let flags = fcntl(raw_fd, FcntlArg::F_GETFL)?;
    let mut flags = OFlag::from_bits_truncate(flags);
    flags.insert(OFlag::O_NONBLOCK);
    fcntl(raw_fd, FcntlArg::F_SETFL(flags))?;

    let fd_flags = fcntl(raw_fd, FcntlArg::F_GETFD)?;
    let mut fd_flags = FdFlag::from_bits_truncate(fd_flags);
    fd_flags.insert(FdFlag::FD_CLOEXEC);
    fcntl(raw_fd, FcntlArg::F_SETFD(fd_flags))?;
    Ok(())
}

/// Read the identity fields the device filter sees.
pub(crate) fn query_info(device: &Device, path: &Path, id: i32) -> DeviceInfo {
    let input_id = device.input_id();
    DeviceInfo {
        id,
        path: path.to_path_buf(),
        name: device.name().unwrap_or_default().to_string(),
        bus_type: input_id.bus_type().0,
        vendor: input_id.vendor(),
        product: input_id.product(),
        version: input_id.version(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_id_parsing() {
        assert_eq!(parse_node_id("event0"), Some(0));
        assert_eq!(parse_node_id("event17"), Some(17));
        assert_eq!(parse_node_id("event"), None);
        assert_eq!(parse_node_id("event3a"), None);
        assert_eq!(parse_node_id("event-2"), None);
        assert_eq!(parse_node_id("mouse0"), None);
        assert_eq!(parse_node_id("mice"), None);
    }
}
