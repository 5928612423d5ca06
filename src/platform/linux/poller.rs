//! Readiness multiplexer over device handles and the hotplug notifier.
//!
//! Thin epoll wrapper. The u64 payload registered with each fd is the tag
//! handed back on readiness: a device's stable id, or [`TAG_HOTPLUG`] for
//! the hotplug watcher. Tags resolve to devices in O(1) through the
//! id-keyed registry; nothing on the wake path scans.

use std::os::fd::{BorrowedFd, RawFd};

use nix::sys::epoll::{Epoll, EpollCreateFlags, EpollEvent, EpollFlags, EpollTimeout};

use crate::error::{Error, Result};

/// Tag reserved for the hotplug watcher fd.
pub(crate) const TAG_HOTPLUG: u64 = u64::MAX;

pub(crate) struct Poller {
    epoll: Epoll,
}

impl Poller {
    pub fn new() -> Result<Self> {
        let epoll = Epoll::new(EpollCreateFlags::EPOLL_CLOEXEC)
            .map_err(|e| Error::System(format!("epoll_create: {e}")))?;
        Ok(Self { epoll })
    }

    /// Start watching `fd` for readability under `tag`. The caller keeps
    /// the fd open until [`unregister`](Self::unregister).
    pub fn register(&self, fd: RawFd, tag: u64) -> Result<()> {
        let fd = unsafe { BorrowedFd::borrow_raw(fd) };
        self.epoll
            .add(fd, EpollEvent::new(EpollFlags::EPOLLIN, tag))
            .map_err(|e| Error::System(format!("epoll_ctl add: {e}")))
    }

    /// Stop watching `fd`. Errors are ignored; the fd is about to close.
    pub fn unregister(&self, fd: RawFd) {
        let fd = unsafe { BorrowedFd::borrow_raw(fd) };
        let _ = self.epoll.delete(fd);
    }

    /// Wait up to `timeout_ms` for readiness and fill `events`. Returns
    /// the ready count; an interrupted wait reports zero.
    pub fn wait(&self, events: &mut [EpollEvent], timeout_ms: u16) -> Result<usize> {
        match self.epoll.wait(events, EpollTimeout::from(timeout_ms)) {
            Ok(n) => Ok(n),
            Err(nix::errno::Errno::EINTR) => Ok(0),
            Err(e) => Err(Error::System(format!("epoll_wait: {e}"))),
        }
    }
}
