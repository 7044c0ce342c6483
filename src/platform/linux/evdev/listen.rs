//! Non-blocking keyboard reader over `/dev/input/event*`.
//!
//! The device is switched to `O_NONBLOCK`, so a poll with nothing queued
//! returns immediately. Events are handed out one record per poll, in kernel
//! order; the rest of a batch waits for the following polls.

use crate::device::EventSource;
use crate::error::{Error, Result};
use crate::event::{EventKind, RawInputEvent};
use evdev::Device;
use std::collections::VecDeque;
use std::io;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

/// A physical input device opened for non-blocking reads.
pub struct EvdevReader {
    device: Device,
    path: PathBuf,
    pending: VecDeque<RawInputEvent>,
}

impl EvdevReader {
    /// Open `path` and switch it to non-blocking mode.
    ///
    /// Fails with [`Error::DeviceOpen`] carrying the OS error; there is no
    /// retry.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let open_error = |source| Error::DeviceOpen {
            path: path.clone(),
            source,
        };

        let device = Device::open(&path).map_err(open_error)?;
        set_nonblocking(&device).map_err(open_error)?;

        log::info!(
            "input: opened {} ({})",
            path.display(),
            device.name().unwrap_or("unnamed")
        );

        Ok(Self {
            device,
            path,
            pending: VecDeque::new(),
        })
    }

    /// Device node this reader was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn fill(&mut self) -> Result<()> {
        match self.device.fetch_events() {
            Ok(events) => {
                self.pending.extend(events.map(|ev| to_raw_event(&ev)));
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(()),
            Err(e) => Err(Error::Read(e)),
        }
    }
}

impl EventSource for EvdevReader {
    fn poll(&mut self) -> Result<Option<RawInputEvent>> {
        if self.pending.is_empty() {
            self.fill()?;
        }
        Ok(self.pending.pop_front())
    }
}

impl Drop for EvdevReader {
    fn drop(&mut self) {
        log::debug!("input: closing {}", self.path.display());
    }
}

/// Preserve the existing file status flags and add `O_NONBLOCK`.
fn set_nonblocking(device: &Device) -> io::Result<()> {
    let fd = device.as_raw_fd();

    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }

    let rc = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if rc < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Convert an evdev event into our record.
fn to_raw_event(ev: &evdev::InputEvent) -> RawInputEvent {
    RawInputEvent::new(EventKind::from_raw(ev.event_type().0), ev.code(), ev.value())
}
