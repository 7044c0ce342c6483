//! Device seams: where raw events come from and where synthetic events go.
//!
//! The tick loop only talks to these traits. The Linux implementations live in
//! `platform::linux` (evdev reader, uinput mouse); tests substitute in-memory
//! doubles.

use crate::error::Result;
use crate::event::{BTN_LEFT, EventKind, KeyState, OutputEvent, RawInputEvent, REL_WHEEL};

/// A non-blocking source of raw input events.
pub trait EventSource {
    /// Read at most one event.
    ///
    /// Returns `Ok(None)` when nothing is ready. That is not an error: the
    /// caller keeps using the previous event. Dropping the source closes it.
    fn poll(&mut self) -> Result<Option<RawInputEvent>>;
}

/// A writable synthetic input device.
///
/// `emit` writes a single record; `sync_report` closes the current burst so
/// consumers apply it atomically. Every button or axis change must be followed
/// by exactly one `sync_report` before the next unrelated emission, which the
/// provided gesture methods guarantee. Dropping the sink destroys the device.
pub trait EventSink {
    /// Write one event record.
    fn emit(&mut self, event: OutputEvent) -> Result<()>;

    /// Write a `SYN_REPORT` marker.
    fn sync_report(&mut self) -> Result<()>;

    /// Change a button's state as one synchronized report.
    fn press_release(&mut self, button: u16, state: KeyState) -> Result<()> {
        self.emit(OutputEvent::button(button, state))?;
        self.sync_report()
    }

    /// Move the vertical wheel as one synchronized report.
    fn scroll(&mut self, delta: i32) -> Result<()> {
        self.emit(OutputEvent::wheel(delta))?;
        self.sync_report()
    }
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&mut self, event: OutputEvent) -> Result<()> {
        (**self).emit(event)
    }

    fn sync_report(&mut self) -> Result<()> {
        (**self).sync_report()
    }
}

impl<T: EventSource + ?Sized> EventSource for Box<T> {
    fn poll(&mut self) -> Result<Option<RawInputEvent>> {
        (**self).poll()
    }
}

/// Event types and codes a virtual device advertises.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// `EV_KEY` codes (buttons).
    pub buttons: Vec<u16>,
    /// `EV_REL` codes (axes).
    pub relative_axes: Vec<u16>,
}

impl Capabilities {
    /// A primary button plus the vertical wheel.
    pub fn mouse(button: u16) -> Self {
        Self {
            buttons: vec![button],
            relative_axes: vec![REL_WHEEL],
        }
    }

    /// Check if an output event falls inside the advertised set.
    pub fn supports(&self, event: &OutputEvent) -> bool {
        match event.kind {
            EventKind::Synchronization => true,
            EventKind::Key => self.buttons.contains(&event.code),
            EventKind::Relative => self.relative_axes.contains(&event.code),
            _ => false,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::mouse(BTN_LEFT)
    }
}

/// `BUS_USB` from `linux/input.h`.
pub const BUS_USB: u16 = 0x03;

/// How the virtual device identifies itself to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// Display name.
    pub name: String,
    /// Bus type.
    pub bus: u16,
    /// Vendor id.
    pub vendor: u16,
    /// Product id.
    pub product: u16,
    /// Version.
    pub version: u16,
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self {
            name: "CobbleFarmerMouse".to_string(),
            bus: BUS_USB,
            vendor: 0x1234,
            product: 0x5678,
            version: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;

    #[test]
    fn test_press_release_is_one_report() {
        let mut sink = RecordingSink::default();
        sink.press_release(BTN_LEFT, KeyState::Pressed).unwrap();
        assert_eq!(
            sink.events(),
            vec![
                OutputEvent::button(BTN_LEFT, KeyState::Pressed),
                OutputEvent::sync_report(),
            ]
        );
    }

    #[test]
    fn test_scroll_is_one_report() {
        let mut sink = RecordingSink::default();
        sink.scroll(-1).unwrap();
        assert_eq!(
            sink.events(),
            vec![OutputEvent::wheel(-1), OutputEvent::sync_report()]
        );
    }

    #[test]
    fn test_boxed_sink_forwards() {
        let mut sink: Box<RecordingSink> = Box::default();
        sink.scroll(1).unwrap();
        assert_eq!(sink.events().len(), 2);
    }

    #[test]
    fn test_default_capabilities() {
        let caps = Capabilities::default();
        assert!(caps.supports(&OutputEvent::button(BTN_LEFT, KeyState::Released)));
        assert!(caps.supports(&OutputEvent::wheel(-1)));
        assert!(caps.supports(&OutputEvent::sync_report()));
        assert!(!caps.supports(&OutputEvent::button(0x111, KeyState::Pressed)));
        assert!(!caps.supports(&OutputEvent::new(EventKind::Absolute, 0, 0)));
    }

    #[test]
    fn test_default_identity() {
        let id = DeviceIdentity::default();
        assert_eq!(id.name, "CobbleFarmerMouse");
        assert_eq!((id.bus, id.vendor, id.product), (BUS_USB, 0x1234, 0x5678));
    }
}
