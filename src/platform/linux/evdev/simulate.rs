//! Virtual mouse over uinput.
//!
//! Creates a synthetic device that advertises only the configured buttons and
//! relative axes, and identifies itself with the configured bus, vendor,
//! product and name.

use crate::device::{Capabilities, DeviceIdentity, EventSink};
use crate::error::{Error, Result};
use crate::event::OutputEvent;
use evdev::{
    AttributeSet, BusType, EventType as EvdevEventType, InputEvent, InputId, Key as EvdevKey,
    RelativeAxisType,
    uinput::{VirtualDevice, VirtualDeviceBuilder},
};
use std::io;

/// A uinput device acting as a mouse.
///
/// evdev closes every batch written through [`VirtualDevice::emit`] with its own
/// `SYN_REPORT`, so records from `emit` are collected and written as one batch
/// when `sync_report` is called. The device seen by consumers receives exactly
/// the records emitted, each burst followed by one `SYN_REPORT`.
pub struct UinputMouse {
    device: VirtualDevice,
    name: String,
    capabilities: Capabilities,
    pending: Vec<InputEvent>,
}

impl UinputMouse {
    /// Register the virtual device with the host.
    pub fn create(identity: &DeviceIdentity, capabilities: &Capabilities) -> Result<Self> {
        let mut keys = AttributeSet::<EvdevKey>::new();
        for &code in &capabilities.buttons {
            keys.insert(EvdevKey::new(code));
        }

        let mut rel_axes = AttributeSet::<RelativeAxisType>::new();
        for &code in &capabilities.relative_axes {
            rel_axes.insert(RelativeAxisType(code));
        }

        let id = InputId::new(
            BusType(identity.bus),
            identity.vendor,
            identity.product,
            identity.version,
        );

        let device = VirtualDeviceBuilder::new()
            .map_err(uinput_error)?
            .name(&identity.name)
            .input_id(id)
            .with_keys(&keys)
            .map_err(|e| Error::VirtualDevice(format!("failed to add buttons: {e}")))?
            .with_relative_axes(&rel_axes)
            .map_err(|e| Error::VirtualDevice(format!("failed to add relative axes: {e}")))?
            .build()
            .map_err(uinput_error)?;

        log::info!(
            "uinput: created {:?} ({:04x}:{:04x})",
            identity.name,
            identity.vendor,
            identity.product
        );

        Ok(Self {
            device,
            name: identity.name.clone(),
            capabilities: capabilities.clone(),
            pending: Vec::new(),
        })
    }
}

impl EventSink for UinputMouse {
    fn emit(&mut self, event: OutputEvent) -> Result<()> {
        if event.is_sync_report() {
            return self.sync_report();
        }
        if !self.capabilities.supports(&event) {
            log::warn!("uinput: {event:?} is not advertised by {:?}", self.name);
        }
        self.pending.push(to_input_event(&event));
        Ok(())
    }

    fn sync_report(&mut self) -> Result<()> {
        let batch = std::mem::take(&mut self.pending);
        self.device.emit(&batch).map_err(Error::Emit)
    }
}

impl Drop for UinputMouse {
    fn drop(&mut self) {
        if !self.pending.is_empty() {
            log::warn!(
                "uinput: discarding {} unsynchronized event(s)",
                self.pending.len()
            );
        }
        log::debug!("uinput: destroying {:?}", self.name);
    }
}

/// Convert our record into an evdev event. The kernel timestamps it on write.
fn to_input_event(event: &OutputEvent) -> InputEvent {
    InputEvent::new(EvdevEventType(event.kind.raw()), event.code, event.value)
}

/// Map a failure to open or create the uinput device.
fn uinput_error(e: io::Error) -> Error {
    match e.kind() {
        io::ErrorKind::PermissionDenied => Error::PermissionDenied(format!(
            "cannot access /dev/uinput: {e}. Make sure /dev/uinput is writable \
             (you may need to be in the 'input' group or have appropriate udev rules)."
        )),
        io::ErrorKind::NotFound => Error::VirtualDevice(format!(
            "/dev/uinput not found: {e}. Is the uinput kernel module loaded?"
        )),
        _ => Error::VirtualDevice(e.to_string()),
    }
}
