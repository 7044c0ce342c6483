//! Raw input event records and the events written to the virtual device.
//!
//! Both sides speak the Linux input protocol: an event is a `(type, code, value)`
//! triple, and a burst of events is closed by a `SYN_REPORT`.

/// `SYN_REPORT` code within [`EventKind::Synchronization`].
pub const SYN_REPORT: u16 = 0x00;
/// Left mouse button code within [`EventKind::Key`].
pub const BTN_LEFT: u16 = 0x110;
/// Vertical wheel code within [`EventKind::Relative`].
pub const REL_WHEEL: u16 = 0x08;

/// The type field of an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EventKind {
    /// `EV_SYN`: report boundaries.
    #[default]
    Synchronization,
    /// `EV_KEY`: keys and buttons.
    Key,
    /// `EV_REL`: relative axes (motion, wheel).
    Relative,
    /// `EV_ABS`: absolute axes.
    Absolute,
    /// `EV_MSC`: miscellaneous (scancodes).
    Misc,
    /// Any other raw type.
    Other(u16),
}

impl EventKind {
    /// Decode a raw `type` field.
    pub fn from_raw(raw: u16) -> Self {
        match raw {
            0x00 => EventKind::Synchronization,
            0x01 => EventKind::Key,
            0x02 => EventKind::Relative,
            0x03 => EventKind::Absolute,
            0x04 => EventKind::Misc,
            other => EventKind::Other(other),
        }
    }

    /// Encode back to the raw `type` field.
    pub fn raw(&self) -> u16 {
        match self {
            EventKind::Synchronization => 0x00,
            EventKind::Key => 0x01,
            EventKind::Relative => 0x02,
            EventKind::Absolute => 0x03,
            EventKind::Misc => 0x04,
            EventKind::Other(raw) => *raw,
        }
    }
}

/// State carried in the value of a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyState {
    /// Value 0: key or button released (break).
    Released,
    /// Value 1: key or button pressed (make).
    Pressed,
    /// Value 2: auto-repeat while held.
    Repeat,
}

impl KeyState {
    /// The event value for this state.
    pub fn value(&self) -> i32 {
        match self {
            KeyState::Released => 0,
            KeyState::Pressed => 1,
            KeyState::Repeat => 2,
        }
    }
}

/// The most recently read event from the physical device.
///
/// The tick loop keeps exactly one of these; it is replaced whenever a new
/// event is read and otherwise keeps its previous value. The default value is
/// an all-zero record, matching a zero-initialized kernel `input_event`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RawInputEvent {
    /// Event type.
    pub kind: EventKind,
    /// Type-specific code (key code, axis, sync code).
    pub code: u16,
    /// Value (key state, axis delta).
    pub value: i32,
}

impl RawInputEvent {
    /// Create a new raw event.
    pub fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// Shorthand for a key event.
    pub fn key(code: u16, state: KeyState) -> Self {
        Self::new(EventKind::Key, code, state.value())
    }

    /// Check if this record is a key event for `code` with the given state.
    pub fn is_key(&self, code: u16, state: KeyState) -> bool {
        self.kind == EventKind::Key && self.code == code && self.value == state.value()
    }

    /// Check if this record reports `code` being released.
    pub fn is_key_release(&self, code: u16) -> bool {
        self.is_key(code, KeyState::Released)
    }
}

/// A single record written to the virtual device.
///
/// Built per emission and not retained. There is no timestamp: the kernel
/// stamps uinput events on arrival.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputEvent {
    /// Event type.
    pub kind: EventKind,
    /// Type-specific code.
    pub code: u16,
    /// Value.
    pub value: i32,
}

impl OutputEvent {
    /// Create an event.
    pub fn new(kind: EventKind, code: u16, value: i32) -> Self {
        Self { kind, code, value }
    }

    /// A `SYN_REPORT` marker.
    pub fn sync_report() -> Self {
        Self::new(EventKind::Synchronization, SYN_REPORT, 0)
    }

    /// A button state change.
    pub fn button(code: u16, state: KeyState) -> Self {
        Self::new(EventKind::Key, code, state.value())
    }

    /// A vertical wheel movement.
    pub fn wheel(delta: i32) -> Self {
        Self::new(EventKind::Relative, REL_WHEEL, delta)
    }

    /// Check if this is a `SYN_REPORT` marker.
    pub fn is_sync_report(&self) -> bool {
        self.kind == EventKind::Synchronization && self.code == SYN_REPORT
    }
}
