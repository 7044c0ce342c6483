//! Named action registry.
//!
//! An ordered multimap of name to handler. Several actions may share a name;
//! invoking the name runs all of them in registration order and sums their
//! return codes. The tick loop invokes [`MAIN`] once per tick and treats a
//! non-zero sum as the request to stop.

use crate::device::EventSink;
use crate::error::Result;
use crate::event::RawInputEvent;

/// Name the tick loop invokes every tick.
pub const MAIN: &str = "main";

/// Everything an action sees during one tick.
pub struct Tick<'a> {
    /// Seconds since the previous tick, never negative.
    pub elapsed: f64,
    /// The last event read from the input device. Stale when `fresh` is false.
    pub event: &'a RawInputEvent,
    /// Whether `event` was read during this tick.
    pub fresh: bool,
    /// The virtual device.
    pub sink: &'a mut dyn EventSink,
}

impl Tick<'_> {
    /// A release of `code` read during this tick.
    ///
    /// Stale events never count, so a single physical release is seen once.
    pub fn key_released(&self, code: u16) -> bool {
        self.fresh && self.event.is_key_release(code)
    }
}

/// Trait for actions invoked by name.
///
/// The returned code is summed with the other actions of the same name; a
/// non-zero total stops the tick loop.
pub trait Action {
    /// Called once per invocation of the action's name.
    fn invoke(&mut self, tick: &mut Tick<'_>) -> Result<i32>;

    /// Called once when the loop stops, before the devices are released.
    fn shutdown(&mut self, _sink: &mut dyn EventSink) -> Result<()> {
        Ok(())
    }
}

/// Implement Action for closures.
impl<F> Action for F
where
    F: FnMut(&mut Tick<'_>) -> Result<i32>,
{
    fn invoke(&mut self, tick: &mut Tick<'_>) -> Result<i32> {
        self(tick)
    }
}

struct ActionEntry {
    name: String,
    action: Box<dyn Action>,
}

/// Ordered collection of named actions.
///
/// Entries are only ever appended. Actions cannot register new actions while
/// being invoked: `invoke` holds the registry mutably for its whole duration.
#[derive(Default)]
pub struct ActionRegistry {
    entries: Vec<ActionEntry>,
}

impl ActionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an action under `name`.
    pub fn register<A>(&mut self, name: impl Into<String>, action: A)
    where
        A: Action + 'static,
    {
        let name = name.into();
        log::debug!("registry: registered action #{} as {:?}", self.entries.len(), name);
        self.entries.push(ActionEntry {
            name,
            action: Box::new(action),
        });
    }

    /// Run every action registered under `name`, in order, and sum the codes.
    ///
    /// Returns 0 without calling anything if no action has that name. The
    /// first failing action aborts the invocation.
    pub fn invoke(&mut self, name: &str, tick: &mut Tick<'_>) -> Result<i32> {
        let mut total = 0i32;
        for entry in self.entries.iter_mut().filter(|e| e.name == name) {
            total = total.wrapping_add(entry.action.invoke(tick)?);
        }
        Ok(total)
    }

    /// Give every action a chance to leave the virtual device in a clean state.
    pub fn shutdown(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        for entry in &mut self.entries {
            entry.action.shutdown(sink)?;
        }
        Ok(())
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of actions registered under `name`.
    pub fn count(&self, name: &str) -> usize {
        self.entries.iter().filter(|e| e.name == name).count()
    }
}

impl std::fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.name))
            .finish()
    }
}
