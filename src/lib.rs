//! # cobble
//!
//! Hotkey-driven click automation for Linux. A keyboard is read directly from
//! its evdev node and a virtual mouse is driven through uinput, so it works
//! the same under X11, Wayland and on the console.
//!
//! ## How it runs
//!
//! A fixed-rate tick loop (60 Hz by default) reads at most one keyboard event
//! per tick and invokes every action registered under [`MAIN`] with the time
//! elapsed since the previous tick:
//!
//! - [`ToolCycler`] toggles on a release of the toggle key, holds the left
//!   button, and every `delay` seconds releases it, scrolls one notch and
//!   presses it again. It stops on its own after `max_steps` tools.
//! - [`StatusReporter`] redraws the current state and the tick rate.
//!
//! A release of the quit key makes the actions return a non-zero code, which
//! ends the loop; both devices are released on the way out.
//!
//! ## Custom actions
//!
//! ```
//! use cobble::{ActionRegistry, MAIN, Result, Tick};
//!
//! let mut registry = ActionRegistry::new();
//! registry.register(MAIN, |tick: &mut Tick<'_>| -> Result<i32> {
//!     if tick.key_released(1) {
//!         return Ok(1); // Escape stops the loop
//!     }
//!     Ok(0)
//! });
//! assert_eq!(registry.count(MAIN), 1);
//! ```

pub mod automation;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod keycode;
pub mod registry;
pub mod status;
pub mod tick;

mod platform;

#[cfg(test)]
mod testing;

// Re-exports
pub use automation::{AutomationState, CyclerConfig, QUIT, StatusSnapshot, ToolCycler};
pub use config::{Args, Config};
pub use device::{Capabilities, DeviceIdentity, EventSink, EventSource};
pub use error::{Error, Result};
pub use event::{EventKind, KeyState, OutputEvent, RawInputEvent};
pub use keycode::Key;
pub use registry::{Action, ActionRegistry, MAIN, Tick};
pub use status::{FrameCounter, StatusReporter};
pub use tick::{Outcome, Session};

// Device backends
pub use platform::{EvdevReader, UinputMouse};
