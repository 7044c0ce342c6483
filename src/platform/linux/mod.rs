//! Linux platform implementation.
//!
//! Reads the keyboard directly from a `/dev/input/event*` node and writes
//! synthetic mouse events through `/dev/uinput`. Works on X11, Wayland and
//! the console alike.
//!
//! ## Permissions
//!
//! Both device nodes are normally restricted to root and the `input` group:
//! ```bash
//! sudo usermod -aG input $USER
//! # Then log out and back in
//! ```

mod evdev;

pub use self::evdev::{EvdevReader, UinputMouse};
