//! evdev/uinput backends.

mod listen;
mod simulate;

pub use listen::EvdevReader;
pub use simulate::UinputMouse;
