//! Platform-specific device backends.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(target_os = "linux")]
pub use linux::*;

// The automation reads evdev nodes and writes through uinput; nothing else exists.
#[cfg(not(target_os = "linux"))]
compile_error!("cobble only supports Linux (evdev and uinput)");
