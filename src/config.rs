//! Startup configuration.
//!
//! Everything is fixed for the lifetime of the process; nothing is persisted.
//! [`Args`] is the command-line surface, [`Config`] the validated result.

use crate::automation::CyclerConfig;
use crate::device::{Capabilities, DeviceIdentity};
use crate::error::{Error, Result};
use crate::event::BTN_LEFT;
use crate::keycode::Key;
use crate::tick::DEFAULT_TICK_RATE;
use clap::Parser;
use std::path::PathBuf;

/// Keyboard device read when none is given.
pub const DEFAULT_DEVICE: &str = "/dev/input/event5";

/// Title shown in the status block and the terminal title.
pub const DEFAULT_TITLE: &str = "Cobble Farmer";

/// Validated configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Keyboard event device.
    pub device: PathBuf,
    /// Automation tuning.
    pub cycler: CyclerConfig,
    /// Tick rate in Hz.
    pub tick_rate: u32,
    /// Virtual device identity.
    pub identity: DeviceIdentity,
    /// Whether to draw the status display.
    pub status: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: PathBuf::from(DEFAULT_DEVICE),
            cycler: CyclerConfig::default(),
            tick_rate: DEFAULT_TICK_RATE,
            identity: DeviceIdentity::default(),
            status: true,
        }
    }
}

impl Config {
    /// Check the values that would make the automation misbehave.
    pub fn validate(&self) -> Result<()> {
        let c = &self.cycler;
        if !(c.delay.is_finite() && c.delay > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "delay must be a positive number of seconds, got {}",
                c.delay
            )));
        }
        if c.max_steps == 0 {
            return Err(Error::InvalidConfig("max steps must be at least 1".into()));
        }
        if c.scroll == 0 {
            return Err(Error::InvalidConfig("scroll delta must not be 0".into()));
        }
        if c.toggle_key == c.quit_key {
            return Err(Error::InvalidConfig(format!(
                "toggle and quit key are both {}",
                c.toggle_key
            )));
        }
        if self.tick_rate == 0 {
            return Err(Error::InvalidConfig("tick rate must be at least 1 Hz".into()));
        }
        if self.identity.name.is_empty() {
            return Err(Error::InvalidConfig("device name must not be empty".into()));
        }
        Ok(())
    }

    /// What the virtual device advertises.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities::mouse(self.cycler.button)
    }
}

/// Hold the left mouse button and cycle tools with the wheel on a timer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Keyboard event device to read hotkeys from
    #[arg(default_value = DEFAULT_DEVICE)]
    pub device: PathBuf,

    /// Key whose release starts or stops the automation
    #[arg(long, default_value = "KEY_Z")]
    pub toggle_key: Key,

    /// Key whose release exits the program
    #[arg(long, default_value = "KEY_DELETE")]
    pub quit_key: Key,

    /// Seconds between tool cycles
    #[arg(long, default_value_t = 200.0)]
    pub delay: f64,

    /// Number of tools to go through before stopping
    #[arg(long, default_value_t = 9)]
    pub max_steps: u32,

    /// Wheel notches per tool cycle
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    pub scroll: i32,

    /// Polling rate in Hz
    #[arg(long, default_value_t = DEFAULT_TICK_RATE)]
    pub tick_rate: u32,

    /// Name of the virtual mouse
    #[arg(long, default_value = "CobbleFarmerMouse")]
    pub name: String,

    /// Vendor id of the virtual mouse (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0x1234", value_parser = parse_id)]
    pub vendor: u16,

    /// Product id of the virtual mouse (decimal or 0x-prefixed hex)
    #[arg(long, default_value = "0x5678", value_parser = parse_id)]
    pub product: u16,

    /// Do not draw the status display
    #[arg(long)]
    pub no_status: bool,
}

impl TryFrom<Args> for Config {
    type Error = Error;

    fn try_from(args: Args) -> Result<Self> {
        let config = Config {
            device: args.device,
            cycler: CyclerConfig {
                toggle_key: args.toggle_key,
                quit_key: args.quit_key,
                delay: args.delay,
                max_steps: args.max_steps,
                scroll: args.scroll,
                button: BTN_LEFT,
            },
            tick_rate: args.tick_rate,
            identity: DeviceIdentity {
                name: args.name,
                vendor: args.vendor,
                product: args.product,
                ..DeviceIdentity::default()
            },
            status: !args.no_status,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Parse a 16-bit id given as decimal or `0x` hex.
fn parse_id(s: &str) -> std::result::Result<u16, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse::<u16>(),
    };
    parsed.map_err(|e| format!("invalid id {s:?}: {e}"))
}
