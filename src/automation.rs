//! The tool-cycle automation.
//!
//! A release of the toggle key starts holding the primary button. While
//! running, every `delay` seconds the button is let go, the wheel moves one
//! notch to select the next tool, and the button is pressed again. After
//! `max_steps` tools the button is released and the automation goes idle.
//! A release of the quit key stops the whole program.

use crate::device::EventSink;
use crate::error::Result;
use crate::event::{BTN_LEFT, KeyState};
use crate::keycode::Key;
use crate::registry::{Action, Tick};
use std::cell::Cell;
use std::rc::Rc;

/// Code returned to the tick loop when the quit key is released.
pub const QUIT: i32 = 1;

/// Tuning for [`ToolCycler`].
#[derive(Debug, Clone, PartialEq)]
pub struct CyclerConfig {
    /// Key whose release toggles the automation.
    pub toggle_key: Key,
    /// Key whose release stops the program.
    pub quit_key: Key,
    /// Seconds between tool cycles.
    pub delay: f64,
    /// Last step number before the automation stops on its own.
    pub max_steps: u32,
    /// Wheel delta of one tool cycle.
    pub scroll: i32,
    /// Button held while running.
    pub button: u16,
}

impl Default for CyclerConfig {
    fn default() -> Self {
        Self {
            toggle_key: Key::KeyZ,
            quit_key: Key::Delete,
            delay: 200.0,
            max_steps: 9,
            scroll: -1,
            button: BTN_LEFT,
        }
    }
}

/// State carried across ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AutomationState {
    /// Whether the button is currently held by the automation.
    pub running: bool,
    /// Seconds accumulated toward the next cycle.
    pub accumulator: f64,
    /// Current tool, starting at 1.
    pub step: u32,
}

/// What the status display shows. Published by the cycler every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusSnapshot {
    pub running: bool,
    pub delay: f64,
    pub accumulator: f64,
    pub step: u32,
}

/// Shared, single-threaded view of the latest [`StatusSnapshot`].
pub type StatusHandle = Rc<Cell<StatusSnapshot>>;

/// Holds the button and cycles tools on a fixed delay.
#[derive(Debug)]
pub struct ToolCycler {
    config: CyclerConfig,
    state: AutomationState,
    status: StatusHandle,
}

impl ToolCycler {
    /// Create an idle cycler.
    pub fn new(config: CyclerConfig) -> Self {
        let status = Rc::new(Cell::new(StatusSnapshot {
            delay: config.delay,
            ..Default::default()
        }));
        Self {
            config,
            state: AutomationState::default(),
            status,
        }
    }

    /// Handle for the status display.
    pub fn status(&self) -> StatusHandle {
        self.status.clone()
    }

    /// Current state.
    pub fn state(&self) -> AutomationState {
        self.state
    }

    fn start(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        self.state.running = true;
        self.state.accumulator = 0.0;
        self.state.step = 1;
        log::info!("automation: started");
        sink.press_release(self.config.button, KeyState::Pressed)
    }

    fn stop(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        self.state.running = false;
        sink.press_release(self.config.button, KeyState::Released)
    }

    fn next_tool(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        sink.press_release(self.config.button, KeyState::Released)?;
        sink.scroll(self.config.scroll)?;
        sink.press_release(self.config.button, KeyState::Pressed)
    }

    fn step(&mut self, tick: &mut Tick<'_>) -> Result<i32> {
        if tick.key_released(self.config.toggle_key.code()) {
            if self.state.running {
                log::info!("automation: stopped by toggle key");
                self.stop(tick.sink)?;
            } else {
                self.start(tick.sink)?;
            }
        }

        if tick.key_released(self.config.quit_key.code()) {
            log::info!("automation: quit key released");
            return Ok(QUIT);
        }

        if !self.state.running {
            return Ok(0);
        }

        if self.state.step > self.config.max_steps {
            log::info!("automation: all {} tools used", self.config.max_steps);
            self.stop(tick.sink)?;
            return Ok(0);
        }

        self.state.accumulator += tick.elapsed;
        if self.state.accumulator >= self.config.delay {
            self.next_tool(tick.sink)?;
            // Keep the overshoot so cycles do not drift later over time.
            self.state.accumulator -= self.config.delay;
            self.state.step += 1;
            log::debug!(
                "automation: cycled to tool {} (carry {:.3}s)",
                self.state.step,
                self.state.accumulator
            );
        }

        Ok(0)
    }

    fn publish(&self) {
        self.status.set(StatusSnapshot {
            running: self.state.running,
            delay: self.config.delay,
            accumulator: self.state.accumulator,
            step: self.state.step,
        });
    }
}

impl Action for ToolCycler {
    fn invoke(&mut self, tick: &mut Tick<'_>) -> Result<i32> {
        let code = self.step(tick);
        self.publish();
        code
    }

    /// Let go of the button if the program stops mid-run.
    fn shutdown(&mut self, sink: &mut dyn EventSink) -> Result<()> {
        if self.state.running {
            log::info!("automation: releasing button on shutdown");
            self.stop(sink)?;
            self.publish();
        }
        Ok(())
    }
}
