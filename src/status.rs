//! Live status display.
//!
//! Redraws a small block with the automation state every tick and puts the
//! measured tick rate into the terminal title once per second. Output errors
//! never stop the program: the first one is logged and drawing is disabled.

use crate::automation::{StatusHandle, StatusSnapshot};
use crate::error::{Error, Result};
use crate::registry::{Action, Tick};
use std::io::{self, Write};

/// Counts ticks per one-second window.
#[derive(Debug, Clone, Default)]
pub struct FrameCounter {
    window: f64,
    frames: u32,
}

impl FrameCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one tick. Returns the number of ticks in the window that just
    /// closed, if this tick closed one.
    pub fn tick(&mut self, elapsed: f64) -> Option<u32> {
        self.window += elapsed;
        self.frames += 1;

        if self.window > 1.0 {
            self.window -= 1.0;
            let rate = self.frames;
            self.frames = 0;
            return Some(rate);
        }
        None
    }
}

/// Action that draws the status block. Always returns 0.
pub struct StatusReporter<W: Write> {
    out: W,
    title: String,
    status: StatusHandle,
    counter: FrameCounter,
    disabled: bool,
}

impl<W: Write> StatusReporter<W> {
    /// Create a reporter drawing `status` to `out`.
    pub fn new(out: W, title: impl Into<String>, status: StatusHandle) -> Self {
        Self {
            out,
            title: title.into(),
            status,
            counter: FrameCounter::new(),
            disabled: false,
        }
    }

    /// Whether drawing stopped after an output error.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    fn draw(&mut self, snapshot: &StatusSnapshot, rate: Option<u32>) -> io::Result<()> {
        if let Some(rate) = rate {
            // OSC 0: set window title, terminated by BEL.
            write!(self.out, "\x1b]0;{} - {} FPS\x07", self.title, rate)?;
        }

        // RIS: clear the screen and home the cursor.
        write!(self.out, "\x1bc")?;
        writeln!(self.out, "{}", self.title)?;
        writeln!(self.out, "-----------------------------------------")?;
        writeln!(self.out, "Running:                {}", u8::from(snapshot.running))?;
        writeln!(self.out, "Delay Between Tools:    {:.6}", snapshot.delay)?;
        writeln!(self.out, "Delay Tracker:          {:.6}", snapshot.accumulator)?;
        writeln!(self.out, "Current Tool:           {}", snapshot.step)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> Action for StatusReporter<W> {
    fn invoke(&mut self, tick: &mut Tick<'_>) -> Result<i32> {
        let rate = self.counter.tick(tick.elapsed);
        if let Some(rate) = rate {
            log::trace!("status: {rate} ticks/s");
        }
        if self.disabled {
            return Ok(0);
        }

        let snapshot = self.status.get();
        if let Err(e) = self.draw(&snapshot, rate) {
            log::warn!("{}; status display disabled", Error::Status(e));
            self.disabled = true;
        }
        Ok(0)
    }
}
