//! Fixed-rate tick loop.
//!
//! Each tick: measure the time since the previous tick, read at most one input
//! event, invoke the [`MAIN`] actions, and sleep for one tick interval. A
//! non-zero result from the actions, or the external stop flag, ends the loop.
//! The session owns both devices; they are released when it is dropped, on
//! every exit path.

use crate::device::{EventSink, EventSource};
use crate::error::Result;
use crate::event::RawInputEvent;
use crate::registry::{ActionRegistry, MAIN, Tick};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Default tick rate in Hz.
pub const DEFAULT_TICK_RATE: u32 = 60;

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The actions returned this non-zero code.
    Sentinel(i32),
    /// The stop flag was raised (SIGINT/SIGTERM).
    Interrupted,
}

/// Clamp a measured tick duration to a usable, non-negative number of seconds.
pub fn clamp_elapsed(elapsed: f64) -> f64 {
    if elapsed.is_nan() || elapsed < 0.0 {
        log::warn!("tick: clock anomaly ({elapsed}s), using 0");
        0.0
    } else {
        elapsed
    }
}

/// Seconds between two clock samples, 0 if `now` is before `prev`.
pub fn elapsed_between(prev: Instant, now: Instant) -> f64 {
    match now.checked_duration_since(prev) {
        Some(d) => d.as_secs_f64(),
        None => clamp_elapsed(-(prev.duration_since(now).as_secs_f64())),
    }
}

/// Sleep interval for a tick rate.
pub fn tick_interval(rate_hz: u32) -> Duration {
    Duration::from_secs(1) / rate_hz.max(1)
}

/// Devices, actions and the shared last event for one run.
pub struct Session<S: EventSource, K: EventSink> {
    source: S,
    sink: K,
    registry: ActionRegistry,
    last_event: RawInputEvent,
    interval: Duration,
}

impl<S: EventSource, K: EventSink> Session<S, K> {
    /// Create a session ticking at [`DEFAULT_TICK_RATE`].
    pub fn new(source: S, sink: K, registry: ActionRegistry) -> Self {
        Self {
            source,
            sink,
            registry,
            last_event: RawInputEvent::default(),
            interval: tick_interval(DEFAULT_TICK_RATE),
        }
    }

    /// Change the tick rate.
    pub fn with_tick_rate(mut self, rate_hz: u32) -> Self {
        self.interval = tick_interval(rate_hz);
        self
    }

    /// The event actions currently see.
    pub fn last_event(&self) -> &RawInputEvent {
        &self.last_event
    }

    /// Run one tick with an already measured `elapsed`, without sleeping.
    ///
    /// Returns the summed action code; non-zero means stop.
    pub fn step(&mut self, elapsed: f64) -> Result<i32> {
        let elapsed = clamp_elapsed(elapsed);

        let fresh = match self.source.poll()? {
            Some(event) => {
                log::trace!("tick: read {event:?}");
                self.last_event = event;
                true
            }
            None => false,
        };

        let mut tick = Tick {
            elapsed,
            event: &self.last_event,
            fresh,
            sink: &mut self.sink,
        };
        self.registry.invoke(MAIN, &mut tick)
    }

    /// Run until an action asks to stop or `stop` is raised.
    ///
    /// On every exit path the action shutdown hooks run first, then both
    /// devices are released exactly once. A loop error wins over a shutdown
    /// error.
    pub fn run(mut self, stop: &AtomicBool) -> Result<Outcome> {
        log::info!(
            "tick: running at {:.1} Hz",
            1.0 / self.interval.as_secs_f64()
        );

        let result = self.run_loop(stop);
        if let Err(e) = &result {
            log::error!("tick: loop failed: {e}");
        }

        let shutdown = self.registry.shutdown(&mut self.sink);
        self.release();

        match (result, shutdown) {
            (Ok(outcome), Ok(())) => Ok(outcome),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(shutdown_err)) => {
                log::warn!("tick: shutdown after failure also failed: {shutdown_err}");
                Err(e)
            }
        }
    }

    fn run_loop(&mut self, stop: &AtomicBool) -> Result<Outcome> {
        let mut prev = Instant::now();
        loop {
            if stop.load(Ordering::SeqCst) {
                log::info!("tick: stop requested");
                return Ok(Outcome::Interrupted);
            }

            let now = Instant::now();
            let elapsed = elapsed_between(prev, now);
            prev = now;

            let code = self.step(elapsed)?;
            if code != 0 {
                log::info!("tick: actions returned {code}, terminating");
                return Ok(Outcome::Sentinel(code));
            }

            thread::sleep(self.interval);
        }
    }

    fn release(self) {
        let Session { source, sink, .. } = self;
        drop(source);
        log::debug!("tick: input device closed");
        drop(sink);
        log::debug!("tick: virtual device destroyed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automation::{CyclerConfig, QUIT, ToolCycler};
    use crate::event::{BTN_LEFT, KeyState, OutputEvent};
    use crate::status::StatusReporter;
    use crate::testing::{DropCounter, FailingWriter, RecordingSink, ScriptedSource, Tracked};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn release(code: u16) -> Option<RawInputEvent> {
        Some(RawInputEvent::key(code, KeyState::Released))
    }

    fn sync() -> Option<RawInputEvent> {
        Some(RawInputEvent::default())
    }

    #[test]
    fn test_clamp_elapsed() {
        assert_eq!(clamp_elapsed(0.016), 0.016);
        assert_eq!(clamp_elapsed(0.0), 0.0);
        assert_eq!(clamp_elapsed(-3.0), 0.0);
        assert_eq!(clamp_elapsed(f64::NAN), 0.0);
    }

    #[test]
    fn test_elapsed_between_is_never_negative() {
        let earlier = Instant::now();
        let later = earlier + Duration::from_millis(20);
        assert!((elapsed_between(earlier, later) - 0.02).abs() < 1e-9);
        assert_eq!(elapsed_between(later, earlier), 0.0);
    }

    #[test]
    fn test_tick_interval() {
        assert_eq!(tick_interval(60), Duration::from_nanos(16_666_666));
        assert_eq!(tick_interval(1), Duration::from_secs(1));
        assert_eq!(tick_interval(0), Duration::from_secs(1));
    }

    #[test]
    fn test_step_keeps_stale_event_when_nothing_read() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ActionRegistry::new();
        let s = seen.clone();
        registry.register(MAIN, move |tick: &mut Tick<'_>| -> Result<i32> {
            s.borrow_mut().push((*tick.event, tick.fresh));
            Ok(0)
        });

        let source = ScriptedSource::new([release(44), None, None, sync()]);
        let mut session = Session::new(source, RecordingSink::default(), registry);
        for _ in 0..4 {
            assert_eq!(session.step(0.016).unwrap(), 0);
        }

        let key = RawInputEvent::key(44, KeyState::Released);
        assert_eq!(
            *seen.borrow(),
            vec![
                (key, true),
                (key, false),
                (key, false),
                (RawInputEvent::default(), true),
            ]
        );
        assert_eq!(*session.last_event(), RawInputEvent::default());
    }

    #[test]
    fn test_step_clamps_negative_elapsed() {
        let seen = Rc::new(RefCell::new(None));
        let mut registry = ActionRegistry::new();
        let s = seen.clone();
        registry.register(MAIN, move |tick: &mut Tick<'_>| -> Result<i32> {
            *s.borrow_mut() = Some(tick.elapsed);
            Ok(0)
        });
        let mut session = Session::new(ScriptedSource::default(), RecordingSink::default(), registry);
        session.step(-0.5).unwrap();
        assert_eq!(*seen.borrow(), Some(0.0));
    }

    #[test]
    fn test_sentinel_terminates_and_releases_devices_once() {
        let source_drops = DropCounter::default();
        let sink_drops = DropCounter::default();
        let sink = RecordingSink::default();

        let mut registry = ActionRegistry::new();
        registry.register(MAIN, ToolCycler::new(CyclerConfig::default()));

        // Start the automation, then quit while it is running.
        let source = ScriptedSource::new([release(44), sync(), None, release(111)]);
        let session = Session::new(
            Tracked::new(source, &source_drops),
            Tracked::new(sink.clone(), &sink_drops),
            registry,
        )
        .with_tick_rate(1000);

        let stop = AtomicBool::new(false);
        assert_eq!(session.run(&stop).unwrap(), Outcome::Sentinel(QUIT));
        assert_eq!(source_drops.count(), 1);
        assert_eq!(sink_drops.count(), 1);

        // Press on start, release on shutdown.
        assert_eq!(
            sink.payload(),
            vec![
                OutputEvent::button(BTN_LEFT, KeyState::Pressed),
                OutputEvent::button(BTN_LEFT, KeyState::Released),
            ]
        );
        assert_eq!(sink.sync_count(), 2);
    }

    #[test]
    fn test_summed_codes_terminate() {
        let mut registry = ActionRegistry::new();
        let mut ticks = 0;
        registry.register(MAIN, move |_: &mut Tick<'_>| -> Result<i32> {
            ticks += 1;
            Ok(if ticks == 3 { 2 } else { 0 })
        });
        registry.register(MAIN, |_: &mut Tick<'_>| -> Result<i32> { Ok(0) });

        let session = Session::new(ScriptedSource::default(), RecordingSink::default(), registry)
            .with_tick_rate(1000);
        let stop = AtomicBool::new(false);
        assert_eq!(session.run(&stop).unwrap(), Outcome::Sentinel(2));
    }

    #[test]
    fn test_stop_flag_interrupts_and_releases() {
        let sink_drops = DropCounter::default();
        let stop = Rc::new(AtomicBool::new(false));

        let mut registry = ActionRegistry::new();
        let flag = stop.clone();
        let mut ticks = 0;
        registry.register(MAIN, move |_: &mut Tick<'_>| -> Result<i32> {
            ticks += 1;
            if ticks == 5 {
                flag.store(true, Ordering::SeqCst);
            }
            Ok(0)
        });

        let session = Session::new(
            ScriptedSource::default(),
            Tracked::new(RecordingSink::default(), &sink_drops),
            registry,
        )
        .with_tick_rate(1000);
        assert_eq!(session.run(&stop).unwrap(), Outcome::Interrupted);
        assert_eq!(sink_drops.count(), 1);
    }

    #[test]
    fn test_emit_failure_propagates_and_still_releases() {
        let source_drops = DropCounter::default();
        let sink_drops = DropCounter::default();
        let mut sink = RecordingSink::default();
        sink.fail = true;

        let mut registry = ActionRegistry::new();
        registry.register(MAIN, ToolCycler::new(CyclerConfig::default()));

        let session = Session::new(
            Tracked::new(ScriptedSource::new([release(44)]), &source_drops),
            Tracked::new(sink, &sink_drops),
            registry,
        )
        .with_tick_rate(1000);
        let stop = AtomicBool::new(false);
        assert!(matches!(session.run(&stop), Err(crate::Error::Emit(_))));
        assert_eq!(source_drops.count(), 1);
        assert_eq!(sink_drops.count(), 1);
    }

    #[test]
    fn test_read_error_still_releases_button() {
        let source_drops = DropCounter::default();
        let sink_drops = DropCounter::default();
        let sink = RecordingSink::default();

        let mut registry = ActionRegistry::new();
        registry.register(MAIN, ToolCycler::new(CyclerConfig::default()));

        // Start the automation, then lose the keyboard.
        let mut source = ScriptedSource::new([release(44), sync()]);
        source.unplug = true;
        let session = Session::new(
            Tracked::new(source, &source_drops),
            Tracked::new(sink.clone(), &sink_drops),
            registry,
        )
        .with_tick_rate(1000);

        let stop = AtomicBool::new(false);
        assert!(matches!(session.run(&stop), Err(crate::Error::Read(_))));
        assert_eq!(
            sink.payload(),
            vec![
                OutputEvent::button(BTN_LEFT, KeyState::Pressed),
                OutputEvent::button(BTN_LEFT, KeyState::Released),
            ]
        );
        assert_eq!(source_drops.count(), 1);
        assert_eq!(sink_drops.count(), 1);
    }

    #[test]
    fn test_broken_status_output_keeps_running_until_quit() {
        let sink = RecordingSink::default();
        let writer = FailingWriter::default();

        let mut registry = ActionRegistry::new();
        let cycler = ToolCycler::new(CyclerConfig::default());
        let status = cycler.status();
        registry.register(MAIN, cycler);
        registry.register(MAIN, StatusReporter::new(writer.clone(), "t", status));

        let source = ScriptedSource::new([release(44), sync(), None, None, release(111)]);
        let session = Session::new(source, sink.clone(), registry).with_tick_rate(1000);

        let stop = AtomicBool::new(false);
        assert_eq!(session.run(&stop).unwrap(), Outcome::Sentinel(QUIT));
        assert_eq!(writer.attempts(), 1);
        assert_eq!(
            sink.payload(),
            vec![
                OutputEvent::button(BTN_LEFT, KeyState::Pressed),
                OutputEvent::button(BTN_LEFT, KeyState::Released),
            ]
        );
    }
}
