//! In-memory device doubles shared by the unit tests.

use crate::device::{EventSink, EventSource};
use crate::error::{Error, Result};
use crate::event::{OutputEvent, RawInputEvent};
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

/// Records every emitted event, sync markers included.
///
/// Clones share the same log, so a test can keep a handle while the session
/// owns (and eventually drops) the sink.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Rc<RefCell<Vec<OutputEvent>>>,
    pub fail: bool,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<OutputEvent> {
        self.log.borrow().clone()
    }

    /// Events with the sync markers stripped.
    pub fn payload(&self) -> Vec<OutputEvent> {
        self.log
            .borrow()
            .iter()
            .copied()
            .filter(|e| !e.is_sync_report())
            .collect()
    }

    pub fn sync_count(&self) -> usize {
        self.log.borrow().iter().filter(|e| e.is_sync_report()).count()
    }

    pub fn clear(&self) {
        self.log.borrow_mut().clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: OutputEvent) -> Result<()> {
        if self.fail {
            return Err(Error::Emit(io::Error::from(io::ErrorKind::BrokenPipe)));
        }
        self.log.borrow_mut().push(event);
        Ok(())
    }

    fn sync_report(&mut self) -> Result<()> {
        self.emit(OutputEvent::sync_report())
    }
}

/// Hands out one scripted poll result per call, then `None` forever, or a
/// read error once `unplug` is set.
#[derive(Debug, Default)]
pub struct ScriptedSource {
    pub script: VecDeque<Option<RawInputEvent>>,
    pub unplug: bool,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Option<RawInputEvent>>) -> Self {
        Self {
            script: script.into_iter().collect(),
            unplug: false,
        }
    }
}

impl EventSource for ScriptedSource {
    fn poll(&mut self) -> Result<Option<RawInputEvent>> {
        match self.script.pop_front() {
            Some(entry) => Ok(entry),
            None if self.unplug => Err(Error::Read(io::Error::from_raw_os_error(19))), // ENODEV
            None => Ok(None),
        }
    }
}

/// A writer whose every write fails. Clones share the attempt count.
#[derive(Debug, Clone, Default)]
pub struct FailingWriter {
    attempts: Rc<Cell<usize>>,
}

impl FailingWriter {
    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl io::Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        self.attempts.set(self.attempts.get() + 1);
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}

/// Counts how many times it has been dropped.
#[derive(Debug, Clone, Default)]
pub struct DropCounter(pub Rc<Cell<usize>>);

impl DropCounter {
    pub fn count(&self) -> usize {
        self.0.get()
    }
}

/// Wraps a double and bumps a [`DropCounter`] when released.
pub struct Tracked<T> {
    pub inner: T,
    pub drops: DropCounter,
}

impl<T> Tracked<T> {
    pub fn new(inner: T, drops: &DropCounter) -> Self {
        Self {
            inner,
            drops: drops.clone(),
        }
    }
}

impl<T> Drop for Tracked<T> {
    fn drop(&mut self) {
        self.drops.0.set(self.drops.0.get() + 1);
    }
}

impl<T: EventSource> EventSource for Tracked<T> {
    fn poll(&mut self) -> Result<Option<RawInputEvent>> {
        self.inner.poll()
    }
}

impl<T: EventSink> EventSink for Tracked<T> {
    fn emit(&mut self, event: OutputEvent) -> Result<()> {
        self.inner.emit(event)
    }

    fn sync_report(&mut self) -> Result<()> {
        self.inner.sync_report()
    }
}
