//! Recording chip and delay for host-side testing (std only).
//!
//! Both share a [`Trace`] so tests can check the exact interleaving of pin
//! writes and delays.

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;

use crate::error::GpioError;

use super::{GpioChip, Level};

/// One recorded hardware interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Line requested as output.
    Claim {
        /// Line offset.
        line: u8,
        /// Initial level.
        level: Level,
    },
    /// Line driven.
    Write {
        /// Line offset.
        line: u8,
        /// New level.
        level: Level,
    },
    /// Blocking delay.
    Delay {
        /// Duration in nanoseconds.
        ns: u64,
    },
}

/// Shared, ordered event log.
#[derive(Debug, Clone, Default)]
pub struct Trace(Rc<RefCell<Vec<Event>>>);

impl Trace {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    /// Snapshot of every recorded event.
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Levels written to `line`, in order.
    pub fn writes(&self, line: u8) -> Vec<Level> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match *e {
                Event::Write { line: l, level } if l == line => Some(level),
                _ => None,
            })
            .collect()
    }

    /// Number of level changes on `line`, starting from its claim level.
    pub fn edges(&self, line: u8) -> usize {
        let mut current: Option<Level> = None;
        let mut edges = 0;
        for event in self.0.borrow().iter() {
            match *event {
                Event::Claim { line: l, level } if l == line => current = Some(level),
                Event::Write { line: l, level } if l == line => {
                    if current.is_some_and(|c| c != level) {
                        edges += 1;
                    }
                    current = Some(level);
                }
                _ => {}
            }
        }
        edges
    }

    /// Last level written to (or claimed on) `line`.
    pub fn level(&self, line: u8) -> Option<Level> {
        self.0.borrow().iter().rev().find_map(|e| match *e {
            Event::Claim { line: l, level } | Event::Write { line: l, level } if l == line => {
                Some(level)
            }
            _ => None,
        })
    }

    /// Total delayed time between consecutive writes to `line`.
    ///
    /// One entry per gap between two writes to the line.
    pub fn gaps_ns(&self, line: u8) -> Vec<u64> {
        let mut gaps = Vec::new();
        let mut pending: Option<u64> = None;
        for event in self.0.borrow().iter() {
            match *event {
                Event::Write { line: l, .. } if l == line => {
                    if let Some(ns) = pending {
                        gaps.push(ns);
                    }
                    pending = Some(0);
                }
                Event::Delay { ns } => {
                    if let Some(total) = pending.as_mut() {
                        *total += ns;
                    }
                }
                _ => {}
            }
        }
        gaps
    }
}

/// In-memory [`GpioChip`] that records every claim and write.
#[derive(Debug, Default)]
pub struct RecordingChip {
    trace: Trace,
    fail_open: Option<u8>,
    fail_write: Option<u8>,
    open_count: usize,
    close_count: usize,
}

impl RecordingChip {
    /// Create a chip writing into `trace`.
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            ..Self::default()
        }
    }

    /// Make `open` fail as if chip `chip` could not be opened.
    pub fn fail_open(mut self, chip: u8) -> Self {
        self.fail_open = Some(chip);
        self
    }

    /// Make every write to `line` fail.
    pub fn fail_write(mut self, line: u8) -> Self {
        self.fail_write = Some(line);
        self
    }

    /// The shared trace.
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// How many times the chip was opened.
    pub fn open_count(&self) -> usize {
        self.open_count
    }

    /// How many times the chip was closed.
    pub fn close_count(&self) -> usize {
        self.close_count
    }
}

impl GpioChip for RecordingChip {
    fn open(&mut self) -> Result<(), GpioError> {
        if let Some(chip) = self.fail_open {
            return Err(GpioError::ChipOpenFailed { chip });
        }
        self.open_count += 1;
        Ok(())
    }

    fn claim_output(&mut self, line: u8, initial: Level) -> Result<(), GpioError> {
        self.trace.push(Event::Claim { line, level: initial });
        Ok(())
    }

    fn write(&mut self, line: u8, level: Level) -> Result<(), GpioError> {
        if self.fail_write == Some(line) {
            return Err(GpioError::WriteFailed(line));
        }
        self.trace.push(Event::Write { line, level });
        Ok(())
    }

    fn close(&mut self) {
        self.close_count += 1;
    }
}

/// [`DelayNs`] that records instead of sleeping.
#[derive(Debug, Clone, Default)]
pub struct RecordingDelay {
    trace: Trace,
}

impl RecordingDelay {
    /// Create a delay writing into `trace`.
    pub fn new(trace: Trace) -> Self {
        Self { trace }
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.trace.push(Event::Delay { ns: u64::from(ns) });
    }

    fn delay_us(&mut self, us: u32) {
        self.trace.push(Event::Delay {
            ns: u64::from(us) * 1_000,
        });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.trace.push(Event::Delay {
            ns: u64::from(ms) * 1_000_000,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_ignore_repeated_levels() {
        let trace = Trace::default();
        let mut chip = RecordingChip::new(trace.clone());
        chip.claim_output(19, Level::Low).unwrap();
        chip.write(19, Level::Low).unwrap();
        chip.write(19, Level::High).unwrap();
        chip.write(19, Level::Low).unwrap();
        chip.write(19, Level::Low).unwrap();

        assert_eq!(trace.writes(19).len(), 4);
        assert_eq!(trace.edges(19), 2);
        assert_eq!(trace.level(19), Some(Level::Low));
    }

    #[test]
    fn test_gaps_sum_delays_between_writes() {
        let trace = Trace::default();
        let mut chip = RecordingChip::new(trace.clone());
        let mut delay = RecordingDelay::new(trace.clone());
        chip.write(19, Level::High).unwrap();
        delay.delay_ms(2);
        delay.delay_us(5);
        chip.write(19, Level::Low).unwrap();

        assert_eq!(trace.gaps_ns(19), vec![2_005_000]);
    }
}
