//! GPIO backend lifecycle.

use heapless::FnvIndexSet;

use crate::error::GpioError;

use super::{GpioChip, Level};

/// Maximum number of lines a backend can claim.
pub const MAX_LINES: usize = 32;

/// Owns a [`GpioChip`] and enforces the open/claimed invariants.
///
/// Every pin operation requires the backend to be open and the line to have
/// been claimed by [`GpioBackend::initialize`].
pub struct GpioBackend<C: GpioChip> {
    chip: C,
    open: bool,
    claimed: FnvIndexSet<u8, MAX_LINES>,
}

impl<C: GpioChip> GpioBackend<C> {
    /// Wrap a chip. The backend starts closed.
    pub fn new(chip: C) -> Self {
        Self {
            chip,
            open: false,
            claimed: FnvIndexSet::new(),
        }
    }

    /// Open the chip and claim `lines` as outputs at LOW.
    ///
    /// On a claim failure the chip is closed again and the backend stays closed.
    pub fn initialize(&mut self, lines: &[u8]) -> Result<(), GpioError> {
        if self.open {
            return Err(GpioError::AlreadyInitialized);
        }

        self.chip.open()?;

        for &line in lines {
            if self.claimed.contains(&line) {
                continue;
            }
            if let Err(e) = self.claim(line) {
                tracing::error!("claiming line {} failed: {}", line, e);
                self.chip.close();
                self.claimed.clear();
                return Err(e);
            }
        }

        self.open = true;
        tracing::debug!("GPIO backend open, {} lines claimed", self.claimed.len());
        Ok(())
    }

    fn claim(&mut self, line: u8) -> Result<(), GpioError> {
        self.chip.claim_output(line, Level::Low)?;
        self.claimed
            .insert(line)
            .map_err(|_| GpioError::ClaimFailed(line))?;
        Ok(())
    }

    /// Drive a claimed line.
    pub fn write_pin(&mut self, line: u8, level: Level) -> Result<(), GpioError> {
        if !self.open {
            return Err(GpioError::NotInitialized);
        }
        if !self.claimed.contains(&line) {
            return Err(GpioError::UnclaimedPin(line));
        }
        self.chip.write(line, level)
    }

    /// Release the chip handle. Safe to call when already closed.
    pub fn shutdown(&mut self) {
        if !self.open {
            return;
        }
        self.chip.close();
        self.claimed.clear();
        self.open = false;
        tracing::debug!("GPIO backend closed");
    }

    /// Whether the backend is open.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Whether `line` is claimed.
    #[inline]
    pub fn is_claimed(&self, line: u8) -> bool {
        self.claimed.contains(&line)
    }

    /// Borrow the underlying chip.
    #[inline]
    pub fn chip(&self) -> &C {
        &self.chip
    }

    /// Consume the backend and return the chip, closing it first.
    pub fn into_chip(mut self) -> C {
        self.shutdown();
        self.chip
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::gpio::mock::{Event, RecordingChip, Trace};

    #[test]
    fn test_write_before_initialize() {
        let mut backend = GpioBackend::new(RecordingChip::new(Trace::default()));
        assert_eq!(backend.write_pin(19, Level::High), Err(GpioError::NotInitialized));
    }

    #[test]
    fn test_initialize_claims_low() {
        let trace = Trace::default();
        let mut backend = GpioBackend::new(RecordingChip::new(trace.clone()));
        backend.initialize(&[12, 13, 19]).unwrap();

        assert!(backend.is_open());
        assert!(backend.is_claimed(13));
        assert_eq!(
            trace.events(),
            vec![
                Event::Claim { line: 12, level: Level::Low },
                Event::Claim { line: 13, level: Level::Low },
                Event::Claim { line: 19, level: Level::Low },
            ]
        );
    }

    #[test]
    fn test_unclaimed_pin() {
        let mut backend = GpioBackend::new(RecordingChip::new(Trace::default()));
        backend.initialize(&[12]).unwrap();
        assert_eq!(backend.write_pin(5, Level::High), Err(GpioError::UnclaimedPin(5)));
    }

    #[test]
    fn test_double_initialize() {
        let mut backend = GpioBackend::new(RecordingChip::new(Trace::default()));
        backend.initialize(&[12]).unwrap();
        assert_eq!(backend.initialize(&[12]), Err(GpioError::AlreadyInitialized));
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let mut backend = GpioBackend::new(RecordingChip::new(Trace::default()));
        backend.shutdown();
        backend.initialize(&[12]).unwrap();
        backend.shutdown();
        backend.shutdown();
        assert!(!backend.is_open());
        assert_eq!(backend.chip().close_count(), 1);
        assert_eq!(backend.write_pin(12, Level::Low), Err(GpioError::NotInitialized));
    }

    #[test]
    fn test_open_failure() {
        let chip = RecordingChip::new(Trace::default()).fail_open(4);
        let mut backend = GpioBackend::new(chip);
        assert_eq!(
            backend.initialize(&[12]),
            Err(GpioError::ChipOpenFailed { chip: 4 })
        );
        assert!(!backend.is_open());
    }
}
