//! Linux GPIO character device chip (feature `cdev`).

use std::collections::HashMap;

use gpio_cdev::{Chip, LineHandle, LineRequestFlags};

use crate::error::GpioError;

use super::detect::detect_chip_index;
use super::{GpioChip, Level};

/// [`GpioChip`] backed by `/dev/gpiochipN`.
///
/// The chip index is either fixed or detected from the board model when the
/// chip is opened.
pub struct CdevChip {
    index: Option<u8>,
    consumer: String,
    chip: Option<Chip>,
    handles: HashMap<u8, LineHandle>,
}

impl CdevChip {
    /// Create a chip. `index = None` detects the index on open.
    pub fn new(index: Option<u8>, consumer: &str) -> Self {
        Self {
            index,
            consumer: consumer.into(),
            chip: None,
            handles: HashMap::new(),
        }
    }

    /// Chip index in use (after open, or when configured explicitly).
    pub fn index(&self) -> Option<u8> {
        self.index
    }
}

impl GpioChip for CdevChip {
    fn open(&mut self) -> Result<(), GpioError> {
        let index = match self.index {
            Some(index) => index,
            None => detect_chip_index()?,
        };
        let path = format!("/dev/gpiochip{}", index);
        let chip = Chip::new(&path).map_err(|e| {
            tracing::error!("gpiochip{} export failed: {}", index, e);
            GpioError::ChipOpenFailed { chip: index }
        })?;
        tracing::info!("opened {}", path);
        self.index = Some(index);
        self.chip = Some(chip);
        Ok(())
    }

    fn claim_output(&mut self, line: u8, initial: Level) -> Result<(), GpioError> {
        let chip = self.chip.as_mut().ok_or(GpioError::NotInitialized)?;
        let handle = chip
            .get_line(u32::from(line))
            .and_then(|l| l.request(LineRequestFlags::OUTPUT, initial.bit(), &self.consumer))
            .map_err(|e| {
                tracing::error!("line {} request failed: {}", line, e);
                GpioError::ClaimFailed(line)
            })?;
        self.handles.insert(line, handle);
        Ok(())
    }

    fn write(&mut self, line: u8, level: Level) -> Result<(), GpioError> {
        let handle = self
            .handles
            .get(&line)
            .ok_or(GpioError::UnclaimedPin(line))?;
        handle
            .set_value(level.bit())
            .map_err(|_| GpioError::WriteFailed(line))
    }

    fn close(&mut self) {
        // Dropping the handles releases the lines back to the kernel.
        self.handles.clear();
        self.chip = None;
    }
}
