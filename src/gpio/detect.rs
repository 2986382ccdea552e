//! Board model detection (std only).
//!
//! The Raspberry Pi 5 exposes its header lines on `gpiochip4`; earlier
//! models use `gpiochip0`.

use std::fs;

use crate::error::GpioError;

/// Where the kernel describes the board model.
pub const CPUINFO_PATH: &str = "/proc/cpuinfo";

/// Chip index for the Raspberry Pi 5 header.
pub const PI5_CHIP: u8 = 4;

/// Chip index for every other supported board.
pub const DEFAULT_CHIP: u8 = 0;

/// Pick the chip index from `/proc/cpuinfo` contents.
pub fn chip_index_from_cpuinfo(cpuinfo: &str) -> u8 {
    if cpuinfo.contains("Raspberry Pi 5") {
        PI5_CHIP
    } else {
        DEFAULT_CHIP
    }
}

/// Read `/proc/cpuinfo` and pick the chip index.
///
/// # Errors
///
/// Returns `DetectionFailed` if the file cannot be read.
pub fn detect_chip_index() -> Result<u8, GpioError> {
    let cpuinfo = fs::read_to_string(CPUINFO_PATH).map_err(|e| {
        tracing::error!("It is not possible to determine the board model: {}", e);
        GpioError::DetectionFailed
    })?;
    let chip = chip_index_from_cpuinfo(&cpuinfo);
    tracing::info!("detected gpiochip{}", chip);
    Ok(chip)
}
