//! Demo runner for the dual HR8825 HAT.
//!
//! Usage: `stepper-hat [config.toml]`. Without a path the stock Waveshare
//! wiring and the two-motor demo program are used.

use std::env;
use std::process::ExitCode;

use stepper_hat::gpio::{CdevChip, StdDelay};
use stepper_hat::{load_config, BoardConfig, CancelToken, Program, StepperDriver};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();
    let config = match args.get(1) {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path);
            match load_config(path) {
                Ok(config) => config,
                Err(e) => {
                    tracing::error!("Failed to load config from '{}': {}", path, e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => BoardConfig::default(),
    };

    let token = CancelToken::new();
    let handler_token = token.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        tracing::warn!("Interrupt received, stopping motors");
        handler_token.cancel();
    }) {
        tracing::error!("Failed to install signal handler: {}", e);
        return ExitCode::FAILURE;
    }

    let mut driver = match StepperDriver::builder()
        .chip(CdevChip::new(config.chip, &config.consumer))
        .delay(StdDelay::new())
        .from_config(&config)
        .build()
    {
        Ok(driver) => driver,
        Err(e) => {
            tracing::error!("GPIO initialization failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let program = Program::from_config(&config);
    tracing::info!(
        "Running {} moves ({} steps, ~{} ms)",
        program.len(),
        program.total_steps(),
        program.duration_ms()
    );

    match program.run(&mut driver, &token) {
        Ok(report) if report.cancelled => {
            tracing::info!(
                "Cancelled after {} moves, {} steps",
                report.moves_completed,
                report.steps
            );
            ExitCode::SUCCESS
        }
        Ok(report) => {
            tracing::info!("Done: {} moves, {} steps", report.moves_completed, report.steps);
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("Program failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
