//! Harness - Best-of-Batches Timing
//!
//! Each measurement runs the operation `repeat` times inside one timed batch
//! and divides the batch time by `repeat` to get a per-call estimate. This is
//! done for `batches` independent batches and the smallest per-call estimate
//! is reported. Taking the minimum rather than the mean suppresses scheduler
//! jitter and cache warm-up; the result is a best-case estimate.

use crate::error::{HarnessError, OperationError};
use crate::measure::{Timer, nanos_to_millis};
use crate::result::Timing;
use tracing::debug;

/// Default number of calls per batch
pub const DEFAULT_REPEAT: u32 = 3;

/// Default number of independent batches
pub const DEFAULT_BATCHES: u32 = 3;

/// Repeat and batch counts for a measurement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Calls per timed batch (R)
    pub repeat: u32,
    /// Independent batches (B)
    pub batches: u32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            repeat: DEFAULT_REPEAT,
            batches: DEFAULT_BATCHES,
        }
    }
}

impl HarnessConfig {
    /// Create a validated config
    pub fn new(repeat: u32, batches: u32) -> Result<Self, HarnessError> {
        let config = Self { repeat, batches };
        config.validate()?;
        Ok(config)
    }

    /// Reject zero repeat or batch counts
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.repeat == 0 {
            return Err(HarnessError::InvalidConfig(
                "repeat must be at least 1".to_string(),
            ));
        }
        if self.batches == 0 {
            return Err(HarnessError::InvalidConfig(
                "batches must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of operation calls one measurement performs
    pub fn total_calls(&self) -> u64 {
        u64::from(self.repeat) * u64::from(self.batches)
    }
}

/// Stateless timing primitive.
///
/// A `Harness` only holds its configuration; every call to [`Harness::measure`]
/// is independent. Measurements must not overlap, so the harness is meant to
/// be driven from one thread, one operation after another.
#[derive(Debug, Clone, Copy)]
pub struct Harness {
    config: HarnessConfig,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            config: HarnessConfig::default(),
        }
    }
}

impl Harness {
    /// Create a harness, validating the config up front
    pub fn new(config: HarnessConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    pub fn config(&self) -> HarnessConfig {
        self.config
    }

    /// Time a fallible zero-argument operation.
    ///
    /// The first error returned by `op` aborts the measurement and is
    /// propagated as [`HarnessError::Operation`]. Panics are not caught.
    pub fn measure<T, E, F>(&self, name: &str, mut op: F) -> Result<Timing, HarnessError>
    where
        F: FnMut() -> Result<T, E>,
        E: Into<OperationError>,
    {
        let HarnessConfig { repeat, batches } = self.config;
        let mut batch_ms = Vec::with_capacity(batches as usize);

        for batch in 0..batches {
            let timer = Timer::start();

            for _ in 0..repeat {
                match op() {
                    Ok(output) => {
                        std::hint::black_box(output);
                    }
                    Err(e) => {
                        return Err(HarnessError::Operation {
                            name: name.to_string(),
                            source: e.into(),
                        });
                    }
                }
            }

            let total_nanos = timer.stop();
            let per_call_ms = nanos_to_millis(total_nanos as f64 / f64::from(repeat));
            debug!(operation = name, batch, per_call_ms, "batch complete");
            batch_ms.push(per_call_ms);
        }

        Ok(Timing::from_batches(self.config, batch_ms))
    }

    /// Time an operation against a shared input object.
    pub fn measure_with<I, T, E, F>(
        &self,
        name: &str,
        input: &I,
        mut op: F,
    ) -> Result<Timing, HarnessError>
    where
        I: ?Sized,
        F: FnMut(&I) -> Result<T, E>,
        E: Into<OperationError>,
    {
        self.measure(name, || op(std::hint::black_box(input)))
    }
}
