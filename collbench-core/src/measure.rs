//! Wall-clock Timing
//!
//! Thin layer over `std::time::Instant` that reports elapsed time in the
//! units the harness works in (nanoseconds internally, milliseconds in results).

use std::time::Duration;

/// Nanoseconds per millisecond.
pub const NANOS_PER_MILLI: f64 = 1_000_000.0;

/// Timer for one measured region.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    start: std::time::Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }

    /// Elapsed time since the timer started
    #[inline(always)]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the timer and return elapsed nanoseconds
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        // Saturate instead of truncating: a u64 of nanoseconds covers ~584 years.
        u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Convert nanoseconds to fractional milliseconds.
#[inline]
pub fn nanos_to_millis(nanos: f64) -> f64 {
    nanos / NANOS_PER_MILLI
}

/// Pin the current thread to a specific core.
///
/// Keeps sequential measurements on one core so batches are not split across
/// core migrations.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    // SAFETY: `cpu_set_t` is a plain bitmask, zeroed is a valid empty set, and
    // `sched_setaffinity(0, ..)` only affects the calling thread.
    unsafe {
        let mut set = MaybeUninit::<libc::cpu_set_t>::zeroed();
        let set_ref = set.assume_init_mut();

        libc::CPU_ZERO(set_ref);
        libc::CPU_SET(cpu, set_ref);

        let result = libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), set_ref);

        if result == 0 {
            Ok(())
        } else {
            Err(std::io::Error::last_os_error())
        }
    }
}

/// Pin the current thread to a specific core (no-op on this platform).
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    Ok(())
}
