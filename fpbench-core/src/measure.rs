//! Per-call Timing
//!
//! Wall-clock timestamps taken immediately around a single backend call,
//! using the monotonic `std::time::Instant` clock.

use std::time::Instant;

/// Timer for one measured call
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer
    #[inline(always)]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Stop the timer and return elapsed nanoseconds
    #[inline(always)]
    pub fn stop(&self) -> u64 {
        // Saturates after ~584 years
        u64::try_from(self.start.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

/// Number of CPU indices an affinity mask can address
#[cfg(target_os = "linux")]
pub const MAX_CPUS: usize = libc::CPU_SETSIZE as usize;

/// Number of CPU indices an affinity mask can address
#[cfg(not(target_os = "linux"))]
pub const MAX_CPUS: usize = usize::MAX;

/// Set CPU affinity to pin the current thread to a specific core
///
/// Keeps the whole run on one core so every backend is measured under the
/// same cache and frequency conditions. Indices at or above [`MAX_CPUS`]
/// are rejected with `InvalidInput`.
#[cfg(target_os = "linux")]
pub fn pin_to_cpu(cpu: usize) -> Result<(), std::io::Error> {
    use std::mem::MaybeUninit;

    // CPU_SET does not bounds-check its index
    if cpu >= MAX_CPUS {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("CPU index {} exceeds affinity mask size {}", cpu, MAX_CPUS),
        ));
    }

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

/// Set CPU affinity (no-op on this platform)
#[cfg(not(target_os = "linux"))]
pub fn pin_to_cpu(_cpu: usize) -> Result<(), std::io::Error> {
    // CPU pinning not supported on this platform
    Ok(())
}
