// display.rs: process-wide verbosity level and the stderr display macros.
//
// Every diagnostic line in the crate goes through `displaylevel!`, so a single
// atomic decides what reaches the terminal:
//
// 0 = no output; 1 = errors only; 2 = results + warnings (default);
// 3 = progress; 4 = verbose (per-task and per-iteration detail)

use std::sync::atomic::{AtomicU32, Ordering};

/// Default verbosity: results and warnings.
pub const DISPLAY_LEVEL_DEFAULT: u32 = 2;

/// Highest verbosity level that changes output.
pub const DISPLAY_LEVEL_MAX: u32 = 4;

pub static DISPLAY_LEVEL: AtomicU32 = AtomicU32::new(DISPLAY_LEVEL_DEFAULT);

/// Returns the current display level.
#[inline]
pub fn display_level() -> u32 {
    DISPLAY_LEVEL.load(Ordering::Relaxed)
}

/// Sets the display level, clamped to [`DISPLAY_LEVEL_MAX`].
#[inline]
pub fn set_display_level(level: u32) {
    DISPLAY_LEVEL.store(level.min(DISPLAY_LEVEL_MAX), Ordering::Relaxed);
}

/// Print to stdout.
#[macro_export]
macro_rules! displayout {
    ($($arg:tt)*) => { print!($($arg)*) };
}

/// Print to stderr when the display level is at or above `level`.
#[macro_export]
macro_rules! displaylevel {
    ($level:expr, $($arg:tt)*) => {
        if $crate::display::display_level() >= $level {
            eprint!($($arg)*);
        }
    };
}
