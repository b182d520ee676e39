//! Benchmark configuration: defaults and runtime parameters for the `bench` subsystem.
//!
//! [`BenchConfig`] holds the tuneable settings of a benchmark session. Its
//! builder-style setters let callers adjust a default configuration before
//! handing it to the runner.

/// Measured iterations per (codec, corpus) pair.
pub const ITERATIONS_DEFAULT: u32 = 10;

/// Unmeasured warm-up iterations per (codec, corpus) pair.
pub const WARMUP_ITERATIONS_DEFAULT: u32 = 10;

pub const MB: usize = 1 << 20;

/// Runtime parameters controlling a single benchmark session.
#[derive(Debug, Clone)]
pub struct BenchConfig {
    /// Verbosity level: 0 = silent, 1 = errors, 2 = results (default),
    /// 3 = progress, 4 = per-iteration detail.
    pub display_level: u32,

    /// Measured compress+decompress iterations (≥ 1).
    pub iterations: u32,

    /// Warm-up iterations run before measuring; their timings are discarded.
    pub warmup_iterations: u32,
}

impl Default for BenchConfig {
    fn default() -> Self {
        BenchConfig {
            display_level: 2,
            iterations: ITERATIONS_DEFAULT,
            warmup_iterations: WARMUP_ITERATIONS_DEFAULT,
        }
    }
}

impl BenchConfig {
    pub fn set_notification_level(&mut self, level: u32) -> &mut Self {
        self.display_level = level;
        self
    }

    /// Set the measured iteration count; `0` is raised to `1`.
    pub fn set_iterations(&mut self, iterations: u32) -> &mut Self {
        self.iterations = iterations.max(1);
        self
    }

    pub fn set_warmup_iterations(&mut self, iterations: u32) -> &mut Self {
        self.warmup_iterations = iterations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = BenchConfig::default();
        assert_eq!(c.display_level, 2);
        assert_eq!(c.iterations, ITERATIONS_DEFAULT);
        assert_eq!(c.warmup_iterations, WARMUP_ITERATIONS_DEFAULT);
    }

    #[test]
    fn setters_chain_and_clamp() {
        let mut c = BenchConfig::default();
        c.set_iterations(0).set_warmup_iterations(3).set_notification_level(0);
        assert_eq!(c.iterations, 1);
        assert_eq!(c.warmup_iterations, 3);
        assert_eq!(c.display_level, 0);
    }
}
