//! Primality-check tasks.
//!
//! Both strategies answer the same question by trial division up to √n and
//! only differ in which divisors they try:
//!
//! - [`PrimeStrategy::Simple`] tries every integer `2..=√n`.
//! - [`PrimeStrategy::Smart`] tries 2, then odd integers only.
//!
//! The token is checked on entry and after every `check_interval` divisors,
//! so a cancellation request is observed within one interval of work.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::{Abort, CancelToken, Task};

/// Divisors tried between two checkpoints.
pub const CHECK_INTERVAL_DEFAULT: u64 = 1024;

/// A large prime (10^15 + 3) whose simple check takes long enough to cancel.
pub const BIG_PRIME: i64 = 1_000_000_000_000_003;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimeStrategy {
    Simple,
    Smart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimeError {
    /// Primality is undefined for negative inputs.
    Negative(i64),
}

impl fmt::Display for PrimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimeError::Negative(n) => write!(f, "cannot check primality of negative number {}", n),
        }
    }
}

impl std::error::Error for PrimeError {}

/// Checks whether `n` is prime, cooperatively.
#[derive(Debug, Clone)]
pub struct PrimeChecker {
    n: i64,
    strategy: PrimeStrategy,
    check_interval: u64,
    progress: Option<Arc<AtomicU64>>,
}

impl PrimeChecker {
    pub fn simple(n: i64) -> Self {
        PrimeChecker::new(n, PrimeStrategy::Simple)
    }

    pub fn smart(n: i64) -> Self {
        PrimeChecker::new(n, PrimeStrategy::Smart)
    }

    pub fn new(n: i64, strategy: PrimeStrategy) -> Self {
        PrimeChecker {
            n,
            strategy,
            check_interval: CHECK_INTERVAL_DEFAULT,
            progress: None,
        }
    }

    /// Number of divisors tried between checkpoints (minimum 1).
    pub fn with_check_interval(mut self, interval: u64) -> Self {
        self.check_interval = interval.max(1);
        self
    }

    /// Publish the count of divisors tried so far at every checkpoint.
    pub fn with_progress(mut self, progress: Arc<AtomicU64>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn number(&self) -> i64 {
        self.n
    }

    pub fn strategy(&self) -> PrimeStrategy {
        self.strategy
    }

    pub fn check_interval(&self) -> u64 {
        self.check_interval
    }

    /// Run the trial division, stopping at the first checkpoint that sees
    /// `token` cancelled.
    pub fn check(&self, token: &CancelToken) -> Result<bool, Abort> {
        if self.n < 0 {
            return Err(Abort::failed(PrimeError::Negative(self.n)));
        }
        token.checkpoint()?;

        let n = self.n as u64;
        if n < 2 {
            return Ok(false);
        }

        let (first, step) = match self.strategy {
            PrimeStrategy::Simple => (2u64, 1u64),
            PrimeStrategy::Smart => {
                if n % 2 == 0 {
                    return Ok(n == 2);
                }
                (3u64, 2u64)
            }
        };

        let mut tried: u64 = 0;
        let mut d = first;
        // `d <= n / d` is `d * d <= n` without overflow.
        while d <= n / d {
            if n % d == 0 {
                self.publish(tried + 1);
                return Ok(false);
            }
            tried += 1;
            if tried % self.check_interval == 0 {
                self.publish(tried);
                token.checkpoint()?;
            }
            d += step;
        }
        self.publish(tried);
        Ok(true)
    }

    #[inline]
    fn publish(&self, tried: u64) {
        if let Some(progress) = &self.progress {
            progress.store(tried, Ordering::Release);
        }
    }
}

impl Task for PrimeChecker {
    type Output = bool;

    fn run(self, token: &CancelToken) -> Result<bool, Abort> {
        self.check(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn both(n: i64) -> (bool, bool) {
        let token = CancelToken::new();
        let simple = PrimeChecker::simple(n).check(&token).ok().unwrap();
        let smart = PrimeChecker::smart(n).check(&token).ok().unwrap();
        (simple, smart)
    }

    #[test]
    fn small_numbers_agree() {
        let primes = [2i64, 3, 5, 7, 11, 13, 97, 7919];
        let composites = [0i64, 1, 4, 6, 9, 15, 49, 7917, 1_000_000];
        for &p in &primes {
            assert_eq!(both(p), (true, true), "{} is prime", p);
        }
        for &c in &composites {
            assert_eq!(both(c), (false, false), "{} is not prime", c);
        }
    }

    #[test]
    fn square_of_prime_is_composite() {
        // The divisor equal to √n must be tried.
        assert_eq!(both(10_007 * 10_007), (false, false));
    }

    #[test]
    fn negative_number_fails() {
        let out = PrimeChecker::smart(-7).check(&CancelToken::new());
        match out {
            Err(Abort::Failed(e)) => assert!(e.to_string().contains("-7")),
            other => panic!("expected failure, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn cancelled_token_stops_at_entry() {
        let token = CancelToken::new();
        token.cancel();
        let progress = Arc::new(AtomicU64::new(0));
        let out = PrimeChecker::simple(BIG_PRIME)
            .with_progress(Arc::clone(&progress))
            .check(&token);
        assert!(matches!(out, Err(Abort::Interrupted)));
        assert_eq!(progress.load(Ordering::Acquire), 0);
    }

    #[test]
    fn zero_interval_is_clamped() {
        assert_eq!(PrimeChecker::simple(5).with_check_interval(0).check_interval(), 1);
    }

    #[test]
    fn smart_tries_about_half_the_divisors() {
        let simple = Arc::new(AtomicU64::new(0));
        let smart = Arc::new(AtomicU64::new(0));
        let token = CancelToken::new();
        let p = 1_000_003;
        assert!(PrimeChecker::simple(p).with_progress(Arc::clone(&simple)).check(&token).ok().unwrap());
        assert!(PrimeChecker::smart(p).with_progress(Arc::clone(&smart)).check(&token).ok().unwrap());
        let (a, b) = (simple.load(Ordering::Acquire), smart.load(Ordering::Acquire));
        assert!(b * 2 <= a + 2, "smart={} simple={}", b, a);
    }
}
