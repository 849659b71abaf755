use std::time::{Duration, Instant};

/// Token bucket guarding one connection's inbound messages.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    tokens: u32,
    max_tokens: u32,
    refill_rate: Duration,
    last_refill: Instant,
}

impl RateLimiter {
    /// 20 messages of burst, one more every 250 ms. Guessing a word quickly
    /// means several letters a second.
    pub fn new() -> Self {
        Self::new_with_limits(20, Duration::from_millis(250))
    }

    pub fn new_with_limits(max_tokens: u32, refill_rate: Duration) -> Self {
        Self {
            tokens: max_tokens,
            max_tokens,
            refill_rate,
            last_refill: Instant::now(),
        }
    }

    pub fn check_rate_limit(&mut self) -> bool {
        self.refill_tokens();

        if self.tokens > 0 {
            self.tokens -= 1;
            true
        } else {
            false
        }
    }

    fn refill_tokens(&mut self) {
        let now = Instant::now();
        let time_passed = now.duration_since(self.last_refill);

        if time_passed >= self.refill_rate {
            let periods = time_passed.as_millis() / self.refill_rate.as_millis().max(1);
            let tokens_to_add = u32::try_from(periods).unwrap_or(u32::MAX);
            self.tokens = self.tokens.saturating_add(tokens_to_add).min(self.max_tokens);
            self.last_refill = now;
        }
    }

    pub fn remaining_tokens(&mut self) -> u32 {
        self.refill_tokens();
        self.tokens
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_then_refused() {
        let mut limiter = RateLimiter::new_with_limits(3, Duration::from_secs(60));
        assert!(limiter.check_rate_limit());
        assert!(limiter.check_rate_limit());
        assert!(limiter.check_rate_limit());
        assert!(!limiter.check_rate_limit());
        assert_eq!(limiter.remaining_tokens(), 0);
    }

    #[test]
    fn test_refill_after_period() {
        let mut limiter = RateLimiter::new_with_limits(2, Duration::from_millis(10));
        assert!(limiter.check_rate_limit());
        assert!(limiter.check_rate_limit());
        assert!(!limiter.check_rate_limit());

        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(limiter.remaining_tokens(), 2);
        assert!(limiter.check_rate_limit());
    }
}
