use hangman_types::{GameError, GameResult, TimerStatus, TimerView};
use tracing::debug;

/// Result of feeding the timer a tick or an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Not running, or the tick belongs to an earlier arming.
    Ignored,
    Running { remaining_seconds: u32 },
    /// Reached zero on this call. Reported exactly once per arming.
    Expired,
}

/// Per-round countdown. Each `arm` starts a new generation; ticks carrying an
/// older generation are dropped so a previous round can never expire the
/// current one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownTimer {
    status: TimerStatus,
    remaining_seconds: u32,
    generation: u64,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountdownTimer {
    pub fn new() -> Self {
        Self {
            status: TimerStatus::Idle,
            remaining_seconds: 0,
            generation: 0,
        }
    }

    /// Idle -> Running. Returns the generation ticks must carry.
    pub fn arm(&mut self, seconds: u32) -> GameResult<u64> {
        if self.status != TimerStatus::Idle {
            return Err(GameError::InvalidGameState {
                current_state: "countdown already armed".to_string(),
            });
        }
        if seconds == 0 {
            return Err(GameError::invalid_configuration(
                "countdown needs at least one second",
            ));
        }

        self.generation += 1;
        self.remaining_seconds = seconds;
        self.status = TimerStatus::Running;
        debug!("Countdown armed: {}s (generation {})", seconds, self.generation);
        Ok(self.generation)
    }

    /// One elapsed second.
    pub fn tick(&mut self, generation: u64) -> TimerTick {
        if self.status != TimerStatus::Running || generation != self.generation {
            return TimerTick::Ignored;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        self.settle()
    }

    /// Add or remove seconds while running, with a floor of zero. Hitting zero
    /// expires the timer just like a tick would.
    pub fn adjust(&mut self, delta_seconds: i64) -> TimerTick {
        if self.status != TimerStatus::Running {
            return TimerTick::Ignored;
        }

        let adjusted = (self.remaining_seconds as i64 + delta_seconds).clamp(0, u32::MAX as i64);
        self.remaining_seconds = adjusted as u32;
        self.settle()
    }

    /// Any state -> Idle without firing expiry.
    pub fn cancel(&mut self) {
        if self.status != TimerStatus::Idle {
            debug!("Countdown cancelled (generation {})", self.generation);
        }
        self.status = TimerStatus::Idle;
        // Invalidate ticks already in flight for the cancelled arming.
        self.generation += 1;
    }

    fn settle(&mut self) -> TimerTick {
        if self.remaining_seconds == 0 {
            self.status = TimerStatus::Expired;
            TimerTick::Expired
        } else {
            TimerTick::Running {
                remaining_seconds: self.remaining_seconds,
            }
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            status: self.status,
            remaining_seconds: self.remaining_seconds,
            display: format_clock(self.remaining_seconds),
        }
    }
}

/// `m:ss`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_and_tick() {
        let mut timer = CountdownTimer::new();
        let generation = timer.arm(3).unwrap();
        assert_eq!(timer.status(), TimerStatus::Running);

        assert_eq!(
            timer.tick(generation),
            TimerTick::Running {
                remaining_seconds: 2
            }
        );
        timer.tick(generation);
        assert_eq!(timer.tick(generation), TimerTick::Expired);
        assert_eq!(timer.status(), TimerStatus::Expired);
        assert_eq!(timer.remaining_seconds(), 0);

        // Expiry is reported once
        assert_eq!(timer.tick(generation), TimerTick::Ignored);
    }

    #[test]
    fn test_expired_timer_ignores_adjust() {
        let mut timer = CountdownTimer::new();
        let generation = timer.arm(30).unwrap();
        for _ in 0..29 {
            assert!(matches!(timer.tick(generation), TimerTick::Running { .. }));
        }
        assert_eq!(timer.tick(generation), TimerTick::Expired);

        assert_eq!(timer.adjust(15), TimerTick::Ignored);
        assert_eq!(timer.remaining_seconds(), 0);
        assert_eq!(timer.status(), TimerStatus::Expired);
    }

    #[test]
    fn test_adjust_clamps_and_can_expire() {
        let mut timer = CountdownTimer::new();
        timer.arm(10).unwrap();
        assert_eq!(
            timer.adjust(3),
            TimerTick::Running {
                remaining_seconds: 13
            }
        );
        assert_eq!(timer.adjust(-20), TimerTick::Expired);
        assert_eq!(timer.remaining_seconds(), 0);
    }

    #[test]
    fn test_arm_rules() {
        let mut timer = CountdownTimer::new();
        assert!(matches!(
            timer.arm(0),
            Err(GameError::InvalidConfiguration { .. })
        ));
        timer.arm(5).unwrap();
        assert!(matches!(
            timer.arm(5),
            Err(GameError::InvalidGameState { .. })
        ));
        assert_eq!(timer.adjust(-1), TimerTick::Running { remaining_seconds: 4 });
    }

    #[test]
    fn test_stale_generation_ignored() {
        let mut timer = CountdownTimer::new();
        let first = timer.arm(5).unwrap();
        timer.cancel();
        assert_eq!(timer.status(), TimerStatus::Idle);
        assert_eq!(timer.tick(first), TimerTick::Ignored);

        let second = timer.arm(5).unwrap();
        assert_ne!(first, second);
        assert_eq!(timer.tick(first), TimerTick::Ignored);
        assert_eq!(timer.remaining_seconds(), 5);
        assert_eq!(
            timer.tick(second),
            TimerTick::Running {
                remaining_seconds: 4
            }
        );
    }

    #[test]
    fn test_cancel_does_not_fire_expiry() {
        let mut timer = CountdownTimer::new();
        let generation = timer.arm(1).unwrap();
        timer.cancel();
        assert_eq!(timer.tick(generation), TimerTick::Ignored);
        assert_eq!(timer.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_clock_format() {
        assert_eq!(format_clock(120), "2:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(9), "0:09");
        let view = CountdownTimer::new().view();
        assert_eq!(view.display, "0:00");
    }
}
