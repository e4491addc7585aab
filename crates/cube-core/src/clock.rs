use std::time::Duration;

use crate::constants::MAX_CATCH_UP_TICKS;

/// Fixed-rate logical clock, decoupled from the display refresh rate.
///
/// Feed it elapsed wall time; it reports how many logic ticks are due.
/// After a long stall at most [`MAX_CATCH_UP_TICKS`] are reported and the
/// remaining backlog is dropped, so the simulation slows down instead of
/// spiralling.
#[derive(Clone, Debug)]
pub struct TickClock {
    period: Duration,
    accum: Duration,
}

impl TickClock {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / ticks_per_second.max(1),
            accum: Duration::ZERO,
        }
    }

    #[inline]
    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        self.accum += elapsed;
        let period = self.period.as_nanos();
        let due = self.accum.as_nanos() / period;
        self.accum = Duration::from_nanos((self.accum.as_nanos() % period) as u64);
        due.min(MAX_CATCH_UP_TICKS as u128) as u32
    }

    /// Time left until the next tick becomes due.
    #[inline]
    pub fn until_next_tick(&self) -> Duration {
        self.period.saturating_sub(self.accum)
    }
}
