use chrono::{DateTime, Duration, Utc};

/// Seconds of user inactivity after which elapsed time stops accruing.
pub const INACTIVITY_LIMIT_SECS: i64 = 180;

/// Gate for elapsed-time accrual, driven by user interactions.
///
/// The timer is armed by the first interaction of a session and stays armed
/// until the inactivity limit passes without another interaction. A freshly
/// constructed timer is disarmed, so an untouched session accrues nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActivityTimer {
    last_interaction_at: Option<DateTime<Utc>>,
}

impl ActivityTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a user interaction, (re-)arming the timer.
    ///
    /// Re-arming an already armed timer only moves the inactivity deadline;
    /// there is never more than one logical tick source.
    pub fn interaction(&mut self, now: DateTime<Utc>) {
        self.last_interaction_at = Some(now);
    }

    /// One-second tick. Returns whether a second of active time accrued.
    ///
    /// Once `now` is at least [`INACTIVITY_LIMIT_SECS`] past the last
    /// interaction the timer disarms itself and the tick does not count.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        match self.last_interaction_at {
            Some(last)
                if now.signed_duration_since(last)
                    < Duration::seconds(INACTIVITY_LIMIT_SECS) =>
            {
                true
            }
            Some(_) => {
                self.last_interaction_at = None;
                false
            }
            None => false,
        }
    }

    /// Disarms the timer. A no-op when already disarmed.
    pub fn disarm(&mut self) {
        self.last_interaction_at = None;
    }

    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.last_interaction_at.is_some()
    }
}
