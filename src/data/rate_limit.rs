//! Client-side mirror of the backend's action rate limit.
//!
//! The backend enforces the real limit; tracking it here lets the UI disable
//! load buttons and show the remaining wait instead of bouncing requests off
//! a 429.

use std::collections::VecDeque;
use std::time::Duration;

use crate::utils::app_time::{AppInstant, now};

pub struct ActionBudget {
    max_actions: u32,
    window: Duration,
    stamps: VecDeque<AppInstant>,
}

impl Default for ActionBudget {
    fn default() -> Self {
        let budget = &crate::config::API.budget;
        Self::new(
            budget.max_actions,
            Duration::from_secs(budget.window_hours * 3_600),
        )
    }
}

impl ActionBudget {
    pub fn new(max_actions: u32, window: Duration) -> Self {
        Self {
            max_actions,
            window,
            stamps: VecDeque::new(),
        }
    }

    /// Records one action if the budget allows it. On refusal returns the
    /// time until the oldest action ages out of the window.
    pub fn try_consume(&mut self) -> Result<(), Duration> {
        self.try_consume_at(now())
    }

    pub fn remaining(&self) -> u32 {
        self.remaining_at(now())
    }

    fn try_consume_at(&mut self, at: AppInstant) -> Result<(), Duration> {
        self.expire(at);
        if self.stamps.len() as u32 >= self.max_actions {
            let oldest = self.stamps[0];
            let age = at.saturating_duration_since(oldest);
            return Err(self.window.saturating_sub(age));
        }
        self.stamps.push_back(at);
        Ok(())
    }

    fn remaining_at(&self, at: AppInstant) -> u32 {
        let live = self
            .stamps
            .iter()
            .filter(|&&stamp| at.saturating_duration_since(stamp) < self.window)
            .count() as u32;
        self.max_actions.saturating_sub(live)
    }

    fn expire(&mut self, at: AppInstant) {
        while let Some(&oldest) = self.stamps.front() {
            if at.saturating_duration_since(oldest) >= self.window {
                self.stamps.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_budget_refuses_after_max_actions() {
        let start = now();
        let mut budget = ActionBudget::new(3, Duration::from_secs(60));
        for _ in 0..3 {
            assert!(budget.try_consume_at(start).is_ok());
        }
        assert_eq!(budget.remaining_at(start), 0);

        let wait = budget.try_consume_at(start + Duration::from_secs(10)).unwrap_err();
        assert_eq!(wait, Duration::from_secs(50));
    }

    #[test]
    fn test_budget_refills_as_actions_age_out() {
        let start = now();
        let mut budget = ActionBudget::new(1, Duration::from_secs(60));
        assert!(budget.try_consume_at(start).is_ok());
        assert!(budget.try_consume_at(start + Duration::from_secs(59)).is_err());
        assert!(budget.try_consume_at(start + Duration::from_secs(60)).is_ok());
        assert_eq!(budget.remaining_at(start + Duration::from_secs(61)), 0);
    }
}
