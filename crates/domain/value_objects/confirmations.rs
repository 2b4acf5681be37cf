use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use uuid::Uuid;

pub const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_millis(3000);

/// Something a user can delete behind a two-step confirmation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeletionTarget {
    Project { project_id: Uuid },
    Image { project_id: Uuid, image_id: Uuid },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    Idle,
    Confirming { armed_at: Instant },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressOutcome {
    NeedsConfirmation,
    Confirmed,
}

/// Arm on the first press, fire on a second press inside the window.
#[derive(Debug, Clone, Copy)]
pub struct TwoStepConfirm {
    state: ConfirmState,
    timeout: Duration,
}

impl Default for TwoStepConfirm {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIRM_TIMEOUT)
    }
}

impl TwoStepConfirm {
    pub fn new(timeout: Duration) -> Self {
        Self {
            state: ConfirmState::Idle,
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Current state as seen at `now`; an expired arm reads as idle.
    pub fn state_at(&self, now: Instant) -> ConfirmState {
        match self.state {
            ConfirmState::Confirming { armed_at } if now.duration_since(armed_at) < self.timeout => {
                self.state
            }
            _ => ConfirmState::Idle,
        }
    }

    pub fn press(&mut self, now: Instant) -> PressOutcome {
        match self.state_at(now) {
            ConfirmState::Idle => {
                self.state = ConfirmState::Confirming { armed_at: now };
                PressOutcome::NeedsConfirmation
            }
            ConfirmState::Confirming { .. } => {
                self.state = ConfirmState::Idle;
                PressOutcome::Confirmed
            }
        }
    }

    pub fn cancel(&mut self) {
        self.state = ConfirmState::Idle;
    }

    pub fn is_armed(&self, now: Instant) -> bool {
        matches!(self.state_at(now), ConfirmState::Confirming { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn second_press_within_window_confirms_once() {
        let mut confirm = TwoStepConfirm::default();

        assert_eq!(confirm.press(Instant::now()), PressOutcome::NeedsConfirmation);
        tokio::time::advance(Duration::from_millis(1200)).await;
        assert_eq!(confirm.press(Instant::now()), PressOutcome::Confirmed);

        // Back to idle, so a third press only re-arms.
        assert_eq!(confirm.press(Instant::now()), PressOutcome::NeedsConfirmation);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_arm_behaves_like_idle() {
        let mut confirm = TwoStepConfirm::default();

        confirm.press(Instant::now());
        tokio::time::advance(Duration::from_millis(3000)).await;

        assert!(!confirm.is_armed(Instant::now()));
        assert_eq!(confirm.press(Instant::now()), PressOutcome::NeedsConfirmation);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_disarms() {
        let mut confirm = TwoStepConfirm::default();

        confirm.press(Instant::now());
        confirm.cancel();

        assert_eq!(confirm.state_at(Instant::now()), ConfirmState::Idle);
        assert_eq!(confirm.press(Instant::now()), PressOutcome::NeedsConfirmation);
    }
}
