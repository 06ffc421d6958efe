use std::time::Duration;

use thiserror::Error;

use crate::validation::ValidationError;

pub const SUBMIT_SUCCESS_MESSAGE: &str = "Your order has been submitted successfully!";
pub const SUBMIT_FAILURE_MESSAGE: &str =
    "There was an error submitting your order. Please try again.";

/// How long the success banner stays up before the form is cleared.
pub const SUCCESS_RESET_DELAY: Duration = Duration::from_secs(3);

/// Lifecycle of one submission attempt.
///
/// ```text
/// Idle ──begin──▶ Submitting ──ok──▶ Succeeded ──reset──▶ Idle
///   ▲                  │
///   └──── retry ─── Failed ◀──err──┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Submitting,
    Succeeded,
    Failed,
}

impl SubmissionState {
    /// Whether a new submit attempt may start. The submit control should be
    /// disabled whenever this is `false`.
    pub fn accepts_submit(&self) -> bool {
        matches!(self, Self::Idle | Self::Failed)
    }
}

/// Why a submit attempt did not start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("an order is already being submitted")]
    AlreadySubmitting,

    #[error("the previous order is still being cleared")]
    AwaitingReset,

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
