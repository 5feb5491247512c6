//! Short-lived success and error signals shown after an exercise move.

use std::time::{Duration, Instant};

use serde::Serialize;

/// How long a classification signal stays visible.
pub const FEEDBACK_DURATION: Duration = Duration::from_millis(1500);

/// How long a quiz signal stays visible.
pub const QUIZ_FEEDBACK_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Success,
    Error,
}

/// A transient signal that expires at a fixed instant.
///
/// Callers pass the current time in, so expiry is deterministic in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: &'static str,
    expires_at: Instant,
}

impl Feedback {
    pub fn new(
        kind: FeedbackKind,
        message: &'static str,
        now: Instant,
        duration: Duration,
    ) -> Self {
        Self {
            kind,
            message,
            expires_at: now + duration,
        }
    }

    pub fn is_active(
        &self,
        now: Instant,
    ) -> bool {
        now < self.expires_at
    }

    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feedback_expires_after_duration() {
        let now = Instant::now();
        let feedback = Feedback::new(FeedbackKind::Error, "nope", now, FEEDBACK_DURATION);

        assert!(feedback.is_active(now));
        assert!(feedback.is_active(now + Duration::from_millis(1499)));
        assert!(!feedback.is_active(now + FEEDBACK_DURATION));
    }

    #[test]
    fn kind_predicates() {
        let now = Instant::now();
        let error = Feedback::new(FeedbackKind::Error, "nope", now, FEEDBACK_DURATION);
        let success = Feedback::new(FeedbackKind::Success, "yes", now, FEEDBACK_DURATION);

        assert!(error.is_error());
        assert!(!success.is_error());
    }
}
