use thiserror::Error;

use riyada_core::{ExamError, PlanError};

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("the completion service returned no content")]
    EmptyResponse,

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("failed to encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("a request is already in progress")]
    Busy,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error(transparent)]
    Exam(#[from] ExamError),
}

impl AiError {
    /// Short message suitable for showing to a learner.
    pub fn user_message(&self) -> String {
        match self {
            AiError::Http(e) if e.is_timeout() => {
                "The assistant took too long to answer. Please try again.".to_string()
            }
            AiError::Http(_) | AiError::Api { .. } => {
                "Could not reach the assistant. Check your connection and try again.".to_string()
            }
            AiError::EmptyResponse | AiError::Malformed(_) | AiError::Exam(ExamError::NoQuestions) => {
                "The assistant's answer could not be used. Please try again.".to_string()
            }
            AiError::Busy => "Please wait for the current request to finish.".to_string(),
            AiError::InvalidInput(msg) => msg.clone(),
            AiError::Encode(_) | AiError::Plan(_) | AiError::Exam(_) => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn user_message_hides_transport_details() {
        let err = AiError::Api {
            status: 503,
            body: "upstream overloaded".to_string(),
        };

        assert!(!err.user_message().contains("503"));
        assert!(err.to_string().contains("503"));
    }

    #[test]
    fn user_message_passes_input_errors_through() {
        let err = AiError::InvalidInput("Fill in at least 5 boxes.".to_string());

        assert_eq!(err.user_message(), "Fill in at least 5 boxes.");
    }
}
