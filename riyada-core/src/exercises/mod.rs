//! Interactive classroom exercises.
//!
//! All timing is driven by `Instant` values passed in by the caller; nothing
//! here sleeps or spawns timers.

pub mod catalogs;
pub mod classification;
pub mod cost_quiz;
pub mod feedback;

use thiserror::Error;

pub use catalogs::{
    ACCOUNT_TYPES, AccountCategory, BalanceSide, DEBTOR_CREDITOR_TERMS, account_types_exercise,
    debtor_creditor_exercise,
};
pub use classification::{CatalogItem, Category, ClassificationExercise, ItemState, Placement};
pub use cost_quiz::{COST_TYPES, CostQuiz, CostType, QUIZ_QUESTIONS, QuizQuestion};
pub use feedback::{FEEDBACK_DURATION, Feedback, FeedbackKind, QUIZ_FEEDBACK_DURATION};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExerciseError {
    #[error("no item with id {0}")]
    UnknownItem(u32),

    #[error("item {0} is already classified")]
    AlreadyClassified(u32),

    #[error("no item is selected")]
    NothingSelected,

    #[error("'{0}' is not an option for this question")]
    UnknownOption(String),

    #[error("wait for the current feedback to clear")]
    FeedbackPending,
}
