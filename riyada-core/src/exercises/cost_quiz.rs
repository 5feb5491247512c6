//! Cost-type reference cards and the two-option quiz.

use std::time::Instant;

use tracing::debug;

use crate::exercises::ExerciseError;
use crate::exercises::feedback::{Feedback, FeedbackKind, QUIZ_FEEDBACK_DURATION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostType {
    pub id: u32,
    pub title: &'static str,
    pub concept: &'static str,
    pub examples: &'static [&'static str],
}

pub const COST_TYPES: &[CostType] = &[
    CostType {
        id: 1,
        title: "Capital costs",
        concept: "Start-up costs: money spent once at the beginning of the project to acquire \
                  assets and the basic means of production.",
        examples: &["Building and construction", "Equipment and machinery", "Buying land"],
    },
    CostType {
        id: 2,
        title: "Operating costs",
        concept: "Working-capital costs: the recurring expenses needed to run the business day \
                  to day.",
        examples: &[
            "All fixed costs",
            "All variable costs",
            "Operating wages and maintenance",
        ],
    },
    CostType {
        id: 3,
        title: "Fixed costs",
        concept: "Costs that do not change with the volume of production.",
        examples: &["Rent", "Administrative salaries", "Government licences", "Insurance"],
    },
    CostType {
        id: 4,
        title: "Variable costs",
        concept: "Costs that rise and fall with the volume of production.",
        examples: &[
            "Raw materials",
            "Fuel",
            "Electricity for manufacturing",
            "Packaging",
        ],
    },
    CostType {
        id: 5,
        title: "Direct costs",
        concept: "Costs that show up in the form of the finished product.",
        examples: &[
            "Making the product itself",
            "Wood for furniture",
            "Fabric for clothing",
        ],
    },
    CostType {
        id: 6,
        title: "Indirect costs",
        concept: "Costs that do not show up in the form of the finished product.",
        examples: &[
            "Overhead added to the product",
            "Machine lubricants",
            "Factory lighting",
            "Supervisor salaries",
        ],
    },
];

const FIXED: &str = "Fixed cost";
const VARIABLE: &str = "Variable cost";
const CAPITAL: &str = "Capital cost";
const OPERATING: &str = "Operating cost";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizQuestion {
    pub prompt: &'static str,
    pub options: [&'static str; 2],
    pub correct: &'static str,
}

pub const QUIZ_QUESTIONS: &[QuizQuestion] = &[
    QuizQuestion {
        prompt: "Paying the shop's monthly rent",
        options: [FIXED, VARIABLE],
        correct: FIXED,
    },
    QuizQuestion {
        prompt: "Buying flour for a bakery",
        options: [FIXED, VARIABLE],
        correct: VARIABLE,
    },
    QuizQuestion {
        prompt: "Buying a large oven when the bakery opens",
        options: [CAPITAL, OPERATING],
        correct: CAPITAL,
    },
    QuizQuestion {
        prompt: "Fuel for the delivery van (depends on orders)",
        options: [FIXED, VARIABLE],
        correct: VARIABLE,
    },
];

/// Cycles through [`QUIZ_QUESTIONS`].
///
/// A correct answer shows success and moves to the next question once the
/// signal clears, wrapping after the last one. A wrong answer shows an error
/// and keeps the question.
#[derive(Debug, Clone, Default)]
pub struct CostQuiz {
    index: usize,
    feedback: Option<Feedback>,
    advance_pending: bool,
}

impl CostQuiz {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &'static QuizQuestion {
        &QUIZ_QUESTIONS[self.index]
    }

    pub fn feedback(
        &self,
        now: Instant,
    ) -> Option<&Feedback> {
        self.feedback.as_ref().filter(|f| f.is_active(now))
    }

    /// Clears an expired signal, advancing after a correct answer.
    pub fn tick(
        &mut self,
        now: Instant,
    ) {
        if self.feedback.as_ref().is_some_and(|f| !f.is_active(now)) {
            self.feedback = None;
            if self.advance_pending {
                self.advance_pending = false;
                self.index = (self.index + 1) % QUIZ_QUESTIONS.len();
                debug!(index = self.index, "quiz advanced");
            }
        }
    }

    /// Answers the current question. Returns whether the answer was right.
    pub fn answer(
        &mut self,
        option: &str,
        now: Instant,
    ) -> Result<bool, ExerciseError> {
        self.tick(now);
        if self.feedback.is_some() {
            return Err(ExerciseError::FeedbackPending);
        }

        let question = self.current();
        if !question.options.iter().any(|o| *o == option) {
            return Err(ExerciseError::UnknownOption(option.to_string()));
        }

        let correct = option == question.correct;
        let (kind, message) = if correct {
            (FeedbackKind::Success, "Correct!")
        } else {
            (FeedbackKind::Error, "Wrong, try again.")
        };
        self.feedback = Some(Feedback::new(kind, message, now, QUIZ_FEEDBACK_DURATION));
        self.advance_pending = correct;
        Ok(correct)
    }
}
