//! Practice exam session.
//!
//! ```text
//! Idle -> Generating -> Active -> Finished
//!   ^         |                      |
//!   +---------+ (failure)            |
//!   +--------------------------------+ (reset)
//! ```
//!
//! Questions arrive from an untrusted source, so [`validate_questions`]
//! drops anything incomplete before a session can start.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Number of questions requested for a full exam.
pub const EXAM_QUESTION_COUNT: usize = 30;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExamError {
    #[error("cannot {action} while the exam is {status}")]
    InvalidTransition {
        action: &'static str,
        status: ExamStatus,
    },

    #[error("no usable questions were generated")]
    NoQuestions,

    #[error("'{0}' is not an option for the current question")]
    UnknownOption(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamStatus {
    Idle,
    Generating,
    Active,
    Finished,
}

impl fmt::Display for ExamStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            ExamStatus::Idle => "idle",
            ExamStatus::Generating => "generating",
            ExamStatus::Active => "active",
            ExamStatus::Finished => "finished",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Mcq,
    Tf,
    Math,
}

impl QuestionKind {
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::Mcq => "Multiple choice",
            QuestionKind::Tf => "True or false",
            QuestionKind::Math => "Calculation",
        }
    }
}

/// A question as received, before validation. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftQuestion {
    pub id: Option<u32>,
    pub text: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<QuestionKind>,
    pub options: Option<Vec<String>>,
    pub correct_answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamQuestion {
    pub id: u32,
    pub text: String,
    pub kind: QuestionKind,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Keeps only the drafts that can be asked and marked.
///
/// A draft is dropped if its text, options or answer is missing or blank, or
/// if its options do not contain the answer. Missing kinds default to
/// multiple choice and missing ids are numbered by position. Duplicate ids
/// are renumbered so answers can be keyed by id.
pub fn validate_questions(drafts: Vec<DraftQuestion>) -> Result<Vec<ExamQuestion>, ExamError> {
    let total = drafts.len();
    let mut seen = Vec::with_capacity(total);
    let mut questions = Vec::with_capacity(total);

    for (position, draft) in drafts.into_iter().enumerate() {
        let Some(mut question) = accept_draft(draft, position) else {
            continue;
        };
        if seen.contains(&question.id) {
            question.id = fresh_id(&seen);
        }
        seen.push(question.id);
        questions.push(question);
    }

    if questions.len() < total {
        warn!(
            dropped = total - questions.len(),
            kept = questions.len(),
            "dropped incomplete exam questions"
        );
    }
    if questions.is_empty() {
        return Err(ExamError::NoQuestions);
    }
    Ok(questions)
}

/// One past the highest id in use, or the lowest free id once the top of
/// the range is taken.
fn fresh_id(seen: &[u32]) -> u32 {
    seen.iter()
        .max()
        .and_then(|highest| highest.checked_add(1))
        .or_else(|| (0..=u32::MAX).find(|id| !seen.contains(id)))
        .unwrap_or_default()
}

fn accept_draft(
    draft: DraftQuestion,
    position: usize,
) -> Option<ExamQuestion> {
    let text = draft.text.filter(|t| !t.trim().is_empty())?;
    let answer = draft.correct_answer.filter(|a| !a.trim().is_empty())?;
    let options: Vec<String> = draft
        .options?
        .into_iter()
        .filter(|o| !o.trim().is_empty())
        .collect();
    if !options.contains(&answer) {
        return None;
    }
    Some(ExamQuestion {
        id: draft.id.unwrap_or(position as u32 + 1),
        text,
        kind: draft.kind.unwrap_or(QuestionKind::Mcq),
        options,
        correct_answer: answer,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Wrong,
    /// The question already had an answer; nothing changed.
    AlreadyAnswered,
}

#[derive(Debug, Clone)]
pub struct ExamSession {
    status: ExamStatus,
    questions: Vec<ExamQuestion>,
    index: usize,
    score: usize,
    answers: BTreeMap<u32, String>,
}

impl Default for ExamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ExamSession {
    pub fn new() -> Self {
        Self {
            status: ExamStatus::Idle,
            questions: Vec::new(),
            index: 0,
            score: 0,
            answers: BTreeMap::new(),
        }
    }

    pub fn status(&self) -> ExamStatus {
        self.status
    }

    pub fn questions(&self) -> &[ExamQuestion] {
        &self.questions
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Answers recorded so far, keyed by question id.
    pub fn answers(&self) -> &BTreeMap<u32, String> {
        &self.answers
    }

    pub fn current(&self) -> Option<&ExamQuestion> {
        match self.status {
            ExamStatus::Active => self.questions.get(self.index),
            _ => None,
        }
    }

    pub fn current_answer(&self) -> Option<&str> {
        self.current()
            .and_then(|q| self.answers.get(&q.id))
            .map(String::as_str)
    }

    /// Marks the start of a generation request.
    pub fn begin_generation(&mut self) -> Result<(), ExamError> {
        self.require(ExamStatus::Idle, "start generating")?;
        self.status = ExamStatus::Generating;
        Ok(())
    }

    /// Returns to idle after a failed generation request.
    pub fn generation_failed(&mut self) {
        if self.status == ExamStatus::Generating {
            self.status = ExamStatus::Idle;
        }
    }

    /// Starts the exam with validated questions.
    pub fn start(
        &mut self,
        questions: Vec<ExamQuestion>,
    ) -> Result<(), ExamError> {
        self.require(ExamStatus::Generating, "start the exam")?;
        if questions.is_empty() {
            self.status = ExamStatus::Idle;
            return Err(ExamError::NoQuestions);
        }
        debug!(count = questions.len(), "exam started");
        *self = Self {
            status: ExamStatus::Active,
            questions,
            ..Self::new()
        };
        Ok(())
    }

    /// Records an answer to the current question. Only the first answer counts.
    pub fn answer(
        &mut self,
        option: &str,
    ) -> Result<AnswerOutcome, ExamError> {
        self.require(ExamStatus::Active, "answer")?;
        let question = &self.questions[self.index];
        if self.answers.contains_key(&question.id) {
            return Ok(AnswerOutcome::AlreadyAnswered);
        }
        if !question.options.iter().any(|o| o == option) {
            return Err(ExamError::UnknownOption(option.to_string()));
        }

        let correct = option == question.correct_answer;
        self.answers.insert(question.id, option.to_string());
        if correct {
            self.score += 1;
            Ok(AnswerOutcome::Correct)
        } else {
            Ok(AnswerOutcome::Wrong)
        }
    }

    /// Moves to the next question, or finishes after the last one.
    pub fn next(&mut self) -> Result<ExamStatus, ExamError> {
        self.require(ExamStatus::Active, "advance")?;
        if self.index + 1 < self.questions.len() {
            self.index += 1;
        } else {
            self.status = ExamStatus::Finished;
            debug!(score = self.score, total = self.questions.len(), "exam finished");
        }
        Ok(self.status)
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn require(
        &self,
        expected: ExamStatus,
        action: &'static str,
    ) -> Result<(), ExamError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(ExamError::InvalidTransition {
                action,
                status: self.status,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn draft(
        id: u32,
        options: &[&str],
        answer: &str,
    ) -> DraftQuestion {
        DraftQuestion {
            id: Some(id),
            text: Some(format!("Question {id}")),
            kind: Some(QuestionKind::Mcq),
            options: Some(options.iter().map(|o| o.to_string()).collect()),
            correct_answer: Some(answer.to_string()),
        }
    }

    fn active_session() -> ExamSession {
        let questions = validate_questions(vec![
            draft(1, &["A", "B"], "A"),
            draft(2, &["True", "False"], "False"),
        ])
        .unwrap();
        let mut session = ExamSession::new();
        session.begin_generation().unwrap();
        session.start(questions).unwrap();
        session
    }

    // =========================================================================
    // validation tests
    // =========================================================================

    #[test]
    fn validate_drops_incomplete_drafts() {
        let drafts = vec![
            draft(1, &["A", "B"], "A"),
            DraftQuestion {
                text: None,
                ..draft(2, &["A"], "A")
            },
            draft(3, &["A", "B"], "C"),
            DraftQuestion {
                options: None,
                ..draft(4, &[], "A")
            },
        ];

        let questions = validate_questions(drafts).unwrap();

        assert_eq!(questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn validate_all_invalid_is_an_error() {
        let result = validate_questions(vec![DraftQuestion::default()]);

        assert_eq!(result, Err(ExamError::NoQuestions));
    }

    #[test]
    fn validate_fills_missing_id_and_kind() {
        let questions = validate_questions(vec![DraftQuestion {
            id: None,
            kind: None,
            ..draft(0, &["10", "20"], "20")
        }])
        .unwrap();

        assert_eq!(questions[0].id, 1);
        assert_eq!(questions[0].kind, QuestionKind::Mcq);
    }

    #[test]
    fn validate_renumbers_duplicate_ids() {
        let questions =
            validate_questions(vec![draft(5, &["A"], "A"), draft(5, &["B"], "B")]).unwrap();

        assert_eq!(questions.iter().map(|q| q.id).collect::<Vec<_>>(), vec![5, 6]);
    }

    #[test]
    fn validate_renumbers_duplicates_at_the_top_of_the_id_range() {
        let questions = validate_questions(vec![
            draft(u32::MAX, &["A"], "A"),
            draft(u32::MAX, &["B"], "B"),
            draft(0, &["C"], "C"),
        ])
        .unwrap();

        assert_eq!(
            questions.iter().map(|q| q.id).collect::<Vec<_>>(),
            vec![u32::MAX, 0, 1]
        );
    }

    #[test]
    fn draft_deserializes_from_camel_case() {
        let json = r#"{"id":7,"text":"Q","type":"tf","options":["True","False"],"correctAnswer":"True"}"#;

        let parsed: DraftQuestion = serde_json::from_str(json).unwrap();

        assert_eq!(parsed.kind, Some(QuestionKind::Tf));
        assert_eq!(parsed.correct_answer.as_deref(), Some("True"));
    }

    // =========================================================================
    // session tests
    // =========================================================================

    #[test]
    fn correct_answer_increments_score() {
        let mut session = active_session();

        assert_eq!(session.answer("A").unwrap(), AnswerOutcome::Correct);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn second_answer_is_ignored() {
        let mut session = active_session();
        session.answer("B").unwrap();

        let outcome = session.answer("A").unwrap();

        assert_eq!(outcome, AnswerOutcome::AlreadyAnswered);
        assert_eq!(session.score(), 0);
        assert_eq!(session.current_answer(), Some("B"));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut session = active_session();

        assert_eq!(
            session.answer("Z"),
            Err(ExamError::UnknownOption("Z".to_string()))
        );
        assert!(session.answers().is_empty());
    }

    #[test]
    fn next_advances_then_finishes() {
        let mut session = active_session();

        assert_eq!(session.next().unwrap(), ExamStatus::Active);
        assert_eq!(session.current().map(|q| q.id), Some(2));
        assert_eq!(session.next().unwrap(), ExamStatus::Finished);
        assert!(session.current().is_none());
        assert!(session.next().is_err());
    }

    #[test]
    fn full_run_scores_correct_answers() {
        let mut session = active_session();
        session.answer("A").unwrap();
        session.next().unwrap();
        session.answer("True").unwrap();
        session.next().unwrap();

        assert_eq!(session.status(), ExamStatus::Finished);
        assert_eq!(session.score(), 1);
        assert_eq!(session.answers().len(), 2);
    }

    #[test]
    fn failed_generation_returns_to_idle() {
        let mut session = ExamSession::new();
        session.begin_generation().unwrap();

        session.generation_failed();

        assert_eq!(session.status(), ExamStatus::Idle);
    }

    #[test]
    fn cannot_answer_while_idle() {
        let mut session = ExamSession::new();

        assert_eq!(
            session.answer("A"),
            Err(ExamError::InvalidTransition {
                action: "answer",
                status: ExamStatus::Idle,
            })
        );
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut session = active_session();
        session.answer("A").unwrap();

        session.reset();

        assert_eq!(session.status(), ExamStatus::Idle);
        assert_eq!(session.score(), 0);
        assert!(session.questions().is_empty());
        assert!(session.answers().is_empty());
    }
}
