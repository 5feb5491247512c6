//! Line-oriented front ends for the classroom exercises and the practice exam.
//!
//! The loops read commands from any `BufRead` and write to any `Write`, so
//! they run the same against a terminal or a test buffer. Feedback timing
//! uses a virtual clock that advances by the feedback duration after each
//! answer.

use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::Result;
use clap::ValueEnum;
use tracing::{debug, warn};

use riyada_core::exercises::{
    COST_TYPES, Category, ClassificationExercise, CostQuiz, FEEDBACK_DURATION,
    QUIZ_FEEDBACK_DURATION, QUIZ_QUESTIONS, account_types_exercise, debtor_creditor_exercise,
};
use riyada_core::{AnswerOutcome, ExamSession, ExamStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExerciseKind {
    /// Sort accounts into assets, liabilities and equity.
    AccountTypes,
    /// Sort accounts by their normal balance side.
    DebtorCreditor,
    /// Reference cards for the six cost types.
    CostTypes,
    /// Two-option quiz on cost types.
    CostQuiz,
}

pub fn run<R: BufRead, W: Write>(
    kind: ExerciseKind,
    input: R,
    out: &mut W,
) -> Result<()> {
    match kind {
        ExerciseKind::AccountTypes => classify(&mut account_types_exercise(), input, out),
        ExerciseKind::DebtorCreditor => classify(&mut debtor_creditor_exercise(), input, out),
        ExerciseKind::CostTypes => cost_types(out),
        ExerciseKind::CostQuiz => cost_quiz(&mut CostQuiz::new(), input, out),
    }
}

fn is_quit(line: &str) -> bool {
    matches!(line, "q" | "quit" | "exit")
}

// =============================================================================
// Classification
// =============================================================================

fn print_board<C: Category, W: Write>(
    exercise: &ClassificationExercise<C>,
    out: &mut W,
) -> Result<()> {
    writeln!(out)?;
    for category in C::all() {
        let names: Vec<&str> = exercise.bucket(*category).iter().map(|i| i.name).collect();
        writeln!(out, "[{}] {}", category.label(), names.join(", "))?;
    }
    writeln!(out, "Remaining:")?;
    for item in exercise.remaining() {
        writeln!(out, "  {:>2}. {} ({})", item.id, item.name, item.note)?;
    }
    let buckets: Vec<String> = C::all()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}={}", i + 1, c.label()))
        .collect();
    writeln!(out, "Enter '<item> <bucket>' ({}) or 'q':", buckets.join(", "))?;
    Ok(())
}

/// Parses `"<item id> <bucket number>"`, with a 1-based bucket number.
fn parse_move(line: &str) -> Option<(u32, usize)> {
    let mut parts = line.split_whitespace();
    let item = parts.next()?.parse().ok()?;
    let bucket: usize = parts.next()?.parse().ok()?;
    if parts.next().is_some() || bucket == 0 {
        return None;
    }
    Some((item, bucket - 1))
}

pub fn classify<C: Category, R: BufRead, W: Write>(
    exercise: &mut ClassificationExercise<C>,
    input: R,
    out: &mut W,
) -> Result<()> {
    let mut now = Instant::now();
    print_board(exercise, out)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if is_quit(line) {
            break;
        }
        let Some((id, bucket)) = parse_move(line) else {
            writeln!(out, "Could not read that. Example: '3 1'")?;
            continue;
        };
        let Some(category) = C::all().get(bucket).copied() else {
            writeln!(out, "There is no bucket {}.", bucket + 1)?;
            continue;
        };

        if let Err(e) = exercise.select(id, now) {
            warn!(id, error = %e, "selection rejected");
            writeln!(out, "{e}")?;
            continue;
        }
        let placement = exercise.place(category, now)?;
        if let Some(feedback) = exercise.feedback(now) {
            writeln!(out, "{}", feedback.message)?;
        }
        debug!(id, ?placement, "classification attempt");

        now += FEEDBACK_DURATION;
        exercise.tick(now);

        if exercise.is_complete() {
            writeln!(out, "All done! Every item is in its bucket.")?;
            return Ok(());
        }
        print_board(exercise, out)?;
    }
    Ok(())
}

// =============================================================================
// Cost types
// =============================================================================

fn cost_types<W: Write>(out: &mut W) -> Result<()> {
    for cost in COST_TYPES {
        writeln!(out, "{}. {}", cost.id, cost.title)?;
        writeln!(out, "   {}", cost.concept)?;
        writeln!(out, "   Examples: {}", cost.examples.join(", "))?;
    }
    Ok(())
}

fn ask<W: Write>(
    quiz: &CostQuiz,
    out: &mut W,
) -> Result<()> {
    let q = quiz.current();
    writeln!(out, "\n{}", q.prompt)?;
    writeln!(out, "  1) {}\n  2) {}", q.options[0], q.options[1])?;
    Ok(())
}

pub fn cost_quiz<R: BufRead, W: Write>(
    quiz: &mut CostQuiz,
    input: R,
    out: &mut W,
) -> Result<()> {
    let mut now = Instant::now();
    let mut streak = 0;
    let mut attempts = 0;

    ask(quiz, out)?;

    for line in input.lines() {
        let line = line?;
        let line = line.trim();
        if is_quit(line) {
            break;
        }
        let choice = match line {
            "1" => 0,
            "2" => 1,
            _ => {
                writeln!(out, "Type 1 or 2.")?;
                continue;
            }
        };

        let option = quiz.current().options[choice];
        let correct = quiz.answer(option, now)?;
        attempts += 1;
        if let Some(feedback) = quiz.feedback(now) {
            writeln!(out, "{}", feedback.message)?;
        }
        now += QUIZ_FEEDBACK_DURATION;
        quiz.tick(now);

        if correct {
            streak += 1;
            if streak == QUIZ_QUESTIONS.len() {
                writeln!(out, "Round complete: {streak} right in {attempts} attempts.")?;
                return Ok(());
            }
        }
        ask(quiz, out)?;
    }
    Ok(())
}

// =============================================================================
// Practice exam
// =============================================================================

/// Walks an active session question by question until it finishes or the
/// input ends.
pub fn take_exam<R: BufRead, W: Write>(
    session: &mut ExamSession,
    input: R,
    out: &mut W,
) -> Result<()> {
    let mut lines = input.lines();
    while session.status() == ExamStatus::Active {
        let Some(question) = session.current() else {
            break;
        };
        let total = session.questions().len();
        writeln!(
            out,
            "\nQuestion {} of {} ({})\n{}",
            session.index() + 1,
            total,
            question.kind.label(),
            question.text
        )?;
        for (i, option) in question.options.iter().enumerate() {
            writeln!(out, "  {}) {}", i + 1, option)?;
        }
        let options = question.options.clone();
        let correct = question.correct_answer.clone();

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if is_quit(line) {
            break;
        }
        let picked = line
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| options.get(i));
        match picked {
            Some(option) => match session.answer(option)? {
                AnswerOutcome::Correct => writeln!(out, "Correct!")?,
                AnswerOutcome::Wrong => writeln!(out, "Wrong. The answer is: {correct}")?,
                AnswerOutcome::AlreadyAnswered => {}
            },
            None => writeln!(out, "Skipped.")?,
        }
        session.next()?;
    }

    if session.status() == ExamStatus::Finished {
        writeln!(
            out,
            "\nScore: {} / {}",
            session.score(),
            session.questions().len()
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use riyada_core::{ExamQuestion, QuestionKind};

    use super::*;

    fn run_to_string(
        kind: ExerciseKind,
        input: &str,
    ) -> String {
        let mut out = Vec::new();
        run(kind, input.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // =========================================================================
    // Classification
    // =========================================================================

    #[test]
    fn parse_move_reads_item_and_bucket() {
        assert_eq!(parse_move("3 1"), Some((3, 0)));
        assert_eq!(parse_move(" 12   2 "), Some((12, 1)));
        assert_eq!(parse_move("3"), None);
        assert_eq!(parse_move("3 0"), None);
        assert_eq!(parse_move("a b"), None);
        assert_eq!(parse_move("1 2 3"), None);
    }

    #[test]
    fn debtor_creditor_wrong_then_right() {
        // Item 1 is a debit-side term; bucket 2 is creditor.
        let text = run_to_string(ExerciseKind::DebtorCreditor, "1 2\n1 1\nq\n");

        assert!(text.contains("Wrong, try a different bucket."));
        assert!(text.contains("Correct, well done!"));
    }

    #[test]
    fn unknown_item_is_reported_and_loop_continues() {
        let text = run_to_string(ExerciseKind::AccountTypes, "99 1\nq\n");

        assert!(text.contains("no item with id 99"));
    }

    #[test]
    fn finishing_every_item_prints_all_done() {
        let mut exercise = debtor_creditor_exercise();
        let moves: String = exercise
            .catalog()
            .iter()
            .map(|item| {
                let bucket = if item.category == riyada_core::exercises::BalanceSide::Debit {
                    1
                } else {
                    2
                };
                format!("{} {}\n", item.id, bucket)
            })
            .collect();
        let mut out = Vec::new();

        classify(&mut exercise, moves.as_bytes(), &mut out).unwrap();

        assert!(exercise.is_complete());
        assert!(String::from_utf8(out).unwrap().contains("All done!"));
    }

    // =========================================================================
    // Cost quiz
    // =========================================================================

    #[test]
    fn cost_quiz_full_round() {
        let answers: String = QUIZ_QUESTIONS
            .iter()
            .map(|q| {
                let i = q.options.iter().position(|o| *o == q.correct).unwrap();
                format!("{}\n", i + 1)
            })
            .collect();

        let text = run_to_string(ExerciseKind::CostQuiz, &answers);

        assert!(text.contains("Round complete: 4 right in 4 attempts."));
    }

    #[test]
    fn cost_quiz_wrong_answer_repeats_question() {
        let mut quiz = CostQuiz::new();
        let q = quiz.current();
        let wrong = q.options.iter().position(|o| *o != q.correct).unwrap();
        let mut out = Vec::new();

        cost_quiz(&mut quiz, format!("{}\n", wrong + 1).as_bytes(), &mut out).unwrap();

        assert_eq!(quiz.index(), 0);
        assert!(String::from_utf8(out).unwrap().contains("Wrong, try again."));
    }

    #[test]
    fn cost_types_lists_all_six() {
        let text = run_to_string(ExerciseKind::CostTypes, "");

        assert!(text.starts_with("1. Capital costs"));
        assert!(text.contains("6. "));
    }

    // =========================================================================
    // Exam
    // =========================================================================

    fn session_with(count: u32) -> ExamSession {
        let questions = (1..=count)
            .map(|id| ExamQuestion {
                id,
                text: format!("Question {id}"),
                kind: QuestionKind::Tf,
                options: vec!["True".to_string(), "False".to_string()],
                correct_answer: "True".to_string(),
            })
            .collect();
        let mut session = ExamSession::new();
        session.begin_generation().unwrap();
        session.start(questions).unwrap();
        session
    }

    #[test]
    fn take_exam_scores_answers_and_skips() {
        let mut session = session_with(3);
        let mut out = Vec::new();

        take_exam(&mut session, "1\n2\nx\n".as_bytes(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(session.status(), ExamStatus::Finished);
        assert_eq!(session.score(), 1);
        assert!(text.contains("Wrong. The answer is: True"));
        assert!(text.contains("Skipped."));
        assert!(text.contains("Score: 1 / 3"));
    }

    #[test]
    fn take_exam_quit_leaves_session_active() {
        let mut session = session_with(2);
        let mut out = Vec::new();

        take_exam(&mut session, "1\nq\n".as_bytes(), &mut out).unwrap();

        assert_eq!(session.status(), ExamStatus::Active);
        assert_eq!(session.index(), 1);
    }
}
