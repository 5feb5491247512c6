//! Practice exam generation.

use riyada_core::{DraftQuestion, EXAM_QUESTION_COUNT, ExamQuestion, validate_questions};

use crate::client::CompletionRequest;
use crate::error::AiError;
use crate::parse::parse_payload;
use crate::schema::ResponseSchema;
use crate::tasks::RESPONSE_LANGUAGE;

const TOPICS: &[&str] = &[
    "Business Model Canvas components",
    "SWOT and PESTLE analysis",
    "Marketing plan (STP, the 7Ps, pricing strategies)",
    "Operating plan and legal forms of companies",
    "Financial plan, including calculations for break-even point, depreciation, net profit \
     and equity = assets - liabilities",
];

pub fn exam_request() -> CompletionRequest {
    let per_kind = EXAM_QUESTION_COUNT / 3;
    let topics: String = TOPICS
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {t}\n", i + 1))
        .collect();
    let prompt = format!(
        "Create a practice exam for an entrepreneurship course. Generate exactly \
         {EXAM_QUESTION_COUNT} questions in {RESPONSE_LANGUAGE} covering:\n{topics}\n\
         Requirements:\n\
         - {per_kind} multiple choice questions (type \"mcq\").\n\
         - {per_kind} true/false questions (type \"tf\").\n\
         - {per_kind} calculation problems (type \"math\"): the scenario goes in text and the \
         numeric answers in options.\n\
         - The options array must always contain correctAnswer exactly.\n\
         - Return a JSON array."
    );
    let schema = ResponseSchema::array(ResponseSchema::object([
        ("id", ResponseSchema::integer()),
        ("text", ResponseSchema::string()),
        ("type", ResponseSchema::string_enum(&["mcq", "tf", "math"])),
        ("options", ResponseSchema::array(ResponseSchema::string())),
        ("correctAnswer", ResponseSchema::string()),
    ]));
    CompletionRequest::new(prompt, schema)
}

/// Decodes and validates a generated question list.
pub fn parse_questions(raw: &str) -> Result<Vec<ExamQuestion>, AiError> {
    let drafts: Vec<DraftQuestion> = parse_payload(raw)?;
    Ok(validate_questions(drafts)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use riyada_core::{ExamError, QuestionKind};

    use super::*;

    #[test]
    fn exam_request_asks_for_thirty_questions_as_array() {
        let request = exam_request();

        assert!(request.prompt.contains("exactly 30 questions"));
        assert!(request.prompt.contains("10 true/false"));
        assert_eq!(request.schema.to_value()["type"], "ARRAY");
    }

    #[test]
    fn parse_questions_drops_invalid_entries() {
        let raw = r#"[
            {"id":1,"text":"Equity = ?","type":"math","options":["A - L","A + L"],"correctAnswer":"A - L"},
            {"id":2,"text":"Missing answer","type":"tf","options":["True","False"]},
            {"id":3,"text":"Answer not in options","type":"mcq","options":["x"],"correctAnswer":"y"}
        ]"#;

        let questions = parse_questions(raw).unwrap();

        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].kind, QuestionKind::Math);
    }

    #[test]
    fn parse_questions_unknown_kind_fails_whole_payload() {
        let raw = r#"[{"id":1,"text":"Q","type":"essay","options":["a"],"correctAnswer":"a"}]"#;

        assert!(matches!(parse_questions(raw), Err(AiError::Malformed(_))));
    }

    #[test]
    fn parse_questions_empty_list_is_no_questions() {
        assert!(matches!(
            parse_questions("[]"),
            Err(AiError::Exam(ExamError::NoQuestions))
        ));
    }
}
