pub mod calculations;
pub mod exam;
pub mod exercises;
pub mod export;
pub mod plans;

pub use exam::{
    AnswerOutcome, DraftQuestion, EXAM_QUESTION_COUNT, ExamError, ExamQuestion, ExamSession,
    ExamStatus, QuestionKind, validate_questions,
};
pub use plans::{
    BusinessPlan, BusinessPlanSection, MIN_REFINE_LEN, MarketingPlan, MarketingPlanSection,
    PlanError, PlanWorkbook, SectionKey, Suggestion,
};
