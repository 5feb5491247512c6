//! Plan drafting and section refinement.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use riyada_core::{
    BusinessPlanSection, MarketingPlanSection, PlanWorkbook, SectionKey, Suggestion,
};

use crate::client::CompletionRequest;
use crate::error::AiError;
use crate::parse::{non_blank, parse_payload};
use crate::schema::ResponseSchema;
use crate::tasks::{Payload, RESPONSE_LANGUAGE, blank};

/// Prompt wording that differs between plan kinds.
pub trait PlanPrompt: SectionKey {
    /// Human name of the plan, e.g. "business plan".
    const PLAN_NAME: &'static str;
    /// Persona the service is asked to adopt when drafting.
    const DRAFT_PERSONA: &'static str;
    /// What the advice part of a refinement should focus on.
    const REFINE_FOCUS: &'static str;

    /// Extra guidance per section for a full draft.
    fn hint(&self) -> &'static str {
        ""
    }
}

impl PlanPrompt for BusinessPlanSection {
    const PLAN_NAME: &'static str = "business plan";
    const DRAFT_PERSONA: &'static str = "an expert entrepreneurship consultant";
    const REFINE_FOCUS: &'static str = "what is missing or could be strengthened";
}

impl PlanPrompt for MarketingPlanSection {
    const PLAN_NAME: &'static str = "marketing plan";
    const DRAFT_PERSONA: &'static str = "an expert chief marketing officer";
    const REFINE_FOCUS: &'static str = "how to make it more persuasive or data-driven";

    fn hint(&self) -> &'static str {
        match self {
            Self::TargetAudience => "demographics, psychographics and persona",
            Self::Usp => "a clear unique selling proposition",
            Self::ProductStrategy => "features mapped to benefits",
            Self::PricingStrategy => "pricing model and justification",
            Self::Distribution => "channels and logistics",
            Self::Promotion => "campaign ideas and channels",
            Self::Budget => "estimated allocation",
            Self::Kpis => "key performance indicators",
        }
    }
}

/// The learner's project, as typed into the "generate plan" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectIdea {
    pub name: String,
    pub description: String,
}

pub fn draft_request<K: PlanPrompt>(idea: &ProjectIdea) -> Result<CompletionRequest, AiError> {
    if blank(&idea.description) {
        return Err(AiError::InvalidInput(
            "Describe the project before generating a plan.".to_string(),
        ));
    }

    let keys: String = K::all()
        .iter()
        .map(|s| match s.hint() {
            "" => format!("- {}\n", s.key()),
            hint => format!("- {} ({hint})\n", s.key()),
        })
        .collect();

    let prompt = format!(
        "You are {persona}. Create a comprehensive {plan} in {RESPONSE_LANGUAGE} for a startup \
         based on the following details.\n\n\
         Project name: {name}\n\
         Description: {description}\n\n\
         Generate detailed, realistic content tailored to the project for EACH of these keys:\n\
         {keys}\n\
         Return a JSON object where each key holds the text for that section.",
        persona = K::DRAFT_PERSONA,
        plan = K::PLAN_NAME,
        name = idea.name.trim(),
        description = idea.description.trim(),
    );

    let schema = ResponseSchema::object(K::all().iter().map(|s| (s.key(), ResponseSchema::string())));
    Ok(CompletionRequest::new(prompt, schema))
}

/// Decodes a generated plan into `(section, text)` pairs.
///
/// Sections the payload leaves out, or fills with something other than
/// text, come back as `None` so a merge leaves them alone.
pub fn parse_draft<K: PlanPrompt>(raw: &str) -> Result<Vec<(K, Option<String>)>, AiError> {
    let object: Map<String, Value> = parse_payload(raw)?;
    let sections: Vec<(K, Option<String>)> = K::all()
        .iter()
        .map(|s| {
            let text = object
                .get(s.key())
                .and_then(Value::as_str)
                .map(str::to_string);
            (*s, non_blank(text))
        })
        .collect();

    if sections.iter().all(|(_, text)| text.is_none()) {
        return Err(AiError::EmptyResponse);
    }
    Ok(sections)
}

pub fn refine_request<K: PlanPrompt>(
    workbook: &PlanWorkbook<K>,
    section: K,
) -> Result<CompletionRequest, AiError> {
    let draft = workbook.refine_request(section)?;
    let prompt = format!(
        "You are an expert {plan} consultant. The user is writing the \"{title}\" section of \
         their {plan} in {RESPONSE_LANGUAGE}.\n\n\
         Current draft:\n\"{draft}\"\n\n\
         Provide:\n\
         1. A refined, professional version of this text that keeps its core meaning.\n\
         2. Brief actionable advice on {focus}.",
        plan = K::PLAN_NAME,
        title = section.title(),
        focus = K::REFINE_FOCUS,
    );
    Ok(CompletionRequest::new(
        prompt,
        ResponseSchema::strings(&["refined", "advice"]),
    ))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Refinement {
    pub refined: Option<String>,
    pub advice: Option<String>,
}

impl Payload for Refinement {
    fn is_empty(&self) -> bool {
        self.refined.as_deref().is_none_or(blank)
    }
}

impl Refinement {
    /// A suggestion needs rewritten text; advice is optional.
    pub fn into_suggestion(self) -> Result<Suggestion, AiError> {
        let refined = non_blank(self.refined).ok_or(AiError::EmptyResponse)?;
        Ok(Suggestion {
            refined,
            advice: non_blank(self.advice).unwrap_or_default(),
        })
    }
}
