//! Corporate identity: vision, mission and values.

use serde::{Deserialize, Serialize};

use crate::client::CompletionRequest;
use crate::error::AiError;
use crate::schema::ResponseSchema;
use crate::tasks::{Payload, RESPONSE_LANGUAGE, blank, clamp_score};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityBrief {
    pub project_name: String,
    pub field: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityStatement {
    pub vision: String,
    pub mission: String,
    pub values: String,
}

/// Generated statement. Any part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdentityDraft {
    pub vision: Option<String>,
    pub mission: Option<String>,
    pub values: Option<String>,
}

impl Payload for IdentityDraft {
    fn is_empty(&self) -> bool {
        [&self.vision, &self.mission, &self.values]
            .iter()
            .all(|v| v.as_deref().is_none_or(blank))
    }
}

impl IdentityDraft {
    /// Overwrites only the parts the draft carries.
    pub fn merge_into(
        self,
        statement: &mut IdentityStatement,
    ) {
        let parts = [
            (self.vision, &mut statement.vision),
            (self.mission, &mut statement.mission),
            (self.values, &mut statement.values),
        ];
        for (value, slot) in parts {
            if let Some(value) = value.filter(|v| !blank(v)) {
                *slot = value;
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityReview {
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub refined_vision: Option<String>,
    pub refined_mission: Option<String>,
}

impl IdentityReview {
    pub fn score(&self) -> Option<u8> {
        clamp_score(self.score)
    }
}

impl Payload for IdentityReview {
    fn is_empty(&self) -> bool {
        self.score().is_none()
            && [&self.feedback, &self.refined_vision, &self.refined_mission]
                .iter()
                .all(|v| v.as_deref().is_none_or(blank))
    }
}

pub fn generate_request(brief: &IdentityBrief) -> Result<CompletionRequest, AiError> {
    if blank(&brief.project_name) || blank(&brief.field) {
        return Err(AiError::InvalidInput(
            "Enter the project name and field first.".to_string(),
        ));
    }
    let prompt = format!(
        "Act as a branding expert. Create a vision, mission and values in {RESPONSE_LANGUAGE} \
         for a project with:\n\
         Name: {name}\n\
         Field/description: {field}\n\n\
         Rules:\n\
         - Vision: ambitious and future-oriented.\n\
         - Mission: action-oriented, present tense, clear.\n\
         - Values: four or five core principles.",
        name = brief.project_name.trim(),
        field = brief.field.trim(),
    );
    Ok(CompletionRequest::new(
        prompt,
        ResponseSchema::strings(&["vision", "mission", "values"]),
    ))
}

pub fn review_request(statement: &IdentityStatement) -> Result<CompletionRequest, AiError> {
    if blank(&statement.vision) || blank(&statement.mission) {
        return Err(AiError::InvalidInput(
            "Write a vision and a mission before asking for a review.".to_string(),
        ));
    }
    let prompt = format!(
        "Evaluate this corporate identity (written in {RESPONSE_LANGUAGE}):\n\
         Vision: {vision}\n\
         Mission: {mission}\n\
         Values: {values}\n\n\
         Criteria:\n\
         - The vision must be inspiring and long-term.\n\
         - The mission must be specific and actionable.\n\n\
         Give a score from 0 to 100, feedback, and refined versions of the vision and mission.",
        vision = statement.vision.trim(),
        mission = statement.mission.trim(),
        values = statement.values.trim(),
    );
    let schema = ResponseSchema::object([
        ("score", ResponseSchema::number()),
        ("feedback", ResponseSchema::string()),
        ("refinedVision", ResponseSchema::string()),
        ("refinedMission", ResponseSchema::string()),
    ]);
    Ok(CompletionRequest::new(prompt, schema))
}
