//! Strategy analyses: Business Model Canvas, SWOT, PESTLE and a
//! head-to-head competitor comparison.

use serde::{Deserialize, Serialize};

use crate::client::CompletionRequest;
use crate::error::AiError;
use crate::schema::ResponseSchema;
use crate::tasks::{Payload, RESPONSE_LANGUAGE, blank, clamp_score, clean_list, form_json};

/// A canvas needs at least this many filled blocks before it is analysed.
pub const MIN_BMC_FIELDS: usize = 5;

// =============================================================================
// Business Model Canvas
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BmcCanvas {
    pub customer_segments: String,
    pub value_propositions: String,
    pub channels: String,
    pub customer_relationships: String,
    pub revenue_streams: String,
    pub key_resources: String,
    pub key_activities: String,
    pub key_partners: String,
    pub cost_structure: String,
}

impl BmcCanvas {
    pub fn blocks(&self) -> [(&'static str, &str); 9] {
        [
            ("Customer segments", self.customer_segments.as_str()),
            ("Value propositions", self.value_propositions.as_str()),
            ("Channels", self.channels.as_str()),
            ("Customer relationships", self.customer_relationships.as_str()),
            ("Revenue streams", self.revenue_streams.as_str()),
            ("Key resources", self.key_resources.as_str()),
            ("Key activities", self.key_activities.as_str()),
            ("Key partners", self.key_partners.as_str()),
            ("Cost structure", self.cost_structure.as_str()),
        ]
    }

    pub fn filled_count(&self) -> usize {
        self.blocks().iter().filter(|(_, v)| !blank(v)).count()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BmcAnalysis {
    pub success_score: Option<f64>,
    pub positives: Option<Vec<String>>,
    pub development_tips: Option<Vec<String>>,
    pub overall_feedback: Option<String>,
}

impl BmcAnalysis {
    pub fn score(&self) -> Option<u8> {
        clamp_score(self.success_score)
    }
}

impl Payload for BmcAnalysis {
    fn is_empty(&self) -> bool {
        self.score().is_none()
            && clean_list(self.positives.clone()).is_empty()
            && clean_list(self.development_tips.clone()).is_empty()
            && self.overall_feedback.as_deref().is_none_or(blank)
    }
}

pub fn bmc_request(canvas: &BmcCanvas) -> Result<CompletionRequest, AiError> {
    if canvas.filled_count() < MIN_BMC_FIELDS {
        return Err(AiError::InvalidInput(format!(
            "Fill in at least {MIN_BMC_FIELDS} boxes of the canvas for a meaningful analysis."
        )));
    }
    let prompt = format!(
        "You are an expert business consultant and entrepreneurship professor. Analyse the \
         following Business Model Canvas data.\n\n\
         Canvas:\n{data}\n\n\
         Evaluate the coherence, viability and potential success of this business model. \
         Answer in {RESPONSE_LANGUAGE} with:\n\
         - successScore: number from 0 to 100 for potential viability\n\
         - positives: three strong points\n\
         - developmentTips: three actionable tips to improve the model\n\
         - overallFeedback: a short summary paragraph",
        data = form_json(canvas)?,
    );
    let schema = ResponseSchema::object([
        ("successScore", ResponseSchema::number()),
        ("positives", ResponseSchema::array(ResponseSchema::string())),
        ("developmentTips", ResponseSchema::array(ResponseSchema::string())),
        ("overallFeedback", ResponseSchema::string()),
    ])
    .require(&["successScore", "positives", "developmentTips", "overallFeedback"]);
    Ok(CompletionRequest::new(prompt, schema))
}

// =============================================================================
// SWOT
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwotInput {
    pub strengths: String,
    pub weaknesses: String,
    pub opportunities: String,
    pub threats: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwotAnalysis {
    pub score: Option<f64>,
    pub strategic_advice: Option<String>,
    pub action_points: Option<Vec<String>>,
}

impl Payload for SwotAnalysis {
    fn is_empty(&self) -> bool {
        clamp_score(self.score).is_none()
            && self.strategic_advice.as_deref().is_none_or(blank)
            && clean_list(self.action_points.clone()).is_empty()
    }
}

pub fn swot_request(input: &SwotInput) -> Result<CompletionRequest, AiError> {
    if [&input.strengths, &input.weaknesses, &input.opportunities, &input.threats]
        .iter()
        .all(|v| blank(v))
    {
        return Err(AiError::InvalidInput(
            "Fill in the SWOT grid before asking for an analysis.".to_string(),
        ));
    }
    let prompt = format!(
        "Analyse this SWOT analysis for a startup:\n{data}\n\n\
         Provide, in {RESPONSE_LANGUAGE}:\n\
         1. A viability score from 0 to 100.\n\
         2. Strategic advice on using strengths to capture opportunities and on minimising \
         threats.\n\
         3. Three concrete action points.",
        data = form_json(input)?,
    );
    let schema = ResponseSchema::object([
        ("score", ResponseSchema::number()),
        ("strategicAdvice", ResponseSchema::string()),
        ("actionPoints", ResponseSchema::array(ResponseSchema::string())),
    ]);
    Ok(CompletionRequest::new(prompt, schema))
}

// =============================================================================
// PESTLE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PestleInput {
    pub political: String,
    pub economic: String,
    pub social: String,
    pub technological: String,
    pub legal: String,
    pub environmental: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PestleAnalysis {
    pub summary: Option<String>,
    pub key_risks: Option<Vec<String>>,
}

impl Payload for PestleAnalysis {
    fn is_empty(&self) -> bool {
        self.summary.as_deref().is_none_or(blank) && clean_list(self.key_risks.clone()).is_empty()
    }
}

pub fn pestle_request(input: &PestleInput) -> Result<CompletionRequest, AiError> {
    let prompt = format!(
        "Analyse this PESTLE analysis for a business context:\n{data}\n\n\
         Provide, in {RESPONSE_LANGUAGE}:\n\
         1. A summary of how favourable the external environment is.\n\
         2. The three biggest external risks mentioned.",
        data = form_json(input)?,
    );
    let schema = ResponseSchema::object([
        ("summary", ResponseSchema::string()),
        ("keyRisks", ResponseSchema::array(ResponseSchema::string())),
    ]);
    Ok(CompletionRequest::new(prompt, schema))
}

// =============================================================================
// Competitor comparison
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorProfile {
    pub name: String,
    pub price: String,
    pub quality: String,
    pub location: String,
    pub marketing: String,
    pub strengths: String,
    pub weaknesses: String,
}

impl CompetitorProfile {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompetitorAnalysis {
    pub advantage: Option<String>,
    pub positioning: Option<String>,
}

impl Payload for CompetitorAnalysis {
    fn is_empty(&self) -> bool {
        self.advantage.as_deref().is_none_or(blank) && self.positioning.as_deref().is_none_or(blank)
    }
}

pub fn competitor_request(
    mine: &CompetitorProfile,
    theirs: &CompetitorProfile,
) -> Result<CompletionRequest, AiError> {
    let prompt = format!(
        "Compare my project with a competitor based on this data:\n\
         My project: {mine}\n\
         Competitor: {theirs}\n\n\
         Identify, in {RESPONSE_LANGUAGE}:\n\
         1. My competitive advantage (why customers will choose me).\n\
         2. Market positioning advice.",
        mine = form_json(mine)?,
        theirs = form_json(theirs)?,
    );
    Ok(CompletionRequest::new(
        prompt,
        ResponseSchema::strings(&["advantage", "positioning"]),
    ))
}
