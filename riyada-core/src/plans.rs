//! Business and marketing plan workbooks.
//!
//! A workbook holds free text per section plus at most one pending
//! refinement suggestion per section. Suggestions never touch the text until
//! they are accepted.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Drafts shorter than this (in characters, after trimming) are not sent
/// for refinement.
pub const MIN_REFINE_LEN: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("section '{0}' has no pending suggestion")]
    NoSuggestion(&'static str),

    #[error("section '{section}' needs at least 10 characters before refining (has {len})")]
    DraftTooShort { section: &'static str, len: usize },

    #[error("unknown plan section '{0}'")]
    UnknownSection(String),
}

/// The fixed list of sections a workbook is made of.
pub trait SectionKey: Copy + Ord + fmt::Debug + 'static {
    fn all() -> &'static [Self];

    /// Stable snake_case key, also used as the JSON field name.
    fn key(&self) -> &'static str;

    fn title(&self) -> &'static str;

    fn from_key(key: &str) -> Result<Self, PlanError> {
        Self::all()
            .iter()
            .copied()
            .find(|s| s.key() == key)
            .ok_or_else(|| PlanError::UnknownSection(key.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessPlanSection {
    ExecutiveSummary,
    CompanyDesc,
    Products,
    Market,
    Marketing,
    Operations,
    Team,
    Financial,
    Risks,
}

impl SectionKey for BusinessPlanSection {
    fn all() -> &'static [Self] {
        use BusinessPlanSection::*;
        &[
            ExecutiveSummary,
            CompanyDesc,
            Products,
            Market,
            Marketing,
            Operations,
            Team,
            Financial,
            Risks,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "executive_summary",
            Self::CompanyDesc => "company_desc",
            Self::Products => "products",
            Self::Market => "market",
            Self::Marketing => "marketing",
            Self::Operations => "operations",
            Self::Team => "team",
            Self::Financial => "financial",
            Self::Risks => "risks",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::ExecutiveSummary => "1. Executive summary",
            Self::CompanyDesc => "2. Company description",
            Self::Products => "3. Products and services",
            Self::Market => "4. Market analysis",
            Self::Marketing => "5. Marketing plan",
            Self::Operations => "6. Operating plan",
            Self::Team => "7. Team and management",
            Self::Financial => "8. Financial plan",
            Self::Risks => "9. Risk analysis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketingPlanSection {
    TargetAudience,
    Usp,
    ProductStrategy,
    PricingStrategy,
    Distribution,
    Promotion,
    Budget,
    Kpis,
}

impl SectionKey for MarketingPlanSection {
    fn all() -> &'static [Self] {
        use MarketingPlanSection::*;
        &[
            TargetAudience,
            Usp,
            ProductStrategy,
            PricingStrategy,
            Distribution,
            Promotion,
            Budget,
            Kpis,
        ]
    }

    fn key(&self) -> &'static str {
        match self {
            Self::TargetAudience => "target_audience",
            Self::Usp => "usp",
            Self::ProductStrategy => "product_strategy",
            Self::PricingStrategy => "pricing_strategy",
            Self::Distribution => "distribution",
            Self::Promotion => "promotion",
            Self::Budget => "budget",
            Self::Kpis => "kpis",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::TargetAudience => "1. Target audience",
            Self::Usp => "2. Unique selling proposition",
            Self::ProductStrategy => "3. Product strategy",
            Self::PricingStrategy => "4. Pricing strategy",
            Self::Distribution => "5. Distribution",
            Self::Promotion => "6. Promotion",
            Self::Budget => "7. Marketing budget",
            Self::Kpis => "8. Key performance indicators",
        }
    }
}

/// A refined rewrite of one section plus advice on what is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub refined: String,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanWorkbook<S: SectionKey> {
    texts: BTreeMap<S, String>,
    suggestions: BTreeMap<S, Suggestion>,
}

pub type BusinessPlan = PlanWorkbook<BusinessPlanSection>;
pub type MarketingPlan = PlanWorkbook<MarketingPlanSection>;

impl<S: SectionKey> Default for PlanWorkbook<S> {
    fn default() -> Self {
        Self {
            texts: BTreeMap::new(),
            suggestions: BTreeMap::new(),
        }
    }
}

impl<S: SectionKey> PlanWorkbook<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section text, or an empty string if nothing has been written.
    pub fn text(
        &self,
        section: S,
    ) -> &str {
        self.texts.get(&section).map_or("", String::as_str)
    }

    pub fn set_text(
        &mut self,
        section: S,
        text: impl Into<String>,
    ) {
        self.texts.insert(section, text.into());
    }

    pub fn can_refine(
        &self,
        section: S,
    ) -> bool {
        draft_len(self.text(section)) >= MIN_REFINE_LEN
    }

    /// The draft to send for refinement, if it is long enough.
    pub fn refine_request(
        &self,
        section: S,
    ) -> Result<&str, PlanError> {
        let text = self.text(section);
        let len = draft_len(text);
        if len < MIN_REFINE_LEN {
            return Err(PlanError::DraftTooShort {
                section: section.key(),
                len,
            });
        }
        Ok(text)
    }

    pub fn suggestion(
        &self,
        section: S,
    ) -> Option<&Suggestion> {
        self.suggestions.get(&section)
    }

    pub fn set_suggestion(
        &mut self,
        section: S,
        suggestion: Suggestion,
    ) {
        self.suggestions.insert(section, suggestion);
    }

    /// Replaces the section text with the pending suggestion.
    pub fn accept(
        &mut self,
        section: S,
    ) -> Result<(), PlanError> {
        let suggestion = self
            .suggestions
            .remove(&section)
            .ok_or(PlanError::NoSuggestion(section.key()))?;
        self.texts.insert(section, suggestion.refined);
        debug!(section = section.key(), "suggestion accepted");
        Ok(())
    }

    /// Drops the pending suggestion. Returns whether there was one.
    pub fn discard(
        &mut self,
        section: S,
    ) -> bool {
        self.suggestions.remove(&section).is_some()
    }

    /// Applies a generated draft, overwriting only the sections it contains.
    ///
    /// Missing and blank fields leave the existing text alone. Returns the
    /// number of sections written.
    pub fn merge_draft<I>(
        &mut self,
        draft: I,
    ) -> usize
    where
        I: IntoIterator<Item = (S, Option<String>)>,
    {
        let mut applied = 0;
        for (section, text) in draft {
            if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
                self.texts.insert(section, text);
                applied += 1;
            }
        }
        debug!(applied, "generated draft merged");
        applied
    }

    /// Every section in order as `(title, text)`, ready for export.
    pub fn sections(&self) -> Vec<(&'static str, &str)> {
        S::all()
            .iter()
            .map(|s| (s.title(), self.text(*s)))
            .collect()
    }

    pub fn filled_count(&self) -> usize {
        self.texts.values().filter(|t| !t.trim().is_empty()).count()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn draft_len(text: &str) -> usize {
    text.trim().chars().count()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn suggestion(refined: &str) -> Suggestion {
        Suggestion {
            refined: refined.to_string(),
            advice: "Add numbers.".to_string(),
        }
    }

    #[test]
    fn section_lists_have_expected_keys() {
        let business: Vec<&str> = BusinessPlanSection::all().iter().map(|s| s.key()).collect();
        let marketing: Vec<&str> = MarketingPlanSection::all().iter().map(|s| s.key()).collect();

        assert_eq!(
            business,
            vec![
                "executive_summary",
                "company_desc",
                "products",
                "market",
                "marketing",
                "operations",
                "team",
                "financial",
                "risks",
            ]
        );
        assert_eq!(marketing.len(), 8);
        assert_eq!(MarketingPlanSection::from_key("kpis"), Ok(MarketingPlanSection::Kpis));
        assert!(BusinessPlanSection::from_key("nope").is_err());
    }

    #[test]
    fn refine_requires_ten_characters() {
        let mut plan = BusinessPlan::new();
        plan.set_text(BusinessPlanSection::Team, "  two devs ");

        assert!(!plan.can_refine(BusinessPlanSection::Team));
        assert_eq!(
            plan.refine_request(BusinessPlanSection::Team),
            Err(PlanError::DraftTooShort {
                section: "team",
                len: 8,
            })
        );

        plan.set_text(BusinessPlanSection::Team, "two founders");
        assert_eq!(plan.refine_request(BusinessPlanSection::Team), Ok("two founders"));
    }

    #[test]
    fn refine_counts_characters_not_bytes() {
        let mut plan = MarketingPlan::new();
        // nine two-byte characters
        plan.set_text(MarketingPlanSection::Usp, "جودةعالية");

        assert!(!plan.can_refine(MarketingPlanSection::Usp));
    }

    #[test]
    fn accept_replaces_text_and_clears_suggestion() {
        let mut plan = BusinessPlan::new();
        plan.set_text(BusinessPlanSection::Market, "draft text here");
        plan.set_suggestion(BusinessPlanSection::Market, suggestion("polished text"));

        plan.accept(BusinessPlanSection::Market).unwrap();

        assert_eq!(plan.text(BusinessPlanSection::Market), "polished text");
        assert!(plan.suggestion(BusinessPlanSection::Market).is_none());
    }

    #[test]
    fn discard_keeps_text() {
        let mut plan = BusinessPlan::new();
        plan.set_text(BusinessPlanSection::Market, "draft text here");
        plan.set_suggestion(BusinessPlanSection::Market, suggestion("polished text"));

        assert!(plan.discard(BusinessPlanSection::Market));
        assert!(!plan.discard(BusinessPlanSection::Market));
        assert_eq!(plan.text(BusinessPlanSection::Market), "draft text here");
    }

    #[test]
    fn accept_without_suggestion_is_an_error() {
        let mut plan = MarketingPlan::new();

        assert_eq!(
            plan.accept(MarketingPlanSection::Budget),
            Err(PlanError::NoSuggestion("budget"))
        );
    }

    #[test]
    fn merge_draft_applies_only_present_fields() {
        let mut plan = BusinessPlan::new();
        plan.set_text(BusinessPlanSection::Risks, "keep me");
        plan.set_text(BusinessPlanSection::Team, "replace me");

        let applied = plan.merge_draft([
            (BusinessPlanSection::Team, Some("new team".to_string())),
            (BusinessPlanSection::Risks, None),
            (BusinessPlanSection::Financial, Some("   ".to_string())),
            (BusinessPlanSection::Market, Some("big market".to_string())),
        ]);

        assert_eq!(applied, 2);
        assert_eq!(plan.text(BusinessPlanSection::Team), "new team");
        assert_eq!(plan.text(BusinessPlanSection::Risks), "keep me");
        assert_eq!(plan.text(BusinessPlanSection::Financial), "");
        assert_eq!(plan.text(BusinessPlanSection::Market), "big market");
    }

    #[test]
    fn sections_are_listed_in_order_with_titles() {
        let mut plan = MarketingPlan::new();
        plan.set_text(MarketingPlanSection::Promotion, "Social media");

        let sections = plan.sections();

        assert_eq!(sections.len(), 8);
        assert_eq!(sections[0], ("1. Target audience", ""));
        assert_eq!(sections[5], ("6. Promotion", "Social media"));
        assert_eq!(plan.filled_count(), 1);
    }
}
