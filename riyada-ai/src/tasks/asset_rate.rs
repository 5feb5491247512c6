//! Useful-life and straight-line rate lookup for a named asset.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use serde::Deserialize;

use riyada_core::calculations::AssetInput;

use crate::client::CompletionRequest;
use crate::error::AiError;
use crate::schema::ResponseSchema;
use crate::tasks::{Payload, RESPONSE_LANGUAGE, blank};

/// Rate used when the suggestion carries no usable number.
pub const FALLBACK_RATE: Decimal = Decimal::TEN;

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)?").expect("number pattern is valid"));

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRateSuggestion {
    pub asset_name: Option<String>,
    pub estimated_life: Option<String>,
    pub suggested_rate: Option<String>,
    pub reasoning: Option<String>,
}

impl Payload for AssetRateSuggestion {
    fn is_empty(&self) -> bool {
        self.rate().is_none() && self.estimated_life.as_deref().is_none_or(blank)
    }
}

impl AssetRateSuggestion {
    /// The first number in `suggested_rate`, so "20", "20%" and "20 percent"
    /// all read as 20. Rates above 100 are ignored.
    pub fn rate(&self) -> Option<Decimal> {
        let text = self.suggested_rate.as_deref()?;
        let found = FIRST_NUMBER.find(text)?;
        Decimal::from_str(found.as_str())
            .ok()
            .filter(|r| *r <= Decimal::ONE_HUNDRED)
    }

    /// A new depreciation row priced at zero, named after the suggestion or
    /// the search term, at the suggested rate or [`FALLBACK_RATE`].
    pub fn to_asset_input(
        &self,
        search_term: &str,
    ) -> AssetInput {
        let name = self
            .asset_name
            .as_deref()
            .filter(|n| !blank(n))
            .unwrap_or(search_term)
            .trim()
            .to_string();
        AssetInput {
            name,
            price: Decimal::ZERO,
            rate: self.rate().unwrap_or(FALLBACK_RATE),
        }
    }
}

pub fn lookup_request(search_term: &str) -> Result<CompletionRequest, AiError> {
    if blank(search_term) {
        return Err(AiError::InvalidInput(
            "Type an asset name to look up.".to_string(),
        ));
    }
    let prompt = format!(
        "Act as an accounting expert. Give the estimated useful life and the standard annual \
         straight-line depreciation rate for this asset: \"{asset}\". Answer in \
         {RESPONSE_LANGUAGE}.\n\n\
         - assetName: the asset name\n\
         - estimatedLife: a range in years, e.g. 5-7 years\n\
         - suggestedRate: the percentage as a number only, e.g. 20\n\
         - reasoning: a brief explanation",
        asset = search_term.trim(),
    );
    Ok(CompletionRequest::new(
        prompt,
        ResponseSchema::strings(&["assetName", "estimatedLife", "suggestedRate", "reasoning"]),
    ))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn suggestion(rate: &str) -> AssetRateSuggestion {
        AssetRateSuggestion {
            asset_name: Some("Laptop".to_string()),
            estimated_life: Some("3-5 years".to_string()),
            suggested_rate: Some(rate.to_string()),
            reasoning: None,
        }
    }

    #[test]
    fn rate_reads_first_number() {
        assert_eq!(suggestion("20").rate(), Some(dec!(20)));
        assert_eq!(suggestion("12.5%").rate(), Some(dec!(12.5)));
        assert_eq!(suggestion("about 33 percent").rate(), Some(dec!(33)));
        assert_eq!(suggestion("unknown").rate(), None);
        assert_eq!(suggestion("250").rate(), None);
    }

    #[test]
    fn to_asset_input_falls_back_to_ten_percent() {
        let input = suggestion("n/a").to_asset_input("laptop");

        assert_eq!(
            input,
            AssetInput {
                name: "Laptop".to_string(),
                price: dec!(0),
                rate: dec!(10),
            }
        );
    }

    #[test]
    fn to_asset_input_uses_search_term_without_name() {
        let s = AssetRateSuggestion {
            asset_name: None,
            ..suggestion("25")
        };

        let input = s.to_asset_input(" delivery van ");

        assert_eq!(input.name, "delivery van");
        assert_eq!(input.rate, dec!(25));
    }

    #[test]
    fn lookup_request_rejects_blank_term() {
        assert!(matches!(lookup_request("  "), Err(AiError::InvalidInput(_))));
        assert!(lookup_request("Oven").unwrap().prompt.contains("\"Oven\""));
    }
}
