//! Prompt builders and response types, one module per assistant task.
//!
//! | Module | Task |
//! |--------|------|
//! | [`plans`] | Full business/marketing plan drafts and section refinement |
//! | [`analysis`] | BMC, SWOT, PESTLE and competitor analyses |
//! | [`identity`] | Vision/mission/values generation and review |
//! | [`asset_rate`] | Useful-life and depreciation-rate lookup |
//! | [`exam`] | Practice exam generation |

pub mod analysis;
pub mod asset_rate;
pub mod exam;
pub mod identity;
pub mod plans;

use serde::Serialize;

use crate::error::AiError;

/// Language every answer is written in.
pub const RESPONSE_LANGUAGE: &str = "Arabic";

/// A decoded response that can be checked for usable content.
pub trait Payload {
    /// True when no field carries anything worth showing.
    fn is_empty(&self) -> bool;
}

/// Pretty JSON of form state for embedding in a prompt.
pub(crate) fn form_json<T: Serialize>(value: &T) -> Result<String, AiError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub(crate) fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Clamps a reported score into `0..=100`, dropping non-finite values.
pub fn clamp_score(score: Option<f64>) -> Option<u8> {
    score
        .filter(|s| s.is_finite())
        .map(|s| s.round().clamp(0.0, 100.0) as u8)
}

/// Keeps the non-blank entries of an optional list.
pub fn clean_list(items: Option<Vec<String>>) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
