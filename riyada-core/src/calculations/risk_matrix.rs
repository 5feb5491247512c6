//! Probability/impact risk matrix.
//!
//! Each risk is rated 1 to 5 for how likely it is and 1 to 5 for how much
//! damage it would do. The product of the two is its score, and the score
//! places it in one of three tiers:
//!
//! | Score | Level |
//! |-------|-------|
//! | 15 and above | High |
//! | 8 to 14 | Medium |
//! | below 8 | Low |
//!
//! The heat map counts how many risks fall on each probability/impact cell,
//! highest probability first.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Lowest rating on either axis.
pub const MIN_RATING: u8 = 1;

/// Highest rating on either axis.
pub const MAX_RATING: u8 = 5;

const HIGH_THRESHOLD: u8 = 15;
const MEDIUM_THRESHOLD: u8 = 8;

/// Stable identifier for a row in a [`RiskMatrix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RiskId(pub u64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RiskError {
    #[error("a risk needs a description")]
    EmptyName,

    #[error("{field} must be between 1 and 5, got {value}")]
    RatingOutOfRange { field: &'static str, value: u8 },

    #[error("no risk with id {0:?}")]
    UnknownRisk(RiskId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: u8) -> Self {
        if score >= HIGH_THRESHOLD {
            RiskLevel::High
        } else if score >= MEDIUM_THRESHOLD {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

/// Values for a risk that has not been added yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRisk {
    pub name: String,
    pub probability: u8,
    pub impact: u8,
}

impl Default for NewRisk {
    fn default() -> Self {
        Self {
            name: String::new(),
            probability: 3,
            impact: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Risk {
    pub id: RiskId,
    pub name: String,
    pub probability: u8,
    pub impact: u8,
}

impl Risk {
    pub fn score(&self) -> u8 {
        self.probability.saturating_mul(self.impact)
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(self.score())
    }
}

/// Count of risks per cell. Row 0 is probability 5, column 0 is impact 1.
pub type HeatMap = [[usize; MAX_RATING as usize]; MAX_RATING as usize];

/// Editable list of rated risks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskMatrix {
    risks: Vec<Risk>,
    next_id: u64,
}

fn check_rating(
    field: &'static str,
    value: u8,
) -> Result<u8, RiskError> {
    if (MIN_RATING..=MAX_RATING).contains(&value) {
        Ok(value)
    } else {
        Err(RiskError::RatingOutOfRange { field, value })
    }
}

impl RiskMatrix {
    pub fn empty() -> Self {
        Self {
            risks: Vec::new(),
            next_id: 1,
        }
    }

    /// The five risks every course project starts with.
    pub fn seeded() -> Self {
        let mut matrix = Self::empty();
        for (name, probability, impact) in [
            ("Fierce competition in the market", 4, 4),
            ("Cash shortage and weakening finances", 3, 5),
            ("Production or supplier problems", 2, 4),
            ("Falling demand for the service", 2, 5),
            ("Staff turnover", 3, 3),
        ] {
            matrix.push(name.to_string(), probability, impact);
        }
        matrix
    }

    /// Builds a matrix from inputs, rejecting the first invalid one.
    pub fn from_inputs<I>(inputs: I) -> Result<Self, RiskError>
    where
        I: IntoIterator<Item = NewRisk>,
    {
        let mut matrix = Self::empty();
        for input in inputs {
            matrix.add(input)?;
        }
        Ok(matrix)
    }

    pub fn risks(&self) -> &[Risk] {
        &self.risks
    }

    pub fn len(&self) -> usize {
        self.risks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.risks.is_empty()
    }

    /// Appends a risk. The description is trimmed and must not be blank.
    pub fn add(
        &mut self,
        input: NewRisk,
    ) -> Result<RiskId, RiskError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(RiskError::EmptyName);
        }
        let probability = check_rating("probability", input.probability)?;
        let impact = check_rating("impact", input.impact)?;
        Ok(self.push(name.to_string(), probability, impact))
    }

    pub fn remove(
        &mut self,
        id: RiskId,
    ) -> Result<Risk, RiskError> {
        let index = self
            .risks
            .iter()
            .position(|r| r.id == id)
            .ok_or(RiskError::UnknownRisk(id))?;
        debug!(?id, "risk removed");
        Ok(self.risks.remove(index))
    }

    pub fn reset(&mut self) {
        *self = Self::seeded();
    }

    /// Risks on one cell of the grid.
    pub fn at(
        &self,
        probability: u8,
        impact: u8,
    ) -> impl Iterator<Item = &Risk> {
        self.risks
            .iter()
            .filter(move |r| r.probability == probability && r.impact == impact)
    }

    pub fn heat_map(&self) -> HeatMap {
        let mut map: HeatMap = Default::default();
        for risk in &self.risks {
            let row = usize::from(MAX_RATING - risk.probability);
            let column = usize::from(risk.impact - MIN_RATING);
            map[row][column] += 1;
        }
        map
    }

    pub fn count_at_level(
        &self,
        level: RiskLevel,
    ) -> usize {
        self.risks.iter().filter(|r| r.level() == level).count()
    }

    fn push(
        &mut self,
        name: String,
        probability: u8,
        impact: u8,
    ) -> RiskId {
        let id = RiskId(self.next_id);
        self.next_id += 1;
        self.risks.push(Risk {
            id,
            name,
            probability,
            impact,
        });
        debug!(?id, probability, impact, "risk added");
        id
    }
}

impl Default for RiskMatrix {
    fn default() -> Self {
        Self::seeded()
    }
}
