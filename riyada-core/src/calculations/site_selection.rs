//! Weighted scoring of two candidate sites.
//!
//! Every criterion carries an importance weight from 1 to 5. Each site is
//! scored 0 to 5 against every criterion, and a site's total is the sum of
//! `score × weight`. The site with the higher total is preferred. Equal
//! totals prefer neither.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MIN_WEIGHT: u8 = 1;
pub const MAX_WEIGHT: u8 = 5;
pub const MAX_SITE_SCORE: u8 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SiteSelectionError {
    #[error("criterion {index} is out of range (matrix has {len} criteria)")]
    CriterionOutOfRange { index: usize, len: usize },

    #[error("weight must be between 1 and 5, got {0}")]
    WeightOutOfRange(u8),

    #[error("site score must be between 0 and 5, got {0}")]
    ScoreOutOfRange(u8),

    #[error("a criterion needs a name")]
    EmptyName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Site {
    A,
    B,
}

impl Site {
    pub fn label(&self) -> &'static str {
        match self {
            Site::A => "Site A",
            Site::B => "Site B",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Criterion {
    pub name: String,
    pub weight: u8,
    pub score_a: u8,
    pub score_b: u8,
}

impl Criterion {
    pub fn score(
        &self,
        site: Site,
    ) -> u8 {
        match site {
            Site::A => self.score_a,
            Site::B => self.score_b,
        }
    }

    pub fn weighted(
        &self,
        site: Site,
    ) -> u32 {
        u32::from(self.score(site)) * u32::from(self.weight)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteComparison {
    pub total_a: u32,
    pub total_b: u32,
    /// `None` when the totals are equal.
    pub preferred: Option<Site>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMatrix {
    criteria: Vec<Criterion>,
}

fn check_score(score: u8) -> Result<u8, SiteSelectionError> {
    if score <= MAX_SITE_SCORE {
        Ok(score)
    } else {
        Err(SiteSelectionError::ScoreOutOfRange(score))
    }
}

impl SiteMatrix {
    /// The five location criteria from the operations lesson, unscored.
    pub fn seeded() -> Self {
        let criteria = [
            ("Close to the target market", 5),
            ("Roads and transport links", 4),
            ("Close to where workers live", 3),
            ("Utilities (power, water, internet)", 5),
            ("Rent", 4),
        ]
        .into_iter()
        .map(|(name, weight)| Criterion {
            name: name.to_string(),
            weight,
            score_a: 0,
            score_b: 0,
        })
        .collect();
        Self { criteria }
    }

    /// Builds a matrix from custom criteria, validating every row.
    pub fn with_criteria(criteria: Vec<Criterion>) -> Result<Self, SiteSelectionError> {
        for criterion in &criteria {
            if criterion.name.trim().is_empty() {
                return Err(SiteSelectionError::EmptyName);
            }
            if !(MIN_WEIGHT..=MAX_WEIGHT).contains(&criterion.weight) {
                return Err(SiteSelectionError::WeightOutOfRange(criterion.weight));
            }
            check_score(criterion.score_a)?;
            check_score(criterion.score_b)?;
        }
        Ok(Self { criteria })
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }

    pub fn set_score(
        &mut self,
        index: usize,
        site: Site,
        score: u8,
    ) -> Result<(), SiteSelectionError> {
        let len = self.criteria.len();
        let criterion = self
            .criteria
            .get_mut(index)
            .ok_or(SiteSelectionError::CriterionOutOfRange { index, len })?;
        let score = check_score(score)?;
        match site {
            Site::A => criterion.score_a = score,
            Site::B => criterion.score_b = score,
        }
        Ok(())
    }

    /// Scores one site against every criterion in order. Extra scores are
    /// an error; missing ones leave the criterion unchanged.
    pub fn score_site(
        &mut self,
        site: Site,
        scores: &[u8],
    ) -> Result<(), SiteSelectionError> {
        for (index, score) in scores.iter().enumerate() {
            self.set_score(index, site, *score)?;
        }
        Ok(())
    }

    pub fn total(
        &self,
        site: Site,
    ) -> u32 {
        self.criteria.iter().map(|c| c.weighted(site)).sum()
    }

    pub fn compare(&self) -> SiteComparison {
        let total_a = self.total(Site::A);
        let total_b = self.total(Site::B);
        let preferred = match total_a.cmp(&total_b) {
            std::cmp::Ordering::Greater => Some(Site::A),
            std::cmp::Ordering::Less => Some(Site::B),
            std::cmp::Ordering::Equal => None,
        };
        SiteComparison {
            total_a,
            total_b,
            preferred,
        }
    }

    /// Clears every score back to 0.
    pub fn reset(&mut self) {
        for criterion in &mut self.criteria {
            criterion.score_a = 0;
            criterion.score_b = 0;
        }
    }
}

impl Default for SiteMatrix {
    fn default() -> Self {
        Self::seeded()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn unscored_seed_is_a_tie_at_zero() {
        let comparison = SiteMatrix::seeded().compare();

        assert_eq!(
            comparison,
            SiteComparison {
                total_a: 0,
                total_b: 0,
                preferred: None,
            }
        );
    }

    #[test]
    fn totals_weight_each_score() {
        let mut matrix = SiteMatrix::seeded();
        matrix.score_site(Site::A, &[4, 3, 5, 2, 1]).unwrap();
        matrix.score_site(Site::B, &[3, 4, 2, 5, 4]).unwrap();

        let comparison = matrix.compare();

        // A: 4*5 + 3*4 + 5*3 + 2*5 + 1*4 = 61
        // B: 3*5 + 4*4 + 2*3 + 5*5 + 4*4 = 78
        assert_eq!(comparison.total_a, 61);
        assert_eq!(comparison.total_b, 78);
        assert_eq!(comparison.preferred, Some(Site::B));
    }

    #[test]
    fn higher_total_for_a_prefers_a() {
        let mut matrix = SiteMatrix::seeded();

        matrix.set_score(0, Site::A, 1).unwrap();

        assert_eq!(matrix.compare().preferred, Some(Site::A));
        assert_eq!(matrix.total(Site::A), 5);
    }

    #[test]
    fn scores_above_five_are_rejected() {
        let mut matrix = SiteMatrix::seeded();

        assert_eq!(
            matrix.set_score(1, Site::B, 6),
            Err(SiteSelectionError::ScoreOutOfRange(6))
        );
        assert_eq!(matrix.criteria()[1].score_b, 0);
    }

    #[test]
    fn too_many_scores_is_an_error() {
        let mut matrix = SiteMatrix::seeded();

        let result = matrix.score_site(Site::A, &[1, 1, 1, 1, 1, 1]);

        assert_eq!(
            result,
            Err(SiteSelectionError::CriterionOutOfRange { index: 5, len: 5 })
        );
    }

    #[test]
    fn custom_criteria_are_validated() {
        let criterion = |name: &str, weight| Criterion {
            name: name.to_string(),
            weight,
            score_a: 0,
            score_b: 0,
        };

        assert_eq!(
            SiteMatrix::with_criteria(vec![criterion("Parking", 0)]),
            Err(SiteSelectionError::WeightOutOfRange(0))
        );
        assert_eq!(
            SiteMatrix::with_criteria(vec![criterion(" ", 3)]),
            Err(SiteSelectionError::EmptyName)
        );
        assert!(SiteMatrix::with_criteria(vec![criterion("Parking", 2)]).is_ok());
    }

    #[test]
    fn reset_clears_scores_but_keeps_criteria() {
        let mut matrix = SiteMatrix::seeded();
        matrix.score_site(Site::A, &[5, 5]).unwrap();

        matrix.reset();

        assert_eq!(matrix, SiteMatrix::seeded());
    }
}
