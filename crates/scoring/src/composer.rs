use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoringError};
use crate::fuzzy::{count_occurrences, partial_ratio};
use crate::submission::PageSubmission;
use crate::text_features::TextFeatures;

/// Fixed coefficients of the ranking formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Relevance weights: T, H, P, B, M
    pub title: f64,
    pub headings: f64,
    pub first_paragraph: f64,
    pub body: f64,
    pub meta: f64,

    /// Numerator of the freshness score
    pub freshness_base: f64,

    /// Interaction weights: V, S, L, C
    pub views: f64,
    pub shares: f64,
    pub likes: f64,
    pub comments: f64,

    /// Blend weights: alpha, beta, gamma, delta
    pub relevance_weight: f64,
    pub constant_weight: f64,
    pub freshness_weight: f64,
    pub interaction_weight: f64,

    /// Personalisation offset added to every final score
    pub personalised: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            title: 5.0,
            headings: 3.0,
            first_paragraph: 4.0,
            body: 1.0,
            meta: 2.0,
            freshness_base: 100.0,
            views: 0.1,
            shares: 0.2,
            likes: 0.3,
            comments: 0.4,
            relevance_weight: 0.4,
            constant_weight: 0.3,
            freshness_weight: 0.2,
            interaction_weight: 0.1,
            personalised: 5.0,
        }
    }
}

impl ScoringWeights {
    /// `R = T·k_t + H·k_h + P·k_p + B·k_b + M·k_m`
    #[must_use]
    pub fn relevance(&self, k: &RelevanceBreakdown) -> f64 {
        self.title * f64::from(k.title)
            + self.headings * f64::from(k.headings)
            + self.first_paragraph * f64::from(k.first_paragraph)
            + self.body * k.body_occurrences as f64
            + self.meta * f64::from(k.meta)
    }

    /// `F_s = 100 / age`
    pub fn freshness(&self, age_days: u64) -> Result<f64> {
        if age_days == 0 {
            return Err(ScoringError::ZeroAge);
        }
        Ok(self.freshness_base / age_days as f64)
    }

    /// `U = V·views + S·shares + L·likes + C·comments`
    #[must_use]
    pub fn interaction(&self, views: u64, shares: u64, likes: u64, comments: u64) -> f64 {
        self.views * views as f64
            + self.shares * shares as f64
            + self.likes * likes as f64
            + self.comments * comments as f64
    }

    /// `F_r = α·R + β·1 + γ·F_s + δ·U + personalised`
    #[must_use]
    pub fn blend(&self, relevance: f64, freshness: f64, interaction: f64) -> f64 {
        // β multiplies a constant 1, never an input
        self.relevance_weight * relevance
            + self.constant_weight * 1.0
            + self.freshness_weight * freshness
            + self.interaction_weight * interaction
            + self.personalised
    }
}

/// Keyword match inputs of the relevance score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelevanceBreakdown {
    /// k_t: partial ratio against the title
    pub title: u8,
    /// k_h: partial ratio against the headings
    pub headings: u8,
    /// k_p: partial ratio against the first paragraph
    pub first_paragraph: u8,
    /// k_b: literal occurrences in the body text
    pub body_occurrences: u64,
    /// k_m: always 1
    pub meta: u8,
}

impl RelevanceBreakdown {
    #[must_use]
    pub fn measure(page: &PageSubmission) -> Self {
        let keyword = page.keyword.as_str();
        Self {
            title: partial_ratio(&page.title, keyword),
            headings: partial_ratio(&page.headings, keyword),
            first_paragraph: partial_ratio(&page.first_paragraph, keyword),
            body_occurrences: count_occurrences(&page.body_text, keyword),
            meta: 1,
        }
    }
}

/// Scored page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageScore {
    /// R
    pub relevance: f64,
    /// F_s
    pub freshness: f64,
    /// U
    pub interaction: f64,
    /// F_r
    pub final_score: f64,
    pub position: i64,
    pub keyword: String,
    pub breakdown: RelevanceBreakdown,
    pub text_features: TextFeatures,
}

/// Result for one page of a batch; an error never hides the other pages
pub type PageOutcome = Result<PageScore>;

/// Scores validated pages with a fixed set of weights
#[derive(Debug, Clone, Default)]
pub struct ScoreComposer {
    weights: ScoringWeights,
}

impl ScoreComposer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_weights(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    pub fn score(&self, page: &PageSubmission) -> Result<PageScore> {
        let freshness = self.weights.freshness(page.age_days)?;
        let breakdown = RelevanceBreakdown::measure(page);
        let relevance = self.weights.relevance(&breakdown);
        let interaction =
            self.weights
                .interaction(page.views, page.shares, page.likes, page.comments);
        let final_score = self.weights.blend(relevance, freshness, interaction);

        Ok(PageScore {
            relevance,
            freshness,
            interaction,
            final_score,
            position: page.position,
            keyword: page.keyword.clone(),
            breakdown,
            text_features: TextFeatures::extract(&page.text_fields()),
        })
    }

    /// Score every page in submission order
    pub fn score_all(&self, pages: &[PageSubmission]) -> Vec<PageOutcome> {
        pages
            .iter()
            .enumerate()
            .map(|(idx, page)| {
                let outcome = self.score(page);
                match &outcome {
                    Ok(score) => log::debug!(
                        "page {}: R={:.2} F_s={:.2} U={:.2} F_r={:.2}",
                        idx + 1,
                        score.relevance,
                        score.freshness,
                        score.interaction,
                        score.final_score
                    ),
                    Err(err) => log::debug!("page {} not scored: {err}", idx + 1),
                }
                outcome
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn freshness_is_100_over_age() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.freshness(1).unwrap(), 100.0);
        assert_eq!(weights.freshness(10).unwrap(), 10.0);
        assert_eq!(weights.freshness(3).unwrap(), 100.0 / 3.0);
    }

    #[test]
    fn zero_age_is_an_error_not_a_panic() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.freshness(0), Err(ScoringError::ZeroAge));

        let page = PageSubmission::default();
        assert_eq!(ScoreComposer::new().score(&page), Err(ScoringError::ZeroAge));
    }

    #[test]
    fn interaction_coefficients() {
        let weights = ScoringWeights::default();
        assert!(close(weights.interaction(10, 0, 0, 0), 1.0));
        assert!(close(weights.interaction(0, 10, 0, 0), 2.0));
        assert!(close(weights.interaction(0, 0, 10, 0), 3.0));
        assert!(close(weights.interaction(0, 0, 0, 10), 4.0));
    }

    #[test]
    fn relevance_weights() {
        let weights = ScoringWeights::default();
        let k = RelevanceBreakdown {
            title: 100,
            headings: 50,
            first_paragraph: 10,
            body_occurrences: 7,
            meta: 1,
        };
        assert!(close(weights.relevance(&k), 500.0 + 150.0 + 40.0 + 7.0 + 2.0));
    }

    #[test]
    fn blend_keeps_the_constant_term() {
        let weights = ScoringWeights::default();
        assert!(close(weights.blend(0.0, 0.0, 0.0), 0.3 + 5.0));
    }

    #[test]
    fn empty_keyword_only_scores_the_meta_term() {
        let page = PageSubmission {
            title: "Anything".to_string(),
            body_text: "text text".to_string(),
            age_days: 1,
            ..PageSubmission::default()
        };
        let score = ScoreComposer::new().score(&page).unwrap();
        assert_eq!(score.breakdown.title, 0);
        assert_eq!(score.breakdown.body_occurrences, 0);
        assert!(close(score.relevance, 2.0));
    }

    #[test]
    fn batch_keeps_order_and_isolates_errors() {
        let ok = PageSubmission {
            age_days: 4,
            position: 1,
            ..PageSubmission::default()
        };
        let stale = PageSubmission {
            position: 2,
            ..PageSubmission::default()
        };
        let outcomes = ScoreComposer::new().score_all(&[ok, stale, PageSubmission {
            age_days: 2,
            position: 3,
            ..PageSubmission::default()
        }]);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].as_ref().unwrap().position, 1);
        assert_eq!(outcomes[1], Err(ScoringError::ZeroAge));
        assert_eq!(outcomes[2].as_ref().unwrap().freshness, 50.0);
    }
}
