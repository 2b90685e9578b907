//! # Decoder Scoring
//!
//! Heuristic ranking score for a single web page.
//!
//! ## Formula
//!
//! ```text
//! R   = 5·k_t + 3·k_h + 4·k_p + 1·k_b + 2·k_m
//! F_s = 100 / age
//! U   = 0.1·views + 0.2·shares + 0.3·likes + 0.4·comments
//! F_r = 0.4·R + 0.3·1 + 0.2·F_s + 0.1·U + 5.0
//! ```
//!
//! `k_t`, `k_h` and `k_p` are fuzzy partial ratios of the keyword against the
//! title, headings and first paragraph; `k_b` counts the keyword in the body.
//! TF-IDF features over the four text fields are reported alongside but never
//! enter the score.
//!
//! ## Example
//!
//! ```rust
//! use decoder_scoring::{PageSubmission, ScoreComposer};
//!
//! let page = PageSubmission {
//!     title: "SEO Tips".to_string(),
//!     body_text: "seo seo tips".to_string(),
//!     age_days: 10,
//!     keyword: "seo".to_string(),
//!     ..PageSubmission::default()
//! };
//! let score = ScoreComposer::new().score(&page).unwrap();
//! assert_eq!(score.freshness, 10.0);
//! ```

mod composer;
mod error;
mod fuzzy;
mod submission;
mod text_features;

pub use composer::{PageOutcome, PageScore, RelevanceBreakdown, ScoreComposer, ScoringWeights};
pub use error::{Result, ScoringError};
pub use fuzzy::{count_occurrences, partial_ratio};
pub use submission::{PageDraft, PageField, PageSubmission};
pub use text_features::{TermWeight, TextFeatures};
