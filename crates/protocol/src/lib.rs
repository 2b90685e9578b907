use anyhow::Result;
use decoder_scoring::{PageOutcome, PageScore, PageSubmission, ScoringError};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const SCORE_API_VERSION: u32 = 1;

/// One page as sent to `POST /api/score` or the `score` command
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
#[serde(default, deny_unknown_fields)]
pub struct PageInput {
    pub title: String,
    pub headings: String,
    pub first_paragraph: String,
    pub body_text: String,
    pub views: u64,
    pub shares: u64,
    pub likes: u64,
    pub comments: u64,
    pub position: i64,
    /// Age of the page in days; must be at least 1 to be scored
    #[serde(alias = "age")]
    pub age_days: u64,
    pub keyword: String,
}

impl From<PageInput> for PageSubmission {
    fn from(input: PageInput) -> Self {
        Self {
            title: input.title,
            headings: input.headings,
            first_paragraph: input.first_paragraph,
            body_text: input.body_text,
            views: input.views,
            shares: input.shares,
            likes: input.likes,
            comments: input.comments,
            position: input.position,
            age_days: input.age_days,
            keyword: input.keyword,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq, JsonSchema)]
pub struct ScoreRequest {
    pub pages: Vec<PageInput>,
}

impl ScoreRequest {
    #[must_use]
    pub fn into_submissions(self) -> Vec<PageSubmission> {
        self.pages.into_iter().map(PageSubmission::from).collect()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    Error,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, JsonSchema)]
pub struct ErrorEnvelope {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorEnvelope {
    #[must_use]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let hint = hint_for(&code).map(str::to_string);
        Self {
            code,
            message: message.into(),
            hint,
        }
    }
}

impl From<&ScoringError> for ErrorEnvelope {
    fn from(err: &ScoringError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

fn hint_for(code: &str) -> Option<&'static str> {
    match code {
        "invalid_request" => Some(
            "Send JSON shaped like {\"pages\": [{\"title\": ..., \"age_days\": 10, ...}]}; counts must be non-negative integers.",
        ),
        "zero_age" => Some("Set the age of the page to 1 day or more."),
        "invalid_field" => Some("Numeric fields accept whole numbers only."),
        _ => None,
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct RelevanceReport {
    pub title_ratio: u8,
    pub headings_ratio: u8,
    pub first_paragraph_ratio: u8,
    pub body_occurrences: u64,
    pub meta: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct TermReport {
    pub term: String,
    pub tfidf: f64,
    pub presence: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ScoreReport {
    pub relevance: f64,
    pub freshness: f64,
    pub interaction: f64,
    pub final_score: f64,
    pub position: i64,
    pub keyword: String,
    pub breakdown: RelevanceReport,
    pub tfidf_total: f64,
    pub presence_total: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub terms: Vec<TermReport>,
}

impl From<&PageScore> for ScoreReport {
    fn from(score: &PageScore) -> Self {
        Self {
            relevance: score.relevance,
            freshness: score.freshness,
            interaction: score.interaction,
            final_score: score.final_score,
            position: score.position,
            keyword: score.keyword.clone(),
            breakdown: RelevanceReport {
                title_ratio: score.breakdown.title,
                headings_ratio: score.breakdown.headings,
                first_paragraph_ratio: score.breakdown.first_paragraph,
                body_occurrences: score.breakdown.body_occurrences,
                meta: score.breakdown.meta,
            },
            tfidf_total: score.text_features.tfidf_total,
            presence_total: score.text_features.presence_total,
            terms: score
                .text_features
                .terms
                .iter()
                .map(|t| TermReport {
                    term: t.term.clone(),
                    tfidf: t.tfidf,
                    presence: t.presence,
                })
                .collect(),
        }
    }
}

/// Either a score or the reason the page could not be scored
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct PageResult {
    /// 1-indexed position in the request
    pub page: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct ScoreResponse {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorEnvelope>,
    #[serde(default)]
    pub results: Vec<PageResult>,
}

impl ScoreResponse {
    /// Per-page errors keep the response `ok`; only a rejected request is an error
    #[must_use]
    pub fn from_outcomes(outcomes: &[PageOutcome]) -> Self {
        let results = outcomes
            .iter()
            .enumerate()
            .map(|(idx, outcome)| match outcome {
                Ok(score) => PageResult {
                    page: idx + 1,
                    score: Some(ScoreReport::from(score)),
                    error: None,
                },
                Err(err) => PageResult {
                    page: idx + 1,
                    score: None,
                    error: Some(ErrorEnvelope::from(err)),
                },
            })
            .collect();
        Self {
            status: ResponseStatus::Ok,
            error: None,
            results,
        }
    }

    #[must_use]
    pub fn rejected(error: ErrorEnvelope) -> Self {
        Self {
            status: ResponseStatus::Error,
            error: Some(error),
            results: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.status, ResponseStatus::Error)
    }
}

/// JSON schema of [`ScoreRequest`]
pub fn request_schema() -> Result<serde_json::Value> {
    Ok(serde_json::to_value(schemars::schema_for!(ScoreRequest))?)
}

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}
