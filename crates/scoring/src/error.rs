use thiserror::Error;

/// Result type for scoring operations
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors that can occur while validating or scoring a page
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScoringError {
    /// Freshness is `100 / age`, so an age of zero days has no score
    #[error("Age of the page must be at least 1 day (got 0); freshness is undefined")]
    ZeroAge,

    /// A form or request field could not be turned into a valid value
    #[error("Page {page}, {field}: {reason}")]
    InvalidField {
        /// 1-indexed page number as shown to the user
        page: usize,
        field: &'static str,
        reason: String,
    },
}

impl ScoringError {
    /// Create an invalid field error
    pub fn invalid_field(page: usize, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            page,
            field,
            reason: reason.into(),
        }
    }

    /// Stable machine-readable code for JSON envelopes
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::ZeroAge => "zero_age",
            Self::InvalidField { .. } => "invalid_field",
        }
    }
}
