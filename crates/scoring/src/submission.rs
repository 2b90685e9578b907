use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// One page as entered in the form, after boundary validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSubmission {
    pub title: String,
    pub headings: String,
    pub first_paragraph: String,
    pub body_text: String,

    pub views: u64,
    pub shares: u64,
    pub likes: u64,
    pub comments: u64,

    /// Known ranking position, shown back to the user untouched
    pub position: i64,

    /// Age of the page in days; zero is accepted here and rejected by the composer
    pub age_days: u64,

    /// Keyword the relevance score is computed against
    pub keyword: String,
}

impl PageSubmission {
    /// The four text fields in corpus order: title, headings, first paragraph, body
    #[must_use]
    pub fn text_fields(&self) -> [&str; 4] {
        [
            self.title.as_str(),
            self.headings.as_str(),
            self.first_paragraph.as_str(),
            self.body_text.as_str(),
        ]
    }
}

/// The eleven inputs of a page group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PageField {
    Title,
    Headings,
    FirstParagraph,
    BodyText,
    Views,
    Shares,
    Likes,
    Comments,
    Position,
    Age,
    Keyword,
}

impl PageField {
    /// Form order
    pub const ALL: [PageField; 11] = [
        PageField::Title,
        PageField::Headings,
        PageField::FirstParagraph,
        PageField::BodyText,
        PageField::Views,
        PageField::Shares,
        PageField::Likes,
        PageField::Comments,
        PageField::Position,
        PageField::Age,
        PageField::Keyword,
    ];

    /// Stable field key used in form names and JSON
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            PageField::Title => "title",
            PageField::Headings => "headings",
            PageField::FirstParagraph => "first_paragraph",
            PageField::BodyText => "body_text",
            PageField::Views => "views",
            PageField::Shares => "shares",
            PageField::Likes => "likes",
            PageField::Comments => "comments",
            PageField::Position => "position",
            PageField::Age => "age",
            PageField::Keyword => "keyword",
        }
    }

    /// Human label shown next to the input
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PageField::Title => "Title",
            PageField::Headings => "Headings",
            PageField::FirstParagraph => "First Paragraph",
            PageField::BodyText => "Body Text",
            PageField::Views => "Views",
            PageField::Shares => "Shares",
            PageField::Likes => "Likes",
            PageField::Comments => "Comments",
            PageField::Position => "Known Page Ranking Position",
            PageField::Age => "Age of the Page (days)",
            PageField::Keyword => "Keyword for Ranking Prediction",
        }
    }

    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            PageField::Views
                | PageField::Shares
                | PageField::Likes
                | PageField::Comments
                | PageField::Position
                | PageField::Age
        )
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }
}

/// Raw, unvalidated values of one page group.
///
/// Numeric fields are kept as typed so the form can be re-rendered with exactly
/// what the user entered when validation fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageDraft {
    values: BTreeMap<PageField, String>,
}

impl PageDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: PageField, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Current value; untouched numeric fields read as "0" like a fresh form
    #[must_use]
    pub fn get(&self, field: PageField) -> &str {
        match self.values.get(&field) {
            Some(value) => value.as_str(),
            None if field.is_numeric() => "0",
            None => "",
        }
    }

    /// Validate every field, collecting all problems instead of stopping at the first.
    ///
    /// `page` is the 1-indexed page number used in error messages.
    pub fn validate(&self, page: usize) -> Result<PageSubmission, Vec<ScoringError>> {
        let mut errors = Vec::new();
        let mut count = |field: PageField| -> u64 {
            parse_count(self.get(field))
                .map_err(|reason| errors.push(ScoringError::invalid_field(page, field.label(), reason)))
                .unwrap_or_default()
        };

        let views = count(PageField::Views);
        let shares = count(PageField::Shares);
        let likes = count(PageField::Likes);
        let comments = count(PageField::Comments);
        let age_days = count(PageField::Age);

        let position = parse_position(self.get(PageField::Position))
            .map_err(|reason| {
                errors.push(ScoringError::invalid_field(
                    page,
                    PageField::Position.label(),
                    reason,
                ))
            })
            .unwrap_or_default();

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(PageSubmission {
            title: self.get(PageField::Title).to_string(),
            headings: self.get(PageField::Headings).to_string(),
            first_paragraph: self.get(PageField::FirstParagraph).to_string(),
            body_text: self.get(PageField::BodyText).to_string(),
            views,
            shares,
            likes,
            comments,
            position,
            age_days,
            keyword: self.get(PageField::Keyword).to_string(),
        })
    }
}

impl From<&PageSubmission> for PageDraft {
    fn from(page: &PageSubmission) -> Self {
        let mut draft = Self::new();
        draft.set(PageField::Title, page.title.as_str());
        draft.set(PageField::Headings, page.headings.as_str());
        draft.set(PageField::FirstParagraph, page.first_paragraph.as_str());
        draft.set(PageField::BodyText, page.body_text.as_str());
        draft.set(PageField::Views, page.views.to_string());
        draft.set(PageField::Shares, page.shares.to_string());
        draft.set(PageField::Likes, page.likes.to_string());
        draft.set(PageField::Comments, page.comments.to_string());
        draft.set(PageField::Position, page.position.to_string());
        draft.set(PageField::Age, page.age_days.to_string());
        draft.set(PageField::Keyword, page.keyword.as_str());
        draft
    }
}

fn parse_count(raw: &str) -> Result<u64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }
    if raw.starts_with('-') && is_integer_literal(raw) {
        return Err(format!("must not be negative (got {raw})"));
    }
    Err(not_a_whole_number(raw))
}

fn parse_position(raw: &str) -> Result<i64, String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse::<i64>().map_err(|_| not_a_whole_number(raw))
}

fn not_a_whole_number(raw: &str) -> String {
    if is_integer_literal(raw) {
        format!("is too large (got {raw})")
    } else if raw.parse::<f64>().is_ok() {
        format!("must be a whole number (got {raw})")
    } else {
        format!("must be a number (got {raw:?})")
    }
}

fn is_integer_literal(raw: &str) -> bool {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn fresh_draft_reads_like_an_empty_form() {
        let draft = PageDraft::new();
        assert_eq!(draft.get(PageField::Title), "");
        assert_eq!(draft.get(PageField::Views), "0");

        let page = draft.validate(1).unwrap();
        assert_eq!(page, PageSubmission::default());
    }

    #[test]
    fn blank_numeric_inputs_default_to_zero() {
        let mut draft = PageDraft::new();
        draft.set(PageField::Likes, "   ");
        draft.set(PageField::Age, "");
        let page = draft.validate(1).unwrap();
        assert_eq!(page.likes, 0);
        assert_eq!(page.age_days, 0);
    }

    #[test]
    fn validation_collects_every_bad_field() {
        let mut draft = PageDraft::new();
        draft.set(PageField::Views, "abc");
        draft.set(PageField::Shares, "-3");
        draft.set(PageField::Position, "2.5");
        draft.set(PageField::Age, "7");

        let errors = draft.validate(2).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors[0].to_string(),
            "Page 2, Views: must be a number (got \"abc\")"
        );
        assert_eq!(
            errors[1].to_string(),
            "Page 2, Shares: must not be negative (got -3)"
        );
        assert_eq!(
            errors[2].to_string(),
            "Page 2, Known Page Ranking Position: must be a whole number (got 2.5)"
        );
    }

    #[test]
    fn overflowing_integers_are_too_large() {
        let mut draft = PageDraft::new();
        draft.set(PageField::Views, "99999999999999999999");
        draft.set(PageField::Likes, "-99999999999999999999");
        draft.set(PageField::Position, "99999999999999999999");

        let errors = draft.validate(1).unwrap_err();
        let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            vec![
                "Page 1, Views: is too large (got 99999999999999999999)",
                "Page 1, Likes: must not be negative (got -99999999999999999999)",
                "Page 1, Known Page Ranking Position: is too large (got 99999999999999999999)",
            ]
        );
    }

    #[test]
    fn negative_position_is_allowed() {
        let mut draft = PageDraft::new();
        draft.set(PageField::Position, " -4 ");
        assert_eq!(draft.validate(1).unwrap().position, -4);
    }

    #[test]
    fn draft_round_trips_a_submission() {
        let page = PageSubmission {
            title: "SEO Tips".to_string(),
            views: 12,
            position: 3,
            age_days: 9,
            keyword: "seo".to_string(),
            ..PageSubmission::default()
        };
        assert_eq!(PageDraft::from(&page).validate(1).unwrap(), page);
    }

    #[test]
    fn field_keys_resolve_back() {
        for field in PageField::ALL {
            assert_eq!(PageField::from_key(field.key()), Some(field));
        }
        assert_eq!(PageField::from_key("bogus"), None);
    }
}
