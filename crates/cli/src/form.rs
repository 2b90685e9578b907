use std::collections::BTreeMap;

use decoder_scoring::{PageDraft, PageField, PageSubmission, ScoringError};

/// Button pressed to post the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormAction {
    AddPage,
    Submit,
}

impl FormAction {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "add" => Some(Self::AddPage),
            "submit" => Some(Self::Submit),
            _ => None,
        }
    }
}

/// Page groups decoded from a urlencoded form post, in index order
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FormState {
    pub(crate) action: FormAction,
    pub(crate) drafts: Vec<PageDraft>,
}

impl FormState {
    /// Decode `<field>-<index>` pairs. Unknown names are ignored.
    pub(crate) fn from_fields(fields: &[(String, String)]) -> Self {
        let mut action = FormAction::Submit;
        let mut groups: BTreeMap<usize, PageDraft> = BTreeMap::new();

        for (name, value) in fields {
            if name == "action" {
                if let Some(parsed) = FormAction::parse(value) {
                    action = parsed;
                }
                continue;
            }
            let Some((field, index)) = parse_field_name(name) else {
                log::debug!("ignoring unknown form field {name:?}");
                continue;
            };
            groups.entry(index).or_default().set(field, value.as_str());
        }

        let drafts: Vec<PageDraft> = groups.into_values().collect();
        Self { action, drafts }
    }

    /// Drop groups past `max_pages`; true when any were dropped
    pub(crate) fn truncate_to(&mut self, max_pages: usize) -> bool {
        let over = self.drafts.len() > max_pages;
        self.drafts.truncate(max_pages);
        over
    }

    /// Append an empty group; false when the page limit is reached
    pub(crate) fn add_page(&mut self, max_pages: usize) -> bool {
        if self.drafts.len() >= max_pages {
            return false;
        }
        self.drafts.push(PageDraft::new());
        true
    }

    /// Validate every group; all field errors are returned together
    pub(crate) fn validate(&self) -> Result<Vec<PageSubmission>, Vec<ScoringError>> {
        let mut pages = Vec::with_capacity(self.drafts.len());
        let mut errors = Vec::new();
        for (idx, draft) in self.drafts.iter().enumerate() {
            match draft.validate(idx + 1) {
                Ok(page) => pages.push(page),
                Err(mut page_errors) => errors.append(&mut page_errors),
            }
        }
        if errors.is_empty() {
            Ok(pages)
        } else {
            Err(errors)
        }
    }
}

/// Form input name of a field in group `index`
pub(crate) fn field_name(field: PageField, index: usize) -> String {
    format!("{}-{index}", field.key())
}

fn parse_field_name(name: &str) -> Option<(PageField, usize)> {
    let (key, index) = name.rsplit_once('-')?;
    let field = PageField::from_key(key)?;
    let index = index.parse().ok()?;
    Some((field, index))
}
