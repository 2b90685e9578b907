use std::fmt::Write as _;

use decoder_scoring::{PageDraft, PageField, PageOutcome, PageScore, PageSubmission, ScoringError};
use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::form::field_name;

const STYLESHEET: &str = "https://cdn.jsdelivr.net/npm/bootstrap@5.3.3/dist/css/bootstrap.min.css";

/// Everything one render of `/` needs
#[derive(Debug, Default)]
pub(crate) struct FormView<'a> {
    pub(crate) drafts: &'a [PageDraft],
    pub(crate) errors: &'a [ScoringError],
    pub(crate) notice: Option<&'a str>,
    /// Validated pages and their outcomes, present after a submit
    pub(crate) results: Option<(&'a [PageSubmission], &'a [PageOutcome])>,
}

pub(crate) fn render_page(view: &FormView<'_>) -> String {
    let mut groups = String::new();
    for (index, draft) in view.drafts.iter().enumerate() {
        groups.push_str(&page_group(index, draft));
    }

    let mut messages = String::new();
    if let Some(notice) = view.notice {
        let _ = write!(
            messages,
            r#"<div class="alert alert-info">{}</div>"#,
            encode_text(notice)
        );
    }
    if !view.errors.is_empty() {
        messages.push_str(r#"<div class="alert alert-danger"><ul class="mb-0">"#);
        for err in view.errors {
            let _ = write!(messages, "<li>{}</li>", encode_text(&err.to_string()));
        }
        messages.push_str("</ul></div>");
    }

    let results = match view.results {
        Some((pages, outcomes)) => results_panel(pages, outcomes),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Page Ranking Decoder</title>
<link rel="stylesheet" href="{STYLESHEET}">
</head>
<body>
<div class="container">
<div class="row">
<div class="col-4">
<h1>Page Ranking Decoder</h1>
<form method="post" action="/">
<button type="submit" name="action" value="add" class="btn btn-secondary">Add Page</button>
<div id="page-inputs-container">
{messages}{groups}</div>
<button type="submit" name="action" value="submit" class="btn btn-primary">Submit</button>
</form>
</div>
<div class="col-8">
<h2>Predicted Results</h2>
<div id="results">{results}</div>
</div>
</div>
</div>
</body>
</html>
"#
    )
}

fn page_group(index: usize, draft: &PageDraft) -> String {
    let mut html = format!(r#"<div class="page-group"><h3>Page {}</h3>"#, index + 1);
    for field in PageField::ALL {
        let name = field_name(field, index);
        let value = draft.get(field);
        let _ = write!(
            html,
            r#"<label for="{name}">{label}:</label>"#,
            label = encode_text(field.label())
        );
        match field {
            PageField::BodyText => {
                let _ = write!(
                    html,
                    r#"<textarea id="{name}" name="{name}" style="width: 100%; height: 200px">{}</textarea>"#,
                    encode_text(value)
                );
            }
            _ => {
                let kind = if field.is_numeric() { "number" } else { "text" };
                let _ = write!(
                    html,
                    r#"<input id="{name}" name="{name}" type="{kind}" value="{}">"#,
                    encode_double_quoted_attribute(value)
                );
            }
        }
    }
    html.push_str("</div>\n");
    html
}

fn results_panel(pages: &[PageSubmission], outcomes: &[PageOutcome]) -> String {
    if outcomes.is_empty() {
        return "<p>No pages to score. Use Add Page first.</p>".to_string();
    }

    let mut html = String::new();
    for (idx, (page, outcome)) in pages.iter().zip(outcomes).enumerate() {
        let _ = write!(html, "<h4>Page {} Results</h4>", idx + 1);
        match outcome {
            Ok(score) => html.push_str(&score_lines(score)),
            Err(err) => {
                let _ = write!(
                    html,
                    r#"<p class="text-danger">Page could not be scored: {}</p><p>Known Page Ranking Position: {}</p><p>Keyword for Ranking Prediction: {}</p>"#,
                    encode_text(&err.to_string()),
                    page.position,
                    encode_text(&page.keyword)
                );
            }
        }
    }
    html
}

fn score_lines(score: &PageScore) -> String {
    let features = &score.text_features;
    let mut html = String::new();
    let _ = write!(
        html,
        "<p>Relevance Score (R): {:.2}</p>\
         <p>TF-IDF Scores: {:.4} over {} terms</p>\
         <p>TF Scores: {}</p>\
         <p>Freshness Score (F_s): {:.2}</p>\
         <p>User Interaction Score (U): {:.2}</p>\
         <p>Final Ranking Score (F_r): {:.2}</p>\
         <p>Known Page Ranking Position: {}</p>\
         <p>Keyword for Ranking Prediction: {}</p>",
        score.relevance,
        features.tfidf_total,
        features.terms.len(),
        features.presence_total,
        score.freshness,
        score.interaction,
        score.final_score,
        score.position,
        encode_text(&score.keyword),
    );

    if !features.is_empty() {
        html.push_str(
            r#"<details><summary>Term weights</summary><table class="table table-sm"><tr><th>Term</th><th>TF-IDF</th><th>Fields</th></tr>"#,
        );
        for term in &features.terms {
            let _ = write!(
                html,
                "<tr><td>{}</td><td>{:.4}</td><td>{}</td></tr>",
                encode_text(&term.term),
                term.tfidf,
                term.presence
            );
        }
        html.push_str("</table></details>");
    }
    html
}
