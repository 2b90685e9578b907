use std::collections::BTreeMap;

use ndarray::{Array2, Axis};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Words of two or more word characters
static TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("token pattern must compile"));

/// Summed TF-IDF weight and presence of one vocabulary term across the fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TermWeight {
    pub term: String,

    /// Sum of the term's L2-normalised TF-IDF weights over all fields
    pub tfidf: f64,

    /// Number of fields that contain the term
    pub presence: usize,
}

/// TF-IDF summary of a page whose text fields form a tiny corpus.
///
/// Informational only: none of these values feed the ranking score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextFeatures {
    /// Vocabulary in lexicographic order
    pub terms: Vec<TermWeight>,
    pub tfidf_total: f64,
    pub presence_total: usize,
}

impl TextFeatures {
    /// Treat every entry of `documents` as its own document.
    ///
    /// Uses smoothed idf `ln((1 + n) / (1 + df)) + 1` and raw term counts, with each
    /// document row L2-normalised. A corpus without a single token yields the
    /// empty summary.
    #[must_use]
    pub fn extract(documents: &[&str]) -> Self {
        let tokenized: Vec<Vec<String>> = documents.iter().map(|doc| tokenize(doc)).collect();

        let mut vocabulary: BTreeMap<&str, usize> = BTreeMap::new();
        for token in tokenized.iter().flatten() {
            vocabulary.entry(token.as_str()).or_insert(0);
        }
        if vocabulary.is_empty() {
            return Self::default();
        }
        for (column, slot) in vocabulary.values_mut().enumerate() {
            *slot = column;
        }

        let mut matrix = Array2::<f64>::zeros((documents.len(), vocabulary.len()));
        for (row, tokens) in tokenized.iter().enumerate() {
            for token in tokens {
                matrix[[row, vocabulary[token.as_str()]]] += 1.0;
            }
        }

        let n_docs = documents.len() as f64;
        for mut column in matrix.columns_mut() {
            let df = column.iter().filter(|count| **count > 0.0).count() as f64;
            let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
            column.mapv_inplace(|tf| tf * idf);
        }

        for mut row in matrix.rows_mut() {
            let norm = row.dot(&row).sqrt();
            if norm > 0.0 {
                row.mapv_inplace(|weight| weight / norm);
            }
        }

        let sums = matrix.sum_axis(Axis(0));
        let terms: Vec<TermWeight> = vocabulary
            .iter()
            .map(|(term, &column)| TermWeight {
                term: (*term).to_string(),
                tfidf: sums[column],
                presence: matrix
                    .column(column)
                    .iter()
                    .filter(|weight| **weight > 0.0)
                    .count(),
            })
            .collect();

        Self {
            tfidf_total: terms.iter().map(|t| t.tfidf).sum(),
            presence_total: terms.iter().map(|t| t.presence).sum(),
            terms,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_RE
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}
