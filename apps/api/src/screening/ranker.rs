//! Ranking orchestrator. Scores every resume against one JD and sorts the results.
//!
//! Per-document problems never abort the batch. Each document resolves to a
//! [`DocumentOutcome`]; skipped documents are logged and reported separately.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::errors::AppError;
use crate::screening::normalizer::normalize;
use crate::screening::vectorizer::try_similarity;

/// Batch cap enforced before any processing starts.
pub const DEFAULT_MAX_DOCUMENTS: usize = 10;

// ────────────────────────────────────────────────────────────────────────────
// Data model
// ────────────────────────────────────────────────────────────────────────────

/// A candidate document: opaque identifier (usually the file name) plus raw text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub text: String,
}

/// Anything other than a JSON string (null, numbers, objects) reads as no text.
fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

impl Document {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub id: String,
    pub score: f64, // 0.0 to 1.0
}

/// Results sorted by score descending; equal scores keep input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RankedList(Vec<SimilarityResult>);

#[cfg_attr(not(test), allow(dead_code))]
impl RankedList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SimilarityResult> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<SimilarityResult> {
        self.0
    }
}

impl IntoIterator for RankedList {
    type Item = SimilarityResult;
    type IntoIter = std::vec::IntoIter<SimilarityResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Raw text was empty or whitespace-only (extraction produced nothing).
    EmptyText,
    /// Only reachable with `drop_empty_normalized`: nothing survived normalization.
    EmptyAfterNormalization,
}

impl SkipReason {
    pub fn describe(&self) -> &'static str {
        match self {
            SkipReason::EmptyText => "No text could be extracted",
            SkipReason::EmptyAfterNormalization => "No scorable words after normalization",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedDocument {
    pub id: String,
    pub reason: SkipReason,
}

/// What happened to a single document during a ranking run.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentOutcome {
    Scored(SimilarityResult),
    Skipped(SkippedDocument),
}

/// A scored document together with its position in the input batch.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    pub input_index: usize,
    pub result: SimilarityResult,
}

/// Full output of a ranking run: sorted scores plus the documents left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RankingReport {
    pub ranked: Vec<RankedEntry>,
    pub skipped: Vec<SkippedDocument>,
}

impl RankingReport {
    /// True when no document produced a score ("no valid input", not "no matches").
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    pub fn ranked_list(&self) -> RankedList {
        RankedList(self.ranked.iter().map(|e| e.result.clone()).collect())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingOptions {
    pub max_documents: usize,
    /// Skip documents whose text normalizes to nothing instead of scoring them 0.0.
    pub drop_empty_normalized: bool,
}

impl Default for RankingOptions {
    fn default() -> Self {
        Self {
            max_documents: DEFAULT_MAX_DOCUMENTS,
            drop_empty_normalized: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Ranker {
    options: RankingOptions,
}

impl Ranker {
    pub fn new(options: RankingOptions) -> Self {
        Self { options }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn options(&self) -> &RankingOptions {
        &self.options
    }

    /// Rejects a batch before any work is done: blank query, no documents, or too many.
    pub fn validate(&self, query: &str, document_count: usize) -> Result<(), AppError> {
        if query.trim().is_empty() {
            return Err(AppError::Validation(
                "job description cannot be empty".to_string(),
            ));
        }
        if document_count == 0 {
            return Err(AppError::Validation(
                "at least one resume is required".to_string(),
            ));
        }
        if document_count > self.options.max_documents {
            return Err(AppError::Validation(format!(
                "at most {} resumes can be processed at once, got {document_count}",
                self.options.max_documents
            )));
        }
        Ok(())
    }

    /// Validates, ranks, and fails with `NoValidInput` when every document was skipped.
    pub fn screen(&self, query: &str, documents: &[Document]) -> Result<RankingReport, AppError> {
        self.validate(query, documents.len())?;

        let report = self.rank_with_outcomes(query, documents);
        if report.is_empty() {
            warn!(
                documents = documents.len(),
                "No document produced a score, batch rejected"
            );
            return Err(AppError::NoValidInput);
        }
        Ok(report)
    }

    /// Ranks `documents` against `query` and returns the sorted scores.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn rank(&self, query: &str, documents: &[Document]) -> RankedList {
        self.rank_with_outcomes(query, documents).ranked_list()
    }

    /// Ranks `documents`, keeping track of which ones were skipped and why.
    pub fn rank_with_outcomes(&self, query: &str, documents: &[Document]) -> RankingReport {
        let normalized_query = normalize(query);
        debug!(
            query_terms = normalized_query.split_whitespace().count(),
            "Query normalized"
        );

        let mut report = RankingReport::default();
        for (input_index, document) in documents.iter().enumerate() {
            match self.score_document(&normalized_query, document) {
                DocumentOutcome::Scored(result) => {
                    report.ranked.push(RankedEntry {
                        input_index,
                        result,
                    });
                }
                DocumentOutcome::Skipped(skipped) => report.skipped.push(skipped),
            }
        }

        // Sort descending. Vec::sort_by is stable, so ties stay in input order.
        report.ranked.sort_by(|a, b| {
            b.result
                .score
                .partial_cmp(&a.result.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            scored = report.ranked.len(),
            skipped = report.skipped.len(),
            "Ranking complete"
        );
        report
    }

    fn score_document(&self, normalized_query: &str, document: &Document) -> DocumentOutcome {
        if document.text.trim().is_empty() {
            warn!(document = %document.id, "No text extracted, skipping document");
            return DocumentOutcome::Skipped(SkippedDocument {
                id: document.id.clone(),
                reason: SkipReason::EmptyText,
            });
        }

        let normalized = normalize(&document.text);
        if normalized.is_empty() && self.options.drop_empty_normalized {
            warn!(document = %document.id, "Nothing left after normalization, skipping document");
            return DocumentOutcome::Skipped(SkippedDocument {
                id: document.id.clone(),
                reason: SkipReason::EmptyAfterNormalization,
            });
        }

        let score = match try_similarity(normalized_query, &normalized) {
            Ok(score) => score,
            Err(e) => {
                warn!(document = %document.id, error = %e, "Scoring failed, using 0.0");
                0.0
            }
        };
        debug!(document = %document.id, score, "Document scored");

        DocumentOutcome::Scored(SimilarityResult {
            id: document.id.clone(),
            score,
        })
    }
}

/// Ranks `documents` against `query` with default options.
#[cfg_attr(not(test), allow(dead_code))]
pub fn rank(query: &str, documents: &[Document]) -> RankedList {
    Ranker::default().rank(query, documents)
}
