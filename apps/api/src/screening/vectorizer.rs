//! Vectorizer / scorer: TF-IDF over a pairwise corpus plus cosine similarity.
//!
//! The corpus is only ever the two documents being compared, so IDF is local to
//! the pair: a score says how close a resume is to *this* JD, nothing more.
//!
//! Weighting:
//!   tf(t, d)  = raw count of t in d
//!   idf(t)    = ln((1 + n) / (1 + df(t))) + 1      (smoothed)
//!   w(t, d)   = tf · idf, then each row is L2-normalised
//!
//! Terms are runs of two or more word characters, lowercased.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, PartialEq)]
pub enum ScoringError {
    #[error("empty vocabulary: no document contains a scorable term")]
    EmptyVocabulary,

    #[error("similarity is not a finite number")]
    NonFiniteScore,
}

/// Sparse TF-IDF row. Ordered by term so dot products sum in a fixed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfVector {
    weights: BTreeMap<String, f64>,
}

impl TfidfVector {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn weight(&self, term: &str) -> f64 {
        self.weights.get(term).copied().unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.weights.values().map(|w| w * w).sum::<f64>().sqrt()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_zero(&self) -> bool {
        self.weights.values().all(|w| *w == 0.0)
    }

    pub fn dot(&self, other: &TfidfVector) -> f64 {
        self.weights
            .iter()
            .filter_map(|(term, w)| other.weights.get(term).map(|o| w * o))
            .sum()
    }
}

/// Vocabulary fitted over a corpus: term → smoothed IDF.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    idf: BTreeMap<String, f64>,
}

impl TfidfVectorizer {
    /// Learns the vocabulary and document frequencies of `documents`.
    pub fn fit(documents: &[&str]) -> Result<Self, ScoringError> {
        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for doc in documents {
            let mut terms: Vec<String> = tokenize(doc).collect();
            terms.sort_unstable();
            terms.dedup();
            for term in terms {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(ScoringError::EmptyVocabulary);
        }

        let n = documents.len() as f64;
        let idf = document_frequency
            .into_iter()
            .map(|(term, df)| {
                let weight = ((1.0 + n) / (1.0 + df as f64)).ln() + 1.0;
                (term, weight)
            })
            .collect();

        Ok(Self { idf })
    }

    /// Projects `document` onto the fitted vocabulary. Unknown terms are ignored.
    pub fn transform(&self, document: &str) -> TfidfVector {
        let mut counts: BTreeMap<String, f64> = BTreeMap::new();
        for term in tokenize(document) {
            if self.idf.contains_key(&term) {
                *counts.entry(term).or_insert(0.0) += 1.0;
            }
        }

        let mut weights: BTreeMap<String, f64> = counts
            .into_iter()
            .map(|(term, tf)| {
                let idf = self.idf[&term];
                (term, tf * idf)
            })
            .collect();

        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }

        TfidfVector { weights }
    }

    pub fn fit_transform(documents: &[&str]) -> Result<Vec<TfidfVector>, ScoringError> {
        let vectorizer = Self::fit(documents)?;
        Ok(documents.iter().map(|d| vectorizer.transform(d)).collect())
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn vocabulary_len(&self) -> usize {
        self.idf.len()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn idf(&self, term: &str) -> Option<f64> {
        self.idf.get(term).copied()
    }
}

/// Lowercased runs of word characters, at least two characters long.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| t.chars().count() >= 2)
        .map(str::to_lowercase)
}

/// Cosine of the angle between two vectors; 0.0 when either is all-zero.
pub fn cosine_similarity(a: &TfidfVector, b: &TfidfVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 0.0;
    }
    a.dot(b) / denom
}

/// Scores two texts against each other, surfacing failures.
pub fn try_similarity(text_a: &str, text_b: &str) -> Result<f64, ScoringError> {
    let vectors = TfidfVectorizer::fit_transform(&[text_a, text_b])?;
    let score = cosine_similarity(&vectors[0], &vectors[1]);
    if !score.is_finite() {
        return Err(ScoringError::NonFiniteScore);
    }
    // positive zero only, so equal scores compare and serialize identically
    Ok(if score > 0.0 { score.min(1.0) } else { 0.0 })
}

/// Similarity in `[0, 1]`. Never fails: a scoring error is logged and scored 0.0.
#[cfg_attr(not(test), allow(dead_code))]
pub fn similarity(text_a: &str, text_b: &str) -> f64 {
    try_similarity(text_a, text_b).unwrap_or_else(|e| {
        warn!(error = %e, "Similarity computation failed, scoring as 0.0");
        0.0
    })
}
