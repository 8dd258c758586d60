//! Text normalizer. Turns raw resume / JD text into a canonical token string.
//!
//! Pipeline: lowercase → keep ASCII letters and whitespace → split on whitespace →
//! drop stopwords → lemmatize → rejoin with single spaces.
//!
//! The lemmatizer is a noun lemmatizer in the WordNet style: irregular forms first,
//! then suffix detachment. Tokens no rule matches pass through untouched.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::screening::lexicon::{is_stopword, IRREGULAR_NOUNS};

/// Upper bound on chained lemma rewrites (e.g. "womens" → "women" → "woman").
const MAX_LEMMA_PASSES: usize = 4;

/// Endings that look plural but belong to singular nouns ("class", "status", "analysis").
const SINGULAR_ENDINGS: &[&str] = &["ss", "us", "is"];

/// (suffix, replacement) pairs tried before the bare "s" rule.
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ches", "ch"),
    ("shes", "sh"),
    ("zzes", "zz"),
    ("xes", "x"),
];

static LEMMATIZER: LazyLock<Lemmatizer> = LazyLock::new(Lemmatizer::new);

/// Noun lemmatizer. Immutable once built; share it through [`Lemmatizer::global`].
#[derive(Debug)]
pub struct Lemmatizer {
    irregulars: HashMap<&'static str, &'static str>,
}

impl Lemmatizer {
    fn new() -> Self {
        tracing::debug!(
            irregular_forms = IRREGULAR_NOUNS.len(),
            "Lemmatizer dictionary loaded"
        );
        Self {
            irregulars: IRREGULAR_NOUNS.iter().copied().collect(),
        }
    }

    /// Process-wide instance, built on first use.
    pub fn global() -> &'static Lemmatizer {
        &LEMMATIZER
    }

    /// Reduces `token` to its base form, repeating until the form is stable.
    ///
    /// A rewrite that would land on a stopword is rejected so that normalizing
    /// already-normalized text is a no-op.
    pub fn lemmatize(&self, token: &str) -> String {
        let mut current = token.to_string();
        for _ in 0..MAX_LEMMA_PASSES {
            match self.lemma(&current) {
                Some(next) if next != current && !is_stopword(&next) => current = next,
                _ => break,
            }
        }
        current
    }

    /// One rewrite step. `None` means no rule applies.
    fn lemma(&self, token: &str) -> Option<String> {
        if let Some(base) = self.irregulars.get(token) {
            return Some((*base).to_string());
        }
        detach_suffix(token)
    }
}

fn detach_suffix(token: &str) -> Option<String> {
    if token.len() <= 3 || SINGULAR_ENDINGS.iter().any(|e| token.ends_with(e)) {
        return None;
    }

    if let Some(stem) = token.strip_suffix("men") {
        // "salesmen", "firemen"; "specimen", "abdomen", "acumen", "semen" keep their ending
        let compound =
            stem.len() >= 3 && !stem.ends_with(|c: char| matches!(c, 'a' | 'i' | 'o' | 'u'));
        return compound.then(|| format!("{stem}man"));
    }

    if let Some(stem) = token.strip_suffix("ies") {
        // "ties", "lies": too short to tell a plural from a verb
        return (token.len() > 4).then(|| format!("{stem}y"));
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if let Some(stem) = token.strip_suffix(suffix) {
            return Some(format!("{stem}{replacement}"));
        }
    }

    if let Some(stem) = token.strip_suffix("ses") {
        // "classes" → "class", "buses" → "bus"; otherwise fall through ("databases")
        if stem.ends_with('s') || stem.ends_with('u') {
            return Some(format!("{stem}s"));
        }
    }

    token.strip_suffix('s').map(str::to_string)
}

/// Normalizes raw text for scoring. Returns an empty string when no token survives.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let letters: String = lowered
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect();

    let lemmatizer = Lemmatizer::global();
    letters
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .map(|token| lemmatizer.lemmatize(token))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lemma(token: &str) -> String {
        Lemmatizer::global().lemmatize(token)
    }

    #[test]
    fn test_lowercases_and_strips_punctuation_and_digits() {
        assert_eq!(normalize("Python, SQL & Django!"), "python sql django");
        assert_eq!(normalize("5+ years C++ 2024"), "year c");
    }

    #[test]
    fn test_hyphenated_words_are_merged() {
        assert_eq!(normalize("full-stack end-to-end"), "fullstack endtoend");
    }

    #[test]
    fn test_stopwords_removed() {
        assert_eq!(
            normalize("I am a Python developer with SQL experience"),
            "python developer sql experience"
        );
    }

    #[test]
    fn test_only_stopwords_yields_empty() {
        assert_eq!(normalize("The and of with"), "");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
        assert_eq!(normalize("12345 !!! ---"), "");
    }

    #[test]
    fn test_accented_letters_are_stripped() {
        assert_eq!(normalize("café résumé"), "caf rsum");
    }

    #[test]
    fn test_whitespace_collapsed_to_single_spaces() {
        assert_eq!(normalize("rust\n\n\tgo   kotlin"), "rust go kotlin");
    }

    #[test]
    fn test_regular_plurals() {
        assert_eq!(lemma("skills"), "skill");
        assert_eq!(lemma("developers"), "developer");
        assert_eq!(lemma("companies"), "company");
        assert_eq!(lemma("matches"), "match");
        assert_eq!(lemma("dishes"), "dish");
        assert_eq!(lemma("boxes"), "box");
        assert_eq!(lemma("classes"), "class");
        assert_eq!(lemma("buses"), "bus");
        assert_eq!(lemma("databases"), "database");
        assert_eq!(lemma("bases"), "base");
        assert_eq!(lemma("buzzes"), "buzz");
    }

    #[test]
    fn test_singular_lookalikes_pass_through() {
        for word in ["class", "status", "analysis", "process", "sql", "aws", "ties"] {
            assert_eq!(lemma(word), word);
        }
    }

    #[test]
    fn test_irregular_forms() {
        assert_eq!(lemma("women"), "woman");
        assert_eq!(lemma("criteria"), "criterion");
        assert_eq!(lemma("analyses"), "analysis");
        assert_eq!(lemma("series"), "series");
        assert_eq!(lemma("news"), "news");
        assert_eq!(lemma("data"), "data");
    }

    #[test]
    fn test_singular_and_plural_forms_meet() {
        for (singular, plural) in [
            ("bias", "biases"),
            ("canvas", "canvases"),
            ("atlas", "atlases"),
            ("alias", "aliases"),
        ] {
            assert_eq!(lemma(singular), singular);
            assert_eq!(lemma(plural), singular);
        }
        assert_eq!(lemma("kubernetes"), "kubernetes");
    }

    #[test]
    fn test_compound_men_plurals() {
        assert_eq!(lemma("salesmen"), "salesman");
        assert_eq!(lemma("firemen"), "fireman");
        assert_eq!(lemma("chairmen"), "chairman");
        for word in ["specimen", "abdomen", "acumen", "semen", "omen"] {
            assert_eq!(lemma(word), word);
        }
    }

    #[test]
    fn test_chained_rewrites_reach_a_fixed_point() {
        assert_eq!(lemma("womens"), "woman");
        assert_eq!(lemma(&lemma("womens")), "woman");
        assert_eq!(lemma("salesmens"), "salesman");
    }

    #[test]
    fn test_rewrite_onto_stopword_is_rejected() {
        // "thems" → "them" would vanish on a second pass
        assert_eq!(lemma("thems"), "thems");
        assert_eq!(lemma("wills"), "wills");
    }

    #[test]
    fn test_verb_forms_untouched() {
        // noun lemmatization leaves inflected verbs alone
        assert_eq!(lemma("running"), "running");
        assert_eq!(lemma("managed"), "managed");
    }

    #[test]
    fn test_irregular_targets_are_fixed_points() {
        for (_, base) in IRREGULAR_NOUNS {
            assert_eq!(lemma(base), *base, "{base} is not stable");
        }
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(Lemmatizer::global(), Lemmatizer::global()));
    }

    proptest! {
        /// normalize(normalize(x)) == normalize(x)
        #[test]
        fn prop_normalize_is_idempotent(raw in "[a-zA-Z0-9 ,.'\\-\n]{0,120}") {
            let once = normalize(&raw);
            prop_assert_eq!(normalize(&once), once);
        }

        /// Output only holds lowercase ASCII letters separated by single spaces.
        #[test]
        fn prop_output_is_canonical(raw in "\\PC{0,80}") {
            let out = normalize(&raw);
            prop_assert!(out.chars().all(|c| c.is_ascii_lowercase() || c == ' '));
            prop_assert!(!out.starts_with(' ') && !out.ends_with(' '));
            prop_assert!(!out.contains("  "));
        }
    }
}
