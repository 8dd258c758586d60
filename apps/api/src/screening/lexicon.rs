//! Static word lists used by the normalizer.
//!
//! The stopword set is built once per process on first use and never mutated.

use std::collections::HashSet;
use std::sync::LazyLock;

use stop_words::{get, LANGUAGE};

/// Irregular noun forms and invariant words that the suffix rules would mangle.
/// Every target must map to itself under the rules (no chains).
pub(crate) const IRREGULAR_NOUNS: &[(&str, &str)] = &[
    ("men", "man"),
    ("women", "woman"),
    ("children", "child"),
    ("feet", "foot"),
    ("teeth", "tooth"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("analyses", "analysis"),
    ("crises", "crisis"),
    ("diagnoses", "diagnosis"),
    ("hypotheses", "hypothesis"),
    ("theses", "thesis"),
    ("criteria", "criterion"),
    ("phenomena", "phenomenon"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("appendices", "appendix"),
    ("curricula", "curriculum"),
    ("alumni", "alumnus"),
    ("caches", "cache"),
    ("niches", "niche"),
    ("quizzes", "quiz"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("biases", "bias"),
    ("canvases", "canvas"),
    ("atlases", "atlas"),
    ("aliases", "alias"),
    ("gases", "gas"),
    ("bias", "bias"),
    ("canvas", "canvas"),
    ("atlas", "atlas"),
    ("alias", "alias"),
    ("kubernetes", "kubernetes"),
    ("series", "series"),
    ("species", "species"),
    ("news", "news"),
    ("lens", "lens"),
    ("always", "always"),
    ("perhaps", "perhaps"),
    ("towards", "towards"),
    ("afterwards", "afterwards"),
    ("whereas", "whereas"),
    ("besides", "besides"),
    ("sometimes", "sometimes"),
    ("mathematics", "mathematics"),
    ("physics", "physics"),
    ("economics", "economics"),
    ("ethics", "ethics"),
];

/// English stopwords from the NLTK corpus list. Contractions stay in the set
/// even though apostrophes never survive the character filter.
static STOPWORDS: LazyLock<HashSet<String>> = LazyLock::new(|| {
    get(LANGUAGE::English)
        .iter()
        .map(|word| word.to_string())
        .collect()
});

pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}
