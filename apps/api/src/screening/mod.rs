// Resume screening core: normalize → TF-IDF score → rank.
// Skill spotting is auxiliary output and never changes the ordering.

pub mod handlers;
pub mod lexicon;
pub mod normalizer;
pub mod ranker;
pub mod skills;
pub mod vectorizer;
