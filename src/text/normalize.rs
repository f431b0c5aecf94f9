//! Text normalisation shared by training and serving.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{lemmatize::lemmatize, stopwords::is_stopword};

/// Bumped whenever the output of [`normalize`] can change for some input.
/// Persisted with the vocabulary so stale artifacts are rejected on load.
pub const NORMALIZER_VERSION: u32 = 1;

static URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://\S+|www\.\S+").expect("valid url regex"));
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<.*?>").expect("valid tag regex"));
static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("valid regex"));
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit regex"));

/// Canonicalise free text into space separated lemmas.
///
/// Lowercases, strips URLs, HTML tags, punctuation and digit runs, then
/// drops stopwords and lemmatizes what remains. The output is a fixpoint:
/// `normalize(&normalize(s)) == normalize(s)`.
pub fn normalize(text: &str) -> String {
    tokens(text).join(" ")
}

/// Same pipeline as [`normalize`] without the final join.
pub fn tokens(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let stripped = URL.replace_all(&lowered, "");
    let stripped = HTML_TAG.replace_all(&stripped, "");
    let stripped = NON_WORD.replace_all(&stripped, "");
    let stripped = DIGITS.replace_all(&stripped, "");

    stripped
        .split_whitespace()
        .filter(|word| !is_stopword(word))
        .map(lemmatize)
        .filter(|lemma| !is_stopword(lemma))
        .collect()
}
