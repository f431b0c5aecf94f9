//! Rule based noun lemmatizer.
//!
//! Reduces plural nouns to their singular form with a handful of suffix
//! rules and an irregular-form table. Applied to a fixpoint so that
//! lemmatizing a lemma is a no-op.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("men", "man"),
        ("women", "woman"),
        ("gentlemen", "gentleman"),
        ("children", "child"),
        ("feet", "foot"),
        ("teeth", "tooth"),
        ("mice", "mouse"),
        ("geese", "goose"),
        ("people", "people"),
        ("lives", "life"),
        ("wives", "wife"),
        ("knives", "knife"),
        ("leaves", "leaf"),
        ("wolves", "wolf"),
        ("selves", "self"),
        ("halves", "half"),
        ("thieves", "thief"),
        ("shelves", "shelf"),
        ("movies", "movie"),
        ("cookies", "cookie"),
        ("zombies", "zombie"),
        ("calories", "calorie"),
        ("selfies", "selfie"),
        ("brownies", "brownie"),
        ("goodies", "goodie"),
        ("rookies", "rookie"),
        ("heroes", "hero"),
        ("potatoes", "potato"),
        ("tomatoes", "tomato"),
        ("echoes", "echo"),
        ("goes", "go"),
        ("aches", "ache"),
        ("headaches", "headache"),
        ("stomachaches", "stomachache"),
    ]
    .into_iter()
    .collect()
});

/// Words ending in `s` that are already singular.
const SINGULAR_S: &[&str] = &[
    "always", "news", "perhaps", "series", "species", "physics", "politics", "mathematics",
    "economics", "lens", "chaos", "bias", "alias", "christmas", "canvas", "atlas", "thanks",
    "whereas", "besides", "sometimes", "afterwards", "towards", "nowadays", "anyways",
];

/// Lemmatize a single lowercase token.
pub fn lemmatize(token: &str) -> String {
    let mut current = token.to_string();
    loop {
        let next = lemmatize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn lemmatize_once(token: &str) -> String {
    if let Some(lemma) = IRREGULAR.get(token) {
        return (*lemma).to_string();
    }
    if token.chars().count() < 4 || SINGULAR_S.contains(&token) {
        return token.to_string();
    }
    if let Some(stem) = token.strip_suffix("ies") {
        if stem.chars().count() > 1 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = token.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    for suffix in ["shes", "ches", "xes", "zzes"] {
        if token.ends_with(suffix) {
            return token[..token.len() - 2].to_string();
        }
    }
    if token.ends_with('s')
        && !["ss", "us", "is", "ous"]
            .iter()
            .any(|ending| token.ends_with(ending))
    {
        return token[..token.len() - 1].to_string();
    }
    token.to_string()
}
