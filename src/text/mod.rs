//! Text preparation: normalisation and vectorisation.

pub mod lemmatize;
pub mod normalize;
pub mod stopwords;
pub mod vectorizer;

pub use normalize::{normalize, NORMALIZER_VERSION};
pub use vectorizer::Vocabulary;
