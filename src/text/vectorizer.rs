//! Frozen word index mapping normalised text to fixed-length id sequences.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Id used to pad sequences shorter than the configured length.
pub const PAD_ID: u32 = 0;
/// Id assigned to any token outside the frozen vocabulary.
pub const OOV_ID: u32 = 1;
pub const OOV_TOKEN: &str = "<OOV>";

const FIRST_WORD_ID: u32 = 2;

/// Word → id vocabulary fitted once on the training split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    max_words: usize,
    sequence_length: usize,
    word_index: IndexMap<String, u32>,
}

impl Vocabulary {
    /// Count tokens across `texts` and keep the most frequent ones.
    ///
    /// Ids start at 2 in descending frequency; ties keep first-seen order.
    /// Only ids strictly below `max_words` are retained.
    pub fn fit<I, S>(texts: I, max_words: usize, sequence_length: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut counts: IndexMap<String, usize> = IndexMap::new();
        for text in texts {
            for token in split(text.as_ref()) {
                *counts.entry(token.to_string()).or_insert(0) += 1;
            }
        }
        let distinct = counts.len();

        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        // stable sort keeps insertion order among equal counts
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let capacity = max_words.saturating_sub(FIRST_WORD_ID as usize);
        let word_index: IndexMap<String, u32> = ranked
            .into_iter()
            .take(capacity)
            .enumerate()
            .map(|(rank, (word, _))| (word, rank as u32 + FIRST_WORD_ID))
            .collect();

        debug!(distinct, kept = word_index.len(), "fitted vocabulary");
        Self {
            max_words,
            sequence_length,
            word_index,
        }
    }

    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }

    /// Number of known words, excluding padding and the OOV slot.
    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }

    /// Rows needed in an embedding table indexed by this vocabulary.
    pub fn embedding_rows(&self) -> usize {
        self.word_index.len() + FIRST_WORD_ID as usize
    }

    pub fn id(&self, token: &str) -> u32 {
        self.word_index.get(token).copied().unwrap_or(OOV_ID)
    }

    /// Map text to ids without padding.
    pub fn encode(&self, text: &str) -> Vec<u32> {
        split(text).map(|token| self.id(token)).collect()
    }

    /// Map text to exactly `sequence_length` ids.
    ///
    /// Short sequences are padded with [`PAD_ID`] at the end; long ones keep
    /// their trailing `sequence_length` ids.
    pub fn vectorize(&self, text: &str) -> Vec<u32> {
        pad_sequence(self.encode(text), self.sequence_length)
    }
}

/// Pad at the end or truncate from the front to `length`.
pub fn pad_sequence(mut ids: Vec<u32>, length: usize) -> Vec<u32> {
    if ids.len() > length {
        ids.drain(..ids.len() - length);
    } else {
        ids.resize(length, PAD_ID);
    }
    ids
}

fn split(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| c.is_whitespace() || c == '_')
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_descending_frequency() {
        let vocab = Vocabulary::fit(["sad sad happy", "happy sad calm"], 100, 5);
        assert_eq!(vocab.id("sad"), 2);
        assert_eq!(vocab.id("happy"), 3);
        assert_eq!(vocab.id("calm"), 4);
        assert_eq!(vocab.embedding_rows(), 5);
    }

    #[test]
    fn words_beyond_max_words_become_oov() {
        let vocab = Vocabulary::fit(["a a a b b c"], 4, 5);
        assert_eq!(vocab.id("a"), 2);
        assert_eq!(vocab.id("b"), 3);
        assert_eq!(vocab.id("c"), OOV_ID);
        assert_eq!(vocab.vectorize("c a unseen"), vec![1, 2, 1, 0, 0]);
    }

    #[test]
    fn long_sequences_keep_the_tail() {
        let vocab = Vocabulary::fit(["one two three four"], 100, 2);
        assert_eq!(vocab.vectorize("one two three four"), vec![4, 5]);
    }

    #[test]
    fn underscores_separate_tokens() {
        let vocab = Vocabulary::fit(["good_vibes"], 100, 3);
        assert_eq!(vocab.len(), 2);
        assert_eq!(vocab.vectorize("good_vibes"), vec![2, 3, 0]);
    }
}
