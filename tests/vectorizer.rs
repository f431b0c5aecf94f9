use emotion_lens::text::{
    vectorizer::{OOV_ID, PAD_ID},
    Vocabulary,
};
use proptest::prelude::*;

#[test]
fn unknown_words_map_to_oov_and_short_text_pads() {
    let vocab = Vocabulary::fit(["happy day", "happy calm"], 10_000, 5);
    assert_eq!(vocab.vectorize("happy zebra"), vec![2, OOV_ID, PAD_ID, PAD_ID, PAD_ID]);
    assert_eq!(vocab.vectorize(""), vec![PAD_ID; 5]);
}

#[test]
fn long_text_keeps_most_recent_tokens() {
    let vocab = Vocabulary::fit(["one two three four"], 10_000, 2);
    assert_eq!(vocab.vectorize("one two three four"), vec![4, 5]);
}

proptest! {
    #[test]
    fn every_sequence_has_configured_length(
        corpus in prop::collection::vec("[a-e]{1,3}( [a-e]{1,3}){0,8}", 1..20),
        text in "[a-f]{0,3}( [a-f]{1,3}){0,200}",
        length in 1usize..64,
        max_words in 2usize..50,
    ) {
        let vocab = Vocabulary::fit(&corpus, max_words, length);
        let ids = vocab.vectorize(&text);
        prop_assert_eq!(ids.len(), length);
        prop_assert!(ids.iter().all(|id| (*id as usize) < vocab.embedding_rows()));
        prop_assert!(vocab.embedding_rows() <= max_words.max(2));
    }
}
