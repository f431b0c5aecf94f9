use emotion_lens::text::normalize;
use proptest::prelude::*;

#[test]
fn strips_noise_and_stopwords() {
    assert_eq!(
        normalize("I had a wonderful day today, everything went so well!"),
        "wonderful day today everything went well"
    );
    assert_eq!(
        normalize("Check <b>this</b> out: https://example.com/x?y=1 www.dogs.org 42 dogs!!"),
        "check dog"
    );
}

#[test]
fn empty_and_noise_only_inputs_are_empty() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("   "), "");
    assert_eq!(normalize("!!! 123 <br/>"), "");
    assert_eq!(normalize("I am not the one who was there"), "one");
}

proptest! {
    #[test]
    fn normalisation_is_idempotent(text in "[a-zA-Z0-9 ,.!?'<>/:_-]{0,120}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once.clone());
    }

    #[test]
    fn output_is_single_spaced_lowercase(text in "[a-zA-Z ,.!?]{0,120}") {
        let out = normalize(&text);
        prop_assert!(!out.contains("  "));
        prop_assert_eq!(out.trim(), out.as_str());
        prop_assert_eq!(out.to_lowercase(), out.clone());
    }
}
