use emotion_lens::{
    data::{labels::parse_tags, LabelSet},
    Error,
};
use proptest::prelude::*;

const NAMES: [&str; 6] = ["anger", "fear", "joy", "love", "sadness", "surprise"];

fn label_set() -> LabelSet {
    let all: Vec<String> = NAMES.iter().map(|s| s.to_string()).collect();
    LabelSet::fit([all.as_slice()])
}

#[test]
fn list_literal_cells_parse() {
    assert_eq!(parse_tags("['joy', 'love']", 2).unwrap(), vec!["joy", "love"]);
    assert_eq!(parse_tags("[\"fear\"]", 2).unwrap(), vec!["fear"]);
    assert_eq!(parse_tags("joy,sadness", 2).unwrap(), vec!["joy", "sadness"]);
    assert!(parse_tags("[]", 2).unwrap().is_empty());
}

#[test]
fn malformed_cells_report_row() {
    let err = parse_tags("['joy'", 7).unwrap_err();
    assert!(matches!(err, Error::MalformedTags { row: 7, .. }));
    assert!(parse_tags("['joy, 'love']", 3).is_err());
    assert!(parse_tags("joy,,love", 3).is_err());
}

proptest! {
    #[test]
    fn encode_decode_round_trips(mask in prop::collection::vec(any::<bool>(), NAMES.len())) {
        let labels = label_set();
        let tags: Vec<String> = NAMES
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|(name, _)| name.to_string())
            .collect();

        let vector = labels.encode(&tags).unwrap();
        prop_assert_eq!(vector.len(), labels.len());
        prop_assert_eq!(vector.iter().filter(|v| **v == 1.0).count(), tags.len());
        prop_assert_eq!(labels.decode(&vector), tags);
    }
}
