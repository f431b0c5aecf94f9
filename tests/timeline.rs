use chrono::NaiveDate;
use emotion_lens::inference::{timeline::read_entries, MoodTimeline, Prediction};

fn p(label: &str, score: f64) -> Prediction {
    Prediction {
        label: label.into(),
        score,
    }
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, day).unwrap()
}

#[test]
fn two_dates_produce_two_rows() {
    let timeline = MoodTimeline::from_predictions(vec![
        (date(1), vec![p("joy", 0.82), p("excitement", 0.4)]),
        (date(2), vec![p("sadness", 0.61)]),
    ]);
    assert_eq!(timeline.rows().len(), 2);
    assert_eq!(timeline.labels(), ["joy", "excitement", "sadness"]);
    assert_eq!(timeline.series("sadness"), vec![(date(1), None), (date(2), Some(0.61))]);
}

#[test]
fn journal_csv_round_trips_through_timeline_csv() {
    let dir = tempfile::tempdir().unwrap();
    let journal = dir.path().join("journal.csv");
    std::fs::write(
        &journal,
        "date,text\n2023-01-01,\"Great day, lots of laughs\"\n2023-01-02,Felt low\n",
    )
    .unwrap();
    let entries = read_entries(&journal).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].date, date(1));
    assert_eq!(entries[0].text, "Great day, lots of laughs");

    let timeline = MoodTimeline::from_predictions(vec![
        (entries[0].date, vec![p("joy", 0.9)]),
        (entries[1].date, vec![p("sadness", 0.5)]),
    ]);
    let out = dir.path().join("out/timeline.csv");
    timeline.write_csv(&out).unwrap();

    let mut reader = csv::Reader::from_path(&out).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ["date", "joy", "sadness"]);
    let rows: Vec<Vec<String>> = reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    assert_eq!(rows[0][0], "2023-01-01");
    assert_eq!(rows[0][1], "0.9");
    assert_eq!(rows[0][2], "");
    assert_eq!(rows[1][2], "0.5");
}

#[test]
fn bad_journal_date_names_the_row() {
    let dir = tempfile::tempdir().unwrap();
    let journal = dir.path().join("journal.csv");
    std::fs::write(&journal, "date,text\n2023-01-01,ok\nyesterday,hmm\n").unwrap();
    let err = read_entries(&journal).unwrap_err();
    assert!(format!("{err:#}").contains("row 3"));
}
