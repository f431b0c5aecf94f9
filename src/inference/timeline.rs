//! Mood timeline: per-entry emotion scores laid out as a sparse table.

use std::{fs::File, path::Path};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use indexmap::{IndexMap, IndexSet};
use polars::prelude::{CsvWriter, DataFrame, NamedFrom, SerWriter, Series};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::inference::Prediction;

const DATE_COLUMN: &str = "date";

/// One dated journal entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub date: NaiveDate,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineRow {
    pub date: NaiveDate,
    /// Only the labels reported for this entry.
    pub scores: IndexMap<String, f64>,
}

/// Rows in entry order; columns are every label seen, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MoodTimeline {
    labels: Vec<String>,
    rows: Vec<TimelineRow>,
}

impl MoodTimeline {
    pub fn from_predictions<I>(scored: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, Vec<Prediction>)>,
    {
        let mut labels = IndexSet::new();
        let rows = scored
            .into_iter()
            .map(|(date, predictions)| {
                let scores = predictions
                    .into_iter()
                    .map(|p| {
                        labels.insert(p.label.clone());
                        (p.label, p.score)
                    })
                    .collect();
                TimelineRow { date, scores }
            })
            .collect();
        Self {
            labels: labels.into_iter().collect(),
            rows,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn rows(&self) -> &[TimelineRow] {
        &self.rows
    }

    /// Score of `label` per row; `None` where the label was not reported.
    pub fn series(&self, label: &str) -> Vec<(NaiveDate, Option<f64>)> {
        self.rows
            .iter()
            .map(|row| (row.date, row.scores.get(label).copied()))
            .collect()
    }

    /// `date` column plus one nullable float column per label.
    pub fn to_frame(&self) -> Result<DataFrame> {
        if self.labels.iter().any(|l| l == DATE_COLUMN) {
            bail!("label {DATE_COLUMN:?} collides with the timeline's date column");
        }
        let mut columns = Vec::with_capacity(self.labels.len() + 1);
        columns.push(Series::new(
            DATE_COLUMN.into(),
            self.rows
                .iter()
                .map(|r| r.date.format("%Y-%m-%d").to_string())
                .collect::<Vec<_>>(),
        ));
        for label in &self.labels {
            columns.push(Series::new(
                label.as_str().into(),
                self.rows
                    .iter()
                    .map(|r| r.scores.get(label).copied())
                    .collect::<Vec<Option<f64>>>(),
            ));
        }
        Ok(DataFrame::new(columns)?)
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut df = self.to_frame()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        CsvWriter::new(&mut file).finish(&mut df)?;
        info!(path = %path.display(), rows = df.height(), columns = df.width(), "wrote timeline");
        Ok(())
    }
}

/// Read `date,text` rows (dates as `YYYY-MM-DD`) from a CSV journal.
pub fn read_entries(path: &Path) -> Result<Vec<JournalEntry>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("opening {}", path.display()))?;
    let mut entries = Vec::new();
    for (offset, record) in reader.deserialize::<JournalEntry>().enumerate() {
        entries.push(record.with_context(|| format!("{} row {}", path.display(), offset + 2))?);
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(label: &str, score: f64) -> Prediction {
        Prediction {
            label: label.into(),
            score,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 1, d).unwrap()
    }

    #[test]
    fn columns_follow_first_appearance() {
        let timeline = MoodTimeline::from_predictions(vec![
            (day(1), vec![p("joy", 0.9), p("love", 0.4)]),
            (day(2), vec![p("sadness", 0.7), p("joy", 0.35)]),
        ]);
        assert_eq!(timeline.labels(), ["joy", "love", "sadness"]);
        assert_eq!(
            timeline.series("love"),
            vec![(day(1), Some(0.4)), (day(2), None)]
        );
    }

    #[test]
    fn frame_keeps_missing_scores_null() {
        let timeline = MoodTimeline::from_predictions(vec![
            (day(1), vec![p("joy", 0.9)]),
            (day(2), vec![]),
        ]);
        let df = timeline.to_frame().unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("joy").unwrap().null_count(), 1);
    }

    #[test]
    fn label_named_date_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("timeline.csv");
        let timeline = MoodTimeline::from_predictions(vec![(
            day(1),
            vec![p("joy", 0.8), p("date", 0.5)],
        )]);
        let err = timeline.write_csv(&path).unwrap_err();
        assert!(err.to_string().contains("date column"), "{err}");
        assert!(!path.exists());
        // the in-memory series is still reachable
        assert_eq!(timeline.series("date"), vec![(day(1), Some(0.5))]);
    }
}
