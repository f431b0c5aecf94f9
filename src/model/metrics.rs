//! Multi-label evaluation metrics.

use serde::Serialize;

/// Probability above which a label counts as predicted during evaluation.
pub const EVALUATION_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Confusion {
    pub true_positive: u64,
    pub false_positive: u64,
    pub false_negative: u64,
    pub true_negative: u64,
}

impl Confusion {
    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> f64 {
        ratio(
            2 * self.true_positive,
            2 * self.true_positive + self.false_positive + self.false_negative,
        )
    }

    pub fn support(&self) -> u64 {
        self.true_positive + self.false_negative
    }

    fn add(&mut self, predicted: bool, actual: bool) {
        match (predicted, actual) {
            (true, true) => self.true_positive += 1,
            (true, false) => self.false_positive += 1,
            (false, true) => self.false_negative += 1,
            (false, false) => self.true_negative += 1,
        }
    }
}

/// Per-label confusion counts accumulated over batches.
#[derive(Debug, Clone)]
pub struct MultiLabelCounts {
    threshold: f32,
    per_label: Vec<Confusion>,
}

impl MultiLabelCounts {
    pub fn new(num_labels: usize, threshold: f32) -> Self {
        Self {
            threshold,
            per_label: vec![Confusion::default(); num_labels],
        }
    }

    /// Fold in row-major `[rows, num_labels]` probabilities and 0/1 targets.
    pub fn update(&mut self, probabilities: &[f32], expected: &[f32]) {
        let width = self.per_label.len().max(1);
        for (index, (probability, target)) in probabilities.iter().zip(expected).enumerate() {
            self.per_label[index % width].add(*probability > self.threshold, *target >= 0.5);
        }
    }

    /// Counts pooled across every label.
    pub fn pooled(&self) -> Confusion {
        self.per_label
            .iter()
            .fold(Confusion::default(), |mut acc, counts| {
                acc.true_positive += counts.true_positive;
                acc.false_positive += counts.false_positive;
                acc.false_negative += counts.false_negative;
                acc.true_negative += counts.true_negative;
                acc
            })
    }

    pub fn micro_f1(&self) -> f64 {
        self.pooled().f1()
    }

    /// Element-wise accuracy over every (example, label) decision.
    pub fn binary_accuracy(&self) -> f64 {
        let pooled = self.pooled();
        let correct = pooled.true_positive + pooled.true_negative;
        ratio(
            correct,
            correct + pooled.false_positive + pooled.false_negative,
        )
    }

    pub fn label_scores(&self, labels: &[String]) -> Vec<LabelScore> {
        labels
            .iter()
            .zip(&self.per_label)
            .map(|(label, counts)| LabelScore {
                label: label.clone(),
                precision: counts.precision(),
                recall: counts.recall(),
                f1: counts.f1(),
                support: counts.support(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelScore {
    pub label: String,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: u64,
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn micro_f1_pools_counts_across_labels() {
        let mut counts = MultiLabelCounts::new(3, EVALUATION_THRESHOLD);
        // row 1: predicts labels 0 and 1, truth is 0 and 2
        // row 2: predicts label 2, truth is 2
        counts.update(&[0.9, 0.7, 0.1, 0.2, 0.4, 0.8], &[1.0, 0.0, 1.0, 0.0, 0.0, 1.0]);

        let pooled = counts.pooled();
        assert_eq!(pooled.true_positive, 2);
        assert_eq!(pooled.false_positive, 1);
        assert_eq!(pooled.false_negative, 1);
        assert_eq!(pooled.true_negative, 2);
        assert!((counts.micro_f1() - 4.0 / 6.0).abs() < 1e-12);
        assert!((counts.binary_accuracy() - 4.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn evaluation_threshold_is_strict() {
        let mut counts = MultiLabelCounts::new(1, EVALUATION_THRESHOLD);
        counts.update(&[0.5], &[1.0]);
        assert_eq!(counts.pooled().false_negative, 1);
    }

    #[test]
    fn empty_counts_score_zero() {
        let counts = MultiLabelCounts::new(2, EVALUATION_THRESHOLD);
        assert_eq!(counts.micro_f1(), 0.0);
        assert_eq!(counts.binary_accuracy(), 0.0);
    }

    #[test]
    fn label_scores_follow_label_order() {
        let mut counts = MultiLabelCounts::new(2, EVALUATION_THRESHOLD);
        counts.update(&[0.9, 0.9, 0.1, 0.9], &[1.0, 0.0, 1.0, 1.0]);
        let labels = vec!["joy".to_string(), "sadness".to_string()];
        let scores = counts.label_scores(&labels);
        assert_eq!(scores[0].label, "joy");
        assert_eq!(scores[0].support, 2);
        assert!((scores[0].recall - 0.5).abs() < 1e-12);
        assert!((scores[1].precision - 0.5).abs() < 1e-12);
    }
}
