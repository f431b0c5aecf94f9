//! End-to-end training run: dataset → normalised splits → model → artifacts.

use std::path::Path;

use anyhow::{bail, Context, Result};
use burn::tensor::backend::AutodiffBackend;
use serde::Serialize;
use tracing::{info, instrument};

use crate::{
    config::TrainConfig,
    data::{load_examples, split::train_validation_split, DatasetColumns, LabelSet},
    model::{
        batcher::{EmotionDataset, EmotionItem},
        trainer::{self, EpochSummary, Evaluation},
        ArtifactStore, EmotionModelConfig,
    },
    text::{normalize, Vocabulary},
};

/// What a training run produced, printed as JSON by the CLI.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub run_id: String,
    pub examples: usize,
    pub train_rows: usize,
    pub validation_rows: usize,
    pub labels: Vec<String>,
    pub vocabulary_size: usize,
    pub best_epoch: usize,
    pub stopped_early: bool,
    pub history: Vec<EpochSummary>,
    pub validation: Evaluation,
}

struct Prepared {
    text: String,
    tags: Vec<String>,
}

/// Train on `dataset` and persist every artifact into `store`.
#[instrument(skip(columns, cfg, store, device), fields(dataset = %dataset.display()))]
pub fn train_from_dataset<B: AutodiffBackend>(
    dataset: &Path,
    columns: &DatasetColumns,
    cfg: &TrainConfig,
    store: &ArtifactStore,
    device: &B::Device,
) -> Result<TrainingReport> {
    cfg.validate()?;
    let examples = load_examples(dataset, columns)?;
    let total = examples.len();

    // labels come from the whole dataset so rare tags that land only in
    // validation still have an output unit
    let labels = LabelSet::fit(examples.iter().map(|e| e.tags.as_slice()));
    if labels.is_empty() {
        bail!("dataset {} has no emotion tags", dataset.display());
    }

    let prepared: Vec<Prepared> = examples
        .into_iter()
        .map(|e| Prepared {
            text: normalize(&e.text),
            tags: e.tags,
        })
        .collect();
    let (train_rows, valid_rows) =
        train_validation_split(prepared, cfg.validation_fraction, cfg.seed);
    if train_rows.is_empty() || valid_rows.is_empty() {
        bail!(
            "{total} examples leave an empty split at validation fraction {}",
            cfg.validation_fraction
        );
    }

    let vocabulary = Vocabulary::fit(
        train_rows.iter().map(|r| r.text.as_str()),
        cfg.max_words,
        cfg.sequence_length,
    );
    info!(
        labels = labels.len(),
        vocabulary = vocabulary.len(),
        train = train_rows.len(),
        validation = valid_rows.len(),
        "prepared training data"
    );

    let train_set = encode(&train_rows, &vocabulary, &labels).context("encoding training split")?;
    let valid_set =
        encode(&valid_rows, &vocabulary, &labels).context("encoding validation split")?;

    let model_config = EmotionModelConfig::new(vocabulary.embedding_rows(), labels.len())
        .with_embedding_dim(cfg.embedding_dim);
    let outcome = trainer::train::<B>(
        cfg,
        &model_config,
        labels.as_slice(),
        train_set,
        valid_set.clone(),
        device,
    )?;

    let validation = trainer::evaluate(
        &outcome.model,
        valid_set,
        cfg.batch_size,
        labels.as_slice(),
        device,
    )?;
    info!(
        best_epoch = outcome.best_epoch,
        val_loss = validation.loss,
        val_accuracy = validation.accuracy,
        val_micro_f1 = validation.micro_f1,
        "final validation"
    );

    let run_id = store.save(outcome.model, &model_config, &vocabulary, &labels)?;

    Ok(TrainingReport {
        run_id,
        examples: total,
        train_rows: train_rows.len(),
        validation_rows: valid_rows.len(),
        labels: labels.as_slice().to_vec(),
        vocabulary_size: vocabulary.len(),
        best_epoch: outcome.best_epoch,
        stopped_early: outcome.stopped_early,
        history: outcome.history,
        validation,
    })
}

fn encode(rows: &[Prepared], vocabulary: &Vocabulary, labels: &LabelSet) -> Result<EmotionDataset> {
    let items = rows
        .iter()
        .map(|row| {
            Ok(EmotionItem {
                token_ids: vocabulary.vectorize(&row.text),
                targets: labels.encode(&row.tags)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(EmotionDataset::new(items))
}
