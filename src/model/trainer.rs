//! Training loop with validation-loss early stopping.

use anyhow::{anyhow, Result};
use burn::{
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    module::AutodiffModule,
    optim::{AdamConfig, GradientsParams, Optimizer},
    prelude::*,
    tensor::{activation::sigmoid, backend::AutodiffBackend},
};
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    config::TrainConfig,
    model::{
        batcher::{EmotionBatcher, EmotionDataset},
        metrics::{LabelScore, MultiLabelCounts, EVALUATION_THRESHOLD},
        network::{EmotionModel, EmotionModelConfig},
    },
};

/// Loss and thresholded scores over one evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub loss: f64,
    pub accuracy: f64,
    pub micro_f1: f64,
    pub per_label: Vec<LabelScore>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpochSummary {
    pub epoch: usize,
    pub train_loss: f64,
    pub val_loss: f64,
    pub val_accuracy: f64,
    pub val_micro_f1: f64,
}

/// Result of a training run; `model` holds the best epoch's weights.
pub struct TrainingOutcome<B: Backend> {
    pub model: EmotionModel<B>,
    pub history: Vec<EpochSummary>,
    pub best_epoch: usize,
    pub stopped_early: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Improved,
    Stalled,
    Stop,
}

/// Tracks the best validation loss and signals when patience runs out.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    best_loss: f64,
    best_epoch: usize,
    stale_epochs: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best_loss: f64::INFINITY,
            best_epoch: 0,
            stale_epochs: 0,
        }
    }

    pub fn observe(&mut self, epoch: usize, loss: f64) -> Progress {
        // NaN never compares less, so a diverged epoch counts as stale
        if loss < self.best_loss {
            self.best_loss = loss;
            self.best_epoch = epoch;
            self.stale_epochs = 0;
            return Progress::Improved;
        }
        self.stale_epochs += 1;
        if self.stale_epochs >= self.patience {
            Progress::Stop
        } else {
            Progress::Stalled
        }
    }

    pub fn best_epoch(&self) -> usize {
        self.best_epoch
    }

    pub fn best_loss(&self) -> f64 {
        self.best_loss
    }
}

pub fn train<B: AutodiffBackend>(
    cfg: &TrainConfig,
    model_config: &EmotionModelConfig,
    labels: &[String],
    train_set: EmotionDataset,
    valid_set: EmotionDataset,
    device: &B::Device,
) -> Result<TrainingOutcome<B::InnerBackend>> {
    B::seed(cfg.seed);
    let mut model: EmotionModel<B> = model_config.init(device);
    let mut optim = AdamConfig::new().with_epsilon(1e-7).init();
    info!(
        vocab_size = model_config.vocab_size,
        num_labels = model_config.num_labels,
        train = train_set.len(),
        validation = valid_set.len(),
        "model ready"
    );

    let train_loader = DataLoaderBuilder::new(EmotionBatcher::<B>::new(device.clone()))
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_set);

    let mut stopping = EarlyStopping::new(cfg.patience);
    let mut best: Option<EmotionModel<B::InnerBackend>> = None;
    let mut history = Vec::new();
    let mut stopped_early = false;

    for epoch in 1..=cfg.epochs {
        let mut loss_sum = 0.0f64;
        let mut rows_seen = 0usize;

        for batch in train_loader.iter() {
            let rows = batch.token_ids.dims()[0];
            let (loss, _) = model.forward_loss(batch.token_ids, batch.targets);
            loss_sum += loss.clone().into_scalar().elem::<f64>() * rows as f64;
            rows_seen += rows;

            let grads = GradientsParams::from_grads(loss.backward(), &model);
            model = optim.step(cfg.learning_rate, model, grads);
        }
        let train_loss = mean(loss_sum, rows_seen);

        let candidate = model.valid();
        let eval = evaluate(&candidate, valid_set.clone(), cfg.batch_size, labels, device)?;
        info!(
            epoch,
            epochs = cfg.epochs,
            train_loss,
            val_loss = eval.loss,
            val_accuracy = eval.accuracy,
            val_micro_f1 = eval.micro_f1,
            "epoch finished"
        );
        history.push(EpochSummary {
            epoch,
            train_loss,
            val_loss: eval.loss,
            val_accuracy: eval.accuracy,
            val_micro_f1: eval.micro_f1,
        });

        match stopping.observe(epoch, eval.loss) {
            Progress::Improved => best = Some(candidate),
            Progress::Stalled => debug!(epoch, best = stopping.best_epoch(), "no improvement"),
            Progress::Stop => {
                info!(
                    epoch,
                    best_epoch = stopping.best_epoch(),
                    best_val_loss = stopping.best_loss(),
                    "early stopping"
                );
                stopped_early = true;
                break;
            }
        }
    }

    let best_epoch = stopping.best_epoch();
    let model = match best {
        Some(model) => model,
        None => model.valid(),
    };
    Ok(TrainingOutcome {
        model,
        history,
        best_epoch,
        stopped_early,
    })
}

/// Run `model` over `dataset` without gradients and score it at 0.5.
pub fn evaluate<B: Backend>(
    model: &EmotionModel<B>,
    dataset: EmotionDataset,
    batch_size: usize,
    labels: &[String],
    device: &B::Device,
) -> Result<Evaluation> {
    let loader = DataLoaderBuilder::new(EmotionBatcher::<B>::new(device.clone()))
        .batch_size(batch_size)
        .num_workers(1)
        .build(dataset);

    let mut counts = MultiLabelCounts::new(labels.len(), EVALUATION_THRESHOLD);
    let mut loss_sum = 0.0f64;
    let mut rows_seen = 0usize;

    for batch in loader.iter() {
        let rows = batch.token_ids.dims()[0];
        let (loss, logits) = model.forward_loss(batch.token_ids, batch.targets);
        loss_sum += loss.into_scalar().elem::<f64>() * rows as f64;
        rows_seen += rows;

        let probabilities = sigmoid(logits)
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("reading probabilities: {e:?}"))?;
        counts.update(&probabilities, &batch.expected);
    }

    Ok(Evaluation {
        loss: mean(loss_sum, rows_seen),
        accuracy: counts.binary_accuracy(),
        micro_f1: counts.micro_f1(),
        per_label: counts.label_scores(labels),
    })
}

fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_after_patience_stale_epochs() {
        let mut stopping = EarlyStopping::new(3);
        let losses = [0.9, 0.7, 0.75, 0.71, 0.72];
        let progress: Vec<_> = losses
            .iter()
            .enumerate()
            .map(|(i, loss)| stopping.observe(i + 1, *loss))
            .collect();
        assert_eq!(
            progress,
            vec![
                Progress::Improved,
                Progress::Improved,
                Progress::Stalled,
                Progress::Stalled,
                Progress::Stop
            ]
        );
        assert_eq!(stopping.best_epoch(), 2);
        assert_eq!(stopping.best_loss(), 0.7);
    }

    #[test]
    fn improvement_resets_patience() {
        let mut stopping = EarlyStopping::new(2);
        assert_eq!(stopping.observe(1, 1.0), Progress::Improved);
        assert_eq!(stopping.observe(2, 1.1), Progress::Stalled);
        assert_eq!(stopping.observe(3, 0.5), Progress::Improved);
        assert_eq!(stopping.observe(4, 0.6), Progress::Stalled);
        assert_eq!(stopping.observe(5, 0.6), Progress::Stop);
    }

    #[test]
    fn nan_loss_never_improves() {
        let mut stopping = EarlyStopping::new(1);
        assert_eq!(stopping.observe(1, 0.4), Progress::Improved);
        assert_eq!(stopping.observe(2, f64::NAN), Progress::Stop);
        assert_eq!(stopping.best_epoch(), 1);
    }
}
