//! Persistence of the three artifacts a training run produces.
//!
//! Layout under the artifacts directory:
//!
//! ```text
//! model.mpk        burn record with the trained weights
//! model.json       architecture config + SHA-256 of model.mpk
//! vocabulary.json  frozen word index + normalizer version
//! labels.json      ordered label set
//! ```
//!
//! Every JSON file carries the same `run_id`; loading fails fast when the
//! files disagree instead of serving meaningless predictions.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkFileRecorder},
};
use chrono::Utc;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::{
    data::LabelSet,
    error::Error,
    model::network::{EmotionModel, EmotionModelConfig},
    text::{Vocabulary, NORMALIZER_VERSION},
};

pub const FORMAT_VERSION: u32 = 1;

const WEIGHTS_STEM: &str = "model";
const WEIGHTS_FILE: &str = "model.mpk";
const MODEL_FILE: &str = "model.json";
const VOCABULARY_FILE: &str = "vocabulary.json";
const LABELS_FILE: &str = "labels.json";

type WeightsRecorder = NamedMpkFileRecorder<FullPrecisionSettings>;

#[derive(Debug, Serialize, Deserialize)]
struct Stamped<T> {
    format_version: u32,
    run_id: String,
    content: T,
}

#[derive(Debug, Serialize, Deserialize)]
struct ModelManifest {
    config: EmotionModelConfig,
    weights_sha256: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct VocabularyFile {
    normalizer_version: u32,
    vocabulary: Vocabulary,
}

/// Everything inference needs, produced together by one training run.
pub struct TrainedArtifacts<B: Backend> {
    pub model: EmotionModel<B>,
    pub model_config: EmotionModelConfig,
    pub vocabulary: Vocabulary,
    pub labels: LabelSet,
    pub run_id: String,
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write weights, vocabulary and labels stamped with a fresh run id.
    pub fn save<B: Backend>(
        &self,
        model: EmotionModel<B>,
        model_config: &EmotionModelConfig,
        vocabulary: &Vocabulary,
        labels: &LabelSet,
    ) -> Result<String> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating artifacts dir {}", self.dir.display()))?;

        let vocabulary_file = VocabularyFile {
            normalizer_version: NORMALIZER_VERSION,
            vocabulary: vocabulary.clone(),
        };
        let run_id = run_id(&[
            serde_json::to_vec(&vocabulary_file)?,
            serde_json::to_vec(labels)?,
            serde_json::to_vec(model_config)?,
            Utc::now().to_rfc3339().into_bytes(),
        ]);

        let weights_path = self.dir.join(WEIGHTS_FILE);
        model
            .save_file(self.dir.join(WEIGHTS_STEM), &WeightsRecorder::new())
            .with_context(|| format!("saving weights to {}", weights_path.display()))?;
        let manifest = ModelManifest {
            config: model_config.clone(),
            weights_sha256: sha256_file(&weights_path)?,
        };

        self.write(MODEL_FILE, &run_id, manifest)?;
        self.write(VOCABULARY_FILE, &run_id, vocabulary_file)?;
        self.write(LABELS_FILE, &run_id, labels.clone())?;
        info!(dir = %self.dir.display(), %run_id, "saved artifacts");
        Ok(run_id)
    }

    /// Load and cross-check all artifacts, then restore the weights.
    pub fn load<B: Backend>(&self, device: &B::Device) -> Result<TrainedArtifacts<B>> {
        let manifest: Stamped<ModelManifest> = self.read(MODEL_FILE)?;
        let vocabulary: Stamped<VocabularyFile> = self.read(VOCABULARY_FILE)?;
        let labels: Stamped<LabelSet> = self.read(LABELS_FILE)?;

        for (file, version) in [
            (MODEL_FILE, manifest.format_version),
            (VOCABULARY_FILE, vocabulary.format_version),
            (LABELS_FILE, labels.format_version),
        ] {
            if version != FORMAT_VERSION {
                return Err(mismatch(format!(
                    "{file} has format version {version}, expected {FORMAT_VERSION}"
                )));
            }
        }
        if vocabulary.run_id != manifest.run_id || labels.run_id != manifest.run_id {
            return Err(mismatch(format!(
                "run ids differ: model={} vocabulary={} labels={}",
                manifest.run_id, vocabulary.run_id, labels.run_id
            )));
        }
        if vocabulary.content.normalizer_version != NORMALIZER_VERSION {
            return Err(mismatch(format!(
                "vocabulary built with normalizer v{}, running v{NORMALIZER_VERSION}",
                vocabulary.content.normalizer_version
            )));
        }

        let config = manifest.content.config;
        let vocab = vocabulary.content.vocabulary;
        let label_set = labels.content;
        if config.vocab_size != vocab.embedding_rows() {
            return Err(mismatch(format!(
                "model expects {} vocabulary rows, vocabulary has {}",
                config.vocab_size,
                vocab.embedding_rows()
            )));
        }
        if config.num_labels != label_set.len() {
            return Err(mismatch(format!(
                "model outputs {} labels, label set has {}",
                config.num_labels,
                label_set.len()
            )));
        }

        let weights_path = self.dir.join(WEIGHTS_FILE);
        let digest = sha256_file(&weights_path)?;
        if digest != manifest.content.weights_sha256 {
            return Err(mismatch(format!(
                "{} checksum {digest} does not match manifest",
                weights_path.display()
            )));
        }

        let model = config
            .init::<B>(device)
            .load_file(self.dir.join(WEIGHTS_STEM), &WeightsRecorder::new(), device)
            .with_context(|| format!("loading weights from {}", weights_path.display()))?;
        info!(dir = %self.dir.display(), run_id = %manifest.run_id, "loaded artifacts");

        Ok(TrainedArtifacts {
            model,
            model_config: config,
            vocabulary: vocab,
            labels: label_set,
            run_id: manifest.run_id,
        })
    }

    fn write<T: Serialize>(&self, file: &str, run_id: &str, content: T) -> Result<()> {
        let path = self.dir.join(file);
        let stamped = Stamped {
            format_version: FORMAT_VERSION,
            run_id: run_id.to_string(),
            content,
        };
        fs::write(&path, serde_json::to_vec_pretty(&stamped)?)
            .with_context(|| format!("writing {}", path.display()))
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<T> {
        let path = self.dir.join(file);
        let bytes = fs::read(&path).with_context(|| {
            format!("cannot read {}; has the model been trained?", path.display())
        })?;
        serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
    }
}

fn mismatch(detail: String) -> anyhow::Error {
    Error::ArtifactMismatch(detail).into()
}

fn run_id(parts: &[Vec<u8>]) -> String {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

fn sha256_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}
