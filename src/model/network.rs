//! Bidirectional LSTM emotion network.

use burn::{
    nn::{
        loss::BinaryCrossEntropyLossConfig, BiLstm, BiLstmConfig, Dropout, DropoutConfig,
        Embedding, EmbeddingConfig, Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::{relu, sigmoid},
};

// `#[derive(Config)]` already provides Clone and serde impls.
#[derive(Config, Debug, PartialEq)]
pub struct EmotionModelConfig {
    /// Rows of the embedding table (vocabulary ids incl. padding and OOV).
    pub vocab_size: usize,
    pub num_labels: usize,
    #[config(default = 128)]
    pub embedding_dim: usize,
    #[config(default = 64)]
    pub sequence_hidden: usize,
    #[config(default = 32)]
    pub summary_hidden: usize,
    #[config(default = 64)]
    pub dense_units: usize,
    #[config(default = 0.2)]
    pub embedding_dropout: f64,
    #[config(default = 0.3)]
    pub dense_dropout: f64,
}

impl EmotionModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EmotionModel<B> {
        EmotionModel {
            embedding: EmbeddingConfig::new(self.vocab_size, self.embedding_dim).init(device),
            embedding_dropout: DropoutConfig::new(self.embedding_dropout).init(),
            sequence_lstm: BiLstmConfig::new(self.embedding_dim, self.sequence_hidden, true)
                .init(device),
            summary_lstm: BiLstmConfig::new(2 * self.sequence_hidden, self.summary_hidden, true)
                .init(device),
            dense: LinearConfig::new(2 * self.summary_hidden, self.dense_units).init(device),
            dense_dropout: DropoutConfig::new(self.dense_dropout).init(),
            output: LinearConfig::new(self.dense_units, self.num_labels).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct EmotionModel<B: Backend> {
    embedding: Embedding<B>,
    embedding_dropout: Dropout,
    sequence_lstm: BiLstm<B>,
    summary_lstm: BiLstm<B>,
    dense: Linear<B>,
    dense_dropout: Dropout,
    output: Linear<B>,
}

impl<B: Backend> EmotionModel<B> {
    /// token_ids: [batch, seq_len] → logits: [batch, num_labels]
    pub fn forward(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let x = self.embedding.forward(token_ids);
        let x = self.embedding_dropout.forward(x);

        let (x, _) = self.sequence_lstm.forward(x, None); // [batch, seq, 2 * sequence_hidden]
        let (x, _) = self.summary_lstm.forward(x, None); // [batch, seq, 2 * summary_hidden]
        let x = last_states(x);

        let x = relu(self.dense.forward(x));
        let x = self.dense_dropout.forward(x);
        self.output.forward(x)
    }

    /// Independent per-label probabilities in [0, 1].
    pub fn forward_probabilities(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        sigmoid(self.forward(token_ids))
    }

    /// Mean binary cross entropy over every (example, label) pair.
    pub fn forward_loss(
        &self,
        token_ids: Tensor<B, 2, Int>,
        targets: Tensor<B, 2, Int>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let logits = self.forward(token_ids);
        let loss = BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(&logits.device())
            .forward(logits.clone(), targets);
        (loss, logits)
    }
}

/// Collapse a bidirectional output to one vector per example: the forward
/// direction's state after the last step joined with the backward
/// direction's state after it has consumed the whole sequence (position 0).
fn last_states<B: Backend>(output: Tensor<B, 3>) -> Tensor<B, 2> {
    let [batch, seq_len, width] = output.dims();
    let hidden = width / 2;
    let forward = output
        .clone()
        .slice([0..batch, seq_len - 1..seq_len, 0..hidden])
        .reshape([batch, hidden]);
    let backward = output
        .slice([0..batch, 0..1, hidden..width])
        .reshape([batch, hidden]);
    Tensor::cat(vec![forward, backward], 1)
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    type TestBackend = NdArray;

    #[test]
    fn output_shape_matches_label_count() {
        let device = Default::default();
        let model: EmotionModel<TestBackend> = EmotionModelConfig::new(20, 5)
            .with_embedding_dim(8)
            .init(&device);
        let ids = Tensor::<TestBackend, 1, Int>::from_ints([2, 3, 4, 0, 1, 5, 0, 0], &device)
            .reshape([2, 4]);

        let probabilities = model.forward_probabilities(ids);
        assert_eq!(probabilities.dims(), [2, 5]);

        let values = probabilities.into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn last_states_picks_direction_ends() {
        let device = Default::default();
        // batch 1, seq 3, width 4 (hidden 2)
        let output = Tensor::<TestBackend, 1>::from_floats(
            [
                1.0, 2.0, 10.0, 20.0, //
                3.0, 4.0, 30.0, 40.0, //
                5.0, 6.0, 50.0, 60.0,
            ],
            &device,
        )
        .reshape([1, 3, 4]);
        let collapsed = last_states(output).into_data().to_vec::<f32>().unwrap();
        assert_eq!(collapsed, vec![5.0, 6.0, 10.0, 20.0]);
    }
}
