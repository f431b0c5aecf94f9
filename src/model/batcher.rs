//! Burn dataset and batcher for vectorised emotion examples.

use std::sync::Arc;

use burn::{
    data::{dataloader::batcher::Batcher, dataset::Dataset},
    prelude::*,
};

/// One example ready for batching: fixed-length ids plus its multi-hot targets.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionItem {
    pub token_ids: Vec<u32>,
    pub targets: Vec<f32>,
}

/// Shared, cheaply cloned item list so one split can feed several loaders.
#[derive(Debug, Clone)]
pub struct EmotionDataset {
    items: Arc<Vec<EmotionItem>>,
}

impl EmotionDataset {
    pub fn new(items: Vec<EmotionItem>) -> Self {
        Self {
            items: Arc::new(items),
        }
    }
}

impl Dataset<EmotionItem> for EmotionDataset {
    fn get(&self, index: usize) -> Option<EmotionItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

#[derive(Debug, Clone)]
pub struct EmotionBatch<B: Backend> {
    /// [batch, seq_len]
    pub token_ids: Tensor<B, 2, Int>,
    /// [batch, num_labels], 0/1
    pub targets: Tensor<B, 2, Int>,
    /// Host copy of `targets`, row-major, for metric bookkeeping.
    pub expected: Vec<f32>,
}

#[derive(Clone, Debug)]
pub struct EmotionBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> EmotionBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<EmotionItem, EmotionBatch<B>> for EmotionBatcher<B> {
    fn batch(&self, items: Vec<EmotionItem>) -> EmotionBatch<B> {
        let batch_size = items.len();
        let seq_len = items.first().map_or(0, |item| item.token_ids.len());
        let num_labels = items.first().map_or(0, |item| item.targets.len());

        let ids: Vec<i32> = items
            .iter()
            .flat_map(|item| item.token_ids.iter().map(|&id| id as i32))
            .collect();
        let expected: Vec<f32> = items
            .iter()
            .flat_map(|item| item.targets.iter().copied())
            .collect();
        let targets: Vec<i32> = expected.iter().map(|&v| v as i32).collect();

        let token_ids = Tensor::<B, 1, Int>::from_ints(ids.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);
        let targets = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device)
            .reshape([batch_size, num_labels]);

        EmotionBatch {
            token_ids,
            targets,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::NdArray;

    use super::*;

    #[test]
    fn stacks_items_row_major() {
        let batcher = EmotionBatcher::<NdArray>::new(Default::default());
        let batch = batcher.batch(vec![
            EmotionItem {
                token_ids: vec![2, 3, 0],
                targets: vec![1.0, 0.0],
            },
            EmotionItem {
                token_ids: vec![4, 0, 0],
                targets: vec![0.0, 1.0],
            },
        ]);
        assert_eq!(batch.token_ids.dims(), [2, 3]);
        assert_eq!(batch.targets.dims(), [2, 2]);
        assert_eq!(batch.expected, vec![1.0, 0.0, 0.0, 1.0]);
    }
}
