//! Frozen, ordered emotion label set and multi-hot encoding.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Sorted list of emotion names; a label's position is its output index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    /// Build the sorted union of every tag seen across `tag_lists`.
    pub fn fit<'a, I>(tag_lists: I) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let unique: BTreeSet<&str> = tag_lists
            .into_iter()
            .flat_map(|tags| tags.iter().map(String::as_str))
            .collect();
        Self {
            labels: unique.into_iter().map(str::to_string).collect(),
        }
    }

    /// Wrap an already ordered list, e.g. a pretrained model's label map.
    pub fn from_ordered(labels: Vec<String>) -> Self {
        Self { labels }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels
            .binary_search_by(|known| known.as_str().cmp(label))
            .ok()
            .or_else(|| self.labels.iter().position(|l| l == label))
    }

    /// Multi-hot vector with a 1.0 at every tag position.
    pub fn encode(&self, tags: &[String]) -> Result<Vec<f32>> {
        let mut vector = vec![0.0; self.labels.len()];
        for tag in tags {
            let index = self
                .index_of(tag)
                .ok_or_else(|| Error::UnknownLabel(tag.clone()))?;
            vector[index] = 1.0;
        }
        Ok(vector)
    }

    /// Inverse of [`encode`](Self::encode): labels whose entry is at least 1.0.
    pub fn decode(&self, vector: &[f32]) -> Vec<String> {
        self.labels
            .iter()
            .zip(vector)
            .filter(|(_, value)| **value >= 1.0)
            .map(|(label, _)| label.clone())
            .collect()
    }
}

/// Parse an emotions cell into tags.
///
/// Accepts list literals (`['joy', "love"]`, `[]`) and bare comma separated
/// values (`joy, love`). Whitespace around items is ignored.
pub fn parse_tags(raw: &str, row: usize) -> Result<Vec<String>> {
    let malformed = |reason| Error::MalformedTags {
        row,
        raw: raw.to_string(),
        reason,
    };

    let trimmed = raw.trim();
    let body = match (trimmed.starts_with('['), trimmed.ends_with(']')) {
        (true, true) if trimmed.len() >= 2 => &trimmed[1..trimmed.len() - 1],
        (false, false) => trimmed,
        _ => return Err(malformed("unbalanced brackets")),
    };
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut tags = Vec::new();
    for item in body.split(',') {
        let item = item.trim();
        let unquoted = match item.chars().next() {
            Some(quote @ ('\'' | '"')) => item
                .strip_prefix(quote)
                .and_then(|rest| rest.strip_suffix(quote))
                .ok_or_else(|| malformed("unterminated quote"))?,
            _ => item,
        };
        if unquoted.trim().is_empty() {
            return Err(malformed("empty tag"));
        }
        if unquoted.contains(['[', ']', '\'', '"']) {
            return Err(malformed("unexpected quote or bracket inside tag"));
        }
        tags.push(unquoted.trim().to_string());
    }
    Ok(tags)
}
