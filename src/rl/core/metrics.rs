//! Metrics Records
//!
//! Ordered name → scalar maps emitted by the training loop and returned by
//! agent updates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key every agent update must report
pub const WEIGHTED_LOSS: &str = "weighted_loss";
/// Mean weighted loss over the updates of one iteration
pub const EPISODE_LOSS: &str = "episode_loss";
pub const EPISODE: &str = "episode";
pub const STEP: &str = "step";
pub const ENV_STEP: &str = "env_step";
pub const TOTAL_TIME: &str = "total_time";
pub const EPISODE_REWARD: &str = "episode_reward";

/// Record category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Train,
    Eval,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Train => "train",
            Category::Eval => "eval",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping from metric name to value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricsRecord {
    values: BTreeMap<String, f64>,
}

impl MetricsRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: f64) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Copy every entry of `other` into this record, overwriting duplicates
    pub fn extend(&mut self, other: &MetricsRecord) {
        for (name, value) in &other.values {
            self.values.insert(name.clone(), *value);
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Copy without the entries named in `names`
    pub fn without(&self, names: &[&str]) -> MetricsRecord {
        MetricsRecord {
            values: self
                .values
                .iter()
                .filter(|(k, _)| !names.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
        }
    }
}

impl FromIterator<(String, f64)> for MetricsRecord {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
