// ============================================================
// Infrastructure — Dataset Configuration
// ============================================================
// Sequence lengths and feature width shared by the encoder,
// the synthesizer and the batcher.
//
// Stored as JSON next to the feature files so every run reads
// the same contract:
//
//   {"txt_seq_len": 70, "img_seq_len": 60,
//    "max_seq_a_len": 40, "feature_dim": 2054}
//
// Missing fields fall back to the defaults below.

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::data::encoder::FeatureEncoder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Text positions per caption variant ([CLS] … [SEP] … [SEP] + padding)
    pub txt_seq_len: usize,
    /// Region slots per example; extra regions are dropped
    pub img_seq_len: usize,
    /// Caption span bound handed to the encoder
    pub max_seq_a_len: usize,
    /// f32 values per region feature vector
    pub feature_dim: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            txt_seq_len: 70,
            img_seq_len: 60,
            max_seq_a_len: 40,
            feature_dim: 2054,
        }
    }
}

impl DatasetConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Cannot read dataset config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("Invalid dataset config '{}'", path.display()))?;
        cfg.validate()?;
        tracing::info!("Loaded dataset config from '{}': {:?}", path.display(), cfg);
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.txt_seq_len >= 3,
            "txt_seq_len must leave room for [CLS] and two [SEP] (got {})",
            self.txt_seq_len
        );
        ensure!(self.feature_dim > 0, "feature_dim must be positive");
        ensure!(
            self.max_seq_a_len <= self.txt_seq_len - 2,
            "max_seq_a_len ({}) exceeds txt_seq_len - 2 ({})",
            self.max_seq_a_len,
            self.txt_seq_len - 2
        );
        Ok(())
    }

    pub fn encoder(&self) -> FeatureEncoder {
        FeatureEncoder::new(self.img_seq_len, self.max_seq_a_len, self.txt_seq_len)
    }
}
