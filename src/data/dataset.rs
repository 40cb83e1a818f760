use anyhow::{Context, Result};
use burn::data::dataset::Dataset;
use std::path::Path;

use crate::data::features::decode_row;
use crate::data::synthesizer::ExampleSynthesizer;
use crate::data::tsv::TsvFile;
use crate::domain::example::RelationExample;
use crate::domain::record::Record;
use crate::domain::traits::{RowSource, SubwordTokenizer};
use crate::error::DatasetResult;
use crate::infra::config::DatasetConfig;

/// Relation-prediction examples read lazily from a row source.
///
/// Nothing is cached: every `get` reads, decodes and encodes its
/// row from scratch, so the dataset can be shared across loader
/// workers without locking.
pub struct VgRelationDataset<S, T> {
    rows: S,
    tokenizer: T,
    config: DatasetConfig,
    synthesizer: ExampleSynthesizer,
}

impl<T: SubwordTokenizer> VgRelationDataset<TsvFile, T> {
    /// Open a feature TSV.
    pub fn open(path: impl AsRef<Path>, tokenizer: T, config: DatasetConfig) -> Result<Self> {
        let path = path.as_ref();
        config.validate()?;
        let rows = TsvFile::open(path)
            .with_context(|| format!("Cannot open feature file '{}'", path.display()))?;
        Ok(Self::new(rows, tokenizer, config))
    }
}

impl<S: RowSource, T: SubwordTokenizer> VgRelationDataset<S, T> {
    pub fn new(rows: S, tokenizer: T, config: DatasetConfig) -> Self {
        let synthesizer = ExampleSynthesizer::new(config.encoder());
        Self {
            rows,
            tokenizer,
            config,
            synthesizer,
        }
    }

    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// Read and decode row `index` without encoding it.
    pub fn fetch(&self, index: usize) -> DatasetResult<Record> {
        let (image_id, payload) = self.rows.row(index)?;
        decode_row(&image_id, &payload, self.config.feature_dim)
    }

    /// Read, decode and encode row `index`.
    pub fn try_get(&self, index: usize) -> DatasetResult<RelationExample> {
        let record = self.fetch(index)?;
        self.synthesizer.build(&self.tokenizer, record)
    }
}

impl<S: RowSource, T: SubwordTokenizer> Dataset<RelationExample> for VgRelationDataset<S, T> {
    /// `None` past the end only. Burn's loaders stop at the first
    /// `None`, so a row that fails to decode panics instead; use
    /// `try_get` to handle the error.
    ///
    /// # Panics
    /// If row `index` exists but cannot be decoded or encoded.
    fn get(&self, index: usize) -> Option<RelationExample> {
        if index >= self.rows.len() {
            return None;
        }
        match self.try_get(index) {
            Ok(example) => Some(example),
            Err(e) => {
                tracing::error!("Row {} failed: {}", index, e);
                panic!("row {index}: {e}");
            }
        }
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}
