// Shared fixtures for data-layer unit tests.

use std::collections::HashMap;

use base64::Engine;

use crate::domain::traits::SubwordTokenizer;
use crate::error::DatasetResult;

pub const PAD_ID: i64 = 0;
pub const UNK_ID: i64 = 100;
pub const CLS_ID: i64 = 101;
pub const SEP_ID: i64 = 102;
pub const MASK_ID: i64 = 103;

/// Whitespace tokenizer over a fixed vocabulary with BERT
/// special-token ids. Words not in the vocabulary map to UNK.
pub struct WhitespaceTokenizer {
    vocab: HashMap<String, i64>,
}

impl WhitespaceTokenizer {
    pub fn new(words: &[&str]) -> Self {
        let mut vocab: HashMap<String, i64> = [
            ("[PAD]", PAD_ID),
            ("[UNK]", UNK_ID),
            ("[CLS]", CLS_ID),
            ("[SEP]", SEP_ID),
            ("[MASK]", MASK_ID),
        ]
        .into_iter()
        .map(|(t, id)| (t.to_string(), id))
        .collect();

        for (i, word) in words.iter().enumerate() {
            vocab.entry(word.to_string()).or_insert(1000 + i as i64);
        }
        Self { vocab }
    }

    /// Vocabulary covering the default fixture record.
    pub fn fixture() -> Self {
        Self::new(&[
            "man", "hat", "shirt", "tree", "dog", "in", "red", "blue", "color", "is", "a",
            "wearing", "having", "sitting", "on", "irrelevant", "no", "relation", "with",
        ])
    }

    pub fn id(&self, word: &str) -> i64 {
        self.vocab.get(word).copied().unwrap_or(UNK_ID)
    }
}

impl SubwordTokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> DatasetResult<Vec<String>> {
        Ok(text.split_whitespace().map(str::to_string).collect())
    }

    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Vec<i64> {
        tokens.iter().map(|t| self.id(t)).collect()
    }
}

/// Base64 of little-endian f32 values.
pub fn encode_feature(values: &[f32]) -> String {
    let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// JSON payload of one row in the nested-boxlist layout.
pub fn row_json(
    classes: &[&str],
    dim: usize,
    colors: [&str; 2],
    names: [&str; 2],
    relation: &str,
) -> String {
    let boxes: Vec<serde_json::Value> = classes
        .iter()
        .enumerate()
        .map(|(i, class)| {
            let values = vec![i as f32 + 1.0; dim];
            serde_json::json!({
                "rect": [0.0, 0.0, 10.0, 10.0],
                "class": class,
                "feature": encode_feature(&values),
            })
        })
        .collect();

    serde_json::json!({
        "objects": [[boxes], colors, names, relation]
    })
    .to_string()
}
