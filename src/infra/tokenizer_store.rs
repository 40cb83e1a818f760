// ============================================================
// Infrastructure — Tokenizer Store
// ============================================================
// Adapts a HuggingFace `tokenizers::Tokenizer` to the
// SubwordTokenizer trait the pipeline is written against.
//
// Two ways to get one:
//   - from_file:  a `tokenizer.json` exported with the encoder
//                 checkpoint (the normal case; WordPiece vocab)
//   - word_level: an in-memory word-level vocabulary with BERT
//                 special-token ids, for fixtures and small
//                 experiments where no checkpoint exists yet
//
// Special-token ids follow bert-base-uncased:
//   [PAD] 0   [UNK] 100   [CLS] 101   [SEP] 102   [MASK] 103
//
// Reference: HuggingFace tokenizers, tokenizer.json format

use anyhow::{Context, Result};
use std::path::Path;
use std::str::FromStr;
use tokenizers::Tokenizer;

use crate::domain::traits::SubwordTokenizer;
use crate::error::{DatasetError, DatasetResult};

const UNK_TOKEN: &str = "[UNK]";
const DEFAULT_UNK_ID: i64 = 100;

const SPECIAL_TOKENS: [(&str, u32); 5] = [
    ("[PAD]", 0),
    ("[UNK]", 100),
    ("[CLS]", 101),
    ("[SEP]", 102),
    ("[MASK]", 103),
];

pub struct HfTokenizer {
    inner: Tokenizer,
    unk_id: i64,
}

impl HfTokenizer {
    pub fn new(inner: Tokenizer) -> Self {
        let unk_id = inner
            .token_to_id(UNK_TOKEN)
            .map(i64::from)
            .unwrap_or(DEFAULT_UNK_ID);
        Self { inner, unk_id }
    }

    /// Load a `tokenizer.json`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let inner = Tokenizer::from_file(path).map_err(|e| {
            anyhow::anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })?;
        tracing::info!(
            "Loaded tokenizer from '{}' (vocab size {})",
            path.display(),
            inner.get_vocab_size(true)
        );
        Ok(Self::new(inner))
    }

    /// Build a lowercase word-level tokenizer over `words`.
    /// Words get ids from 104 upwards in the order given;
    /// duplicates and special tokens are skipped.
    pub fn word_level<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        // ── Step 1: Vocabulary ────────────────────────────────────────────────
        let mut vocab = serde_json::Map::new();
        for (token, id) in SPECIAL_TOKENS {
            vocab.insert(token.to_string(), serde_json::json!(id));
        }

        let mut next_id = 104u32;
        for word in words {
            let w = word.as_ref().to_lowercase();
            if w.is_empty() || vocab.contains_key(&w) {
                continue;
            }
            vocab.insert(w, serde_json::json!(next_id));
            next_id += 1;
        }

        // ── Step 2: tokenizer.json in HuggingFace format ──────────────────────
        let added_tokens: Vec<serde_json::Value> = SPECIAL_TOKENS
            .iter()
            .map(|(content, id)| {
                serde_json::json!({
                    "id": id, "content": content, "single_word": false,
                    "lstrip": false, "rstrip": false, "normalized": false, "special": true
                })
            })
            .collect();

        let tokenizer_json = serde_json::json!({
            "version": "1.0",
            "truncation": null,
            "padding": null,
            "added_tokens": added_tokens,
            "normalizer": {
                "type": "BertNormalizer",
                "clean_text": true,
                "handle_chinese_chars": true,
                "strip_accents": null,
                "lowercase": true
            },
            "pre_tokenizer": {
                "type": "Whitespace"
            },
            "post_processor": null,
            "decoder": null,
            "model": {
                "type": "WordLevel",
                "vocab": vocab,
                "unk_token": UNK_TOKEN
            }
        });

        let inner = Tokenizer::from_str(&tokenizer_json.to_string())
            .map_err(|e| anyhow::anyhow!("Cannot build word-level tokenizer: {e}"))
            .context("word-level tokenizer JSON was rejected")?;

        tracing::debug!("Built word-level tokenizer with {} words", next_id - 104);
        Ok(Self::new(inner))
    }

    pub fn inner(&self) -> &Tokenizer {
        &self.inner
    }
}

impl SubwordTokenizer for HfTokenizer {
    fn tokenize(&self, text: &str) -> DatasetResult<Vec<String>> {
        let encoding = self
            .inner
            .encode(text, false)
            .map_err(|e| DatasetError::Tokenizer(e.to_string()))?;
        Ok(encoding.get_tokens().to_vec())
    }

    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Vec<i64> {
        tokens
            .iter()
            .map(|t| self.inner.token_to_id(t).map(i64::from).unwrap_or(self.unk_id))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer() -> HfTokenizer {
        HfTokenizer::word_level(&["man", "hat", "wearing", "in", "red", "color", "is", "a"]).unwrap()
    }

    #[test]
    fn test_special_token_ids() {
        let tok = tokenizer();
        assert_eq!(tok.token_id("[PAD]"), 0);
        assert_eq!(tok.token_id("[CLS]"), 101);
        assert_eq!(tok.token_id("[SEP]"), 102);
        assert_eq!(tok.token_id("[MASK]"), 103);
    }

    #[test]
    fn test_mask_survives_tokenization() {
        let tok = tokenizer();
        let tokens = tok.tokenize("man is [MASK] [MASK] a hat").unwrap();
        assert_eq!(tokens, vec!["man", "is", "[MASK]", "[MASK]", "a", "hat"]);
    }

    #[test]
    fn test_lowercases_and_maps_unknown() {
        let tok = tokenizer();
        let ids = tok.encode_ids("Man zebra").unwrap();
        assert_eq!(ids, vec![104, 100]);
    }

    #[test]
    fn test_from_file_missing() {
        assert!(HfTokenizer::from_file("/nonexistent/tokenizer.json").is_err());
    }
}
