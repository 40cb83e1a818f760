// ============================================================
// Domain — Core Traits
// ============================================================
// The two collaborators the pipeline depends on but does not
// own: a subword tokenizer with its vocabulary, and a store of
// rows that can be read by index.
//
// Implementations:
//   - HfTokenizer              → SubwordTokenizer (HuggingFace)
//   - TsvFile                  → RowSource (memory-mapped TSV)
//   - Vec<(String, String)>    → RowSource (in-memory rows)
//
// Both traits take &self only. The Burn DataLoader may call
// into the dataset from several worker threads at once, so
// implementations must be Send + Sync and free of interior
// mutation.

use crate::error::DatasetResult;

// ─── SubwordTokenizer ─────────────────────────────────────────────────────────
/// A BERT-style subword tokenizer.
///
/// Special tokens (`[CLS]`, `[SEP]`, `[MASK]`) must come back
/// from `tokenize` as single tokens and map to their ids in
/// `convert_tokens_to_ids`.
pub trait SubwordTokenizer: Send + Sync {
    /// Split text into subword tokens.
    fn tokenize(&self, text: &str) -> DatasetResult<Vec<String>>;

    /// Map tokens to vocabulary ids. Unknown tokens map to the
    /// unknown-token id.
    fn convert_tokens_to_ids(&self, tokens: &[String]) -> Vec<i64>;

    /// Tokenize and convert in one step.
    fn encode_ids(&self, text: &str) -> DatasetResult<Vec<i64>> {
        let tokens = self.tokenize(text)?;
        Ok(self.convert_tokens_to_ids(&tokens))
    }

    /// Id of a single token, e.g. `[MASK]`.
    fn token_id(&self, token: &str) -> i64 {
        self.convert_tokens_to_ids(&[token.to_string()])[0]
    }
}

// ─── RowSource ────────────────────────────────────────────────────────────────
/// Random access to `(image_id, json)` rows by index.
pub trait RowSource: Send + Sync {
    /// Number of rows.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read one row as `(image_id, json payload)`.
    fn row(&self, index: usize) -> DatasetResult<(String, String)>;
}
