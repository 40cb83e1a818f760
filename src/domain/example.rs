// ============================================================
// Domain — Encoded Examples
// ============================================================
// What the dataset hands to the batcher.
//
// Sequence layout of one caption variant (txt_seq_len = L,
// img_seq_len = R):
//
//   input_ids       [CLS] caption [SEP] labels [SEP] 0 0 …    L
//   segment_ids       0     0…0     0     1…1    1   0 0 …    L
//   attention_mask    1     1…1     1     1…1    1   0 0 … | regions 1…1 0…0   L + R
//   lm_label_ids     -1    -1…     -1    -1…    -1  -1 …  | -1 …              L + R
//
// All sequences are i64 to match the encoder's input contract.

use serde::{Deserialize, Serialize};

use crate::domain::record::RegionFeatures;

/// Output of `FeatureEncoder::encode` for one text pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedFeatures {
    /// Token ids, length L
    pub input_ids: Vec<i64>,
    /// Text mask followed by region mask, length L + R
    pub attention_mask: Vec<i64>,
    /// Segment ids, length L
    pub segment_ids: Vec<i64>,
    /// Masked-LM labels, all -1 here, length L + R
    pub lm_label_ids: Vec<i64>,
}

/// One of the three candidate captions of an example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionVariant {
    /// Number of `[MASK]` tokens in the caption (1, 2 or 3)
    pub mask_count: usize,
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub segment_ids: Vec<i64>,
    pub lm_label_ids: Vec<i64>,
    /// Positions in `input_ids` holding the `[MASK]` id
    pub mask_positions: Vec<usize>,
    /// Target token ids for the masked slots: the true relation
    /// when `mask_count` matches its length, else a placeholder
    /// phrase
    pub relation_label_ids: Vec<i64>,
}

impl CaptionVariant {
    pub fn new(
        mask_count: usize,
        encoded: EncodedFeatures,
        mask_token_id: i64,
        relation_label_ids: Vec<i64>,
    ) -> Self {
        let mask_positions = encoded
            .input_ids
            .iter()
            .enumerate()
            .filter(|&(_, &id)| id == mask_token_id)
            .map(|(i, _)| i)
            .collect();

        Self {
            mask_count,
            input_ids: encoded.input_ids,
            attention_mask: encoded.attention_mask,
            segment_ids: encoded.segment_ids,
            lm_label_ids: encoded.lm_label_ids,
            mask_positions,
            relation_label_ids,
        }
    }
}

/// A fully encoded relation-prediction example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationExample {
    pub image_id: String,
    /// Region features clipped and zero-padded to `[R, dim]`.
    /// Shared by all three variants; the batcher broadcasts it.
    pub region_features: RegionFeatures,
    /// Variants for 1, 2 and 3 mask tokens, in that order
    pub variants: [CaptionVariant; 3],
    pub colors: [String; 2],
    /// Index into `variants` whose label is the true relation
    pub target_variant: usize,
}

impl RelationExample {
    /// Region features repeated once per variant, `[3, R, dim]`.
    pub fn stacked_region_features(&self) -> Vec<f32> {
        self.region_features.as_slice().repeat(self.variants.len())
    }
}
