// ============================================================
// Data — Feature Encoder
// ============================================================
// Turns one (caption, region labels) text pair plus a region
// count into the fixed-length sequences a BERT-style encoder
// expects.
//
// BERT input convention:
//   tokens:   [CLS] man is [MASK] a hat [SEP] man hat tree [SEP]
//   segments:   0    0   0   0    0  0    0    1   1   1     1
//
// Steps:
//   1. Tokenize text_a and text_b separately
//   2. Truncate the pair to max_seq_len - 3, always trimming the
//      currently longer side (single text: max_seq_len - 2)
//   3. Wrap in [CLS] / [SEP] markers and assign segment ids
//   4. Convert to ids, build the attention mask, zero-pad
//   5. Append one mask slot per region (1 real, 0 padding) and
//      -1 labels for every region slot
//
// Reference: Devlin et al. (2019) BERT, §3 (input representation)

use crate::domain::example::EncodedFeatures;
use crate::domain::traits::SubwordTokenizer;
use crate::error::DatasetResult;

pub const CLS_TOKEN: &str = "[CLS]";
pub const SEP_TOKEN: &str = "[SEP]";

/// Label value for positions that carry no masked-LM target.
pub const IGNORE_LABEL: i64 = -1;

const PAD_TOKEN_ID: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEncoder {
    /// Region slots appended to the attention mask and labels
    pub max_img_seq_len: usize,
    /// Upper bound for the caption span; validated by the config,
    /// truncation itself works on the pair total
    pub max_seq_a_len: usize,
    /// Length of the text portion of every sequence
    pub max_seq_len: usize,
    pub cls_token_segment_id: i64,
    pub pad_token_segment_id: i64,
    pub sequence_a_segment_id: i64,
    pub sequence_b_segment_id: i64,
}

impl FeatureEncoder {
    pub fn new(max_img_seq_len: usize, max_seq_a_len: usize, max_seq_len: usize) -> Self {
        Self {
            max_img_seq_len,
            max_seq_a_len,
            max_seq_len,
            cls_token_segment_id: 0,
            pad_token_segment_id: 0,
            sequence_a_segment_id: 0,
            sequence_b_segment_id: 1,
        }
    }

    /// Encode `text_a` (and optionally `text_b`) for an image with
    /// `num_regions` regions.
    ///
    /// # Panics
    /// If a text sequence does not come out exactly `max_seq_len`
    /// long, e.g. when `max_seq_len` cannot hold the `[CLS]` and
    /// `[SEP]` markers.
    pub fn encode(
        &self,
        tokenizer: &dyn SubwordTokenizer,
        text_a: &str,
        text_b: Option<&str>,
        num_regions: usize,
    ) -> DatasetResult<EncodedFeatures> {
        let mut tokens_a = tokenizer.tokenize(text_a)?;
        let mut tokens_b = Vec::new();

        match text_b.filter(|t| !t.is_empty()) {
            Some(text_b) => {
                tokens_b = tokenizer.tokenize(text_b)?;
                truncate_seq_pair(&mut tokens_a, &mut tokens_b, self.max_seq_len.saturating_sub(3));
            }
            None => tokens_a.truncate(self.max_seq_len.saturating_sub(2)),
        }

        // ── [CLS] a [SEP] (b [SEP]) ──────────────────────────────────────────
        let mut tokens = Vec::with_capacity(self.max_seq_len);
        let mut segment_ids = Vec::with_capacity(self.max_seq_len);

        tokens.push(CLS_TOKEN.to_string());
        segment_ids.push(self.cls_token_segment_id);
        for token in tokens_a {
            tokens.push(token);
            segment_ids.push(self.sequence_a_segment_id);
        }
        tokens.push(SEP_TOKEN.to_string());
        segment_ids.push(self.sequence_a_segment_id);

        if !tokens_b.is_empty() {
            for token in tokens_b {
                tokens.push(token);
                segment_ids.push(self.sequence_b_segment_id);
            }
            tokens.push(SEP_TOKEN.to_string());
            segment_ids.push(self.sequence_b_segment_id);
        }

        let mut input_ids = tokenizer.convert_tokens_to_ids(&tokens);
        let mut attention_mask = vec![1i64; input_ids.len()];
        let mut lm_label_ids = vec![IGNORE_LABEL; input_ids.len()];

        // ── Zero-pad the text portion ────────────────────────────────────────
        while input_ids.len() < self.max_seq_len {
            input_ids.push(PAD_TOKEN_ID);
            attention_mask.push(0);
            segment_ids.push(self.pad_token_segment_id);
            lm_label_ids.push(IGNORE_LABEL);
        }

        assert_eq!(input_ids.len(), self.max_seq_len, "input_ids length");
        assert_eq!(attention_mask.len(), self.max_seq_len, "attention_mask length");
        assert_eq!(segment_ids.len(), self.max_seq_len, "segment_ids length");
        assert_eq!(lm_label_ids.len(), self.max_seq_len, "lm_label_ids length");

        // ── Region slots ─────────────────────────────────────────────────────
        if self.max_img_seq_len > 0 {
            let real = num_regions.min(self.max_img_seq_len);
            attention_mask.extend(std::iter::repeat(1).take(real));
            attention_mask.extend(std::iter::repeat(0).take(self.max_img_seq_len - real));
        }
        lm_label_ids.extend(std::iter::repeat(IGNORE_LABEL).take(self.max_img_seq_len));

        Ok(EncodedFeatures {
            input_ids,
            attention_mask,
            segment_ids,
            lm_label_ids,
        })
    }
}

/// Trim a token pair in place until it fits `max_length`,
/// removing the last token of the longer side each step (the
/// second side on ties). One long side loses more than a short
/// side would, which keeps the most information overall.
pub fn truncate_seq_pair(tokens_a: &mut Vec<String>, tokens_b: &mut Vec<String>, max_length: usize) {
    while tokens_a.len() + tokens_b.len() > max_length {
        if tokens_a.len() > tokens_b.len() {
            tokens_a.pop();
        } else {
            tokens_b.pop();
        }
    }
}
