// ============================================================
// Data — Example Synthesizer
// ============================================================
// Builds a relation-prediction example from one decoded record.
//
// The model sees the same caption three times, with the
// relation slot holding 1, 2 or 3 [MASK] tokens:
//
//   man in red color is [MASK] a hat in blue color
//   man in red color is [MASK] [MASK] a hat in blue color
//   man in red color is [MASK] [MASK] [MASK] a hat in blue color
//
// Only the variant whose mask count equals the length of the
// (canonical, tokenized) relation is labelled with the relation
// itself; the other two are labelled with placeholder phrases.
//
// text_b is the list of region labels, with the subject and
// object regions prefixed by their colours. The region indices
// come from the image id ("…_<subject>_<object>").

use crate::data::encoder::FeatureEncoder;
use crate::domain::example::{CaptionVariant, RelationExample};
use crate::domain::record::Record;
use crate::domain::relation::{
    canonical_relation, colored_labels, region_pair, CaptionTemplate, MASK_TOKEN,
    MAX_RELATION_TOKENS, PLACEHOLDER_PHRASES,
};
use crate::domain::traits::SubwordTokenizer;
use crate::error::{DatasetError, DatasetResult};

#[derive(Debug, Clone)]
pub struct ExampleSynthesizer {
    encoder: FeatureEncoder,
}

impl ExampleSynthesizer {
    pub fn new(encoder: FeatureEncoder) -> Self {
        Self { encoder }
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Build the three caption variants for `record`.
    pub fn build(
        &self,
        tokenizer: &dyn SubwordTokenizer,
        record: Record,
    ) -> DatasetResult<RelationExample> {
        let max_regions = self.encoder.max_img_seq_len;

        // ── Relation label ────────────────────────────────────────────────────
        let relation = canonical_relation(&record.relation);
        let relation_ids = tokenizer.encode_ids(relation)?;
        if relation_ids.is_empty() || relation_ids.len() > MAX_RELATION_TOKENS {
            return Err(DatasetError::RelationLength {
                relation: relation.to_string(),
                len: relation_ids.len(),
            });
        }
        let target_variant = relation_ids.len() - 1;

        // ── text_b: coloured region labels ────────────────────────────────────
        let pair = region_pair(&record.image_id)?;
        let labels = colored_labels(&record.labels(), pair, &record.colors);

        // ── Candidate labels ──────────────────────────────────────────────────
        let mut relation_labels: [Vec<i64>; MAX_RELATION_TOKENS] = Default::default();
        for (slot, phrase) in relation_labels.iter_mut().zip(PLACEHOLDER_PHRASES) {
            *slot = tokenizer.encode_ids(phrase)?;
        }
        relation_labels[target_variant] = relation_ids;

        // ── Encode each caption variant ───────────────────────────────────────
        let template = CaptionTemplate::new(&record.names, &record.colors);
        let features = record.features.clip(max_regions);
        let num_regions = features.num_regions();
        let mask_token_id = tokenizer.token_id(MASK_TOKEN);

        let [one, two, three]: [DatasetResult<CaptionVariant>; MAX_RELATION_TOKENS] =
            std::array::from_fn(|i| {
                let mask_count = i + 1;
                let caption = template.render(mask_count);
                let encoded = self.encoder.encode(tokenizer, &caption, Some(&labels), num_regions)?;
                let label_ids = std::mem::take(&mut relation_labels[i]);
                Ok(CaptionVariant::new(mask_count, encoded, mask_token_id, label_ids))
            });
        let variants = [one?, two?, three?];

        tracing::debug!(
            "Built example {} ({} regions, relation {:?} → variant {})",
            record.image_id,
            num_regions,
            relation,
            target_variant
        );

        Ok(RelationExample {
            image_id: record.image_id,
            region_features: features.pad_to(max_regions),
            variants,
            colors: record.colors,
            target_variant,
        })
    }
}
