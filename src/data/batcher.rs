// ============================================================
// Data — Relation Batcher
// ============================================================
// Implements Burn's Batcher trait to stack RelationExamples
// into tensors.
//
// Shapes (N = batch size, V = 3 caption variants,
//         L = txt_seq_len, R = img_seq_len, D = feature_dim):
//
//   region_features   [N, V, R, D]   float
//   input_ids         [N, V, L]      int
//   segment_ids       [N, V, L]      int
//   attention_mask    [N, V, L + R]  int
//   lm_label_ids      [N, V, L + R]  int
//   target_variants   [N]            int
//
// Each example stores its region features once; they are
// broadcast across the three variants here so consumers still
// see one feature block per caption.
//
// Mask positions and relation label ids have variable length
// per variant and stay as plain Vecs.
//
// Reference: Burn Book §4 (Batcher)

use burn::{data::dataloader::batcher::Batcher, prelude::*};

use crate::domain::example::{CaptionVariant, RelationExample};

// ─── RelationBatch ────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct RelationBatch<B: Backend> {
    pub image_ids: Vec<String>,
    pub region_features: Tensor<B, 4>,
    pub input_ids: Tensor<B, 3, Int>,
    pub attention_mask: Tensor<B, 3, Int>,
    pub segment_ids: Tensor<B, 3, Int>,
    pub lm_label_ids: Tensor<B, 3, Int>,
    /// Which variant of each example carries the true relation
    pub target_variants: Tensor<B, 1, Int>,
    pub mask_positions: Vec<[Vec<usize>; 3]>,
    pub relation_label_ids: Vec<[Vec<i64>; 3]>,
    pub colors: Vec<[String; 2]>,
}

// ─── RelationBatcher ──────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct RelationBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> RelationBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    /// Flatten one per-variant sequence of every example into an
    /// `[N, V, len]` int tensor.
    fn stack_variants(
        &self,
        items: &[RelationExample],
        field: impl Fn(&CaptionVariant) -> &[i64],
    ) -> Tensor<B, 3, Int> {
        let batch_size = items.len();
        let num_variants = items[0].variants.len();
        let seq_len = field(&items[0].variants[0]).len();

        // Burn takes i32 for Int tensor construction
        let flat: Vec<i32> = items
            .iter()
            .flat_map(|ex| ex.variants.iter())
            .flat_map(|v| field(v).iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, num_variants, seq_len])
    }
}

impl<B: Backend> Batcher<RelationExample, RelationBatch<B>> for RelationBatcher<B> {
    fn batch(&self, items: Vec<RelationExample>) -> RelationBatch<B> {
        assert!(!items.is_empty(), "cannot batch zero examples");

        let batch_size = items.len();
        let num_variants = items[0].variants.len();
        let num_regions = items[0].region_features.num_regions();
        let dim = items[0].region_features.dim();

        // ── Region features: [N, 1, R, D] broadcast to [N, V, R, D] ───────────
        let feats_flat: Vec<f32> = items
            .iter()
            .flat_map(|ex| ex.region_features.as_slice().iter().copied())
            .collect();
        let feats = Tensor::<B, 1>::from_floats(feats_flat.as_slice(), &self.device)
            .reshape([batch_size, 1, num_regions, dim]);
        let region_features = Tensor::cat(vec![feats; num_variants], 1);

        // ── Token sequences ───────────────────────────────────────────────────
        let input_ids = self.stack_variants(&items, |v| v.input_ids.as_slice());
        let attention_mask = self.stack_variants(&items, |v| v.attention_mask.as_slice());
        let segment_ids = self.stack_variants(&items, |v| v.segment_ids.as_slice());
        let lm_label_ids = self.stack_variants(&items, |v| v.lm_label_ids.as_slice());

        let targets: Vec<i32> = items.iter().map(|ex| ex.target_variant as i32).collect();
        let target_variants = Tensor::<B, 1, Int>::from_ints(targets.as_slice(), &self.device);

        // ── Variable-length and string fields ────────────────────────────────
        let mut image_ids = Vec::with_capacity(batch_size);
        let mut colors = Vec::with_capacity(batch_size);
        let mut mask_positions = Vec::with_capacity(batch_size);
        let mut relation_label_ids = Vec::with_capacity(batch_size);
        for ex in items {
            let [v1, v2, v3] = ex.variants;
            mask_positions.push([v1.mask_positions, v2.mask_positions, v3.mask_positions]);
            relation_label_ids.push([
                v1.relation_label_ids,
                v2.relation_label_ids,
                v3.relation_label_ids,
            ]);
            image_ids.push(ex.image_id);
            colors.push(ex.colors);
        }

        RelationBatch {
            image_ids,
            region_features,
            input_ids,
            attention_mask,
            segment_ids,
            lm_label_ids,
            target_variants,
            mask_positions,
            relation_label_ids,
            colors,
        }
    }
}
