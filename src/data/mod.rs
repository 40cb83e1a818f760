// ============================================================
// Data Pipeline
// ============================================================
// Everything from a TSV row to a tensor batch:
//
//   TsvFile            → (image_id, json) by row index
//       │
//       ▼
//   decode_row         → Record (base64 f32 region features)
//       │
//       ▼
//   ExampleSynthesizer → three masked captions + labels
//       │
//       ▼
//   FeatureEncoder     → padded ids / masks / segments
//       │
//       ▼
//   VgRelationDataset  → Burn's Dataset trait
//       │
//       ▼
//   RelationBatcher    → Burn's Batcher trait
//
// Each module is responsible for exactly one step.

/// Memory-mapped, row-indexed TSV reader
pub mod tsv;

/// JSON row payload and base64 feature decoding
pub mod features;

/// Token / segment / mask encoding for one caption
pub mod encoder;

/// Caption variants and relation labels for one record
pub mod synthesizer;

/// Burn Dataset over a row source
pub mod dataset;

/// Burn Batcher producing relation batches
pub mod batcher;

#[cfg(test)]
pub(crate) mod test_support;
