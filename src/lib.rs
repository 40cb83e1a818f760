// ============================================================
// vg-relation-data
// ============================================================
// Dataset layer for relation-prediction pre-training of a
// vision-language encoder.
//
//   TSV row  (image_id \t json)
//       │
//       ▼
//   TsvFile / RowSource   → random access by row index
//       │
//       ▼
//   decode_row            → Record (region boxes + f32 features)
//       │
//       ▼
//   ExampleSynthesizer    → 3 masked caption variants
//       │                   (1, 2 or 3 [MASK] tokens)
//       ▼
//   FeatureEncoder        → ids / mask / segments / labels
//       │
//       ▼
//   VgRelationDataset     → Burn Dataset<RelationExample>
//       │
//       ▼
//   RelationBatcher       → RelationBatch tensors
//
// Layers:
//   domain  — plain types and rules, no I/O
//   data    — the pipeline above
//   infra   — tokenizer loading and configuration

pub mod error;
pub mod domain;
pub mod data;
pub mod infra;

pub use data::{
    batcher::{RelationBatch, RelationBatcher},
    dataset::VgRelationDataset,
    encoder::FeatureEncoder,
    synthesizer::ExampleSynthesizer,
    tsv::TsvFile,
};
pub use domain::{
    example::{CaptionVariant, EncodedFeatures, RelationExample},
    record::{Record, RegionBox, RegionFeatures},
    traits::{RowSource, SubwordTokenizer},
};
pub use error::{DatasetError, DatasetResult};
pub use infra::{config::DatasetConfig, tokenizer_store::HfTokenizer};
