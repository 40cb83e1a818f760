// ============================================================
// Infrastructure Layer
// ============================================================
// Cross-cutting pieces the pipeline needs but does not own:
//
//   tokenizer_store.rs — Loads a HuggingFace tokenizer.json (or
//                        builds a small word-level vocabulary)
//                        and exposes it as a SubwordTokenizer.
//
//   config.rs          — Sequence lengths and feature width,
//                        read from JSON and validated.
//
// Reference: Rust Book §9 (Error Handling with anyhow)

/// Tokenizer loading behind the SubwordTokenizer trait
pub mod tokenizer_store;

/// Dataset configuration
pub mod config;
