// ============================================================
// Domain Layer
// ============================================================
// Plain Rust structs, enums, and traits that define what a
// relation-prediction example IS.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain data, pure functions, and traits
//
// The data layer decodes rows into these types and the
// batcher turns them into tensors.

/// A decoded row: regions, features, colours, names, relation
pub mod record;

/// Encoder output and the three caption variants per example
pub mod example;

/// Relation vocabulary rules and caption templates
pub mod relation;

/// Tokenizer and row-source abstractions
pub mod traits;
