//! Error types for row decoding and example construction.

use std::path::PathBuf;
use thiserror::Error;

pub type DatasetResult<T> = Result<T, DatasetError>;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("row index {index} out of range (rows: {len})")]
    RowOutOfRange { index: usize, len: usize },
    #[error("row {index} has {columns} column(s), expected at least 2")]
    MalformedRow { index: usize, columns: usize },
    #[error("json decode error for {image_id}: {source}")]
    Json {
        image_id: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("base64 decode error for {image_id} region {region}: {source}")]
    Base64 {
        image_id: String,
        region: usize,
        #[source]
        source: base64::DecodeError,
    },
    #[error("feature buffer for {image_id} region {region} is {bytes} bytes, not a multiple of 4")]
    FeatureBytes {
        image_id: String,
        region: usize,
        bytes: usize,
    },
    #[error("feature width for {image_id} region {region} is {width}, expected {expected}")]
    FeatureWidth {
        image_id: String,
        region: usize,
        width: usize,
        expected: usize,
    },
    #[error("{image_id} has {len} {field}, expected at least 2")]
    PairField {
        image_id: String,
        field: &'static str,
        len: usize,
    },
    #[error("{image_id} has no regions")]
    EmptyRegions { image_id: String },
    #[error("image id {image_id:?} does not end in two integer indices")]
    ImageId { image_id: String },
    #[error("relation {relation:?} tokenizes to {len} sub-words, expected 1 to 3")]
    RelationLength { relation: String, len: usize },
    #[error("tokenizer error: {0}")]
    Tokenizer(String),
}
