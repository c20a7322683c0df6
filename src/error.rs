use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SectionfigError {
    #[error("'{0}' is not a record type")]
    NotARecord(String),

    #[error("Unsupported type '{ty}' for field '{field}'")]
    UnsupportedType { field: String, ty: String },

    #[error("Record '{record}' declares more than one repeated collection")]
    MultipleMany { record: String },

    #[error("Record '{record}' contains itself through '{field}'")]
    RecursiveRecord { record: String, field: String },

    #[error("Unmatched key '{key}': no field declared for it and no '_many' collection to absorb it")]
    UnmatchedKey { key: String },

    #[error("Missing required value '{key}'")]
    MissingValue { key: String },

    #[error("Expected {expected} at '{key}'")]
    ShapeMismatch { key: String, expected: &'static str },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Invalid spec declaration '{declaration}' for '{key}'")]
    InvalidDeclaration { key: String, declaration: String },

    #[error("Configuration does not match its spec")]
    ValidationFailed(Vec<SectionfigError>),

    #[error("Failed to build '{record}': {source}")]
    Construct {
        record: String,
        source: toml::de::Error,
    },

    #[error("Record '{record}' does not consume lifted key '{key}'")]
    UnconsumedKey { record: String, key: String },

    #[error("Failed to parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
}
