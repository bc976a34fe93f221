//! Error types for the mock store

use thiserror::Error;

use crate::value::Value;

/// Result type for mock store operations
pub type Result<T> = std::result::Result<T, MockError>;

/// Mock store errors
///
/// Every variant is raised at the point of detection; nothing is retried.
#[derive(Error, Debug)]
pub enum MockError {
    #[error("Type {type_name} does not exist on schema{}", did_you_mean(.suggestion))]
    UnknownType {
        type_name: String,
        suggestion: Option<String>,
    },

    #[error("Type {type_name} is not an object type")]
    NotAnObjectType { type_name: String },

    #[error("Field {field_name} does not exist on type {type_name}{}", did_you_mean(.suggestion))]
    UnknownField {
        type_name: String,
        field_name: String,
        suggestion: Option<String>,
    },

    #[error("No mock provided for scalar {scalar}")]
    MissingGenerator { scalar: String },

    #[error("Field {field_name} is a key field of {type_name} and you are trying to set it to {value} while the key is {key}")]
    KeyFieldMismatch {
        type_name: String,
        field_name: String,
        key: String,
        value: Value,
    },

    #[error("Value to set in {type_name}.{field_name} is not normalizable: expected {expected}, got {value}")]
    ShapeMismatch {
        type_name: String,
        field_name: String,
        expected: String,
        value: Value,
    },

    #[error("Value returned by the mock for {type_name} is not a record: {value}")]
    MalformedMock { type_name: String, value: Value },

    #[error("Expected {type_name}.{field_name} to hold a reference, got {value}")]
    NotARef {
        type_name: String,
        field_name: String,
        value: Value,
    },

    #[error("Expected a record of {type_name} fields, got {value}")]
    ExpectedRecord { type_name: String, value: Value },

    #[error("A key is required to read {type_name}.{field_name}")]
    MissingKey {
        type_name: String,
        field_name: String,
    },

    #[error("Cannot use {value} as an identity for {type_name}")]
    InvalidKey { type_name: String, value: Value },

    #[error("Root type {type_name} can only be addressed with key {expected}, got {key}")]
    RootKeyMismatch {
        type_name: String,
        expected: String,
        key: String,
    },

    #[error("SDL parse error at {line}:{column}: {message}")]
    SdlParse {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean {}?)", name),
        None => String::new(),
    }
}
