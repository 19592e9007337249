//! Decode errors for whole-response decoders.
//!
//! Line classifiers and list decoders never fail: an unmatched line is simply skipped.
//! Only decoders that must produce one trustworthy summary report errors here.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("response is not a JSON object")]
    NotAnObject,
    #[error("missing field '{0}'")]
    MissingField(&'static str),
    #[error("field '{field}' is not a base-10 integer: '{value}'")]
    MalformedInteger { field: &'static str, value: String },
    #[error("field '{field}' is not a finite number: '{value}'")]
    MalformedFloat { field: &'static str, value: String },
    #[error("field '{field}' is out of range: '{value}'")]
    OutOfRange { field: &'static str, value: String },
    #[error("unexpected response to {command}: '{response}'")]
    UnexpectedResponse {
        command: &'static str,
        response: String,
    },
}
