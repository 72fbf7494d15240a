//! Error types for the content core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Encountered more than one block with type '{block_type}'. Block types must be unique")]
    RegistrationConflict { block_type: String },

    #[error("Block '{block_type}' has no usable {capability} capability")]
    MalformedHandler {
        block_type: String,
        capability: &'static str,
    },

    #[error("Block '{block_type}' returned mutations without a serialized node")]
    ContractViolation { block_type: String },

    #[error("Unable to find data for {path}.{reference}")]
    UnresolvedReference { path: String, reference: String },

    #[error("Invalid mutation path: {0}")]
    InvalidMutationPath(String),

    #[error("Invalid data for block '{block_type}': {message}")]
    InvalidBlockData { block_type: String, message: String },

    #[error("Document is read-only")]
    ReadOnly,

    #[error("Document is already being serialized")]
    DocumentBusy,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ContentError {
    pub fn invalid_data(block_type: impl Into<String>, message: impl Into<String>) -> Self {
        ContentError::InvalidBlockData {
            block_type: block_type.into(),
            message: message.into(),
        }
    }
}

pub type ContentResult<T> = Result<T, ContentError>;
