//! Error types for field controllers

use blockpress_core::ContentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Unknown Content block '{0}'")]
    UnknownBlock(String),

    #[error("Unable to load Content block '{block_type}': {message}")]
    Load { block_type: String, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type FieldResult<T> = Result<T, FieldError>;
