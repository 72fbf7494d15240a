//! # Blockpress Fields
//!
//! The Content field: built-in blocks, asynchronous block loading and the
//! per-field controller that drives `blockpress-core`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockpress_fields::{ContentController, ContentFieldConfig, FieldInput, StaticBlockLoader};
//!
//! let controller = ContentController::new(
//!     ContentFieldConfig::new("body").with_block_types(["cloudinaryImage", "relationshipTag"]),
//!     Arc::new(StaticBlockLoader::builtin()),
//! );
//!
//! let payload = controller.serialize(FieldInput::Editor(&editor)).await?;
//! let body = payload.to_json()?;
//! ```

pub mod blocks;
mod config;
mod controller;
mod errors;
mod loader;

pub use blocks::{builtin_blocks, builtin_persisted_types};
pub use config::ContentFieldConfig;
pub use controller::{BlockSettings, ContentController, FieldInput, FieldPayload, LoadedBlocks};
pub use errors::{FieldError, FieldResult};
pub use loader::{BlockLoader, LoadedBlock, StaticBlockLoader};
