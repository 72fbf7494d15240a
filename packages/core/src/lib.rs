//! # Blockpress Core
//!
//! Serialization of rich-text documents with embedded blocks.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ editor: live document + read-only lease      │
//! └──────────────────────────────────────────────┘
//!                     ↓ snapshot
//! ┌──────────────────────────────────────────────┐
//! │ serializer: walk + block handlers            │
//! │  → pruned tree with _mutationPaths           │
//! │  → create/connect batches per block path     │
//! └──────────────────────────────────────────────┘
//!                     ↓ assemble (disconnectAll)
//! ┌──────────────────────────────────────────────┐
//! │ persistence layer (external)                 │
//! └──────────────────────────────────────────────┘
//!                     ↓ results / records
//! ┌──────────────────────────────────────────────┐
//! │ linker: _mutationPaths → _joinId             │
//! │ deserializer: _joinId + records → tree       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use blockpress_core::{assemble, serialize_editor, BlockRegistry, Editor};
//!
//! let registry = BlockRegistry::new(blocks)?;
//! let editor = Editor::new(document);
//!
//! let serialization = serialize_editor(&editor, &registry)?;
//! let envelope = assemble(serialization);
//! ```

mod batch;
mod block;
mod deserializer;
mod editor;
mod errors;
mod inflect;
mod linker;
mod node;
mod registry;
mod serializer;
mod walker;

pub use batch::{assemble, ActionBatch, MutationBatches, MutationEnvelope, MutationPath, PathMutation, Serialization};
pub use block::{Action, Block, Capabilities, Mutations, SerializeContext, Serialized};
pub use deserializer::{deserialize, ResolvedDocument};
pub use editor::{Editor, EditorLease};
pub use errors::{ContentError, ContentResult};
pub use inflect::pluralize;
pub use linker::link;
pub use node::{Data, Node, NodeKind, JOIN_IDS_KEY, JOIN_ID_KEY, MUTATION_PATHS_KEY};
pub use registry::{BlockRegistry, RegisteredBlock};
pub use serializer::{serialize, serialize_editor};
pub use walker::{walk, walk_children, walk_default, Visited, Visitor};
