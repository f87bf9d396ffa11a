//! Field schema data structures.
//!
//! This module provides the model behind the schema builder:
//!
//! - Field nodes and their types
//! - The ordered field forest with add/update/delete at any depth
//! - The sample JSON generator
//! - Loading and saving schema documents
//!
//! ## Architecture
//!
//! - [`field`] - Single field node, field types and partial updates
//! - [`tree`] - The field forest and its edit operations
//! - [`sample`] - Type to placeholder mapping and the sample fold
//! - [`session`] - Working document bound to a file on disk

/// Single field node, field types and partial updates.
pub mod field;

/// The field forest and its edit operations.
pub mod tree;

/// Sample JSON generation.
pub mod sample;

/// Working document container and file persistence.
pub mod session;

pub use field::{FieldId, FieldNode, FieldType, FieldUpdate};
pub use sample::SampleFormat;
pub use session::{DocumentFormat, SchemaDocument, Session};
pub use tree::FieldTree;
