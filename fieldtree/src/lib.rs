//! # fieldtree
//!
//! Compose a nested field schema and render a sample JSON document from it.
//!
//! A schema is an ordered forest of fields. Every field has a key, a type and a
//! required flag; `object` fields hold child fields of their own. The sample
//! generator folds the forest into a JSON object with a fixed placeholder per
//! type, so the same schema always renders the same document.
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldtree::data::{FieldTree, FieldType, FieldUpdate};
//!
//! let mut tree = FieldTree::new();
//! let address = tree.add_root().unwrap();
//! tree.update(address, FieldUpdate::default().with_key("address").with_type(FieldType::Object))
//!     .unwrap();
//! let city = tree.add_child(address).unwrap();
//! tree.update(city, FieldUpdate::default().with_key("city")).unwrap();
//!
//! let sample = tree.sample();
//! assert_eq!(sample["address"]["city"], "sample text");
//! ```
//!
//! ## Modules
//!
//! - [`data`] - Field nodes, the field tree and the sample generator
//! - [`error`] - Errors raised by tree edits and document loading
//! - [`render`] - Text rendering of the tree and of the sample
//! - [`run`] - Command-line front end

#[macro_use]
extern crate log;

/// Field nodes, the field tree model and persistence of schema documents.
pub mod data;

/// Errors raised by tree edits and document loading.
pub mod error;

/// Text rendering of the field tree and of the sample document.
pub mod render;

/// Command-line front end.
pub mod run;

pub use error::{FieldError, Result};
pub use run::*;
pub use serde_json::Value;
