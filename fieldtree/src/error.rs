//! Error types for field tree operations.

use thiserror::Error;

use crate::data::{FieldId, FieldType};

/// Errors raised while editing or loading a field tree.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// No field with this id exists in the tree.
    #[error("field {0} not found")]
    NotFound(FieldId),

    /// Children were requested for a field that is not an object.
    #[error("field {id} is of type {field_type} and cannot hold nested fields")]
    NotAnObject { id: FieldId, field_type: FieldType },

    /// The only remaining root field cannot be removed.
    #[error("field {0} is the last root field and cannot be deleted")]
    LastRoot(FieldId),

    /// Two fields in a loaded document share an id.
    #[error("duplicate field id {0}")]
    DuplicateId(FieldId),

    /// A loaded document has children under a non-object field.
    #[error("field {id} is of type {field_type} but has nested fields")]
    UnexpectedChildren { id: FieldId, field_type: FieldType },

    /// A loaded document has no root fields.
    #[error("schema has no fields")]
    EmptySchema,

    /// A field type name could not be parsed.
    #[error("unknown field type `{0}`, expected one of: text, number, boolean, email, url, date, array, object")]
    UnknownType(String),

    /// Every field id has been handed out.
    #[error("no field ids left to allocate")]
    IdSpaceExhausted,

    /// A field id could not be parsed.
    #[error("invalid field id `{0}`")]
    InvalidId(String),
}

/// Result type for field tree operations.
pub type Result<T> = std::result::Result<T, FieldError>;
