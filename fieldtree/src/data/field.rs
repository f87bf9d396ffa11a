use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::FieldError;

/// Identifier of a field, unique within one tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct FieldId(u64);

impl FieldId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Numeric value of the id.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl FromStr for FieldId {
    type Err = FieldError;

    /// Accepts `7` as well as `#7`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        digits
            .parse::<u64>()
            .map(FieldId)
            .map_err(|_| FieldError::InvalidId(s.to_string()))
    }
}

/// Declared type of a field.
///
/// Written in lowercase; read with the same case-insensitive rules as
/// [`FromStr`], so legacy names like `String` or `Nested` still load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Free text.
    #[default]
    Text,
    /// Numeric value.
    Number,
    /// True or false.
    Boolean,
    /// Email address.
    Email,
    /// URL.
    Url,
    /// Calendar date.
    Date,
    /// List of scalar items.
    Array,
    /// Container of nested fields.
    Object,
}

impl FieldType {
    /// Every field type, in the order offered to users.
    pub const ALL: [FieldType; 8] = [
        FieldType::Text,
        FieldType::Number,
        FieldType::Boolean,
        FieldType::Email,
        FieldType::Url,
        FieldType::Date,
        FieldType::Array,
        FieldType::Object,
    ];

    /// Lowercase name used in documents and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Email => "email",
            FieldType::Url => "url",
            FieldType::Date => "date",
            FieldType::Array => "array",
            FieldType::Object => "object",
        }
    }

    /// Human readable label.
    pub fn label(self) -> &'static str {
        match self {
            FieldType::Text => "Text",
            FieldType::Number => "Number",
            FieldType::Boolean => "Boolean",
            FieldType::Email => "Email",
            FieldType::Url => "URL",
            FieldType::Date => "Date",
            FieldType::Array => "Array",
            FieldType::Object => "Object",
        }
    }

    /// Only objects hold nested fields.
    pub fn can_have_children(self) -> bool {
        self == FieldType::Object
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FieldType {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let ty = match lower.as_str() {
            "text" | "string" => FieldType::Text,
            "number" => FieldType::Number,
            "boolean" | "bool" => FieldType::Boolean,
            "email" => FieldType::Email,
            "url" => FieldType::Url,
            "date" => FieldType::Date,
            "array" => FieldType::Array,
            "object" | "nested" => FieldType::Object,
            _ => return Err(FieldError::UnknownType(s.to_string())),
        };
        Ok(ty)
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// A single field of the schema.
///
/// Leaf fields never hold children; the tree keeps that invariant when types
/// change and when documents are loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldNode {
    id: FieldId,
    key: String,
    #[serde(rename = "type", default)]
    field_type: FieldType,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    children: Vec<FieldNode>,
}

impl FieldNode {
    pub(crate) fn new(
        id: FieldId,
        key: impl Into<String>,
        field_type: FieldType,
        required: bool,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            field_type,
            required,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn required(&self) -> bool {
        self.required
    }

    /// Nested fields, always empty for non-object fields.
    pub fn children(&self) -> &[FieldNode] {
        &self.children
    }

    pub fn can_have_children(&self) -> bool {
        self.field_type.can_have_children()
    }

    /// Merge a partial update into this field.
    ///
    /// Switching to `object` keeps any existing children; switching to any
    /// other type drops them. Returns whether anything changed.
    pub fn apply(&mut self, update: FieldUpdate) -> bool {
        let before = self.clone();

        if let Some(key) = update.key {
            self.key = key;
        }
        if let Some(required) = update.required {
            self.required = required;
        }
        if let Some(field_type) = update.field_type {
            self.field_type = field_type;
            if !field_type.can_have_children() {
                self.children.clear();
            }
        }

        *self != before
    }

    pub(crate) fn push_child(&mut self, child: FieldNode) {
        debug_assert!(self.can_have_children());
        self.children.push(child);
    }

    pub(crate) fn children_mut(&mut self) -> &mut Vec<FieldNode> {
        &mut self.children
    }
}

/// Partial update of a field. Unset members leave the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldUpdate {
    pub key: Option<String>,
    pub field_type: Option<FieldType>,
    pub required: Option<bool>,
}

impl FieldUpdate {
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_type(mut self, field_type: FieldType) -> Self {
        self.field_type = Some(field_type);
        self
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// True when the update would not touch any member.
    pub fn is_empty(&self) -> bool {
        self.key.is_none() && self.field_type.is_none() && self.required.is_none()
    }
}
