//! Placeholder values per field type and the fold that turns a field forest
//! into a sample document.
//!
//! | type                  | sample                 |
//! |-----------------------|------------------------|
//! | `text`, `email`, `url`| `"sample text"`        |
//! | `number`              | `42`                   |
//! | `boolean`             | `true`                 |
//! | `date`                | `"2024-01-01"`         |
//! | `array`               | `["item1", "item2"]`   |
//! | `object`              | fold of its children   |

use clap::ValueEnum;
use serde_json::{Map, Value, json};

use crate::data::field::{FieldNode, FieldType};

pub const SAMPLE_TEXT: &str = "sample text";
pub const SAMPLE_NUMBER: i64 = 42;
pub const SAMPLE_DATE: &str = "2024-01-01";
pub const SAMPLE_ITEMS: [&str; 2] = ["item1", "item2"];

/// Output layout of the rendered sample.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleFormat {
    /// Two-space indented JSON.
    #[default]
    Pretty,
    /// Single-line JSON.
    Compact,
}

/// Placeholder for a scalar type, `None` for objects.
pub fn placeholder(field_type: FieldType) -> Option<Value> {
    let value = match field_type {
        FieldType::Text | FieldType::Email | FieldType::Url => json!(SAMPLE_TEXT),
        FieldType::Number => json!(SAMPLE_NUMBER),
        FieldType::Boolean => json!(true),
        FieldType::Date => json!(SAMPLE_DATE),
        FieldType::Array => json!(SAMPLE_ITEMS),
        FieldType::Object => return None,
    };
    Some(value)
}

impl FieldNode {
    /// Sample value of this field, recursing into objects.
    pub fn sample(&self) -> Value {
        placeholder(self.field_type()).unwrap_or_else(|| generate(self.children()))
    }
}

/// Fold sibling fields into a JSON object in tree order.
///
/// A repeated key keeps the position of its first occurrence and takes the
/// value of the last one.
pub fn generate(fields: &[FieldNode]) -> Value {
    let mut map = Map::new();
    for field in fields {
        map.insert(field.key().to_string(), field.sample());
    }
    Value::Object(map)
}

/// Render a sample document as text.
pub fn render(sample: &Value, format: SampleFormat) -> serde_json::Result<String> {
    match format {
        SampleFormat::Pretty => serde_json::to_string_pretty(sample),
        SampleFormat::Compact => serde_json::to_string(sample),
    }
}
