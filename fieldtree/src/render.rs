//! Text rendering of the field tree.
//!
//! One line per field, indented by depth:
//!
//! ```text
//! #1 name                 Text    required
//! #2 address              Object  optional
//!   #3 city               Text    optional
//! ```

use colored::Colorize;

use crate::data::{FieldNode, FieldTree, FieldType};

const INDENT: &str = "  ";
const KEY_WIDTH: usize = 20;
const LABEL_WIDTH: usize = 7;

/// Shown in place of an empty key.
pub const UNNAMED: &str = "<unnamed>";

/// Render the whole tree, one field per line.
pub fn render_tree(tree: &FieldTree, color: bool) -> String {
    tree.walk()
        .map(|(depth, node)| render_row(node, depth, color))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a single field row.
pub fn render_row(node: &FieldNode, depth: usize, color: bool) -> String {
    let indent = INDENT.repeat(depth);
    let id = node.id().to_string();
    let key = if node.key().is_empty() {
        UNNAMED
    } else {
        node.key()
    };
    // Pad before coloring so escape codes do not skew the columns.
    let key = format!("{key:<width$}", width = KEY_WIDTH.saturating_sub(indent.len()));
    let label = format!("{:<width$}", node.field_type().label(), width = LABEL_WIDTH);
    let badge = if node.required() { "required" } else { "optional" };

    if !color {
        return format!("{indent}{id} {key} {label} {badge}")
            .trim_end()
            .to_string();
    }

    let badge = if node.required() {
        badge.bold()
    } else {
        badge.dimmed()
    };
    format!(
        "{indent}{} {} {} {badge}",
        id.dimmed(),
        key.bold(),
        colorize_label(&label, node.field_type()),
    )
}

fn colorize_label(label: &str, field_type: FieldType) -> colored::ColoredString {
    match field_type {
        FieldType::Text => label.blue(),
        FieldType::Number => label.green(),
        FieldType::Boolean => label.purple(),
        FieldType::Email => label.yellow(),
        FieldType::Url => label.cyan(),
        FieldType::Date => label.magenta(),
        FieldType::Array => label.bright_yellow(),
        FieldType::Object => label.red(),
    }
}
