use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;

use crate::{
    data::{
        field::{FieldId, FieldNode, FieldUpdate},
        sample::{self, SampleFormat},
        tree::FieldTree,
    },
    error::FieldError,
};

/// Default location of the working document.
pub const DEFAULT_DOCUMENT_PATH: &str = ".fields.json";

/// On-disk form of a field schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDocument {
    /// Root fields in display order.
    pub fields: Vec<FieldNode>,
}

/// Serialization format of a schema document, picked by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Toml,
}

impl DocumentFormat {
    /// Detect the format from a path's extension.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext {
            "json" => Ok(Self::Json),
            "toml" | "tml" => Ok(Self::Toml),
            _ => bail!("Unsupported schema file extension: {ext:?}"),
        }
    }

    pub fn parse(self, content: &str) -> anyhow::Result<SchemaDocument> {
        let doc = match self {
            Self::Json => serde_json::from_str(content)?,
            Self::Toml => toml::from_str(content)?,
        };
        Ok(doc)
    }

    pub fn render(self, doc: &SchemaDocument) -> anyhow::Result<String> {
        let s = match self {
            Self::Json => serde_json::to_string_pretty(doc)?,
            Self::Toml => toml::to_string_pretty(doc)?,
        };
        Ok(s)
    }
}

/// JSON Schema describing the document format, for editor integration.
pub fn document_schema() -> serde_json::Result<Value> {
    serde_json::to_value(schemars::schema_for!(SchemaDocument))
}

/// Working document: a field tree bound to a file on disk.
#[derive(Debug, Clone)]
pub struct Session {
    /// The schema being edited.
    pub tree: FieldTree,
    /// Whether the tree has changes not yet written.
    pub needs_save: bool,
    /// Path of the schema document.
    pub path: PathBuf,
}

impl Session {
    /// Start a fresh document at `path` with the default tree.
    ///
    /// Nothing is written until [`Session::save`] is called.
    pub fn new(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref().to_path_buf();
        DocumentFormat::from_path(&path)?;
        Ok(Self {
            tree: FieldTree::new(),
            needs_save: true,
            path,
        })
    }

    /// Open the document at `path`, or the default path when `None`.
    ///
    /// A missing or blank file yields the default tree.
    pub async fn open(path: Option<impl AsRef<Path>>) -> anyhow::Result<Self> {
        let path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCUMENT_PATH));

        let content = if path.exists() {
            fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?
        } else {
            info!("{} not found, starting from the default schema", path.display());
            String::new()
        };

        Self::from_content(&content, &path)
    }

    /// Build a session from already loaded document content.
    pub fn from_content(content: &str, path: &Path) -> anyhow::Result<Self> {
        let format = DocumentFormat::from_path(path)?;

        let tree = if content.trim().is_empty() {
            FieldTree::new()
        } else {
            let doc = format
                .parse(content)
                .with_context(|| format!("Failed to parse {}", path.display()))?;
            FieldTree::from_roots(doc.fields)
                .with_context(|| format!("Invalid schema in {}", path.display()))?
        };

        debug!("loaded {} fields from {}", tree.len(), path.display());

        Ok(Self {
            tree,
            needs_save: false,
            path: path.to_path_buf(),
        })
    }

    pub fn add_root(&mut self) -> Result<FieldId, FieldError> {
        let id = self.tree.add_root()?;
        self.needs_save = true;
        Ok(id)
    }

    pub fn add_child(&mut self, parent: FieldId) -> Result<FieldId, FieldError> {
        let id = self.tree.add_child(parent)?;
        self.needs_save = true;
        Ok(id)
    }

    pub fn update(&mut self, id: FieldId, update: FieldUpdate) -> Result<bool, FieldError> {
        let changed = self.tree.update(id, update)?;
        self.needs_save |= changed;
        Ok(changed)
    }

    pub fn toggle_required(&mut self, id: FieldId) -> Result<bool, FieldError> {
        let required = self.tree.toggle_required(id)?;
        self.needs_save = true;
        Ok(required)
    }

    pub fn delete(&mut self, id: FieldId) -> Result<FieldNode, FieldError> {
        let removed = self.tree.delete(id)?;
        self.needs_save = true;
        Ok(removed)
    }

    /// The sample document rendered as text.
    pub fn sample_text(&self, format: SampleFormat) -> serde_json::Result<String> {
        sample::render(&self.tree.sample(), format)
    }

    /// The schema document in the format matching the session path.
    pub fn document_text(&self) -> anyhow::Result<String> {
        let doc = SchemaDocument {
            fields: self.tree.roots().to_vec(),
        };
        DocumentFormat::from_path(&self.path)?.render(&doc)
    }

    /// Write pending changes, backing up the previous file first.
    ///
    /// The backup sits next to the document as `<stem>.bak.<ext>` and is
    /// replaced on every save, so it always holds the last written version.
    ///
    /// Returns `false` when there was nothing to save.
    pub async fn save(&mut self) -> anyhow::Result<bool> {
        if !self.needs_save {
            return Ok(false);
        }

        let content = self.document_text()?;

        if self.path.exists() {
            let backup_path = self.backup_path();
            fs::copy(&self.path, &backup_path)
                .await
                .with_context(|| format!("Failed to back up {}", self.path.display()))?;
            debug!("backup written to {}", backup_path.display());
        }

        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("saved {} fields to {}", self.tree.len(), self.path.display());

        self.needs_save = false;
        Ok(true)
    }

    /// Path of the rolling backup, e.g. `fields.bak.toml` for `fields.toml`.
    pub fn backup_path(&self) -> PathBuf {
        let ext = self
            .path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        self.path.with_extension(format!("bak.{ext}"))
    }
}
