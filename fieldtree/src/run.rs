use std::path::{Path, PathBuf};

use anyhow::bail;
use clap::{ArgAction, Parser, Subcommand};

use crate::{
    data::{
        FieldId, FieldType, FieldUpdate, SampleFormat, Session,
        session::{DEFAULT_DOCUMENT_PATH, document_schema},
    },
    error::FieldError,
    render::{render_row, render_tree},
};

/// Compose nested field schemas and preview sample JSON.
#[derive(Parser, Debug)]
#[command(name = "fieldtree", version, about)]
pub struct Cli {
    /// Schema document to work on (`.json` or `.toml`).
    #[arg(short, long, global = true, env = "FIELDTREE_FILE", default_value = DEFAULT_DOCUMENT_PATH)]
    pub file: PathBuf,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write the starting schema to the document.
    Init {
        /// Replace an existing document (a backup is kept).
        #[arg(long)]
        force: bool,
    },
    /// Print the field tree.
    Show,
    /// Print the sample JSON document.
    Sample {
        #[arg(long, value_enum, default_value_t = SampleFormat::Pretty)]
        format: SampleFormat,
    },
    /// Append a root field.
    AddRoot,
    /// Append a nested field to an object field.
    AddChild {
        /// Id of the object field.
        parent: FieldId,
    },
    /// Change the key, type or required flag of a field.
    Set {
        id: FieldId,
        #[arg(long)]
        key: Option<String>,
        #[arg(long = "type", value_name = "TYPE")]
        field_type: Option<FieldType>,
        #[arg(long, action = ArgAction::Set)]
        required: Option<bool>,
    },
    /// Flip the required flag of a field.
    ToggleRequired { id: FieldId },
    /// Delete a field together with its nested fields.
    Rm { id: FieldId },
    /// Print the JSON Schema of the document format.
    Schema,
}

/// Run a parsed command line and return the text to print.
///
/// Edits are saved to the document when they changed something.
///
/// # Errors
///
/// Returns errors when the document cannot be read, parsed or written, or
/// when an edit is rejected by the tree.
pub async fn run(cli: Cli) -> anyhow::Result<String> {
    match &cli.command {
        Command::Schema => {
            return Ok(serde_json::to_string_pretty(&document_schema()?)?);
        }
        Command::Init { force } => {
            return init(&cli.file, *force).await;
        }
        _ => {}
    }

    let mut session = Session::open(Some(&cli.file)).await?;
    let output = execute(&mut session, &cli.command, !cli.plain)?;
    session.save().await?;
    Ok(output)
}

/// Apply a command to an open session without touching the disk.
pub fn execute(session: &mut Session, command: &Command, color: bool) -> anyhow::Result<String> {
    let output = match command {
        Command::Show => render_tree(&session.tree, color),
        Command::Sample { format } => session.sample_text(*format)?,
        Command::AddRoot => session.add_root()?.to_string(),
        Command::AddChild { parent } => session.add_child(*parent)?.to_string(),
        Command::Set {
            id,
            key,
            field_type,
            required,
        } => {
            let update = FieldUpdate {
                key: key.clone(),
                field_type: *field_type,
                required: *required,
            };
            if update.is_empty() {
                bail!("nothing to change, pass --key, --type or --required");
            }
            session.update(*id, update)?;
            let node = session.tree.get(*id).ok_or(FieldError::NotFound(*id))?;
            render_row(node, 0, color)
        }
        Command::ToggleRequired { id } => {
            let required = session.toggle_required(*id)?;
            if required {
                format!("{id} is now required")
            } else {
                format!("{id} is now optional")
            }
        }
        Command::Rm { id } => {
            let removed = session.delete(*id)?;
            format!("removed {} `{}`", removed.id(), removed.key())
        }
        Command::Init { .. } | Command::Schema => {
            bail!("{command:?} does not operate on an open document")
        }
    };
    Ok(output)
}

async fn init(path: &Path, force: bool) -> anyhow::Result<String> {
    if path.exists() && !force {
        bail!(
            "{} already exists, pass --force to replace it",
            path.display()
        );
    }
    let mut session = Session::new(path)?;
    session.save().await?;
    Ok(format!("created {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("fieldtree").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_parse_set() {
        let cli = parse(&["set", "#3", "--type", "Object", "--required", "false"]);
        match cli.command {
            Command::Set {
                id,
                key,
                field_type,
                required,
            } => {
                assert_eq!(id, "3".parse::<FieldId>().unwrap());
                assert_eq!(key, None);
                assert_eq!(field_type, Some(FieldType::Object));
                assert_eq!(required, Some(false));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_type() {
        let res = Cli::try_parse_from(["fieldtree", "set", "1", "--type", "uuid"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_global_file_flag() {
        let cli = parse(&["sample", "--file", "schema.toml", "--format", "compact"]);
        assert_eq!(cli.file, PathBuf::from("schema.toml"));
        assert!(matches!(
            cli.command,
            Command::Sample {
                format: SampleFormat::Compact
            }
        ));
    }

    #[test]
    fn test_execute_edit_sequence() {
        let mut session = Session::from_content("", Path::new("fields.json")).unwrap();

        let id = execute(&mut session, &Command::AddRoot, false).unwrap();
        assert_eq!(id, "#2");

        let row = execute(
            &mut session,
            &Command::Set {
                id: "2".parse().unwrap(),
                key: Some("meta".to_string()),
                field_type: Some(FieldType::Object),
                required: None,
            },
            false,
        )
        .unwrap();
        assert!(row.starts_with("#2 meta"));

        let child = execute(
            &mut session,
            &Command::AddChild {
                parent: "2".parse().unwrap(),
            },
            false,
        )
        .unwrap();
        assert_eq!(child, "#3");

        let sample = execute(
            &mut session,
            &Command::Sample {
                format: SampleFormat::Compact,
            },
            false,
        )
        .unwrap();
        assert_eq!(
            sample,
            r#"{"name":"sample text","meta":{"nested_field":"sample text"}}"#
        );
        assert!(session.needs_save);
    }

    #[test]
    fn test_execute_empty_set_is_rejected() {
        let mut session = Session::from_content("", Path::new("fields.json")).unwrap();
        let cmd = Command::Set {
            id: "1".parse().unwrap(),
            key: None,
            field_type: None,
            required: None,
        };
        assert!(execute(&mut session, &cmd, false).is_err());
        assert!(!session.needs_save);
    }
}
