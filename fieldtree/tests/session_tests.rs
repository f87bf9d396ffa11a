use clap::Parser;
use fieldtree::{
    Cli,
    data::{FieldType, FieldUpdate, SampleFormat, Session},
    run,
};

fn cli(file: &std::path::Path, args: &[&str]) -> Cli {
    let file = file.to_str().unwrap();
    let argv = ["fieldtree", "--plain", "--file", file]
        .into_iter()
        .chain(args.iter().copied());
    Cli::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn test_missing_file_opens_default_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.json");

    let session = Session::open(Some(&path)).await.unwrap();
    assert_eq!(session.tree.len(), 1);
    assert!(!session.needs_save);
    assert!(!path.exists());
}

#[tokio::test]
async fn test_save_and_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.json");

    let mut session = Session::open(Some(&path)).await.unwrap();
    let meta = session.add_root().unwrap();
    session
        .update(
            meta,
            FieldUpdate::default()
                .with_key("meta")
                .with_type(FieldType::Object),
        )
        .unwrap();
    let created = session.add_child(meta).unwrap();
    session
        .update(
            created,
            FieldUpdate::default()
                .with_key("created")
                .with_type(FieldType::Date),
        )
        .unwrap();
    assert!(session.save().await.unwrap());
    assert!(!session.save().await.unwrap());

    let reopened = Session::open(Some(&path)).await.unwrap();
    assert_eq!(reopened.tree, session.tree);
    assert_eq!(
        reopened.sample_text(SampleFormat::Compact).unwrap(),
        r#"{"name":"sample text","meta":{"created":"2024-01-01"}}"#
    );
}

#[tokio::test]
async fn test_save_keeps_backup_of_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fields.toml");

    let mut session = Session::new(&path).unwrap();
    session.save().await.unwrap();
    let first = std::fs::read_to_string(&path).unwrap();
    session.add_root().unwrap();
    session.save().await.unwrap();
    let second = std::fs::read_to_string(&path).unwrap();
    session.add_root().unwrap();
    session.save().await.unwrap();

    let backup = dir.path().join("fields.bak.toml");
    assert_eq!(session.backup_path(), backup);
    assert_ne!(first, second);
    assert_eq!(std::fs::read_to_string(&backup).unwrap(), second);

    let backups: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .filter(|name| name != "fields.toml")
        .collect();
    assert_eq!(backups, vec!["fields.bak.toml".to_string()]);
}

#[tokio::test]
async fn test_cli_edit_flow() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");

    assert!(
        run(cli(&path, &["init"]))
            .await
            .unwrap()
            .starts_with("created")
    );
    assert!(run(cli(&path, &["init"])).await.is_err());

    let root = run(cli(&path, &["add-root"])).await.unwrap();
    assert_eq!(root, "#2");
    run(cli(&path, &["set", "2", "--key", "tags", "--type", "array"]))
        .await
        .unwrap();
    assert_eq!(
        run(cli(&path, &["toggle-required", "2"])).await.unwrap(),
        "#2 is now required"
    );

    let sample = run(cli(&path, &["sample"])).await.unwrap();
    let value: serde_json::Value = serde_json::from_str(&sample).unwrap();
    assert_eq!(
        value,
        serde_json::json!({ "name": "sample text", "tags": ["item1", "item2"] })
    );

    let err = run(cli(&path, &["add-child", "2"])).await.unwrap_err();
    assert!(err.to_string().contains("cannot hold nested fields"));

    let err = run(cli(&path, &["rm", "9"])).await.unwrap_err();
    assert!(err.to_string().contains("not found"));
    assert_eq!(
        run(cli(&path, &["rm", "2"])).await.unwrap(),
        "removed #2 `tags`"
    );
    let err = run(cli(&path, &["rm", "1"])).await.unwrap_err();
    assert!(err.to_string().contains("last root field"));

    let tree = run(cli(&path, &["show"])).await.unwrap();
    assert_eq!(tree.lines().count(), 1);
}

#[tokio::test]
async fn test_cli_schema_command() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    let out = run(cli(&path, &["schema"])).await.unwrap();
    let schema: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert!(schema.get("properties").is_some());
    assert!(!path.exists());
}
