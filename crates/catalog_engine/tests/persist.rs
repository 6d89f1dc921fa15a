use std::fs;

use catalog_core::{ArtifactStyle, Catalog, TagRecord};
use catalog_engine::{ensure_output_dir, ArtifactWriter};
use tempfile::TempDir;

fn catalog() -> Catalog {
    Catalog::from(vec![
        TagRecord::new("Action", "19", Some(1502)),
        TagRecord::new("Indie", "4", None),
    ])
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn writes_into_nested_missing_directory() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("data").join("tags.json");
    let writer = ArtifactWriter::new(&target, ArtifactStyle::Compact);

    let written = writer.write_catalog(&catalog()).unwrap();

    assert_eq!(written, target);
    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        r#"[{"name":"Action","id":"19","count":1502},{"name":"Indie","id":"4","count":null}]"#
    );
}

#[test]
fn replaces_existing_artifact_wholesale() {
    let temp = TempDir::new().unwrap();
    let target = temp.path().join("tags.json");
    fs::write(&target, "[{\"stale\": true}, {\"stale\": true}, {\"stale\": true}]").unwrap();

    let writer = ArtifactWriter::new(&target, ArtifactStyle::Compact);
    writer
        .write_catalog(&Catalog::from(vec![TagRecord::new("RPG", "122", Some(9))]))
        .unwrap();

    assert_eq!(
        fs::read_to_string(&target).unwrap(),
        r#"[{"name":"RPG","id":"122","count":9}]"#
    );
}

#[test]
fn no_artifact_when_parent_is_a_file() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = ArtifactWriter::new(file_path.join("tags.json"), ArtifactStyle::Pretty);
    let result = writer.write_catalog(&catalog());

    assert!(result.is_err());
    assert_eq!(fs::read_to_string(&file_path).unwrap(), "x");
}
