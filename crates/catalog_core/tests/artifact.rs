use catalog_core::{render_catalog, ArtifactStyle, Catalog, TagRecord};
use pretty_assertions::assert_eq;

fn fixture() -> Catalog {
    Catalog::from(vec![
        TagRecord::new("Action", "19", Some(1502)),
        TagRecord::new("Indie", "4", None),
    ])
}

#[test]
fn compact_artifact_matches_downstream_contract() {
    let json = render_catalog(&fixture(), ArtifactStyle::Compact).unwrap();
    assert_eq!(
        json,
        r#"[{"name":"Action","id":"19","count":1502},{"name":"Indie","id":"4","count":null}]"#
    );
}

#[test]
fn pretty_artifact_uses_two_space_indent() {
    let json = render_catalog(&fixture(), ArtifactStyle::Pretty).unwrap();
    let expected = r#"[
  {
    "name": "Action",
    "id": "19",
    "count": 1502
  },
  {
    "name": "Indie",
    "id": "4",
    "count": null
  }
]"#;
    assert_eq!(json, expected);
}

#[test]
fn empty_catalog_renders_empty_array() {
    let json = render_catalog(&Catalog::new(), ArtifactStyle::Compact).unwrap();
    assert_eq!(json, "[]");
}

#[test]
fn artifact_reads_back_with_null_as_missing() {
    let json = render_catalog(&fixture(), ArtifactStyle::Pretty).unwrap();
    let parsed: Catalog = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.records()[1].count, None);
    assert_eq!(parsed, fixture());
}

#[test]
fn rendering_is_deterministic() {
    let a = render_catalog(&fixture(), ArtifactStyle::Pretty).unwrap();
    let b = render_catalog(&fixture(), ArtifactStyle::Pretty).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}
