use crate::Catalog;

/// Layout of the JSON artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArtifactStyle {
    /// Two-space indented, one field per line.
    #[default]
    Pretty,
    /// Single line, no insignificant whitespace.
    Compact,
}

/// Render the catalog as the JSON array consumed downstream.
///
/// Absent counts are written as `null`. The output depends only on the
/// catalog, so equal catalogs yield byte-identical artifacts.
pub fn render_catalog(catalog: &Catalog, style: ArtifactStyle) -> Result<String, serde_json::Error> {
    match style {
        ArtifactStyle::Pretty => serde_json::to_string_pretty(catalog),
        ArtifactStyle::Compact => serde_json::to_string(catalog),
    }
}
