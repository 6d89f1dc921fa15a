//! Catalog core: tag records, count parsing and the artifact format.
mod artifact;
mod count;
mod error;
mod record;

pub use artifact::{render_catalog, ArtifactStyle};
pub use count::parse_count;
pub use error::{CountUnavailable, ExtractionError, HarvestError, SessionError, TagField};
pub use record::{Catalog, TagRecord};
