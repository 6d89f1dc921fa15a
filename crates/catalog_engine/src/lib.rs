//! Catalog engine: page sessions, settle waits and the harvesting loop.
mod chromium;
mod harvest;
mod persist;
mod session;
mod settings;
mod settle;

pub use chromium::ChromiumSession;
pub use harvest::Harvester;
pub use persist::{ensure_output_dir, ArtifactWriter, PersistError};
pub use session::{wait_for_selector, ActivationError, PageSession};
pub use settings::{
    BrowserSettings, HarvestSettings, PageLayout, SettleSettings, DEFAULT_TARGET_URL,
};
pub use settle::{CounterSource, ImmediateSettle, PollingSettle, SettleOutcome, SettleStrategy};
