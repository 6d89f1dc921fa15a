use std::path::PathBuf;

use catalog_core::{Catalog, HarvestError, SessionError};
use catalog_engine::{
    ArtifactWriter, ChromiumSession, Harvester, PageSession, PersistError, PollingSettle,
    SettleStrategy,
};
use catalog_logging::{catalog_info, catalog_warn};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Harvest(#[from] HarvestError),
    #[error("writing artifact failed: {0}")]
    Persist(#[from] PersistError),
}

impl From<SessionError> for RunError {
    fn from(err: SessionError) -> Self {
        RunError::Harvest(HarvestError::Session(err))
    }
}

impl RunError {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunError::Harvest(HarvestError::Session(_)) => 2,
            RunError::Harvest(HarvestError::Extraction(_)) => 3,
            RunError::Harvest(HarvestError::Cancelled) => 130,
            RunError::Persist(_) => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub output: PathBuf,
    pub tags: usize,
    pub missing_counts: usize,
}

/// Open the configured page, harvest it and write the artifact.
pub async fn run(config: &AppConfig, cancel: CancellationToken) -> Result<RunSummary, RunError> {
    let layout = config.harvest.layout.clone();
    let session = ChromiumSession::open(&config.target_url, &config.browser, &layout).await?;
    let settle = PollingSettle::new(&config.harvest.settle);
    let harvester = Harvester::new(session, settle, layout).with_cancellation(cancel);

    let catalog = harvest_and_close(harvester).await?;
    persist(config, &catalog)
}

/// Run the harvest, then close the session whatever the outcome.
pub async fn harvest_and_close<S, W>(mut harvester: Harvester<S, W>) -> Result<Catalog, RunError>
where
    S: PageSession,
    W: SettleStrategy,
{
    let result = harvester.run().await;
    let mut session = harvester.into_session();
    if let Err(err) = session.close().await {
        catalog_warn!("Closing the page session failed: {}", err);
    }
    Ok(result?)
}

pub fn persist(config: &AppConfig, catalog: &Catalog) -> Result<RunSummary, RunError> {
    let writer = ArtifactWriter::new(&config.output, config.artifact_style());
    let output = writer.write_catalog(catalog)?;
    catalog_info!("Wrote {} tags to {}", catalog.len(), output.display());
    Ok(RunSummary {
        output,
        tags: catalog.len(),
        missing_counts: catalog.missing_counts(),
    })
}
