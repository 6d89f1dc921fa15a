use std::time::Duration;

use async_trait::async_trait;
use catalog_core::SessionError;
use thiserror::Error;
use tokio::time::{sleep, Instant};

/// Failure of a single activation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    /// The page refused the trigger (element hidden, script exception).
    /// The session is still usable.
    #[error("activation rejected: {0}")]
    Rejected(String),
    /// The session died while activating.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Narrow capability interface over a loaded page.
///
/// Reads take `&self`; activation takes `&mut self`, so whoever owns the
/// session is the only one able to change which tag the page shows.
#[async_trait]
pub trait PageSession: Send + Sync {
    type Element: Send + Sync;

    /// All elements matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>, SessionError>;

    async fn read_attribute(
        &self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, SessionError>;

    /// Rendered text of the element; empty when it has none.
    async fn read_text(&self, element: &Self::Element) -> Result<String, SessionError>;

    /// Trigger the element. Returns once the trigger was delivered, not once
    /// the page finished reacting to it.
    async fn activate(&mut self, element: &Self::Element) -> Result<(), ActivationError>;

    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Poll until at least one element matches `selector`.
///
/// A page that never renders the selector within `timeout` is not the page
/// we expect, so this fails with `SessionError::Navigation`.
pub async fn wait_for_selector<S: PageSession>(
    session: &S,
    selector: &str,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<usize, SessionError> {
    let deadline = Instant::now() + timeout;
    loop {
        let found = session.query_all(selector).await?;
        if !found.is_empty() {
            return Ok(found.len());
        }
        if Instant::now() >= deadline {
            return Err(SessionError::Navigation(format!(
                "no element matched {selector} within {} ms",
                timeout.as_millis()
            )));
        }
        sleep(poll_interval).await;
    }
}
