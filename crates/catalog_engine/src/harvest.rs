use async_trait::async_trait;
use catalog_core::{
    parse_count, Catalog, CountUnavailable, ExtractionError, HarvestError, SessionError, TagField,
    TagRecord,
};
use catalog_logging::{catalog_debug, catalog_info, catalog_warn};
use tokio_util::sync::CancellationToken;

use crate::session::{ActivationError, PageSession};
use crate::settings::PageLayout;
use crate::settle::{CounterSource, SettleOutcome, SettleStrategy};

/// Drives one page session through every tag control, one activation at a time.
///
/// The harvester owns the session for the whole run; nothing else can
/// activate a tag while it is working.
pub struct Harvester<S, W> {
    session: S,
    settle: W,
    layout: PageLayout,
    cancel: CancellationToken,
}

impl<S, W> Harvester<S, W>
where
    S: PageSession,
    W: SettleStrategy,
{
    pub fn new(session: S, settle: W, layout: PageLayout) -> Self {
        Self {
            session,
            settle,
            layout,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop between two tags once `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn into_session(self) -> S {
        self.session
    }

    /// Harvest every tag present on the page right now.
    ///
    /// The returned catalog has exactly one record per discovered tag, in
    /// discovery order. Tags without a readable count get `count: None`.
    pub async fn run(&mut self) -> Result<Catalog, HarvestError> {
        let elements = self.session.query_all(&self.layout.tag_selector).await?;
        let total = elements.len();
        catalog_info!("Discovered {} tag elements", total);

        let mut catalog = Catalog::with_capacity(total);
        for (index, element) in elements.iter().enumerate() {
            if self.cancel.is_cancelled() {
                catalog_warn!("Harvest cancelled after {}/{} tags", index, total);
                return Err(HarvestError::Cancelled);
            }
            let record = self.harvest_one(index, total, element).await?;
            catalog.push(record);
        }

        debug_assert_eq!(catalog.len(), total);
        catalog_info!(
            "Finished processing all tags: {} harvested, {} without count",
            catalog.len(),
            catalog.missing_counts()
        );
        Ok(catalog)
    }

    async fn harvest_one(
        &mut self,
        index: usize,
        total: usize,
        element: &S::Element,
    ) -> Result<TagRecord, HarvestError> {
        // Activation may rewrite the control, so read it first.
        let name = self
            .session
            .read_text(element)
            .await
            .map_err(|err| structural(err, index, TagField::Name))?
            .trim()
            .to_string();
        if name.is_empty() {
            return Err(ExtractionError {
                index,
                field: TagField::Name,
            }
            .into());
        }
        let id = self
            .session
            .read_attribute(element, &self.layout.id_attribute)
            .await
            .map_err(|err| structural(err, index, TagField::Id))?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or(ExtractionError {
                index,
                field: TagField::Id,
            })?;

        catalog_info!("Processing tag {}/{}: {} (id={})", index + 1, total, name, id);

        let count = match self.count_after_activation(element).await? {
            Ok(count) => {
                catalog_debug!("Tag {} (id={}) count={}", name, id, count);
                Some(count)
            }
            Err(reason) => {
                catalog_warn!("Tag {} (id={}) has no count: {}", name, id, reason);
                None
            }
        };

        Ok(TagRecord { name, id, count })
    }

    async fn count_after_activation(
        &mut self,
        element: &S::Element,
    ) -> Result<Result<u64, CountUnavailable>, SessionError> {
        let previous = read_counter(&self.session, &self.layout.counter_selector).await?;

        match self.session.activate(element).await {
            Ok(()) => {}
            Err(ActivationError::Rejected(reason)) => {
                return Ok(Err(CountUnavailable::ActivationRejected(reason)));
            }
            Err(ActivationError::Session(err)) => return Err(err),
        }

        let mut counter = CounterReader {
            session: &self.session,
            selector: &self.layout.counter_selector,
        };
        let outcome = self.settle.wait(previous.as_deref(), &mut counter).await?;

        Ok(match outcome {
            SettleOutcome::Settled(text) => {
                parse_count(&text).ok_or(CountUnavailable::Unparseable(text))
            }
            SettleOutcome::TimedOut { last_seen } => Err(CountUnavailable::TimedOut { last_seen }),
        })
    }
}

struct CounterReader<'a, S> {
    session: &'a S,
    selector: &'a str,
}

#[async_trait]
impl<'a, S: PageSession> CounterSource for CounterReader<'a, S> {
    async fn read_counter(&mut self) -> Result<Option<String>, SessionError> {
        read_counter(self.session, self.selector).await
    }
}

/// A failed read of a field the record cannot do without. Only a closed
/// session stays a session error; anything else is blamed on the element.
fn structural(err: SessionError, index: usize, field: TagField) -> HarvestError {
    match err {
        SessionError::Closed => HarvestError::Session(err),
        other => {
            catalog_warn!("Reading {} of tag element {} failed: {}", field, index, other);
            ExtractionError { index, field }.into()
        }
    }
}

/// Current counter text. The counter node is replaced while the page
/// re-renders, so a failed read counts as "no counter yet" unless the
/// session itself is gone.
async fn read_counter<S: PageSession>(
    session: &S,
    selector: &str,
) -> Result<Option<String>, SessionError> {
    match try_read_counter(session, selector).await {
        Err(SessionError::Closed) => Err(SessionError::Closed),
        Err(err) => {
            catalog_debug!("Counter read failed, treating as absent: {}", err);
            Ok(None)
        }
        read => read,
    }
}

async fn try_read_counter<S: PageSession>(
    session: &S,
    selector: &str,
) -> Result<Option<String>, SessionError> {
    let found = session.query_all(selector).await?;
    match found.first() {
        Some(element) => Ok(Some(session.read_text(element).await?)),
        None => Ok(None),
    }
}
