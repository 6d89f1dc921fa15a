#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use catalog_core::SessionError;
use catalog_engine::{ActivationError, PageLayout, PageSession};
use tokio_util::sync::CancellationToken;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(catalog_logging::initialize_for_tests);
}

#[derive(Debug, Clone)]
pub struct FixtureTag {
    pub name: Option<String>,
    pub id: Option<String>,
    pub counter: Option<String>,
}

pub fn tag(name: &str, id: &str, counter: Option<&str>) -> FixtureTag {
    FixtureTag {
        name: Some(name.to_string()),
        id: Some(id.to_string()),
        counter: counter.map(str::to_string),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureElement {
    Tag(usize),
    Counter(usize),
}

/// In-memory catalog page: one counter region showing the active tag.
///
/// With `lag_reads > 0` the counter keeps showing the previously active tag
/// for that many reads after an activation.
pub struct FixturePage {
    layout: PageLayout,
    tags: Vec<FixtureTag>,
    active: Option<usize>,
    previous: Option<usize>,
    lag_reads: usize,
    reads_since_activation: AtomicUsize,
    crash_on: Option<usize>,
    reject_on: Option<usize>,
    cancel_on: Option<(usize, CancellationToken)>,
    text_failure: Mutex<Option<(FixtureElement, SessionError)>>,
    attribute_failure: Mutex<Option<(FixtureElement, SessionError)>>,
    closed: bool,
    pub activations: Vec<usize>,
}

impl FixturePage {
    pub fn new(tags: Vec<FixtureTag>) -> Self {
        Self {
            layout: PageLayout::default(),
            tags,
            active: None,
            previous: None,
            lag_reads: 0,
            reads_since_activation: AtomicUsize::new(0),
            crash_on: None,
            reject_on: None,
            cancel_on: None,
            text_failure: Mutex::new(None),
            attribute_failure: Mutex::new(None),
            closed: false,
            activations: Vec::new(),
        }
    }

    pub fn with_lag(mut self, reads: usize) -> Self {
        self.lag_reads = reads;
        self
    }

    pub fn crash_on(mut self, index: usize) -> Self {
        self.crash_on = Some(index);
        self
    }

    pub fn reject_on(mut self, index: usize) -> Self {
        self.reject_on = Some(index);
        self
    }

    pub fn cancel_on(mut self, index: usize, token: CancellationToken) -> Self {
        self.cancel_on = Some((index, token));
        self
    }

    /// The next `read_text` of `element` fails with `err`; later reads succeed.
    pub fn fail_text_once(self, element: FixtureElement, err: SessionError) -> Self {
        *self.text_failure.lock().unwrap() = Some((element, err));
        self
    }

    /// The next `read_attribute` of `element` fails with `err`.
    pub fn fail_attribute_once(self, element: FixtureElement, err: SessionError) -> Self {
        *self.attribute_failure.lock().unwrap() = Some((element, err));
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn shown(&self) -> Option<usize> {
        let reads = self.reads_since_activation.fetch_add(1, Ordering::SeqCst) + 1;
        if reads > self.lag_reads {
            self.active
        } else {
            self.previous
        }
    }

    fn take_failure(
        slot: &Mutex<Option<(FixtureElement, SessionError)>>,
        element: &FixtureElement,
    ) -> Result<(), SessionError> {
        let mut slot = slot.lock().unwrap();
        if matches!(slot.as_ref(), Some((target, _)) if target == element) {
            if let Some((_, err)) = slot.take() {
                return Err(err);
            }
        }
        Ok(())
    }

    fn check_open(&self) -> Result<(), SessionError> {
        if self.closed {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl PageSession for FixturePage {
    type Element = FixtureElement;

    async fn query_all(&self, selector: &str) -> Result<Vec<FixtureElement>, SessionError> {
        self.check_open()?;
        if selector == self.layout.tag_selector {
            return Ok((0..self.tags.len()).map(FixtureElement::Tag).collect());
        }
        if selector == self.layout.counter_selector {
            return Ok(self
                .shown()
                .filter(|index| self.tags[*index].counter.is_some())
                .map(FixtureElement::Counter)
                .into_iter()
                .collect());
        }
        Ok(Vec::new())
    }

    async fn read_attribute(
        &self,
        element: &FixtureElement,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.check_open()?;
        Self::take_failure(&self.attribute_failure, element)?;
        match element {
            FixtureElement::Tag(index) if name == self.layout.id_attribute => {
                Ok(self.tags[*index].id.clone())
            }
            _ => Ok(None),
        }
    }

    async fn read_text(&self, element: &FixtureElement) -> Result<String, SessionError> {
        self.check_open()?;
        Self::take_failure(&self.text_failure, element)?;
        Ok(match element {
            FixtureElement::Tag(index) => self.tags[*index].name.clone().unwrap_or_default(),
            FixtureElement::Counter(index) => self.tags[*index].counter.clone().unwrap_or_default(),
        })
    }

    async fn activate(&mut self, element: &FixtureElement) -> Result<(), ActivationError> {
        self.check_open()?;
        let FixtureElement::Tag(index) = *element else {
            return Err(ActivationError::Rejected("not a tag control".to_string()));
        };
        if self.crash_on == Some(index) {
            self.closed = true;
            return Err(ActivationError::Session(SessionError::Closed));
        }
        if self.reject_on == Some(index) {
            return Err(ActivationError::Rejected("element is not clickable".to_string()));
        }
        self.activations.push(index);
        self.previous = self.active;
        self.active = Some(index);
        self.reads_since_activation.store(0, Ordering::SeqCst);
        if let Some((cancel_index, token)) = &self.cancel_on {
            if *cancel_index == index {
                token.cancel();
            }
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        self.closed = true;
        Ok(())
    }
}
