use std::time::Duration;

use async_trait::async_trait;
use catalog_core::SessionError;
use tokio::time::{sleep, Instant};

use crate::settings::SettleSettings;

/// Reads the counter region of the page as it is right now.
#[async_trait]
pub trait CounterSource: Send {
    async fn read_counter(&mut self) -> Result<Option<String>, SessionError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    Settled(String),
    TimedOut { last_seen: Option<String> },
}

/// Decides when the page has finished reacting to an activation.
///
/// `previous` is the counter text read just before the activation.
#[async_trait]
pub trait SettleStrategy: Send + Sync {
    async fn wait(
        &self,
        previous: Option<&str>,
        counter: &mut dyn CounterSource,
    ) -> Result<SettleOutcome, SessionError>;
}

/// Polls the counter until it shows new, stable text or the ceiling is hit.
#[derive(Debug, Clone)]
pub struct PollingSettle {
    poll_interval: Duration,
    timeout: Duration,
    stable_polls: u32,
    unchanged_grace: Option<Duration>,
}

impl PollingSettle {
    pub fn new(settings: &SettleSettings) -> Self {
        Self {
            poll_interval: settings.poll_interval(),
            timeout: settings.timeout(),
            stable_polls: settings.stable_polls.max(1),
            unchanged_grace: settings.unchanged_grace(),
        }
    }

    fn max_polls(&self) -> u64 {
        let interval = self.poll_interval.as_millis().max(1);
        self.timeout.as_millis().div_ceil(interval) as u64
    }
}

impl Default for PollingSettle {
    fn default() -> Self {
        Self::new(&SettleSettings::default())
    }
}

#[async_trait]
impl SettleStrategy for PollingSettle {
    async fn wait(
        &self,
        previous: Option<&str>,
        counter: &mut dyn CounterSource,
    ) -> Result<SettleOutcome, SessionError> {
        let started = Instant::now();
        let mut candidate: Option<String> = None;
        let mut stable = 0u32;
        let mut unchanged_since: Option<Instant> = None;
        let mut last_seen = None;

        for attempt in 0..=self.max_polls() {
            if attempt > 0 {
                sleep(self.poll_interval).await;
            }
            let current = counter.read_counter().await?;
            let now = Instant::now();

            match current.as_deref() {
                None => {
                    candidate = None;
                    stable = 0;
                    unchanged_since = None;
                }
                Some(text) if Some(text) == previous => {
                    candidate = None;
                    stable = 0;
                    let since = *unchanged_since.get_or_insert(now);
                    if let Some(grace) = self.unchanged_grace {
                        if now.duration_since(since) >= grace {
                            return Ok(SettleOutcome::Settled(text.to_string()));
                        }
                    }
                }
                Some(text) => {
                    unchanged_since = None;
                    if candidate.as_deref() == Some(text) {
                        stable += 1;
                    } else {
                        candidate = Some(text.to_string());
                        stable = 1;
                    }
                    if stable >= self.stable_polls {
                        return Ok(SettleOutcome::Settled(text.to_string()));
                    }
                }
            }
            last_seen = current;

            if started.elapsed() >= self.timeout {
                break;
            }
        }

        Ok(SettleOutcome::TimedOut { last_seen })
    }
}

/// Reads the counter once and takes whatever is there.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSettle;

#[async_trait]
impl SettleStrategy for ImmediateSettle {
    async fn wait(
        &self,
        _previous: Option<&str>,
        counter: &mut dyn CounterSource,
    ) -> Result<SettleOutcome, SessionError> {
        Ok(match counter.read_counter().await? {
            Some(text) => SettleOutcome::Settled(text),
            None => SettleOutcome::TimedOut { last_seen: None },
        })
    }
}
