use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use catalog_core::SessionError;
use catalog_logging::{catalog_debug, catalog_info, catalog_warn};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::{Handler, Page};
use futures_util::StreamExt;
use tokio::task::JoinHandle;

use crate::session::{wait_for_selector, ActivationError, PageSession};
use crate::settings::{BrowserSettings, PageLayout};

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A single Chromium tab driven over the DevTools protocol.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    closed: Arc<AtomicBool>,
}

impl ChromiumSession {
    /// Launch Chromium, open `url` and wait until the tag controls have rendered.
    pub async fn open(
        url: &str,
        settings: &BrowserSettings,
        layout: &PageLayout,
    ) -> Result<Self, SessionError> {
        let target = url::Url::parse(url)
            .map_err(|err| SessionError::Navigation(format!("invalid url {url}: {err}")))?;

        let config = build_config(settings)?;
        let (browser, handler) = Browser::launch(config)
            .await
            .map_err(|err| SessionError::Launch(err.to_string()))?;

        let closed = Arc::new(AtomicBool::new(false));
        let handler_task = spawn_handler_task(handler, Arc::clone(&closed));

        catalog_info!("Opening {}", target);
        let page = match browser.new_page(target.as_str()).await {
            Ok(page) => page,
            Err(err) => {
                handler_task.abort();
                return Err(SessionError::Navigation(err.to_string()));
            }
        };

        let mut session = Self {
            browser,
            page,
            handler_task,
            closed,
        };
        let navigated = session.page.wait_for_navigation().await.map(|_| ());
        if let Err(err) = navigated {
            let _ = session.close().await;
            return Err(SessionError::Navigation(err.to_string()));
        }
        let ready = wait_for_selector(
            &session,
            &layout.tag_selector,
            READY_POLL_INTERVAL,
            Duration::from_millis(settings.page_ready_timeout_ms),
        )
        .await;
        match ready {
            Ok(found) => {
                catalog_debug!("Page ready: {} elements match {}", found, layout.tag_selector);
                Ok(session)
            }
            Err(err) => {
                let _ = session.close().await;
                Err(err)
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn check_open(&self) -> Result<(), SessionError> {
        if self.is_closed() {
            Err(SessionError::Closed)
        } else {
            Ok(())
        }
    }

    fn map_error(&self, err: CdpError) -> SessionError {
        if self.is_closed() || is_connection_lost(&err) {
            SessionError::Closed
        } else {
            SessionError::Protocol(err.to_string())
        }
    }
}

#[async_trait]
impl PageSession for ChromiumSession {
    type Element = Element;

    async fn query_all(&self, selector: &str) -> Result<Vec<Element>, SessionError> {
        self.check_open()?;
        self.page
            .find_elements(selector)
            .await
            .map_err(|err| self.map_error(err))
    }

    async fn read_attribute(
        &self,
        element: &Element,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.check_open()?;
        element
            .attribute(name)
            .await
            .map_err(|err| self.map_error(err))
    }

    async fn read_text(&self, element: &Element) -> Result<String, SessionError> {
        self.check_open()?;
        let text = element
            .inner_text()
            .await
            .map_err(|err| self.map_error(err))?;
        Ok(text.unwrap_or_default())
    }

    async fn activate(&mut self, element: &Element) -> Result<(), ActivationError> {
        self.check_open()?;
        match element.click().await {
            Ok(_) => Ok(()),
            Err(err) if self.is_closed() || is_connection_lost(&err) => {
                Err(ActivationError::Session(SessionError::Closed))
            }
            Err(err) => Err(ActivationError::Rejected(err.to_string())),
        }
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        if self.is_closed() {
            self.handler_task.abort();
            return Ok(());
        }
        let result = self.browser.close().await;
        let _ = self.browser.wait().await;
        self.handler_task.abort();
        self.closed.store(true, Ordering::SeqCst);
        result
            .map(|_| ())
            .map_err(|err| SessionError::Protocol(err.to_string()))
    }
}

fn build_config(settings: &BrowserSettings) -> Result<BrowserConfig, SessionError> {
    let mut builder = BrowserConfig::builder()
        .launch_timeout(Duration::from_millis(settings.launch_timeout_ms))
        .request_timeout(Duration::from_millis(settings.request_timeout_ms));
    if !settings.headless {
        builder = builder.with_head();
    }
    if let Some(path) = &settings.chrome_executable {
        builder = builder.chrome_executable(path);
    }
    builder.build().map_err(SessionError::Launch)
}

fn is_connection_lost(err: &CdpError) -> bool {
    matches!(
        err,
        CdpError::Ws(_) | CdpError::Io(_) | CdpError::NoResponse | CdpError::ChannelSendError(_)
    )
}

fn spawn_handler_task(mut handler: Handler, closed: Arc<AtomicBool>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(err) = event {
                catalog_debug!("devtools handler event error: {}", err);
            }
        }
        catalog_warn!("devtools connection ended");
        closed.store(true, Ordering::SeqCst);
    })
}
