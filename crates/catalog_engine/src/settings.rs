use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TARGET_URL: &str = "https://store.steampowered.com/tag/browse";

/// Where the tag controls and the counter live on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub tag_selector: String,
    pub id_attribute: String,
    pub counter_selector: String,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            tag_selector: ".tag_browse_tag".to_string(),
            id_attribute: "data-tagid".to_string(),
            counter_selector: ".browse_tag_game_total".to_string(),
        }
    }
}

/// Bounds of the poll-until-stable wait after each activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettleSettings {
    pub poll_interval_ms: u64,
    pub timeout_ms: u64,
    /// Consecutive identical reads required before a changed counter counts as settled.
    pub stable_polls: u32,
    /// Accept an unchanged counter after this long; `None` never accepts it.
    pub unchanged_grace_ms: Option<u64>,
}

impl Default for SettleSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 50,
            timeout_ms: 3_000,
            stable_polls: 2,
            unchanged_grace_ms: Some(2_500),
        }
    }
}

impl SettleSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn unchanged_grace(&self) -> Option<Duration> {
        self.unchanged_grace_ms.map(Duration::from_millis)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    pub headless: bool,
    pub chrome_executable: Option<PathBuf>,
    pub launch_timeout_ms: u64,
    pub request_timeout_ms: u64,
    /// How long to wait after navigation for the first tag control to render.
    pub page_ready_timeout_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            launch_timeout_ms: 20_000,
            request_timeout_ms: 30_000,
            page_ready_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    pub layout: PageLayout,
    pub settle: SettleSettings,
}
