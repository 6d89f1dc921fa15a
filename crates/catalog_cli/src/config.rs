use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use catalog_core::ArtifactStyle;
use catalog_engine::{BrowserSettings, HarvestSettings, DEFAULT_TARGET_URL};
use catalog_logging::catalog_info;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

const DEFAULT_CONFIG_FILE_NAME: &str = "tag-harvester.ron";
const DEFAULT_OUTPUT: &str = "tags.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub target_url: String,
    pub output: PathBuf,
    pub compact: bool,
    pub browser: BrowserSettings,
    pub harvest: HarvestSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            compact: false,
            browser: BrowserSettings::default(),
            harvest: HarvestSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load `file_path`, or `tag-harvester.ron` in the working directory if present.
    ///
    /// An explicitly named file must exist; the implicit one may be missing.
    pub fn try_load_from_file_or_default(file_path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match file_path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE_NAME), false),
        };

        match fs::read_to_string(path) {
            Ok(content) => {
                catalog_info!("Loading configuration from {}", path.display());
                Self::from_ron(&content)
                    .with_context(|| format!("invalid configuration in {}", path.display()))
            }
            Err(err) if err.kind() == ErrorKind::NotFound && !explicit => Ok(Self::default()),
            Err(err) => {
                Err(err).with_context(|| format!("cannot read configuration {}", path.display()))
            }
        }
    }

    pub fn from_ron(content: &str) -> Result<Self> {
        Ok(ron::from_str(content)?)
    }

    /// Command-line flags win over the file.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.target_url = url.clone();
        }
        if let Some(output) = &cli.output {
            self.output = output.clone();
        }
        if let Some(timeout) = cli.settle_timeout_ms {
            self.harvest.settle.timeout_ms = timeout;
        }
        if let Some(interval) = cli.poll_interval_ms {
            self.harvest.settle.poll_interval_ms = interval;
        }
        if cli.compact {
            self.compact = true;
        }
        if cli.headed {
            self.browser.headless = false;
        }
        if let Some(chrome) = &cli.chrome {
            self.browser.chrome_executable = Some(chrome.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.target_url)
            .with_context(|| format!("invalid target url {:?}", self.target_url))?;
        if !matches!(url.scheme(), "http" | "https" | "file") {
            bail!("unsupported url scheme {:?}", url.scheme());
        }
        if self.output.as_os_str().is_empty() {
            bail!("output path is empty");
        }
        let layout = &self.harvest.layout;
        if layout.tag_selector.trim().is_empty() || layout.counter_selector.trim().is_empty() {
            bail!("page selectors must not be empty");
        }
        if layout.id_attribute.trim().is_empty() {
            bail!("id attribute must not be empty");
        }
        if self.harvest.settle.poll_interval_ms == 0 {
            bail!("poll interval must be greater than zero");
        }
        if self.harvest.settle.poll_interval_ms > self.harvest.settle.timeout_ms {
            bail!("poll interval exceeds settle timeout");
        }
        Ok(())
    }

    pub fn artifact_style(&self) -> ArtifactStyle {
        if self.compact {
            ArtifactStyle::Compact
        } else {
            ArtifactStyle::Pretty
        }
    }
}
