//! JSON settings for a page of story panels.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::content::document::PreviewMode;
use crate::content::fetch::{DEFAULT_EXPORT_BASE, HttpFetcherOpts};
use crate::content::source::ContentSource;
use crate::foundation::error::{RevealError, RevealResult};
use crate::reveal::binder::RevealConfig;
use crate::reveal::capability::CAPABILITY_WAIT;
use crate::shell::panel::{PanelConfig, PanelVariant};
use crate::shell::refresh::REFRESH_DEBOUNCE;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    pub base_url: String,
    pub timeout_ms: u64,
    pub capability_wait_ms: u64,
    pub refresh_debounce_ms: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXPORT_BASE.to_string(),
            timeout_ms: 10_000,
            capability_wait_ms: CAPABILITY_WAIT.as_millis() as u64,
            refresh_debounce_ms: REFRESH_DEBOUNCE.as_millis() as u64,
        }
    }
}

impl FetchSettings {
    pub fn http_opts(&self) -> HttpFetcherOpts {
        HttpFetcherOpts {
            base_url: self.base_url.clone(),
            timeout: Duration::from_millis(self.timeout_ms),
        }
    }

    pub fn capability_wait(&self) -> Duration {
        Duration::from_millis(self.capability_wait_ms)
    }

    pub fn refresh_debounce(&self) -> Duration {
        Duration::from_millis(self.refresh_debounce_ms)
    }
}

/// One panel on the page.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelSettings {
    pub name: String,
    pub variant: PanelVariant,
    #[serde(default)]
    pub doc_id: Option<String>,
    #[serde(default)]
    pub fallback_text: Option<String>,
    /// Read relative to the settings file when not absolute.
    #[serde(default)]
    pub fallback_path: Option<PathBuf>,
    #[serde(default)]
    pub preview_mode: Option<PreviewMode>,
    #[serde(default)]
    pub reveal: Option<RevealConfig>,
}

impl PanelSettings {
    pub fn source(&self) -> RevealResult<ContentSource> {
        ContentSource::from_optional(self.doc_id.as_deref())
    }

    /// The variant preset with this panel's overrides applied.
    pub fn panel_config(&self) -> PanelConfig {
        let mut config = self.variant.default_config();
        if let Some(mode) = self.preview_mode {
            config.preview_mode = mode;
        }
        if let Some(reveal) = self.reveal {
            config.reveal = reveal;
        }
        config
    }

    fn validate(&self) -> RevealResult<()> {
        if self.name.trim().is_empty() {
            return Err(RevealError::config("panel name must not be empty"));
        }
        match (&self.fallback_text, &self.fallback_path) {
            (Some(_), None) | (None, Some(_)) => {}
            _ => {
                return Err(RevealError::config(format!(
                    "panel '{}' needs exactly one of fallback_text or fallback_path",
                    self.name
                )));
            }
        }
        self.source()
            .map_err(|e| RevealError::config(format!("panel '{}': {e}", self.name)))?;
        if let Some(reveal) = &self.reveal {
            reveal
                .validate()
                .map_err(|e| RevealError::config(format!("panel '{}': {e}", self.name)))?;
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorySettings {
    #[serde(default)]
    pub fetch: FetchSettings,
    pub panels: Vec<PanelSettings>,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl StorySettings {
    pub fn from_reader<R: std::io::Read>(r: R) -> RevealResult<Self> {
        let settings: Self = serde_json::from_reader(r)
            .map_err(|e| RevealError::config(format!("parse settings JSON: {e}")))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_json_str(s: &str) -> RevealResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    pub fn from_path(path: impl AsRef<Path>) -> RevealResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RevealError::config(format!("open settings JSON '{}': {e}", path.display()))
        })?;
        let mut settings = Self::from_reader(BufReader::new(f))?;
        settings.base_dir = path.parent().map(Path::to_path_buf);
        Ok(settings)
    }

    pub fn validate(&self) -> RevealResult<()> {
        url::Url::parse(&self.fetch.base_url).map_err(|e| {
            RevealError::config(format!("invalid base_url '{}': {e}", self.fetch.base_url))
        })?;
        if self.fetch.timeout_ms == 0 {
            return Err(RevealError::config("timeout_ms must be > 0"));
        }
        if self.panels.is_empty() {
            return Err(RevealError::config("settings must declare at least one panel"));
        }
        let mut names = HashSet::new();
        for panel in &self.panels {
            panel.validate()?;
            if !names.insert(panel.name.as_str()) {
                return Err(RevealError::config(format!(
                    "duplicate panel name '{}'",
                    panel.name
                )));
            }
        }
        Ok(())
    }

    pub fn panel(&self, name: &str) -> Option<&PanelSettings> {
        self.panels.iter().find(|p| p.name == name)
    }

    /// Embedded fallback body for `panel`, reading `fallback_path` if set.
    pub fn fallback_text(&self, panel: &PanelSettings) -> RevealResult<String> {
        if let Some(text) = &panel.fallback_text {
            return Ok(text.clone());
        }
        let Some(rel) = &panel.fallback_path else {
            return Err(RevealError::config(format!(
                "panel '{}' has no fallback text",
                panel.name
            )));
        };
        let path = match &self.base_dir {
            Some(dir) if rel.is_relative() => dir.join(rel),
            _ => rel.clone(),
        };
        std::fs::read_to_string(&path).map_err(|e| {
            RevealError::config(format!("read fallback text '{}': {e}", path.display()))
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
