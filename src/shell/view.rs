//! Render model for a story panel, keyed by stable test identifiers.

use crate::content::segment::TokenKind;
use crate::foundation::core::ElementId;

pub const LOADING_ID: &str = "story-loading";
pub const ERROR_ID: &str = "story-error";
pub const TITLE_ID: &str = "story-title";
pub const CONTAINER_ID: &str = "scroll-reveal-container";
pub const TEXT_ID: &str = "scroll-reveal-text";

pub const LOADING_LABEL: &str = "Hikaye yükleniyor...";
pub const READ_MORE_LABEL: &str = "DEVAMINI OKU";
pub const SHOW_LESS_LABEL: &str = "GİZLE";

/// One rendered token. Only words get an element (and so a reveal state).
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct RenderedToken {
    pub element: Option<ElementId>,
    pub kind: TokenKind,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ToggleButton {
    pub test_id: &'static str,
    pub label: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ReadyView {
    /// Advisory banner; never blocks the content below it.
    pub error_banner: Option<String>,
    /// `None` for variants that render the body alone.
    pub title: Option<String>,
    pub container: ElementId,
    pub tokens: Vec<RenderedToken>,
    pub toggle: Option<ToggleButton>,
}

impl ReadyView {
    /// The body text exactly as rendered.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn word_elements(&self) -> Vec<ElementId> {
        self.tokens.iter().filter_map(|t| t.element).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PanelView {
    Loading {
        test_id: &'static str,
        label: &'static str,
    },
    Ready(ReadyView),
}

impl PanelView {
    pub fn loading() -> Self {
        Self::Loading {
            test_id: LOADING_ID,
            label: LOADING_LABEL,
        }
    }

    pub fn as_ready(&self) -> Option<&ReadyView> {
        match self {
            Self::Ready(view) => Some(view),
            Self::Loading { .. } => None,
        }
    }
}

impl std::fmt::Display for PanelView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let view = match self {
            Self::Loading { test_id, label } => return writeln!(f, "[{test_id}] {label}"),
            Self::Ready(view) => view,
        };
        if let Some(banner) = &view.error_banner {
            writeln!(f, "[{ERROR_ID}] {banner}")?;
        }
        if let Some(title) = &view.title {
            writeln!(f, "[{TITLE_ID}] {title}")?;
        }
        writeln!(f, "[{CONTAINER_ID}] {}", view.container)?;
        writeln!(f, "[{TEXT_ID}]")?;
        writeln!(f, "{}", view.text())?;
        if let Some(toggle) = &view.toggle {
            writeln!(f, "[{}] {}", toggle.test_id, toggle.label)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shell/view.rs"]
mod tests;
