use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::content::document::{DocumentResult, PreviewMode};
use crate::content::fetch::DocumentFetcher;
use crate::content::loader::ContentLoader;
use crate::content::segment::segment;
use crate::content::source::ContentSource;
use crate::foundation::core::{ElementId, ElementIdSeq};
use crate::foundation::error::RevealResult;
use crate::reveal::binder::{ReleaseHandle, RevealBinder, RevealConfig, RevealTarget, StyleSink};
use crate::shell::refresh::RefreshDebouncer;
use crate::shell::view::{
    PanelView, READ_MORE_LABEL, ReadyView, RenderedToken, SHOW_LESS_LABEL, ToggleButton,
};

/// The two panel flavors. They differ in whether collapse is offered again
/// after expanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelVariant {
    /// Landing-page story: "read more" expands once and the button goes away.
    HomeStory,
    /// Section story: the button flips between "read more" and "show less".
    StorySection,
}

impl PanelVariant {
    pub fn collapsible(self) -> bool {
        matches!(self, Self::StorySection)
    }

    pub fn toggle_test_id(self) -> &'static str {
        match self {
            Self::HomeStory => "button-read-more",
            Self::StorySection => "button-toggle-story",
        }
    }

    pub fn default_config(self) -> PanelConfig {
        match self {
            Self::HomeStory => PanelConfig {
                variant: self,
                preview_mode: PreviewMode::Lines,
                show_title: true,
                reveal: RevealConfig {
                    base_opacity: 0.05,
                    base_rotation: 3.0,
                    blur_strength: 8.0,
                    enable_blur: true,
                },
            },
            Self::StorySection => PanelConfig {
                variant: self,
                preview_mode: PreviewMode::Joined,
                show_title: false,
                reveal: RevealConfig {
                    base_opacity: 0.05,
                    base_rotation: 5.0,
                    blur_strength: 2.0,
                    enable_blur: true,
                },
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelConfig {
    pub variant: PanelVariant,
    pub preview_mode: PreviewMode,
    /// Render the document title above the body.
    pub show_title: bool,
    pub reveal: RevealConfig,
}

/// Content lifecycle of a panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PanelPhase {
    Loading,
    Ready(DocumentResult),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DisplayState {
    pub expanded: bool,
    pub loading: bool,
}

struct PanelReveal {
    binder: RevealBinder,
    sink: Arc<dyn StyleSink>,
    handle: Option<ReleaseHandle>,
}

/// One story display unit: loads its content, renders the visible text as
/// tokens and keeps a reveal binding in step with what is rendered.
pub struct StoryPanel<F> {
    config: PanelConfig,
    source: ContentSource,
    fallback_text: String,
    loader: Arc<ContentLoader<F>>,
    phase: PanelPhase,
    expanded: bool,
    ids: ElementIdSeq,
    container: ElementId,
    tokens: Vec<RenderedToken>,
    cancel: CancellationToken,
    reveal: Option<PanelReveal>,
    refresh: RefreshDebouncer,
}

impl<F: DocumentFetcher> StoryPanel<F> {
    /// `ids` is the page's element allocator; panels that share a
    /// [`RevealBinder`] must draw from the same sequence.
    pub fn new(
        config: PanelConfig,
        source: ContentSource,
        fallback_text: impl Into<String>,
        loader: Arc<ContentLoader<F>>,
        ids: &ElementIdSeq,
    ) -> Self {
        let ids = ids.clone();
        let container = ids.next_id();
        Self {
            config,
            source,
            fallback_text: fallback_text.into(),
            loader,
            phase: PanelPhase::Loading,
            expanded: false,
            ids,
            container,
            tokens: Vec::new(),
            cancel: CancellationToken::new(),
            reveal: None,
            refresh: RefreshDebouncer::default(),
        }
    }

    pub fn with_refresh_debouncer(mut self, refresh: RefreshDebouncer) -> Self {
        self.refresh = refresh;
        self
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn container(&self) -> ElementId {
        self.container
    }

    pub fn phase(&self) -> &PanelPhase {
        &self.phase
    }

    pub fn document(&self) -> Option<&DocumentResult> {
        match &self.phase {
            PanelPhase::Ready(doc) => Some(doc),
            PanelPhase::Loading => None,
        }
    }

    pub fn display_state(&self) -> DisplayState {
        DisplayState {
            expanded: self.expanded,
            loading: matches!(self.phase, PanelPhase::Loading),
        }
    }

    /// Token that aborts an in-flight [`Self::load`]; cancelled by [`Self::unmount`].
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Resolve the panel's content. Returns `None` when the panel was
    /// unmounted before the fetch settled; nothing is rendered or bound then.
    #[tracing::instrument(skip(self), fields(container = %self.container, source = %self.source))]
    pub async fn load(&mut self) -> RevealResult<Option<&DocumentResult>> {
        if self.cancel.is_cancelled() {
            return Ok(None);
        }
        self.phase = PanelPhase::Loading;
        self.tokens.clear();

        let Some(doc) = self
            .loader
            .resolve_until(
                &self.source,
                &self.fallback_text,
                self.config.preview_mode,
                &self.cancel,
            )
            .await
        else {
            return Ok(None);
        };

        tracing::debug!(used_fallback = doc.used_fallback, "panel ready");
        self.phase = PanelPhase::Ready(doc);
        self.render_tokens();
        self.rebind()?;
        Ok(self.document())
    }

    /// Text currently shown in the body container.
    pub fn visible_text(&self) -> Option<String> {
        let doc = self.document()?;
        if self.expanded {
            return Some(doc.full_text.clone());
        }
        let mode = self.config.preview_mode;
        Some(format!("{}{}", doc.preview_text, mode.collapsed_suffix()))
    }

    /// False before content is ready and for good once unmounted.
    pub fn can_toggle(&self) -> bool {
        !self.cancel.is_cancelled()
            && self.document().is_some()
            && (!self.expanded || self.config.variant.collapsible())
    }

    /// Flip between preview and full text. Returns whether anything changed.
    ///
    /// A fresh reveal binding is made for the new tokens and a debounced
    /// trigger refresh is scheduled so boundaries are re-measured once the
    /// layout settles.
    pub fn toggle(&mut self) -> RevealResult<bool> {
        if !self.can_toggle() {
            return Ok(false);
        }
        self.expanded = !self.expanded;
        self.render_tokens();
        self.rebind()?;

        if let Some(reveal) = &self.reveal {
            let capability = reveal.binder.capability();
            if tokio::runtime::Handle::try_current().is_ok() {
                self.refresh.schedule(capability);
            } else {
                capability.refresh();
            }
        }
        Ok(true)
    }

    /// Start driving the rendered tokens through `binder`, writing visual
    /// state into `sink`.
    pub fn attach_reveal(
        &mut self,
        binder: RevealBinder,
        sink: Arc<dyn StyleSink>,
    ) -> RevealResult<()> {
        self.reveal = Some(PanelReveal {
            binder,
            sink,
            handle: None,
        });
        self.rebind()
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal
            .as_ref()
            .is_some_and(|r| r.binder.is_bound(self.container))
    }

    pub fn render(&self) -> PanelView {
        let Some(doc) = self.document() else {
            return PanelView::loading();
        };
        PanelView::Ready(ReadyView {
            error_banner: doc.error_message.clone(),
            title: self.config.show_title.then(|| doc.title.clone()),
            container: self.container,
            tokens: self.tokens.clone(),
            toggle: self.toggle_button(),
        })
    }

    /// Tear down: abort any in-flight load, release the reveal binding and
    /// drop a pending refresh.
    pub fn unmount(&mut self) {
        self.cancel.cancel();
        self.refresh.cancel();
        if let Some(reveal) = self.reveal.as_mut()
            && let Some(handle) = reveal.handle.take()
        {
            handle.release();
        }
        tracing::debug!(container = %self.container, "panel unmounted");
    }

    fn toggle_button(&self) -> Option<ToggleButton> {
        if !self.can_toggle() {
            return None;
        }
        let label = if self.expanded {
            SHOW_LESS_LABEL
        } else {
            READ_MORE_LABEL
        };
        Some(ToggleButton {
            test_id: self.config.variant.toggle_test_id(),
            label,
        })
    }

    fn render_tokens(&mut self) {
        let Some(text) = self.visible_text() else {
            self.tokens.clear();
            return;
        };
        let ids = &self.ids;
        self.tokens = segment(&text)
            .map(|t| RenderedToken {
                element: t.is_word().then(|| ids.next_id()),
                kind: t.kind,
                text: t.text.to_string(),
            })
            .collect();
    }

    fn rebind(&mut self) -> RevealResult<()> {
        if self.document().is_none() || self.cancel.is_cancelled() {
            return Ok(());
        }
        let Some(reveal) = self.reveal.as_mut() else {
            return Ok(());
        };
        let target = RevealTarget {
            container: self.container,
            tokens: self.tokens.iter().filter_map(|t| t.element).collect(),
            sink: Arc::clone(&reveal.sink),
        };
        reveal.handle = Some(reveal.binder.bind(target, &self.config.reveal)?);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shell/panel.rs"]
mod tests;
