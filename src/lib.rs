//! Story panels with remote content, embedded fallback and a scroll-driven
//! word reveal.
//!
//! - Resolve a panel's text with a [`ContentLoader`] (never fails; falls back)
//! - Split it into word and separator tokens with [`segment`]
//! - Drive rotation, opacity and blur from scroll progress with a [`RevealBinder`]
//! - Tie the three together per panel with a [`StoryPanel`]
#![forbid(unsafe_code)]

mod config;
mod foundation;

pub(crate) mod animation;
pub(crate) mod content;
pub(crate) mod reveal;
pub(crate) mod shell;

pub use crate::foundation::core::{ElementId, ElementIdSeq, Rect, Viewport};
pub use crate::foundation::error::{ContentUnavailable, RevealError, RevealResult};

pub use crate::animation::ease::Ease;
pub use crate::animation::tween::{Lerp, Stagger, Tween};
pub use crate::config::{FetchSettings, PanelSettings, StorySettings};
pub use crate::content::document::{
    BRAND_PHRASE, DEFAULT_TITLE, DocumentResult, ELLIPSIS, FETCH_FAILED_MESSAGE, PreviewMode,
};
pub use crate::content::fetch::{DEFAULT_EXPORT_BASE, DocumentFetcher, HttpFetcher, HttpFetcherOpts};
pub use crate::content::loader::ContentLoader;
pub use crate::content::segment::{Segments, Token, TokenKind, segment};
pub use crate::content::source::{ContentSource, DocumentId, UNCONFIGURED_PLACEHOLDER};
pub use crate::reveal::binder::{
    ROTATION_END, ROTATION_START, ReleaseHandle, RevealBinder, RevealConfig, RevealTarget,
    StyleSink, TokenStyle, WORD_END, WORD_SCRUB, WORD_STAGGER, WORD_START,
};
pub use crate::reveal::capability::{
    CAPABILITY_WAIT, CapabilitySlot, ProgressFn, Scrub, ScrollCapability, TriggerId, TriggerSpec,
};
pub use crate::reveal::headless::{HeadlessScroller, StyleBuffer};
pub use crate::reveal::position::{Anchor, Edge, ScrollPosition, ScrollRange};
pub use crate::shell::panel::{DisplayState, PanelConfig, PanelPhase, PanelVariant, StoryPanel};
pub use crate::shell::refresh::{REFRESH_DEBOUNCE, RefreshDebouncer};
pub use crate::shell::view::{
    CONTAINER_ID, ERROR_ID, LOADING_ID, LOADING_LABEL, PanelView, READ_MORE_LABEL, ReadyView,
    RenderedToken, SHOW_LESS_LABEL, TEXT_ID, TITLE_ID, ToggleButton,
};
