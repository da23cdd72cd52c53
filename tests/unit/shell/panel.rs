use super::*;
use crate::content::document::{DEFAULT_TITLE, FETCH_FAILED_MESSAGE};
use crate::content::source::DocumentId;
use crate::foundation::core::Rect;
use crate::foundation::error::ContentUnavailable;
use crate::reveal::capability::ScrollCapability;
use crate::reveal::headless::{HeadlessScroller, StyleBuffer};
use std::time::Duration;

struct Fixed(Result<String, ContentUnavailable>);

impl DocumentFetcher for Fixed {
    async fn fetch_text(&self, _id: &DocumentId) -> Result<String, ContentUnavailable> {
        self.0.clone()
    }
}

struct Never;

impl DocumentFetcher for Never {
    async fn fetch_text(&self, _id: &DocumentId) -> Result<String, ContentUnavailable> {
        std::future::pending().await
    }
}

const FALLBACK: &str = "A\nB\nC";

fn panel<F: DocumentFetcher>(
    variant: PanelVariant,
    source: ContentSource,
    fetcher: F,
) -> StoryPanel<F> {
    StoryPanel::new(
        variant.default_config(),
        source,
        FALLBACK,
        Arc::new(ContentLoader::new(fetcher)),
        &ElementIdSeq::default(),
    )
}

fn offline(variant: PanelVariant) -> StoryPanel<Never> {
    panel(variant, ContentSource::Unconfigured, Never)
}

fn offline_on(page: &ElementIdSeq, variant: PanelVariant) -> StoryPanel<Never> {
    StoryPanel::new(
        variant.default_config(),
        ContentSource::Unconfigured,
        FALLBACK,
        Arc::new(ContentLoader::new(Never)),
        page,
    )
}

fn body(panel: &StoryPanel<impl DocumentFetcher>) -> String {
    panel.render().as_ready().unwrap().text()
}

fn toggle(panel: &StoryPanel<impl DocumentFetcher>) -> Option<ToggleButton> {
    panel.render().as_ready().unwrap().toggle.clone()
}

#[test]
fn variant_presets() {
    let home = PanelVariant::HomeStory.default_config();
    assert_eq!(home.preview_mode, PreviewMode::Lines);
    assert_eq!(home.reveal.blur_strength, 8.0);
    assert!(!home.variant.collapsible());
    assert!(home.show_title);

    let section = PanelVariant::StorySection.default_config();
    assert_eq!(section.preview_mode, PreviewMode::Joined);
    assert_eq!(section.reveal.base_rotation, 5.0);
    assert!(section.variant.collapsible());
    assert!(!section.show_title);
}

#[tokio::test]
async fn starts_loading_then_renders_fallback() {
    let mut panel = offline(PanelVariant::HomeStory);
    assert_eq!(
        panel.display_state(),
        DisplayState {
            expanded: false,
            loading: true
        }
    );
    assert_eq!(panel.render(), PanelView::loading());

    let doc = panel.load().await.unwrap().unwrap().clone();
    assert!(doc.used_fallback);
    assert_eq!(doc.error_message, None);
    assert_eq!(doc.title, DEFAULT_TITLE);
    assert!(!panel.display_state().loading);

    assert_eq!(body(&panel), "A\nB");
    let button = toggle(&panel).unwrap();
    assert_eq!(button.test_id, "button-read-more");
    assert_eq!(button.label, READ_MORE_LABEL);
}

#[tokio::test]
async fn home_story_expands_once() {
    let mut panel = offline(PanelVariant::HomeStory);
    panel.load().await.unwrap();

    assert!(panel.toggle().unwrap());
    assert!(panel.display_state().expanded);
    assert_eq!(body(&panel), "A\nB\nC");
    assert_eq!(toggle(&panel), None);

    assert!(!panel.toggle().unwrap());
    assert_eq!(body(&panel), "A\nB\nC");
}

#[tokio::test]
async fn story_section_flips_both_ways() {
    let mut panel = offline(PanelVariant::StorySection);
    panel.load().await.unwrap();
    assert_eq!(panel.visible_text().as_deref(), Some("A B..."));
    assert_eq!(body(&panel), "A B...");

    assert!(panel.toggle().unwrap());
    assert_eq!(body(&panel), "A\nB\nC");
    let button = toggle(&panel).unwrap();
    assert_eq!(button.test_id, "button-toggle-story");
    assert_eq!(button.label, SHOW_LESS_LABEL);

    assert!(panel.toggle().unwrap());
    assert_eq!(body(&panel), "A B...");
    assert_eq!(toggle(&panel).unwrap().label, READ_MORE_LABEL);
    assert_eq!(panel.render().as_ready().unwrap().title, None);
    assert_eq!(panel.document().unwrap().title, DEFAULT_TITLE);
}

#[tokio::test]
async fn home_story_renders_its_title() {
    let mut panel = offline(PanelVariant::HomeStory);
    panel.load().await.unwrap();
    let view = panel.render();
    assert_eq!(view.as_ready().unwrap().title.as_deref(), Some(DEFAULT_TITLE));
    assert!(view.to_string().contains("[story-title]"));
}

#[tokio::test]
async fn failed_fetch_shows_banner_over_fallback() {
    let source = ContentSource::parse("doc-1").unwrap();
    let mut panel = panel(
        PanelVariant::StorySection,
        source,
        Fixed(Err(ContentUnavailable::RemoteRejected(404))),
    );
    panel.load().await.unwrap();

    let view = panel.render();
    let ready = view.as_ready().unwrap();
    assert_eq!(ready.error_banner.as_deref(), Some(FETCH_FAILED_MESSAGE));
    assert_eq!(ready.text(), "A B...");
}

#[tokio::test]
async fn remote_document_replaces_fallback() {
    let source = ContentSource::parse("doc-1").unwrap();
    let mut panel = panel(
        PanelVariant::HomeStory,
        source,
        Fixed(Ok("# Gece\nBir iki\nÜç\nDört".to_string())),
    );
    panel.load().await.unwrap();

    let view = panel.render();
    let ready = view.as_ready().unwrap();
    assert_eq!(ready.error_banner, None);
    assert_eq!(ready.title.as_deref(), Some("Gece"));
    assert_eq!(ready.text(), "Bir iki\nÜç");
    assert_eq!(ready.word_elements().len(), 3);
}

#[test]
fn toggle_before_ready_is_ignored() {
    let mut panel = offline(PanelVariant::StorySection);
    assert!(!panel.can_toggle());
    assert!(!panel.toggle().unwrap());
    assert_eq!(panel.visible_text(), None);
    assert!(!panel.display_state().expanded);
}

#[tokio::test]
async fn unmount_abandons_in_flight_load() {
    let source = ContentSource::parse("doc-1").unwrap();
    let mut panel = panel(PanelVariant::HomeStory, source, Never);
    let cancel = panel.cancel_token();

    let (loaded, ()) = tokio::join!(panel.load(), async { cancel.cancel() });
    assert_eq!(loaded.unwrap(), None);
    assert!(panel.display_state().loading);

    panel.unmount();
    assert_eq!(panel.load().await.unwrap(), None);
}

#[test]
fn panels_on_one_page_get_distinct_containers() {
    let page = ElementIdSeq::starting_at(100);
    let a = offline_on(&page, PanelVariant::HomeStory);
    let b = offline_on(&page, PanelVariant::StorySection);
    assert_eq!(a.container(), ElementId(100));
    assert_eq!(b.container(), ElementId(101));
}

struct Stage {
    scroller: Arc<HeadlessScroller>,
    styles: Arc<StyleBuffer>,
    binder: RevealBinder,
}

fn stage() -> Stage {
    let scroller = Arc::new(HeadlessScroller::new(800.0));
    scroller.set_layout(ElementId(0), Rect::new(0.0, 1000.0, 600.0, 1400.0));
    let capability: Arc<dyn ScrollCapability> = scroller.clone();
    Stage {
        binder: RevealBinder::new(capability),
        styles: Arc::new(StyleBuffer::new()),
        scroller,
    }
}

#[tokio::test(start_paused = true)]
async fn reveal_binding_follows_rendered_tokens() {
    let stage = stage();
    let mut panel = offline(PanelVariant::StorySection);
    panel
        .attach_reveal(stage.binder.clone(), stage.styles.clone())
        .unwrap();
    assert!(!panel.is_revealing());

    panel.load().await.unwrap();
    assert!(panel.is_revealing());
    assert_eq!(stage.scroller.active_triggers(), 3);
    let collapsed_words = panel.render().as_ready().unwrap().word_elements();

    panel.toggle().unwrap();
    assert_eq!(stage.scroller.active_triggers(), 3);
    assert_eq!(stage.scroller.kill_count(), 3);

    let expanded_words = panel.render().as_ready().unwrap().word_elements();
    assert_eq!(expanded_words.len(), 3);
    assert!(expanded_words.iter().all(|w| !collapsed_words.contains(w)));
    let last = stage.styles.token(*expanded_words.last().unwrap()).unwrap();
    assert_eq!(last.opacity, 0.05);
    assert_eq!(last.blur_px, 2.0);

    assert_eq!(stage.scroller.refresh_count(), 0);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(stage.scroller.refresh_count(), 1);

    panel.unmount();
    assert!(!panel.is_revealing());
    assert_eq!(stage.scroller.active_triggers(), 0);
}

#[tokio::test(start_paused = true)]
async fn rapid_toggles_refresh_once() {
    let stage = stage();
    let mut panel = offline(PanelVariant::StorySection);
    panel
        .attach_reveal(stage.binder.clone(), stage.styles.clone())
        .unwrap();
    panel.load().await.unwrap();

    for _ in 0..4 {
        panel.toggle().unwrap();
    }
    assert_eq!(stage.scroller.active_triggers(), 3);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(stage.scroller.refresh_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn panels_sharing_a_binder_keep_their_own_bindings() {
    let stage = stage();
    let page = ElementIdSeq::default();
    let mut a = offline_on(&page, PanelVariant::HomeStory);
    let mut b = offline_on(&page, PanelVariant::StorySection);
    assert_ne!(a.container(), b.container());

    for panel in [&mut a, &mut b] {
        panel
            .attach_reveal(stage.binder.clone(), stage.styles.clone())
            .unwrap();
        panel.load().await.unwrap();
    }
    assert!(a.is_revealing() && b.is_revealing());
    assert_eq!(stage.scroller.active_triggers(), 6);
    assert_eq!(stage.scroller.kill_count(), 0);

    let a_words = a.render().as_ready().unwrap().word_elements();
    let b_words = b.render().as_ready().unwrap().word_elements();
    assert!(a_words.iter().all(|w| !b_words.contains(w)));

    b.toggle().unwrap();
    let b_expanded = b.render().as_ready().unwrap().word_elements();
    assert!(b_expanded.iter().all(|w| !a_words.contains(w)));
    assert!(a.is_revealing());
    assert_eq!(stage.scroller.active_triggers(), 6);

    b.unmount();
    assert!(a.is_revealing());
    assert_eq!(stage.scroller.active_triggers(), 3);
    assert_eq!(stage.binder.active_triggers(a.container()), 3);
}

#[tokio::test(start_paused = true)]
async fn unmounted_panel_ignores_toggles() {
    let stage = stage();
    let mut panel = offline(PanelVariant::StorySection);
    panel
        .attach_reveal(stage.binder.clone(), stage.styles.clone())
        .unwrap();
    panel.load().await.unwrap();
    let before = body(&panel);

    panel.unmount();
    assert!(!panel.can_toggle());
    assert!(!panel.toggle().unwrap());
    assert!(!panel.display_state().expanded);
    assert_eq!(body(&panel), before);
    assert_eq!(toggle(&panel), None);

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(stage.scroller.refresh_count(), 0);
    assert_eq!(stage.scroller.active_triggers(), 0);
}
