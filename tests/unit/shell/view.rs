use super::*;

fn ready(toggle: Option<ToggleButton>, banner: Option<&str>) -> PanelView {
    titled(Some("Gece"), toggle, banner)
}

fn titled(title: Option<&str>, toggle: Option<ToggleButton>, banner: Option<&str>) -> PanelView {
    PanelView::Ready(ReadyView {
        error_banner: banner.map(str::to_string),
        title: title.map(str::to_string),
        container: ElementId(0),
        tokens: vec![
            RenderedToken {
                element: Some(ElementId(1)),
                kind: TokenKind::Word,
                text: "Bir".to_string(),
            },
            RenderedToken {
                element: None,
                kind: TokenKind::Separator,
                text: " ".to_string(),
            },
            RenderedToken {
                element: Some(ElementId(2)),
                kind: TokenKind::Word,
                text: "iki".to_string(),
            },
        ],
        toggle,
    })
}

#[test]
fn loading_view_uses_stable_id() {
    let view = PanelView::loading();
    assert!(view.as_ready().is_none());
    assert_eq!(view.to_string(), "[story-loading] Hikaye yükleniyor...\n");
}

#[test]
fn ready_view_text_and_words() {
    let view = ready(None, None);
    let ready = view.as_ready().unwrap();
    assert_eq!(ready.text(), "Bir iki");
    assert_eq!(ready.word_elements(), vec![ElementId(1), ElementId(2)]);
}

#[test]
fn display_lists_banner_title_body_and_toggle() {
    let toggle = ToggleButton {
        test_id: "button-toggle-story",
        label: READ_MORE_LABEL,
    };
    let out = ready(Some(toggle), Some("yedek")).to_string();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines,
        vec![
            "[story-error] yedek",
            "[story-title] Gece",
            "[scroll-reveal-container] el#0",
            "[scroll-reveal-text]",
            "Bir iki",
            "[button-toggle-story] DEVAMINI OKU",
        ]
    );
}

#[test]
fn untitled_view_skips_title_line() {
    let out = titled(None, None, None).to_string();
    assert!(!out.contains("[story-title]"), "{out}");
    assert!(out.starts_with("[scroll-reveal-container] el#0\n"), "{out}");
}

#[test]
fn serializes_with_state_tag() {
    let json = serde_json::to_value(PanelView::loading()).unwrap();
    assert_eq!(json["state"], "loading");
    assert_eq!(json["test_id"], LOADING_ID);

    let json = serde_json::to_value(ready(None, None)).unwrap();
    assert_eq!(json["state"], "ready");
    assert_eq!(json["title"], "Gece");
}
