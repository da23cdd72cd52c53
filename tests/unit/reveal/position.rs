use super::*;

fn pos(s: &str) -> ScrollPosition {
    s.parse().unwrap()
}

#[test]
fn parses_edges_and_offsets() {
    let p = pos("top bottom-=50px");
    assert_eq!(p.element.edge, Edge::Top);
    assert_eq!(p.viewport.edge, Edge::Bottom);
    assert_eq!(p.viewport.offset_px, -50.0);

    let p = pos("25% center+=10");
    assert_eq!(p.element.edge, Edge::Percent(25.0));
    assert_eq!(p.viewport.offset_px, 10.0);
}

#[test]
fn rejects_malformed_positions() {
    for bad in ["top", "top bottom extra", "middle bottom", "top bottom-50px", "top x%"] {
        let err = bad.parse::<ScrollPosition>().unwrap_err();
        assert!(
            err.to_string().contains("scroll position error:"),
            "{bad}: {err}"
        );
    }
}

#[test]
fn offsets_follow_viewport_geometry() {
    // element spans 1000..1400, viewport is 800 tall
    let bounds = Rect::new(0.0, 1000.0, 600.0, 1400.0);
    assert_eq!(pos("top bottom").scroll_offset(bounds, 800.0), 200.0);
    assert_eq!(pos("bottom top").scroll_offset(bounds, 800.0), 1400.0);
    assert_eq!(pos("top bottom-=50px").scroll_offset(bounds, 800.0), 250.0);
    assert_eq!(pos("top center-=100px").scroll_offset(bounds, 800.0), 700.0);
}

#[test]
fn range_progress_is_clamped() {
    let range = ScrollRange { start: 200.0, end: 1400.0 };
    assert_eq!(range.progress(0.0), 0.0);
    assert_eq!(range.progress(800.0), 0.5);
    assert_eq!(range.progress(5000.0), 1.0);

    let degenerate = ScrollRange { start: 300.0, end: 300.0 };
    assert_eq!(degenerate.progress(299.0), 0.0);
    assert_eq!(degenerate.progress(300.0), 1.0);
}
