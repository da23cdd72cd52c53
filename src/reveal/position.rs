//! Scroll trigger boundaries: "<element edge> <viewport edge>" pairs such as
//! `top bottom` or `top center-=100px`.

use std::str::FromStr;

use crate::foundation::core::Rect;
use crate::foundation::error::{RevealError, RevealResult};

/// A horizontal line across an element or the viewport.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Edge {
    Top,
    Center,
    Bottom,
    /// Fraction of the height from the top, written `N%`.
    Percent(f64),
}

impl Edge {
    pub fn fraction(self) -> f64 {
        match self {
            Self::Top => 0.0,
            Self::Center => 0.5,
            Self::Bottom => 1.0,
            Self::Percent(p) => p / 100.0,
        }
    }
}

/// One side of a position expression: an edge plus a pixel offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Anchor {
    pub edge: Edge,
    pub offset_px: f64,
}

impl Anchor {
    fn resolve(self, top: f64, height: f64) -> f64 {
        top + self.edge.fraction() * height + self.offset_px
    }
}

/// Fires when the element anchor meets the viewport anchor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollPosition {
    pub element: Anchor,
    pub viewport: Anchor,
}

impl ScrollPosition {
    /// Position with an unshifted element edge and a viewport edge shifted by
    /// `viewport_offset_px`.
    pub const fn new(element: Edge, viewport: Edge, viewport_offset_px: f64) -> Self {
        Self {
            element: Anchor {
                edge: element,
                offset_px: 0.0,
            },
            viewport: Anchor {
                edge: viewport,
                offset_px: viewport_offset_px,
            },
        }
    }

    /// Viewport scroll offset at which this position is reached for an element
    /// laid out at `bounds` (document coordinates).
    pub fn scroll_offset(&self, bounds: Rect, viewport_height: f64) -> f64 {
        let element_y = self.element.resolve(bounds.y0, bounds.height());
        let viewport_y = self.viewport.resolve(0.0, viewport_height);
        element_y - viewport_y
    }
}

impl FromStr for ScrollPosition {
    type Err = RevealError;

    fn from_str(s: &str) -> RevealResult<Self> {
        let mut parts = s.split_whitespace();
        let (Some(element), Some(viewport), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(RevealError::position(format!(
                "expected '<element> <viewport>', got '{s}'"
            )));
        };
        Ok(Self {
            element: parse_anchor(element)?,
            viewport: parse_anchor(viewport)?,
        })
    }
}

fn parse_anchor(s: &str) -> RevealResult<Anchor> {
    let (edge, offset_px) = match s.find(['+', '-']) {
        Some(i) if i > 0 => {
            let (edge, rel) = s.split_at(i);
            (edge, parse_relative_offset(rel)?)
        }
        _ => (s, 0.0),
    };

    let edge = match edge.to_ascii_lowercase().as_str() {
        "top" => Edge::Top,
        "center" => Edge::Center,
        "bottom" => Edge::Bottom,
        other => match other.strip_suffix('%') {
            Some(p) => Edge::Percent(parse_finite(p, s)?),
            None => {
                return Err(RevealError::position(format!("unknown edge '{edge}'")));
            }
        },
    };
    Ok(Anchor { edge, offset_px })
}

// "+=40px" / "-=100px" / "-=100"
fn parse_relative_offset(rel: &str) -> RevealResult<f64> {
    let (sign, rest) = match rel.split_at(1) {
        ("+", rest) => (1.0, rest),
        (_, rest) => (-1.0, rest),
    };
    let Some(amount) = rest.strip_prefix('=') else {
        return Err(RevealError::position(format!(
            "offset '{rel}' must use '+=' or '-='"
        )));
    };
    let amount = amount.strip_suffix("px").unwrap_or(amount);
    Ok(sign * parse_finite(amount, rel)?)
}

fn parse_finite(s: &str, ctx: &str) -> RevealResult<f64> {
    s.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RevealError::position(format!("invalid number in '{ctx}'")))
}

/// Scroll offsets between which a trigger's progress runs from 0 to 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ScrollRange {
    pub start: f64,
    pub end: f64,
}

impl ScrollRange {
    pub fn measure(
        start: &ScrollPosition,
        end: &ScrollPosition,
        bounds: Rect,
        viewport_height: f64,
    ) -> Self {
        Self {
            start: start.scroll_offset(bounds, viewport_height),
            end: end.scroll_offset(bounds, viewport_height),
        }
    }

    pub fn progress(&self, scroll_y: f64) -> f64 {
        let span = self.end - self.start;
        if span <= 0.0 {
            return if scroll_y >= self.start { 1.0 } else { 0.0 };
        }
        ((scroll_y - self.start) / span).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/position.rs"]
mod tests;
