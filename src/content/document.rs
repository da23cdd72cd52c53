//! Title/preview/body derivation for story documents.

/// Title used whenever the embedded fallback text is shown.
pub const DEFAULT_TITLE: &str = "Yargıç Erkan Cantay";
/// Site name; a first line that mentions it is taken as the story title.
pub const BRAND_PHRASE: &str = "hilkat garibesi";
/// Advisory shown when a configured remote document could not be used.
pub const FETCH_FAILED_MESSAGE: &str = "Google Docs'tan yüklenemedi, yedek içerik gösteriliyor.";
/// Marker appended to truncated titles and collapsed joined previews.
pub const ELLIPSIS: &str = "...";

const HEADING_MARKER: &str = "# ";
const TITLE_WORDS: usize = 4;
const PREVIEW_LINES: usize = 2;

/// How the collapsed excerpt is built from the first body lines.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    /// First two lines joined by newline (story view).
    #[default]
    Lines,
    /// First two lines joined by a space (summary view).
    Joined,
}

impl PreviewMode {
    pub fn separator(self) -> &'static str {
        match self {
            Self::Lines => "\n",
            Self::Joined => " ",
        }
    }

    /// Suffix a renderer appends to the preview in the collapsed state.
    pub fn collapsed_suffix(self) -> &'static str {
        match self {
            Self::Lines => "",
            Self::Joined => ELLIPSIS,
        }
    }

    /// Join the first two non-empty lines of `body`.
    pub fn preview_of(self, body: &str) -> String {
        non_empty_lines(body)
            .take(PREVIEW_LINES)
            .collect::<Vec<_>>()
            .join(self.separator())
    }
}

/// Fully resolved panel content.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct DocumentResult {
    pub title: String,
    pub preview_text: String,
    pub full_text: String,
    pub used_fallback: bool,
    pub error_message: Option<String>,
}

impl DocumentResult {
    /// Content built from the embedded fallback text.
    pub fn fallback(fallback_text: &str, mode: PreviewMode, error_message: Option<String>) -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            preview_text: mode.preview_of(fallback_text),
            full_text: fallback_text.to_string(),
            used_fallback: true,
            error_message,
        }
    }

    /// Content parsed from a fetched document. `None` when no body lines remain.
    pub fn from_remote(text: &str, mode: PreviewMode) -> Option<Self> {
        let mut lines = non_empty_lines(text);
        let first = lines.next()?;
        let (title, consumed) = extract_title(first);

        let mut body: Vec<&str> = Vec::new();
        if !consumed {
            body.push(first);
        }
        body.extend(lines);
        if body.is_empty() {
            return None;
        }

        let full_text = body.join("\n");
        Some(Self {
            title,
            preview_text: mode.preview_of(&full_text),
            full_text,
            used_fallback: false,
            error_message: None,
        })
    }
}

/// Lines that hold something other than whitespace. Tolerates a leading
/// byte-order mark and `\r\n` endings.
pub(crate) fn non_empty_lines(text: &str) -> impl Iterator<Item = &str> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .filter(|line| !line.trim().is_empty())
}

/// Title for a document whose first non-empty line is `first`, and whether that
/// line is consumed (excluded from the body).
pub(crate) fn extract_title(first: &str) -> (String, bool) {
    if let Some(rest) = first.strip_prefix(HEADING_MARKER) {
        return (rest.trim().to_string(), true);
    }
    if fold_case(first).contains(BRAND_PHRASE) {
        return (first.trim().to_string(), true);
    }
    let words: Vec<&str> = first.split_whitespace().take(TITLE_WORDS).collect();
    (format!("{}{ELLIPSIS}", words.join(" ")), false)
}

/// Lowercase with the dotted and dotless forms of `i` folded together, so
/// Turkish capitals (`İ`, `I`) and lowercase (`i`, `ı`) compare equal.
pub(crate) fn fold_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'İ' | 'I' | 'ı' => out.push('i'),
            '\u{307}' => {} // combining dot above
            _ => out.extend(c.to_lowercase()),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/content/document.rs"]
mod tests;
