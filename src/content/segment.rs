//! Lossless word/separator segmentation of display text.

/// Kind of a display token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Maximal run of non-whitespace characters.
    Word,
    /// A single `\n`, or a maximal run of other whitespace.
    Separator,
}

/// One token borrowed from the segmented text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
}

impl Token<'_> {
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn is_line_break(&self) -> bool {
        self.text == "\n"
    }
}

/// Lazily segment `text`. The iterator is `Clone`, so a sequence can be
/// restarted from any point without re-scanning what came before.
pub fn segment(text: &str) -> Segments<'_> {
    Segments { rest: text }
}

/// Iterator returned by [`segment`].
#[derive(Clone, Debug)]
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.rest.chars().next()?;
        let (kind, len) = if first == '\n' {
            (TokenKind::Separator, 1)
        } else if first.is_whitespace() {
            let len = run_len(self.rest, |c| c.is_whitespace() && c != '\n');
            (TokenKind::Separator, len)
        } else {
            (TokenKind::Word, run_len(self.rest, |c| !c.is_whitespace()))
        };

        let (text, rest) = self.rest.split_at(len);
        self.rest = rest;
        Some(Token { kind, text })
    }
}

impl std::iter::FusedIterator for Segments<'_> {}

fn run_len(s: &str, keep: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !keep(c))
        .map_or(s.len(), |(i, _)| i)
}

#[cfg(test)]
#[path = "../../tests/unit/content/segment.rs"]
mod tests;
