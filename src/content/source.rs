use crate::foundation::error::{RevealError, RevealResult};

/// Identifier value that marks a panel whose remote document was never filled in.
pub const UNCONFIGURED_PLACEHOLDER: &str = "PASTE_YOUR_DOC_ID_HERE";

/// Validated remote document identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct DocumentId(String);

impl DocumentId {
    pub fn new(raw: impl Into<String>) -> RevealResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RevealError::validation("document id must be non-empty"));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(RevealError::validation(format!(
                "document id contains invalid character {bad:?}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a panel's text comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContentSource {
    /// No remote document configured; the embedded fallback is used as-is.
    Unconfigured,
    /// A remote document to export as plain text.
    Document(DocumentId),
}

impl ContentSource {
    /// Interpret a configured reference. Empty input and the placeholder are
    /// both the unconfigured sentinel.
    pub fn parse(raw: &str) -> RevealResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() || raw == UNCONFIGURED_PLACEHOLDER {
            return Ok(Self::Unconfigured);
        }
        Ok(Self::Document(DocumentId::new(raw)?))
    }

    pub fn from_optional(raw: Option<&str>) -> RevealResult<Self> {
        raw.map_or(Ok(Self::Unconfigured), Self::parse)
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unconfigured => f.write_str("unconfigured"),
            Self::Document(id) => write!(f, "doc:{id}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/source.rs"]
mod tests;
