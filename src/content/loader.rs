use tokio_util::sync::CancellationToken;

use crate::content::document::{DocumentResult, FETCH_FAILED_MESSAGE, PreviewMode};
use crate::content::fetch::DocumentFetcher;
use crate::content::source::{ContentSource, DocumentId};
use crate::foundation::error::ContentUnavailable;

/// Resolves a [`ContentSource`] into a [`DocumentResult`], falling back to
/// embedded text on any failure.
#[derive(Debug)]
pub struct ContentLoader<F> {
    fetcher: F,
}

impl<F: DocumentFetcher> ContentLoader<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Resolve content for one load cycle. Never fails: unavailable remote
    /// content is replaced by `fallback_text` and reported through
    /// [`DocumentResult::error_message`].
    #[tracing::instrument(skip(self, source, fallback_text), fields(source = %source))]
    pub async fn resolve(
        &self,
        source: &ContentSource,
        fallback_text: &str,
        mode: PreviewMode,
    ) -> DocumentResult {
        let id = match source {
            ContentSource::Unconfigured => {
                tracing::debug!("no remote source configured, using fallback text");
                return DocumentResult::fallback(fallback_text, mode, None);
            }
            ContentSource::Document(id) => id,
        };

        match self.fetch_document(id, mode).await {
            Ok(doc) => {
                tracing::debug!(title = %doc.title, "remote document loaded");
                doc
            }
            Err(reason) => {
                tracing::warn!(%reason, "remote document unavailable, using fallback text");
                DocumentResult::fallback(
                    fallback_text,
                    mode,
                    Some(FETCH_FAILED_MESSAGE.to_string()),
                )
            }
        }
    }

    /// Like [`Self::resolve`], but gives up with `None` once `cancel` fires.
    pub async fn resolve_until(
        &self,
        source: &ContentSource,
        fallback_text: &str,
        mode: PreviewMode,
        cancel: &CancellationToken,
    ) -> Option<DocumentResult> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                tracing::debug!(source = %source, "content load cancelled");
                None
            }
            doc = self.resolve(source, fallback_text, mode) => Some(doc),
        }
    }

    async fn fetch_document(
        &self,
        id: &DocumentId,
        mode: PreviewMode,
    ) -> Result<DocumentResult, ContentUnavailable> {
        let text = self.fetcher.fetch_text(id).await?;
        if text.trim().is_empty() {
            return Err(ContentUnavailable::RemoteEmpty);
        }
        DocumentResult::from_remote(&text, mode).ok_or(ContentUnavailable::RemoteEmpty)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/loader.rs"]
mod tests;
