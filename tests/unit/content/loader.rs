use super::*;
use crate::content::document::DEFAULT_TITLE;
use std::sync::atomic::{AtomicUsize, Ordering};

struct Scripted {
    reply: Result<String, ContentUnavailable>,
    calls: AtomicUsize,
}

impl Scripted {
    fn new(reply: Result<&str, ContentUnavailable>) -> Self {
        Self {
            reply: reply.map(str::to_string),
            calls: AtomicUsize::new(0),
        }
    }
}

impl DocumentFetcher for Scripted {
    async fn fetch_text(&self, _id: &DocumentId) -> Result<String, ContentUnavailable> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply.clone()
    }
}

struct Never;

impl DocumentFetcher for Never {
    async fn fetch_text(&self, _id: &DocumentId) -> Result<String, ContentUnavailable> {
        std::future::pending().await
    }
}

fn doc_source() -> ContentSource {
    ContentSource::parse("doc-123").unwrap()
}

const FALLBACK: &str = "A\nB\nC";

#[tokio::test]
async fn unconfigured_source_skips_fetch() {
    let loader = ContentLoader::new(Scripted::new(Ok("# Remote\nx")));
    let doc = loader
        .resolve(&ContentSource::Unconfigured, FALLBACK, PreviewMode::Joined)
        .await;
    assert!(doc.used_fallback);
    assert_eq!(doc.error_message, None);
    assert_eq!(doc.title, DEFAULT_TITLE);
    assert_eq!(doc.preview_text, "A B");
    assert_eq!(loader.fetcher().calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn remote_success_is_parsed() {
    let loader = ContentLoader::new(Scripted::new(Ok("# Gece\nBir\nİki\nÜç")));
    let doc = loader
        .resolve(&doc_source(), FALLBACK, PreviewMode::Lines)
        .await;
    assert!(!doc.used_fallback);
    assert_eq!(doc.title, "Gece");
    assert_eq!(doc.full_text, "Bir\nİki\nÜç");
    assert_eq!(doc.preview_text, "Bir\nİki");
}

#[tokio::test]
async fn every_failure_collapses_to_the_same_fallback() {
    let failures = [
        Err(ContentUnavailable::RemoteUnreachable("timed out".into())),
        Err(ContentUnavailable::RemoteRejected(404)),
        Err(ContentUnavailable::RemoteRejected(500)),
        Ok(""),
        Ok("  \n\t \n"),
        Ok("# Title only"),
    ];
    let unconfigured = ContentLoader::new(Never)
        .resolve(&ContentSource::Unconfigured, FALLBACK, PreviewMode::Lines)
        .await;

    for reply in failures {
        let loader = ContentLoader::new(Scripted::new(reply));
        let doc = loader
            .resolve(&doc_source(), FALLBACK, PreviewMode::Lines)
            .await;
        assert_eq!(doc.error_message.as_deref(), Some(FETCH_FAILED_MESSAGE));
        assert_eq!(
            DocumentResult {
                error_message: None,
                ..doc
            },
            unconfigured
        );
        assert_eq!(loader.fetcher().calls.load(Ordering::SeqCst), 1, "no retry");
    }
}

#[tokio::test]
async fn cancellation_abandons_an_outstanding_fetch() {
    let loader = ContentLoader::new(Never);
    let cancel = CancellationToken::new();
    cancel.cancel();
    let out = loader
        .resolve_until(&doc_source(), FALLBACK, PreviewMode::Lines, &cancel)
        .await;
    assert_eq!(out, None);
}

#[tokio::test]
async fn uncancelled_resolution_completes() {
    let loader = ContentLoader::new(Scripted::new(Ok("Düz bir ilk satır burada")));
    let cancel = CancellationToken::new();
    let doc = loader
        .resolve_until(&doc_source(), FALLBACK, PreviewMode::Joined, &cancel)
        .await
        .unwrap();
    assert_eq!(doc.title, "Düz bir ilk satır...");
}
