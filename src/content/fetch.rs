use std::future::Future;
use std::time::Duration;

use url::Url;

use crate::content::source::DocumentId;
use crate::foundation::error::{ContentUnavailable, RevealError, RevealResult};

/// Default document-export host.
pub const DEFAULT_EXPORT_BASE: &str = "https://docs.google.com/";

/// Retrieves the plain-text export of a remote document.
///
/// Implementations make exactly one attempt per call and never retry.
pub trait DocumentFetcher {
    /// Fetch the raw UTF-8 text for `id`.
    fn fetch_text(
        &self,
        id: &DocumentId,
    ) -> impl Future<Output = Result<String, ContentUnavailable>> + Send;
}

/// Options for [`HttpFetcher`].
#[derive(Clone, Debug)]
pub struct HttpFetcherOpts {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HttpFetcherOpts {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_EXPORT_BASE.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// [`DocumentFetcher`] backed by the document-export HTTP endpoint.
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpFetcher {
    pub fn new(opts: HttpFetcherOpts) -> RevealResult<Self> {
        let base_url = Url::parse(&opts.base_url).map_err(|err| {
            RevealError::validation(format!("invalid base url '{}': {err}", opts.base_url))
        })?;
        let client = reqwest::Client::builder()
            .timeout(opts.timeout)
            .user_agent(concat!("story-reveal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| RevealError::Other(anyhow::Error::new(err)))?;
        Ok(Self { client, base_url })
    }

    /// `{base}document/d/{id}/export?format=txt`
    pub fn export_url(&self, id: &DocumentId) -> RevealResult<Url> {
        let mut url = self
            .base_url
            .join(&format!("document/d/{id}/export"))
            .map_err(|err| RevealError::validation(format!("invalid export url: {err}")))?;
        url.query_pairs_mut().append_pair("format", "txt");
        Ok(url)
    }
}

impl DocumentFetcher for HttpFetcher {
    async fn fetch_text(&self, id: &DocumentId) -> Result<String, ContentUnavailable> {
        let url = self
            .export_url(id)
            .map_err(|err| ContentUnavailable::RemoteUnreachable(err.to_string()))?;
        tracing::debug!(%url, "fetching document export");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| ContentUnavailable::RemoteUnreachable(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentUnavailable::RemoteRejected(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|err| ContentUnavailable::RemoteUnreachable(err.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/content/fetch.rs"]
mod tests;
