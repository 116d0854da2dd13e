//! Remote fetch collaborator.
//!
//! [`Transport`] is the seam between the client and the network: one
//! best-effort GET per call, returning pagination metadata (when the remote
//! paginates the result) and the parsed JSON body. The blocking
//! [`HttpTransport`] is the production implementation; tests substitute a
//! canned one.

use reqwest::header::HeaderMap;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// Header carrying the page size of a paginated collection.
const PER_PAGE_HEADER: &str = "Per-Page";
/// Header carrying the total item count of a paginated collection.
const TOTAL_HEADER: &str = "Total";

/// Pagination metadata from the `Per-Page` / `Total` response headers.
///
/// Its presence on a response is the sole signal that the result is the
/// first page of a paginated collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    /// Items per page; always positive.
    pub per_page: usize,
    /// Total items across all pages.
    pub total: usize,
}

/// One decoded remote response.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Pagination metadata, if the response carried it.
    pub meta: Option<PageMeta>,
    /// Parsed JSON body.
    pub body: Value,
}

/// Abstract remote fetch.
///
/// Implementations issue a single blocking GET for `endpoint` (relative to
/// their base URL) and surface any failure to the caller. No retries, no
/// timeouts beyond what the implementation's HTTP stack applies.
pub trait Transport: Send + Sync {
    fn get(&self, endpoint: &str) -> Result<FetchResponse>;
}

/// Blocking HTTP transport over reqwest.
pub struct HttpTransport {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Build a transport from a config. The user agent is attached to every
    /// request the inner client sends.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::transport_source("<init>", "failed to build HTTP client", e))?;
        Ok(Self { config, http })
    }

    /// The config this transport was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

impl Transport for HttpTransport {
    fn get(&self, endpoint: &str) -> Result<FetchResponse> {
        let url = self.url_for(endpoint);
        log::debug!("GET {url}");

        let response = self
            .http
            .get(&url)
            .send()
            .map_err(|e| Error::transport_source(endpoint, "request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::transport(
                endpoint,
                format!("unexpected status {status}"),
            ));
        }

        let meta = page_meta_from_headers(response.headers(), endpoint)?;
        let body: Value = response
            .json()
            .map_err(|e| Error::transport_source(endpoint, "invalid JSON body", e))?;

        Ok(FetchResponse { meta, body })
    }
}

/// Extract pagination metadata from response headers.
///
/// `Per-Page` and `Total` must appear together or not at all; a lone header,
/// a non-integer value, or a zero page size is a malformed response.
pub fn page_meta_from_headers(headers: &HeaderMap, endpoint: &str) -> Result<Option<PageMeta>> {
    let per_page = headers.get(PER_PAGE_HEADER);
    let total = headers.get(TOTAL_HEADER);

    match (per_page, total) {
        (None, None) => Ok(None),
        (Some(per_page), Some(total)) => {
            let per_page = parse_count(per_page, PER_PAGE_HEADER, endpoint)?;
            let total = parse_count(total, TOTAL_HEADER, endpoint)?;
            if per_page == 0 {
                return Err(Error::malformed(endpoint, "Per-Page header is zero"));
            }
            Ok(Some(PageMeta { per_page, total }))
        }
        _ => Err(Error::malformed(
            endpoint,
            "Per-Page and Total headers must appear together",
        )),
    }
}

fn parse_count(
    value: &reqwest::header::HeaderValue,
    name: &str,
    endpoint: &str,
) -> Result<usize> {
    value
        .to_str()
        .ok()
        .and_then(|s| s.trim().parse::<usize>().ok())
        .ok_or_else(|| Error::malformed(endpoint, format!("{name} header is not an integer")))
}
