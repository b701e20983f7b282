//! arXiv API provider.
//!
//! Queries the public arXiv export API and parses the returned Atom feed into
//! records. Only `<entry>` elements become records; feed-level metadata is
//! skipped.

use std::time::Duration;

use async_trait::async_trait;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, info};

use super::{ProviderError, ProviderResult, RecordProvider};
use crate::models::Record;

/// Base URL of the arXiv export API.
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api";

/// Builds the query URL for a free-text search.
///
/// Parameters are form-encoded, so `#`, `&` and `+` in the search term stay
/// part of the query.
///
/// # Errors
/// Returns `ProviderError::ConfigError` if `base_url` is not a valid URL
pub fn query_url(base_url: &str, search_term: &str, max_results: usize) -> ProviderResult<reqwest::Url> {
    let search_query = format!("all:{}", search_term.trim());
    let max_results = max_results.to_string();
    reqwest::Url::parse_with_params(
        &format!("{}/query", base_url),
        &[
            ("search_query", search_query.as_str()),
            ("start", "0"),
            ("max_results", max_results.as_str()),
        ],
    )
    .map_err(|e| ProviderError::ConfigError(format!("Invalid arXiv URL {}: {}", base_url, e)))
}

/// Provider backed by the arXiv export API.
#[derive(Debug, Clone)]
pub struct ArxivProvider {
    client: reqwest::Client,
    base_url: String,
}

impl ArxivProvider {
    /// Create a provider against the public API.
    ///
    /// # Arguments
    /// * `timeout` - Whole-request timeout for each fetch
    ///
    /// # Errors
    /// Returns `ProviderError::ConfigError` if the HTTP client cannot be built
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        Self::with_base_url(ARXIV_API_URL, timeout)
    }

    /// Create a provider against a custom API root (mirrors, test servers).
    pub fn with_base_url(base_url: &str, timeout: Duration) -> ProviderResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("arxiv-cluster-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RecordProvider for ArxivProvider {
    async fn fetch_records(&self, query: &str, max_results: usize) -> ProviderResult<Vec<Record>> {
        let url = query_url(&self.base_url, query, max_results)?;
        debug!("Fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(format!("arXiv request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ProviderError::NetworkError(format!(
                "arXiv returned status {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError(format!("Failed to read arXiv response: {}", e)))?;

        let records = parse_feed(&body)?;
        info!("arXiv returned {} entries for '{}'", records.len(), query);
        Ok(records)
    }

    fn name(&self) -> &str {
        "arXiv"
    }
}

/// Entry fields collected while walking the XML events.
#[derive(Default)]
struct EntryBuilder {
    id: String,
    title: String,
    summary: Option<String>,
    published: String,
    journal_ref: Option<String>,
    doi: Option<String>,
}

impl EntryBuilder {
    fn push_text(&mut self, element: &[u8], text: &str) {
        match element {
            b"id" => self.id.push_str(text),
            b"title" => self.title.push_str(text),
            b"summary" => self.summary.get_or_insert_with(String::new).push_str(text),
            b"published" => self.published.push_str(text),
            b"journal_ref" => self.journal_ref.get_or_insert_with(String::new).push_str(text),
            b"doi" => self.doi.get_or_insert_with(String::new).push_str(text),
            _ => {}
        }
    }

    fn build(self) -> Record {
        Record {
            title: self.title.trim().to_string(),
            summary: self.summary.map(|s| s.trim().to_string()),
            published: self.published.trim().to_string(),
            journal_ref: self.journal_ref.map(|s| s.trim().to_string()),
            id: self.id.trim().to_string(),
            doi: self.doi.map(|s| s.trim().to_string()),
        }
    }
}

fn local_name(start: &BytesStart<'_>) -> Vec<u8> {
    start.local_name().as_ref().to_vec()
}

/// Parse an arXiv Atom feed into records.
///
/// Namespace prefixes are ignored, so `<arxiv:doi>` and `<arxiv:journal_ref>`
/// fill `doi` and `journal_ref`. Text inside nested elements of an entry
/// (e.g. `<author><name>`) is not attributed to the entry's own fields.
///
/// # Errors
/// Returns `ProviderError::ParseError` on malformed XML
pub fn parse_feed(xml: &str) -> ProviderResult<Vec<Record>> {
    let mut reader = Reader::from_str(xml);

    let mut records = Vec::new();
    let mut entry: Option<EntryBuilder> = None;
    // element path below the current <entry>
    let mut path: Vec<Vec<u8>> = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let name = local_name(&start);
                if entry.is_none() {
                    if name == b"entry" {
                        entry = Some(EntryBuilder::default());
                        path.clear();
                    }
                } else {
                    path.push(name);
                }
            }
            Ok(Event::End(end)) => {
                if entry.is_some() {
                    if path.is_empty() && end.local_name().as_ref() == b"entry" {
                        if let Some(builder) = entry.take() {
                            records.push(builder.build());
                        }
                    } else {
                        path.pop();
                    }
                }
            }
            Ok(Event::Text(text)) => {
                if let (Some(builder), [element]) = (entry.as_mut(), path.as_slice()) {
                    let text = text
                        .unescape()
                        .map_err(|e| ProviderError::ParseError(format!("Invalid text: {}", e)))?;
                    builder.push_text(element, &text);
                }
            }
            Ok(Event::CData(data)) => {
                if let (Some(builder), [element]) = (entry.as_mut(), path.as_slice()) {
                    let text = String::from_utf8_lossy(&data);
                    builder.push_text(element, &text);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ProviderError::ParseError(format!(
                    "Malformed feed at position {}: {}",
                    reader.error_position(),
                    e
                )))
            }
        }
    }

    if entry.is_some() {
        return Err(ProviderError::ParseError(
            "Feed ended inside an <entry>".to_string(),
        ));
    }

    Ok(records)
}
