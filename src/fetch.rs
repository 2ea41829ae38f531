//! Synchronous fetch capability - blocking retrieval of a resource by locator.
//!
//! The capability is explicit rather than probed at use sites: `detect()`
//! yields either a host-backed fetcher or `Unavailable`, and callers fall
//! back to a degraded path when the fetch fails. `Fixed` serves fixtures
//! from memory for offline pages and tests.

use std::time::Instant;

#[allow(dead_code)]
pub struct FetchResult {
    pub body: String,
    pub uri: String,
    pub status: u16,
    pub elapsed_ms: u128,
}

pub enum Fetcher {
    Host(HostFetcher),
    Fixed(Vec<(String, String)>),
    Unavailable,
}

pub struct HostFetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    /// Probe the host for a synchronous fetch capability.
    pub fn detect() -> Fetcher {
        match reqwest::blocking::Client::builder()
            .user_agent("docstitch/0.1")
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
        {
            Ok(client) => Fetcher::Host(HostFetcher { client }),
            Err(_) => Fetcher::Unavailable,
        }
    }

    /// In-memory fetcher mapping exact URIs to bodies.
    pub fn fixed(pages: &[(&str, &str)]) -> Fetcher {
        Fetcher::Fixed(
            pages
                .iter()
                .map(|(uri, body)| (uri.to_string(), body.to_string()))
                .collect(),
        )
    }

    #[allow(dead_code)]
    pub fn available(&self) -> bool {
        !matches!(self, Fetcher::Unavailable)
    }

    /// Blocking GET/read of `uri`. Blocks the calling thread until the
    /// resource is read or the attempt fails.
    pub fn fetch(&self, uri: &str) -> Result<FetchResult, String> {
        match self {
            Fetcher::Host(host) => host.fetch(uri),
            Fetcher::Fixed(pages) => {
                let start = Instant::now();
                let body = pages
                    .iter()
                    .find(|(u, _)| u == uri)
                    .map(|(_, b)| b.clone())
                    .ok_or_else(|| format!("no fixture for {}", uri))?;
                Ok(FetchResult {
                    body,
                    uri: uri.to_string(),
                    status: 200,
                    elapsed_ms: start.elapsed().as_millis(),
                })
            }
            Fetcher::Unavailable => Err("synchronous fetch capability unavailable".to_string()),
        }
    }
}

impl HostFetcher {
    fn fetch(&self, uri: &str) -> Result<FetchResult, String> {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            self.fetch_http(uri)
        } else if let Some(path) = uri.strip_prefix("file://") {
            read_file(path)
        } else {
            read_file(uri)
        }
    }

    fn fetch_http(&self, uri: &str) -> Result<FetchResult, String> {
        let start = Instant::now();
        let response = self
            .client
            .get(uri)
            .header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .map_err(|e| format!("fetch error: {}", e))?;
        let status = response.status().as_u16();
        if !response.status().is_success() {
            return Err(format!("fetch error: {} returned HTTP {}", uri, status));
        }
        let final_uri = response.url().to_string();
        let body = response
            .text()
            .map_err(|e| format!("body read error: {}", e))?;
        Ok(FetchResult {
            body,
            uri: final_uri,
            status,
            elapsed_ms: start.elapsed().as_millis(),
        })
    }
}

/// Read a resource from a local file path.
fn read_file(path: &str) -> Result<FetchResult, String> {
    let start = Instant::now();
    let body =
        std::fs::read_to_string(path).map_err(|e| format!("file read error: {}: {}", path, e))?;
    Ok(FetchResult {
        body,
        uri: format!("file://{}", path),
        status: 200,
        elapsed_ms: start.elapsed().as_millis(),
    })
}

/// Resolve `href` against the page's base locator.
///
/// Absolute locators (any scheme) pass through. Relative references join
/// against a URL base via the url crate, or against the parent directory
/// for plain file paths.
pub fn resolve_uri(base: &str, href: &str) -> String {
    if href.contains("://") || href.starts_with("file:") {
        return href.to_string();
    }
    if let Ok(base_url) = url::Url::parse(base) {
        if let Ok(joined) = base_url.join(href) {
            return joined.to_string();
        }
    }
    let base_path = std::path::Path::new(base);
    match base_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            dir.join(href).to_string_lossy().into_owned()
        }
        _ => href.to_string(),
    }
}
