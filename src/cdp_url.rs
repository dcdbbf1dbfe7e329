use reqwest::Url;
use thiserror::Error;

use crate::loopback;

/// Appends `path` to a CDP base URL with exactly one `/` between them.
///
/// Both strings are kept as given apart from the slashes at the seam, so a
/// query in `path` (`json/new?about:blank`) passes through unencoded.
pub fn append_cdp_path(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[derive(Debug, Error, PartialEq)]
pub enum EndpointError {
    #[error("invalid CDP URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("unsupported CDP URL scheme '{0}' (expected http, https, ws or wss)")]
    UnsupportedScheme(String),

    #[error("CDP URL '{0}' has no host")]
    MissingHost(String),
}

/// A validated CDP base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct CdpEndpoint {
    url: Url,
}

impl CdpEndpoint {
    pub fn parse(input: &str) -> Result<Self, EndpointError> {
        let trimmed = input.trim();
        let url = Url::parse(trimmed).map_err(|err| EndpointError::InvalidUrl {
            url: trimmed.to_string(),
            reason: err.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" | "ws" | "wss" => {}
            other => return Err(EndpointError::UnsupportedScheme(other.to_string())),
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(EndpointError::MissingHost(trimmed.to_string()));
        }

        Ok(Self { url })
    }

    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    pub fn port(&self) -> Option<u16> {
        self.url.port_or_known_default()
    }

    pub fn is_loopback(&self) -> bool {
        loopback::is_loopback_host(self.host())
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn join(&self, path: &str) -> String {
        append_cdp_path(self.url.as_str(), path)
    }

    pub fn version_url(&self) -> String {
        self.join("json/version")
    }

    pub fn list_url(&self) -> String {
        self.join("json/list")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_separator() {
        let base = "http://127.0.0.1:9222";
        assert_eq!(append_cdp_path(base, "/json/version"), "http://127.0.0.1:9222/json/version");
        assert_eq!(append_cdp_path(base, "json/version"), "http://127.0.0.1:9222/json/version");
        assert_eq!(append_cdp_path("http://127.0.0.1:9222/", "/json"), "http://127.0.0.1:9222/json");
    }

    #[test]
    fn path_query_is_not_encoded() {
        assert_eq!(
            append_cdp_path("http://127.0.0.1:9222", "/json/new?about:blank"),
            "http://127.0.0.1:9222/json/new?about:blank"
        );
        assert_eq!(
            append_cdp_path("http://127.0.0.1:9222", "json/a b"),
            "http://127.0.0.1:9222/json/a b"
        );
    }

    #[test]
    fn base_is_kept_byte_for_byte() {
        assert_eq!(
            append_cdp_path("HTTP://LOCALHOST:9222", "json/version"),
            "HTTP://LOCALHOST:9222/json/version"
        );
        assert_eq!(
            append_cdp_path("http://example.com:80", "json/version"),
            "http://example.com:80/json/version"
        );
        assert_eq!(
            append_cdp_path("http://browser.local:9222/cdp/", "json/list"),
            "http://browser.local:9222/cdp/json/list"
        );
    }

    #[test]
    fn joins_strings_that_are_not_urls() {
        assert_eq!(append_cdp_path("127.0.0.1:9222/", "//json"), "127.0.0.1:9222/json");
        assert_eq!(append_cdp_path("", "json"), "/json");
    }

    #[test]
    fn endpoint_rejects_bad_urls() {
        assert!(matches!(
            CdpEndpoint::parse("not a url"),
            Err(EndpointError::InvalidUrl { .. })
        ));
        assert_eq!(
            CdpEndpoint::parse("ftp://127.0.0.1:21"),
            Err(EndpointError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn endpoint_discovery_urls() {
        let endpoint = CdpEndpoint::parse(" http://localhost:9222 ").unwrap();
        assert!(endpoint.is_loopback());
        assert_eq!(endpoint.port(), Some(9222));
        assert_eq!(endpoint.version_url(), "http://localhost:9222/json/version");
        assert_eq!(endpoint.list_url(), "http://localhost:9222/json/list");

        let remote = CdpEndpoint::parse("wss://browser.example.com/devtools").unwrap();
        assert!(!remote.is_loopback());
        assert_eq!(remote.port(), Some(443));
    }
}
