//! API origin configuration.
//!
//! The origin comes from `HUDDLE_API_HOST`. An empty or root-relative value
//! (`""`, `"/api"`) means "the page's own origin", with the value appended.

use huddle_shared::{ConnectError, CHANNEL_PATH, CHANNEL_TOKEN_PARAM};
use url::Url;

pub const API_HOST_VAR: &str = "HUDDLE_API_HOST";
pub const PAGE_ORIGIN_VAR: &str = "HUDDLE_PAGE_ORIGIN";

/// Page origin used on native targets when `HUDDLE_PAGE_ORIGIN` is unset.
pub const DEFAULT_PAGE_ORIGIN: &str = "http://localhost";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Configured API host, possibly empty or root-relative.
    pub api_host: String,
    /// Origin of the page (or its native stand-in).
    pub page_origin: String,
}

impl ClientConfig {
    pub fn new(api_host: impl Into<String>, page_origin: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            page_origin: page_origin.into(),
        }
    }

    /// Read the configuration from the environment.
    ///
    /// In the browser `HUDDLE_API_HOST` is baked in at compile time and the
    /// page origin comes from `window.location`.
    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        let api_host = option_env!("HUDDLE_API_HOST").unwrap_or_default();
        let page_origin = web_sys::window()
            .and_then(|w| w.location().origin().ok())
            .unwrap_or_default();
        Self::new(api_host, page_origin)
    }

    /// Read the configuration from the environment.
    ///
    /// The runtime variable wins over a value baked in at compile time.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let api_host = std::env::var(API_HOST_VAR)
            .ok()
            .or_else(|| option_env!("HUDDLE_API_HOST").map(String::from))
            .unwrap_or_default();
        let page_origin =
            std::env::var(PAGE_ORIGIN_VAR).unwrap_or_else(|_| DEFAULT_PAGE_ORIGIN.to_string());
        Self::new(api_host, page_origin)
    }

    /// The resolved API origin.
    pub fn origin(&self) -> String {
        if self.api_host.is_empty() || self.api_host.starts_with('/') {
            format!("{}{}", self.page_origin.trim_end_matches('/'), self.api_host)
        } else {
            self.api_host.clone()
        }
    }

    /// Absolute URL for an API path.
    pub fn api_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        let origin = self.origin();
        let base = origin.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    /// URL of the channel endpoint: the origin with its scheme switched to
    /// `ws`/`wss`, path `/echo`, and the token as a query parameter when one
    /// is present.
    pub fn channel_url(&self, token: Option<&str>) -> Result<Url, ConnectError> {
        let origin = self.origin();
        let mut url = Url::parse(&origin).map_err(|e| ConnectError::InvalidOrigin(format!("{origin}: {e}")))?;

        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => return Err(ConnectError::InvalidOrigin(format!("unsupported scheme {other}"))),
        };
        url.set_scheme(scheme)
            .map_err(|_| ConnectError::InvalidOrigin(origin.clone()))?;

        let path = format!("{}{}", url.path().trim_end_matches('/'), CHANNEL_PATH);
        url.set_path(&path);
        url.set_query(None);
        if let Some(token) = token {
            url.query_pairs_mut().append_pair(CHANNEL_TOKEN_PARAM, token);
        }

        Ok(url)
    }
}
