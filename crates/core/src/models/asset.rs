use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What a request is for, as reported by the host (`Request.destination`).
/// Determines which caching strategy serves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RequestDestination {
    /// A top-level page navigation
    Document,
    Style,
    Script,
    Image,
    Font,
    /// Web app manifest
    Manifest,
    /// fetch()/XHR and anything else without a destination
    #[default]
    Empty,
}

/// Routing class derived from a request's destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// Cache-first, offline document fallback
    Navigation,
    /// Cache-first, placeholder fallback
    StaticAsset,
    /// Network-first, cache fallback
    Other,
}

impl RequestDestination {
    pub fn class(&self) -> RequestClass {
        match self {
            RequestDestination::Document => RequestClass::Navigation,
            RequestDestination::Style
            | RequestDestination::Script
            | RequestDestination::Image
            | RequestDestination::Font => RequestClass::StaticAsset,
            RequestDestination::Manifest | RequestDestination::Empty => RequestClass::Other,
        }
    }

    /// Best guess from a URL path, for assets declared by path only.
    pub fn infer_from_url(url: &str) -> Self {
        let path = url.split(['?', '#']).next().unwrap_or(url);
        let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            _ if path.ends_with('/') => RequestDestination::Document,
            Some("html") | Some("htm") => RequestDestination::Document,
            Some("css") => RequestDestination::Style,
            Some("js") | Some("mjs") => RequestDestination::Script,
            Some("png") | Some("jpg") | Some("jpeg") | Some("gif") | Some("svg")
            | Some("webp") | Some("ico") => RequestDestination::Image,
            Some("woff") | Some("woff2") | Some("ttf") | Some("otf") => RequestDestination::Font,
            Some("json") | Some("webmanifest") => RequestDestination::Manifest,
            _ if url.contains("fonts.googleapis.com/css") => RequestDestination::Style,
            _ => RequestDestination::Empty,
        }
    }
}

/// An outbound resource request intercepted by the asset cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRequest {
    /// HTTP method, uppercased
    pub method: String,

    /// Absolute URL or root-relative path (e.g. "/styles.css")
    pub url: String,

    pub destination: RequestDestination,
}

impl AssetRequest {
    pub fn new(
        method: impl Into<String>,
        url: impl Into<String>,
        destination: RequestDestination,
    ) -> Self {
        Self {
            method: method.into().to_uppercase(),
            url: url.into(),
            destination,
        }
    }

    pub fn get(url: impl Into<String>, destination: RequestDestination) -> Self {
        Self::new("GET", url, destination)
    }

    /// A page navigation to `url`.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::get(url, RequestDestination::Document)
    }

    /// A GET whose destination is inferred from the URL.
    pub fn for_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let destination = RequestDestination::infer_from_url(&url);
        Self::get(url, destination)
    }

    pub fn is_get(&self) -> bool {
        self.method == "GET"
    }

    /// Storage key: method and URL. The destination is not part of the key.
    pub fn cache_key(&self) -> String {
        format!("{} {}", self.method, self.url)
    }

    /// The same request with an absolute URL on `origin` rewritten to its
    /// root-relative path, so `http://localhost/styles.css` and `/styles.css`
    /// share one cache key. URLs on other origins are left alone.
    pub fn relative_to(&self, origin: &str) -> AssetRequest {
        let origin = origin.trim_end_matches('/');
        let head = self.url.get(..origin.len());
        let path = match head {
            Some(head) if !origin.is_empty() && head.eq_ignore_ascii_case(origin) => {
                let rest = &self.url[origin.len()..];
                match rest.chars().next() {
                    None => Some("/".to_string()),
                    Some('/') => Some(rest.to_string()),
                    Some('?') | Some('#') => Some(format!("/{rest}")),
                    // A longer host or an explicit port: a different origin
                    Some(_) => None,
                }
            }
            _ => None,
        };
        match path {
            Some(url) => AssetRequest {
                url,
                ..self.clone()
            },
            None => self.clone(),
        }
    }
}

/// A response as stored in and served from the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetResponse {
    pub status: u16,

    /// Header names are lowercased
    pub headers: BTreeMap<String, String>,

    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: body.into(),
        }
    }

    /// A 200 response with the given body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(200, body)
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Only plain 200 responses are written to the cache.
    pub fn is_cacheable(&self) -> bool {
        self.status == 200
    }

    /// Any 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// A stored response together with the time it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub response: AssetResponse,
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn new(response: AssetResponse) -> Self {
        Self {
            response,
            stored_at: Utc::now(),
        }
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseSource {
    /// A cache partition
    Cache,
    /// The network, fresh
    Network,
    /// A synthesized placeholder or the offline document
    Fallback,
}

/// A response handed back to the page, tagged with its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServedResponse {
    pub response: AssetResponse,
    pub source: ResponseSource,
}

impl ServedResponse {
    pub fn from_cache(response: AssetResponse) -> Self {
        Self {
            response,
            source: ResponseSource::Cache,
        }
    }

    pub fn from_network(response: AssetResponse) -> Self {
        Self {
            response,
            source: ResponseSource::Network,
        }
    }

    pub fn fallback(response: AssetResponse) -> Self {
        Self {
            response,
            source: ResponseSource::Fallback,
        }
    }
}
