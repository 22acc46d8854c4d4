// src/client/transport.rs — JSON-over-HTTP transport to the assistant backend
//
// Every client call funnels through `Transport::request`. The HTTP
// implementation joins the request path onto a fixed base URL, sends JSON
// headers, and surfaces non-2xx responses as `ClientError::Http`. No retries.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use url::Url;

use crate::infra::config::BackendConfig;
use crate::infra::errors::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Single request primitive shared by the session and chat clients.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, path: &str, method: Method, body: Option<Value>) -> Result<Value>;

    async fn get(&self, path: &str) -> Result<Value> {
        self.request(path, Method::Get, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value> {
        self.request(path, Method::Post, Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<Value> {
        self.request(path, Method::Put, Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<Value> {
        self.request(path, Method::Delete, None).await
    }
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let base_url = normalize_base(base_url)?;

        let mut builder = Client::builder()
            .default_headers(headers)
            .user_agent(concat!("pension-chat/", env!("CARGO_PKG_VERSION")));
        // A local backend must never be routed through an HTTP(S)_PROXY.
        if is_loopback(&base_url) {
            builder = builder.no_proxy();
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL. A leading `/` does not discard
    /// the base path prefix.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("invalid request path '{path}': {e}")))
    }
}

/// Append `id` to `prefix` as exactly one path segment. Reserved characters
/// are percent-encoded, so `/`, `?` and `#` cannot leave the endpoint. Empty
/// and dot-only ids are rejected because URL resolution would collapse them.
pub fn segment_path(prefix: &str, id: &str) -> Result<String> {
    if matches!(id, "" | "." | "..") {
        return Err(ClientError::InvalidPathSegment(id.to_string()));
    }
    // byte_serialize writes spaces as `+`; a literal `+` comes out as `%2B`.
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    Ok(format!(
        "{}/{}",
        prefix.trim_end_matches('/'),
        encoded.replace('+', "%20")
    ))
}

/// Parse the base URL and make sure it ends in `/` so joins append to it.
fn normalize_base(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ClientError::Config(format!("invalid backend base_url '{raw}': {e}")))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, path: &str, method: Method, body: Option<Value>) -> Result<Value> {
        let url = self.url_for(path)?;
        tracing::debug!("{method} {url}");

        let mut req = self.client.request(method.into(), url);
        if let Some(ref body) = body {
            req = req.json(body);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::debug!("{method} {path} failed with {status}");
            return Err(ClientError::Http {
                method: method.to_string(),
                path: path.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(parse_body(&text))
    }
}

fn is_loopback(url: &Url) -> bool {
    match url.host() {
        Some(url::Host::Domain(d)) => d.eq_ignore_ascii_case("localhost"),
        Some(url::Host::Ipv4(ip)) => ip.is_loopback(),
        Some(url::Host::Ipv6(ip)) => ip.is_loopback(),
        None => false,
    }
}

/// Empty bodies become `Null`; bodies that are not JSON are returned as text.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
