// Outbound JSON GET requests. Query assembly here, actual I/O behind Transport.

use async_trait::async_trait;

use crate::error::WidgetError;

/// A fully described page fetch: endpoint plus ordered query parameters.
///
/// Construction appends a `_` parameter carrying the current epoch
/// milliseconds, so repeated fetches of the same page bypass intermediary
/// response caches.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    url: String,
    params: Vec<(String, String)>,
}

impl PageRequest {
    pub fn new(url: impl Into<String>, mut params: Vec<(String, String)>) -> Self {
        params.push(("_".to_string(), epoch_millis().to_string()));
        PageRequest {
            url: url.into(),
            params,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// The request URL with the encoded query string appended.
    pub fn full_url(&self) -> Result<String, WidgetError> {
        let query = serde_urlencoded::to_string(&self.params)
            .map_err(|e| WidgetError::Transport(e.to_string()))?;
        let joiner = if self.url.contains('?') { '&' } else { '?' };
        Ok(format!("{}{}{}", self.url, joiner, query))
    }
}

/// Current time in epoch milliseconds, for the cache-buster parameter.
fn epoch_millis() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Asynchronous JSON GET. The paginator and the live search share one
/// transport; tests substitute fakes.
#[async_trait(?Send)]
pub trait Transport {
    /// Fetch `request` and parse the body as JSON.
    ///
    /// A network failure, a non-success status, and an unparseable body are
    /// all transport errors; callers treat them uniformly.
    async fn get_json(&self, request: &PageRequest) -> Result<serde_json::Value, WidgetError>;
}

/// Browser transport over the Fetch API.
#[cfg(target_arch = "wasm32")]
#[derive(Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

#[cfg(target_arch = "wasm32")]
impl HttpTransport {
    pub fn new() -> Self {
        HttpTransport {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn get_json(&self, request: &PageRequest) -> Result<serde_json::Value, WidgetError> {
        let url = request.full_url()?;
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| WidgetError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(WidgetError::Status {
                status: status.as_u16(),
                url,
            });
        }
        response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| WidgetError::Transport(e.to_string()))
    }
}
