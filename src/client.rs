use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::Config;
use crate::constants::USER_AGENT;
use crate::envelope::Envelope;
use crate::error::{ClientError, Result};
use crate::interceptor::Interceptor;
use crate::normalizer::error_body_from_text;

/// HTTP client for the DeuceLeague backend. Every response it returns has
/// already been through the [`Interceptor`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_prefix: String,
    interceptor: Interceptor,
}

/// A successful response: status and headers as received, body normalized.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: Value,
}

impl ApiResponse {
    pub fn envelope<T: DeserializeOwned>(&self) -> Result<Envelope<T>> {
        decode_envelope(self.data.clone())
    }

    pub fn into_envelope<T: DeserializeOwned>(self) -> Result<Envelope<T>> {
        decode_envelope(self.data)
    }

    pub fn into_data(self) -> Value {
        self.data
    }
}

fn decode_envelope<T: DeserializeOwned>(data: Value) -> Result<Envelope<T>> {
    serde_json::from_value(data)
        .map_err(|e| ClientError::Decode(format!("Unexpected response shape: {}", e)))
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| ClientError::InvalidRequest(format!("Request body is not JSON: {}", e)))?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(config.api_url.trim())
            .map_err(|e| ClientError::Config(format!("Invalid API URL: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Config(format!("HTTP client init failed: {}", e)))?;

        Ok(Self::with_http(
            http,
            base_url,
            &config.api_prefix,
            Interceptor::from_config(config),
        ))
    }

    /// Assembles a client from an existing `reqwest::Client`.
    pub fn with_http(
        http: reqwest::Client,
        base_url: Url,
        api_prefix: &str,
        interceptor: Interceptor,
    ) -> Self {
        Self {
            http,
            base_url,
            api_prefix: api_prefix.trim().trim_end_matches('/').to_string(),
            interceptor,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// Resolves a request path against the base URL, keeping any path the
    /// base URL already has.
    pub fn url_for(&self, path: &str, query: &[(String, String)]) -> Result<Url> {
        if path.contains('?') || path.contains('#') {
            return Err(ClientError::InvalidRequest(format!(
                "Path must not carry a query or fragment: {}",
                path
            )));
        }

        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim().trim_start_matches('/')
        );
        url.set_path(&joined);
        url.set_query(None);
        url.set_fragment(None);

        let pairs: Vec<&(String, String)> = query
            .iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .collect();
        if !pairs.is_empty() {
            let mut serializer = url.query_pairs_mut();
            for (key, value) in pairs {
                serializer.append_pair(key, value.trim());
            }
        }

        Ok(url)
    }

    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path, &request.query)?;
        let method_label = request.method.to_string();
        let url_label = url.to_string();
        tracing::debug!("{} {}", method_label, url_label);

        let mut builder = self.http.request(request.method, url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                return Err(self.interceptor.on_error(ClientError::Network {
                    method: method_label,
                    url: url_label,
                    message: describe_transport_error(&e),
                }))
            }
        };

        let status = response.status();
        let headers = response.headers().clone();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                return Err(self.interceptor.on_error(ClientError::Network {
                    method: method_label,
                    url: url_label,
                    message: describe_transport_error(&e),
                }))
            }
        };

        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("Request failed");
            return Err(self.interceptor.on_error(ClientError::Http {
                method: method_label,
                url: url_label,
                status: status.as_u16(),
                body: error_body_from_text(&text, reason),
            }));
        }

        let mut api_response = ApiResponse {
            status,
            headers,
            data: parse_body(&text),
        };
        self.interceptor.on_response(&mut api_response);
        Ok(api_response)
    }

    /// Like [`send`](Self::send), but gives up as soon as `cancel` fires.
    pub async fn send_with_cancel(
        &self,
        request: ApiRequest,
        cancel: &CancellationToken,
    ) -> Result<ApiResponse> {
        let method_label = request.method.to_string();
        let url_label = self.url_for(&request.path, &request.query)?.to_string();

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(self.interceptor.on_error(ClientError::Cancelled {
                method: method_label,
                url: url_label,
            })),
            result = self.send(request) => result,
        }
    }

    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<ApiResponse> {
        self.send(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        self.send(ApiRequest::delete(path)).await
    }
}

// Success bodies: empty is null, invalid JSON is kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out: {}", e)
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
