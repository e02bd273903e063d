//! HTTP transport shared by every resource service.
//!
//! SYSTEM CONTEXT
//! ==============
//! Services describe a call as an [`ApiRequest`] and hand it to a
//! [`Transport`]. [`HttpTransport`] is the production implementation: one
//! `reqwest` client with a cookie jar, so the session cookie set by
//! `/auth/login` rides along on every later call.
//!
//! JSON and binary responses are decoded on separate paths. A binary success
//! body is returned untouched; only error bodies are ever inspected as JSON.

use std::path::Path;
use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderValue};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::TransportError;

const ACCEPT_JSON: &str = "application/json";
const ACCEPT_BINARY: &str = "application/pdf, application/octet-stream";

/// How the response body of a call should be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseKind {
    #[default]
    Json,
    Binary,
}

/// A file to send as one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_image_mime(&file_name).map(ToOwned::to_owned);
        Self { file_name, content_type, bytes }
    }

    /// Read a file from disk, keeping only its final path component as the name.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the file cannot be read.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".to_owned(), |name| name.to_string_lossy().into_owned());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_image_mime(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart { field: String, file: FileUpload },
}

/// One call against the API, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
    pub response_kind: ResponseKind,
}

impl ApiRequest {
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None, response_kind: ResponseKind::Json }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    #[must_use]
    pub fn query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    #[must_use]
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    #[must_use]
    pub fn multipart(mut self, field: impl Into<String>, file: FileUpload) -> Self {
        self.body = Some(RequestBody::Multipart { field: field.into(), file });
        self
    }

    /// Treat the response as an opaque binary payload.
    #[must_use]
    pub fn binary(mut self) -> Self {
        self.response_kind = ResponseKind::Binary;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Json(Value),
    Binary(Vec<u8>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub data: ResponseData,
}

impl ApiResponse {
    /// The decoded JSON body, or an error if this was a binary call.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Decode`] when the response holds bytes.
    pub fn into_json(self) -> Result<Value, TransportError> {
        match self.data {
            ResponseData::Json(value) => Ok(value),
            ResponseData::Binary(_) => Err(TransportError::Decode("expected a JSON response".to_owned())),
        }
    }

    /// The raw body of a binary call.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Decode`] when the response was decoded as JSON.
    pub fn into_bytes(self) -> Result<Vec<u8>, TransportError> {
        match self.data {
            ResponseData::Binary(bytes) => Ok(bytes),
            ResponseData::Json(_) => Err(TransportError::Decode("expected a binary response".to_owned())),
        }
    }
}

/// Anything that can execute an [`ApiRequest`].
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest`-backed transport with a persistent cookie jar.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build the transport from a validated config.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Request`] if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| TransportError::Request(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        let accept = match request.response_kind {
            ResponseKind::Json => ACCEPT_JSON,
            ResponseKind::Binary => ACCEPT_BINARY,
        };
        let mut builder = self
            .http
            .request(request.method, url)
            .header(ACCEPT, HeaderValue::from_static(accept));
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        builder = match request.body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart { field, file }) => builder.multipart(multipart_form(field, file)?),
        };
        Ok(builder)
    }
}

fn multipart_form(field: String, file: FileUpload) -> Result<reqwest::multipart::Form, TransportError> {
    let mut part = reqwest::multipart::Part::bytes(file.bytes).file_name(file.file_name);
    if let Some(content_type) = file.content_type {
        part = part
            .mime_str(&content_type)
            .map_err(|e| TransportError::Request(e.to_string()))?;
    }
    Ok(reqwest::multipart::Form::new().part(field, part))
}

fn network_error(err: &reqwest::Error) -> TransportError {
    if err.is_timeout() {
        tracing::debug!(error = %err, "request timed out");
    }
    TransportError::Network(err.to_string())
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let method = request.method.clone();
        let path = request.path.clone();
        let kind = request.response_kind;
        tracing::debug!(%method, %path, ?kind, "api request");

        let response = self.build(request)?.send().await.map_err(|e| network_error(&e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| network_error(&e))?;
        tracing::debug!(%method, %path, status, len = body.len(), "api response");

        if !(200..300).contains(&status) {
            let body = serde_json::from_slice::<Value>(&body).ok();
            return Err(TransportError::Status { status, body });
        }

        let data = match kind {
            ResponseKind::Binary => ResponseData::Binary(body.to_vec()),
            ResponseKind::Json if body.iter().all(u8::is_ascii_whitespace) => ResponseData::Json(Value::Null),
            ResponseKind::Json => ResponseData::Json(
                serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))?,
            ),
        };
        Ok(ApiResponse { status, data })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
