//! HTTP transport for the CDN API
//!
//! Builds and issues one request per call against `<base>/api/<path>`,
//! injecting the session access token as a query parameter. Status codes are
//! never interpreted here; callers decide success from the decoded body.

use crate::error::Result;
use reqwest::multipart;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use tokio_util::codec::{BytesCodec, FramedRead};
use tracing::debug;

/// Request timeout. One attempt per invocation, no retry.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport bound to a base url and an optional access token
pub struct Transport {
    http: Client,
    base_url: String,
    access_token: Option<String>,
}

impl Transport {
    /// Create a new transport
    pub fn new(base_url: &str, access_token: Option<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
        })
    }

    /// Issue a GET request
    pub async fn get(&self, path: &str) -> Result<Value> {
        debug!(path, "GET");
        self.execute(self.http.get(self.endpoint(path))).await
    }

    /// Issue a POST request with a JSON body
    pub async fn post(&self, path: &str, body: &Value) -> Result<Value> {
        debug!(path, "POST");
        self.execute(self.http.post(self.endpoint(path)).json(body))
            .await
    }

    /// Issue a PUT request with a JSON body
    pub async fn put(&self, path: &str, body: &Value) -> Result<Value> {
        debug!(path, "PUT");
        self.execute(self.http.put(self.endpoint(path)).json(body))
            .await
    }

    /// Issue a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Value> {
        debug!(path, "DELETE");
        self.execute(self.http.delete(self.endpoint(path))).await
    }

    /// Upload a file as multipart form-data with exactly four fields:
    /// `name`, `version`, `bucket` and the streamed `assetFile` content.
    pub async fn upload(
        &self,
        path: &str,
        name: &str,
        version: &str,
        bucket: &str,
        file: &Path,
    ) -> Result<Value> {
        debug!(path, file = %file.display(), "POST (multipart)");

        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("asset")
            .to_string();
        let mime = mime_guess::from_path(file).first_or_octet_stream();

        let handle = tokio::fs::File::open(file).await?;
        let stream = FramedRead::new(handle, BytesCodec::new());
        let part = multipart::Part::stream(reqwest::Body::wrap_stream(stream))
            .file_name(file_name)
            .mime_str(mime.as_ref())?;

        let form = multipart::Form::new()
            .text("name", name.to_string())
            .text("version", version.to_string())
            .text("bucket", bucket.to_string())
            .part("assetFile", part);

        self.execute(self.http.post(self.endpoint(path)).multipart(form))
            .await
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn execute(&self, request: RequestBuilder) -> Result<Value> {
        let mut request = request.header("Accept", "application/json");
        // Token is read at call time, never cached beyond one request
        if let Some(token) = &self.access_token {
            request = request.query(&[("access_token", token)]);
        }

        let response = request.send().await?;
        let body: Value = response.json().await?;
        Ok(body)
    }
}
