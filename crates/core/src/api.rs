//! Resource client for the CDN management API
//!
//! One method per operation over users, buckets, assets and the session.
//! Every server body arrives enveloped as `{"response": ...}`; the envelope
//! is unwrapped in one place and callers only ever see the payload.

use crate::error::{Error, Result};
use crate::outcome::Outcome;
use crate::session::SessionStore;
use crate::transport::Transport;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::debug;

/// User account record
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub username: String,
}

/// Bucket record
#[derive(Debug, Clone, Deserialize)]
pub struct Bucket {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}

/// Versioned file stored within a bucket
#[derive(Debug, Clone, Deserialize)]
pub struct AssetFile {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub name: String,
    pub version: String,
    pub bucket: String,
}

/// (label, id) pair used to populate an interactive picker; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    pub name: String,
    pub value: String,
}

/// Credentials accepted by `login`
#[derive(Debug, Clone)]
pub enum LoginCredentials {
    Token(String),
    Basic { username: String, password: String },
}

impl LoginCredentials {
    /// Request body for `users/login`. A token login carries only the
    /// token; a basic login carries only username and password.
    pub fn body(&self) -> Value {
        match self {
            LoginCredentials::Token(token) => json!({ "accessToken": token }),
            LoginCredentials::Basic { username, password } => {
                json!({ "username": username, "password": password })
            }
        }
    }
}

/// Discriminator for `delete_asset`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetDeleteOption {
    Asset,
    Version,
    File,
}

impl AssetDeleteOption {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetDeleteOption::Asset => "asset",
            AssetDeleteOption::Version => "version",
            AssetDeleteOption::File => "file",
        }
    }
}

/// Project an array payload into picker items, preserving server order.
/// Records missing the label or id field are skipped.
pub fn select_items(records: &Value, label_field: &str) -> Vec<SelectItem> {
    records
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|val| {
                    let name = val.get(label_field)?.as_str()?;
                    let value = val.get("_id")?.as_str()?;
                    Some(SelectItem {
                        name: name.to_string(),
                        value: value.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Persist the connection url and report success
pub fn connect(store: &SessionStore, url: &str) -> Result<Outcome> {
    store.save_connection(url)?;
    Ok(Outcome::success("Initialized successfully!"))
}

/// Client for one connected CDN
pub struct CdnClient {
    transport: Transport,
}

impl CdnClient {
    /// Create a client for a CDN url and an optional access token
    pub fn new(url: &str, access_token: Option<String>) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(url, access_token)?,
        })
    }

    // === Session ===

    /// Log into an account. A well-formed response without an access token
    /// is a recovered failure, not an error; a response carrying one is
    /// persisted wholesale to the session store.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        store: &SessionStore,
    ) -> Result<Outcome> {
        let body = self.transport.post("users/login", &credentials.body()).await?;
        let response = unwrap_response(body)?;

        if response.get("accessToken").and_then(Value::as_str).is_some() {
            store.save_credentials(&response)?;
            debug!("login accepted");
            Ok(Outcome::success("Logged in successfully!"))
        } else {
            debug!("login rejected");
            Ok(Outcome::error("Login failed. Try again!"))
        }
    }

    // === Users ===

    /// Full user collection
    pub async fn users(&self) -> Result<Value> {
        self.fetch_raw("users").await
    }

    /// User picker items (label = username, value = id)
    pub async fn list_users(&self) -> Result<Vec<SelectItem>> {
        let users: Vec<User> = self.fetch("users").await?;
        Ok(users
            .into_iter()
            .map(|u| SelectItem {
                name: u.username,
                value: u.id,
            })
            .collect())
    }

    pub async fn create_user(&self, username: &str, password: &str) -> Result<Value> {
        let body = self
            .transport
            .post("users", &json!({ "username": username, "password": password }))
            .await?;
        unwrap_response(body)
    }

    /// Update the logged-in account. Blank fields pass through unchanged;
    /// the server owns blank-means-no-change.
    pub async fn update_user(&self, username: &str, password: &str) -> Result<Value> {
        let body = self
            .transport
            .put("users", &json!({ "username": username, "password": password }))
            .await?;
        unwrap_response(body)
    }

    pub async fn delete_user(&self, id: &str) -> Result<Value> {
        let body = self.transport.delete(&format!("users/{}", id)).await?;
        unwrap_response(body)
    }

    // === Buckets ===

    /// Full bucket collection
    pub async fn buckets(&self) -> Result<Value> {
        self.fetch_raw("buckets").await
    }

    /// Bucket picker items (label = bucket name, value = id)
    pub async fn list_buckets(&self) -> Result<Vec<SelectItem>> {
        let buckets: Vec<Bucket> = self.fetch("buckets").await?;
        Ok(buckets
            .into_iter()
            .map(|b| SelectItem {
                name: b.name,
                value: b.id,
            })
            .collect())
    }

    pub async fn create_bucket(&self, name: &str) -> Result<Value> {
        let body = self.transport.post("buckets", &json!({ "name": name })).await?;
        unwrap_response(body)
    }

    pub async fn delete_bucket(&self, id: &str) -> Result<Value> {
        let body = self.transport.delete(&format!("buckets/{}", id)).await?;
        unwrap_response(body)
    }

    // === Assets ===

    /// Full asset collection
    pub async fn assets(&self) -> Result<Value> {
        self.fetch_raw("assets").await
    }

    /// File picker items within an asset group (label = file name)
    pub async fn list_asset_files(
        &self,
        bucket_id: &str,
        name: &str,
        version: &str,
    ) -> Result<Vec<SelectItem>> {
        let files: Vec<AssetFile> = self
            .fetch(&format!(
                "assets/{}/files?name={}&version={}",
                bucket_id, name, version
            ))
            .await?;
        Ok(files
            .into_iter()
            .map(|f| SelectItem {
                name: f.file_name,
                value: f.id,
            })
            .collect())
    }

    /// Versions recorded for an asset name within a bucket
    pub async fn list_versions(&self, bucket_id: &str, name: &str) -> Result<Value> {
        self.fetch_raw(&format!("buckets/{}/versions?name={}", bucket_id, name))
            .await
    }

    /// Raw bucket-scoped payload, for drill-down by the dispatcher
    pub async fn assets_in_bucket(&self, bucket_id: &str) -> Result<Value> {
        self.fetch_raw(&format!("buckets/{}", bucket_id)).await
    }

    /// Upload a file plus its name/version/bucket metadata
    pub async fn upload_asset(
        &self,
        name: &str,
        version: &str,
        bucket_id: &str,
        file: &Path,
    ) -> Result<Value> {
        let body = self
            .transport
            .upload("assets/upload", name, version, bucket_id, file)
            .await?;
        unwrap_response(body)
    }

    /// Delete within an asset group. Only the `asset` option is wired to an
    /// interactive flow; `version` and `file` are recognized by the server
    /// but unwired here.
    pub async fn delete_asset(
        &self,
        bucket_id: &str,
        id: &str,
        option: AssetDeleteOption,
        name: &str,
    ) -> Result<Value> {
        let body = self
            .transport
            .delete(&format!(
                "assets/{}/{}?name={}&opt={}",
                bucket_id,
                id,
                name,
                option.as_str()
            ))
            .await?;
        unwrap_response(body)
    }

    // === Internals ===

    async fn fetch_raw(&self, path: &str) -> Result<Value> {
        let body = self.transport.get(path).await?;
        unwrap_response(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.fetch_raw(path).await?;
        Ok(serde_json::from_value(response)?)
    }
}

fn unwrap_response(body: Value) -> Result<Value> {
    match body {
        Value::Object(mut map) => map
            .remove("response")
            .ok_or_else(|| Error::Api("body is missing the 'response' field".to_string())),
        other => Err(Error::Api(format!(
            "unexpected response body shape: {}",
            other
        ))),
    }
}
