//! Session state persistence for sonic
//!
//! Two JSON blobs on durable storage: the connected CDN url
//! (`connection.json`, written by `connect`) and the login response
//! (`credentials.json`, written by `login`, removed by `logout`).

use crate::error::{Error, Result};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Session directory name
const SESSION_DIR: &str = "sonic";

/// Connection file name
const CONNECTION_FILE: &str = "connection.json";

/// Credentials file name (separate from the connection so logout only
/// removes the token)
const CREDENTIALS_FILE: &str = "credentials.json";

/// Environment override for the session directory
const HOME_ENV: &str = "SONIC_HOME";

/// Connection record written by `connect`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub url: String,
}

/// Session state loaded once at startup.
///
/// The access token is only read when a connection url is present, so a
/// token always implies a url.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub url: Option<String>,
    pub access_token: Option<String>,
}

impl Session {
    pub fn is_connected(&self) -> bool {
        self.url.is_some()
    }

    pub fn is_logged_in(&self) -> bool {
        self.access_token.is_some()
    }
}

/// Store for the session files, rooted at a directory
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    /// Open the default store (`$SONIC_HOME` or `~/.config/sonic`)
    pub fn open() -> Result<Self> {
        let dir = match std::env::var_os(HOME_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => home_dir()
                .ok_or_else(|| Error::Session("Cannot determine home directory".to_string()))?
                .join(".config")
                .join(SESSION_DIR),
        };

        if !dir.exists() {
            fs::create_dir_all(&dir)
                .map_err(|e| Error::Session(format!("Failed to create session directory: {}", e)))?;
        }

        Ok(Self { dir })
    }

    /// Open a store rooted at an explicit directory
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the connection file
    pub fn connection_path(&self) -> PathBuf {
        self.dir.join(CONNECTION_FILE)
    }

    /// Path of the credentials file
    pub fn credentials_path(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE)
    }

    /// Load the session state. Missing files are not errors: no connection
    /// file means a disconnected session, and credentials are not read at
    /// all while disconnected.
    pub fn load(&self) -> Result<Session> {
        let connection_path = self.connection_path();
        if !connection_path.exists() {
            return Ok(Session::default());
        }

        let content = fs::read_to_string(&connection_path)
            .map_err(|e| Error::InvalidSession(format!("Failed to read connection file: {}", e)))?;
        let connection: Connection = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidSession(format!("Failed to parse connection file: {}", e)))?;

        let credentials_path = self.credentials_path();
        let access_token = if credentials_path.exists() {
            let content = fs::read_to_string(&credentials_path).map_err(|e| {
                Error::InvalidSession(format!("Failed to read credentials file: {}", e))
            })?;
            let credentials: Value = serde_json::from_str(&content).map_err(|e| {
                Error::InvalidSession(format!("Failed to parse credentials file: {}", e))
            })?;
            credentials
                .get("accessToken")
                .and_then(Value::as_str)
                .map(str::to_string)
        } else {
            None
        };

        Ok(Session {
            url: Some(connection.url),
            access_token,
        })
    }

    /// Persist the connection url, overwriting any previous connection
    pub fn save_connection(&self, url: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(&Connection {
            url: url.to_string(),
        })?;
        self.write_secure(&self.connection_path(), content)?;
        debug!(url, "saved connection");
        Ok(())
    }

    /// Persist the full login response, overwriting any previous credentials
    pub fn save_credentials(&self, body: &Value) -> Result<()> {
        let content = serde_json::to_string_pretty(body)?;
        self.write_secure(&self.credentials_path(), content)?;
        debug!("saved credentials");
        Ok(())
    }

    /// Remove the credentials file. Returns whether a file existed.
    pub fn clear_credentials(&self) -> Result<bool> {
        let path = self.credentials_path();
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)
            .map_err(|e| Error::Session(format!("Failed to remove credentials file: {}", e)))?;
        debug!("cleared credentials");
        Ok(true)
    }

    fn write_secure(&self, path: &Path, content: String) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .map_err(|e| Error::Session(format!("Failed to create session directory: {}", e)))?;
        }

        fs::write(path, content)
            .map_err(|e| Error::Session(format!("Failed to write session file: {}", e)))?;

        // Session files hold credentials: read/write for owner only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms)?;
        }

        Ok(())
    }
}
