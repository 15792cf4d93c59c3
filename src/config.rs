use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{MuseError, MuseResult};
use crate::gemini::{DEFAULT_API_BASE, DEFAULT_COPY_MODEL, DEFAULT_IMAGE_MODEL};
use crate::url_validation::validate_http_url;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_BIND: &str = "0.0.0.0";
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const APP_DIR_NAME: &str = "social-muse";

/// Runtime configuration, read from the environment.
///
/// | Env Var                     | Default                                           |
/// |-----------------------------|---------------------------------------------------|
/// | `MUSE_PORT`                 | `3000`                                            |
/// | `MUSE_BIND`                 | `0.0.0.0`                                         |
/// | `SECRET_KEY`                | unset                                             |
/// | `DATA_DIR`                  | platform data dir + `social-muse`                 |
/// | `GEMINI_API_KEY`            | unset                                             |
/// | `GEMINI_API_BASE`           | `https://generativelanguage.googleapis.com/v1beta`|
/// | `GEMINI_COPY_MODEL`         | `gemini-3-flash-preview`                          |
/// | `GEMINI_IMAGE_MODEL`        | `gemini-2.5-flash-image`                          |
/// | `MUSE_REQUEST_TIMEOUT_SECS` | `120`                                             |
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind: String,
    pub port: u16,
    /// Optional path segment every route is nested under.
    pub secret_key: Option<String>,
    pub data_dir: PathBuf,
    pub api_key: Option<String>,
    pub api_base: Url,
    pub copy_model: String,
    pub image_model: String,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> MuseResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MuseResult<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let port = match var("MUSE_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|_| MuseError::Config(format!("MUSE_PORT must be a port number, got {raw}")))?,
            None => DEFAULT_PORT,
        };
        let request_timeout_secs = match var("MUSE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                MuseError::Config(format!("MUSE_REQUEST_TIMEOUT_SECS must be a positive integer, got {raw}"))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        let api_base = validate_http_url(&var("GEMINI_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()))
            .map_err(|err| MuseError::Config(format!("GEMINI_API_BASE: {err}")))?;
        let data_dir = var("DATA_DIR").map(PathBuf::from).unwrap_or_else(default_data_dir);

        Ok(Self {
            bind: var("MUSE_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string()),
            port,
            secret_key: var("SECRET_KEY")
                .map(|value| value.trim_matches('/').to_string())
                .filter(|value| !value.is_empty()),
            data_dir,
            api_key: var("GEMINI_API_KEY"),
            api_base,
            copy_model: var("GEMINI_COPY_MODEL").unwrap_or_else(|| DEFAULT_COPY_MODEL.to_string()),
            image_model: var("GEMINI_IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            request_timeout: Duration::from_secs(request_timeout_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// `/{SECRET_KEY}` or the empty string.
    pub fn route_prefix(&self) -> String {
        match self.secret_key.as_deref() {
            Some(value) => format!("/{value}"),
            None => String::new(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    let mut base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base
}
