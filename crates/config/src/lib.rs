use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use url::Url;

pub mod parser;
pub mod validator;

pub use parser::*;
pub use validator::*;

/// Environment variable holding the static-files base URL.
pub const STATIC_FILES_URL_VAR: &str = "STATIC_FILES_URL";
/// Environment variable overriding the SDK server host.
pub const SDK_SERVER_HOST_VAR: &str = "SDK_SERVER_HOST";
/// Environment variable overriding the SDK server port.
pub const SDK_SERVER_PORT_VAR: &str = "SDK_SERVER_PORT";
/// Environment variable overriding the image-association database path.
pub const INSTRUMENT_IMAGES_DB_VAR: &str = "INSTRUMENT_IMAGES_DB";

/// Top-level settings for the instrument data-access layer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub static_files: StaticFilesSettings,
    #[serde(default)]
    pub sdk: SdkSettings,
    #[serde(default)]
    pub images_db: ImagesDbSettings,
}

impl Settings {
    /// Build settings from environment variables only.
    ///
    /// `STATIC_FILES_URL` is required; the SDK endpoint and the image
    /// database path fall back to their defaults when the corresponding
    /// variables are not set.
    pub fn from_env() -> anyhow::Result<Self> {
        let base_url = env::var(STATIC_FILES_URL_VAR)
            .with_context(|| format!("{} is not set", STATIC_FILES_URL_VAR))?;
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("{} is not a valid URL: {}", STATIC_FILES_URL_VAR, base_url))?;

        let host = env::var(SDK_SERVER_HOST_VAR).unwrap_or_else(|_| default_sdk_host());
        let port = match env::var(SDK_SERVER_PORT_VAR) {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("{} is not a valid port: {}", SDK_SERVER_PORT_VAR, raw))?,
            Err(_) => default_sdk_port(),
        };

        let path = env::var(INSTRUMENT_IMAGES_DB_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_images_db_path());

        Ok(Self {
            static_files: StaticFilesSettings { base_url },
            sdk: SdkSettings { host, port },
            images_db: ImagesDbSettings { path },
        })
    }
}

/// Where instrument images are served from.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StaticFilesSettings {
    /// Absolute base URL; image file names are resolved against it.
    pub base_url: Url,
}

impl StaticFilesSettings {
    /// Absolute URL for an image file name.
    pub fn file_url(&self, file_name: &str) -> String {
        let base = self.base_url.as_str();
        if base.ends_with('/') {
            format!("{base}{file_name}")
        } else {
            format!("{base}/{file_name}")
        }
    }
}

/// Endpoint of the measurement server the SDK connects to.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SdkSettings {
    #[serde(default = "default_sdk_host")]
    pub host: String,
    #[serde(default = "default_sdk_port")]
    pub port: u16,
}

impl SdkSettings {
    /// `host:port` form used when dialing the server.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for SdkSettings {
    fn default() -> Self {
        Self {
            host: default_sdk_host(),
            port: default_sdk_port(),
        }
    }
}

/// Location of the image-association database file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesDbSettings {
    #[serde(default = "default_images_db_path")]
    pub path: PathBuf,
}

impl Default for ImagesDbSettings {
    fn default() -> Self {
        Self {
            path: default_images_db_path(),
        }
    }
}

pub fn default_sdk_host() -> String {
    "127.0.0.1".to_string()
}

pub fn default_sdk_port() -> u16 {
    8080
}

pub fn default_images_db_path() -> PathBuf {
    PathBuf::from("data/instrument_images.json")
}
