use crate::Settings;
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum ValidationError {
    #[error("Static files base URL must use http or https, got: {0}")]
    UnsupportedUrlScheme(String),

    #[error("SDK server host is required")]
    MissingSdkHost,

    #[error("SDK server port must be non-zero")]
    InvalidSdkPort,

    #[error("Images database path is required")]
    MissingImagesDbPath,
}

/// A non-fatal finding about the settings.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
}

/// Outcome of validating a [`Settings`] value.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn validate_settings(settings: &Settings) -> ValidationReport {
    let mut report = ValidationReport::default();

    let scheme = settings.static_files.base_url.scheme();
    if scheme != "http" && scheme != "https" {
        report
            .errors
            .push(ValidationError::UnsupportedUrlScheme(scheme.to_string()));
    }

    if !settings.static_files.base_url.as_str().ends_with('/') {
        report.warnings.push(ValidationWarning {
            field: "static_files.base_url".to_string(),
            message: "base URL has no trailing slash; file names are appended with one".to_string(),
        });
    }

    if settings.sdk.host.trim().is_empty() {
        report.errors.push(ValidationError::MissingSdkHost);
    }

    if settings.sdk.port == 0 {
        report.errors.push(ValidationError::InvalidSdkPort);
    }

    if settings.images_db.path.as_os_str().is_empty() {
        report.errors.push(ValidationError::MissingImagesDbPath);
    } else if settings.images_db.path.extension().map_or(true, |ext| ext != "json") {
        report.warnings.push(ValidationWarning {
            field: "images_db.path".to_string(),
            message: "image database file does not end in .json".to_string(),
        });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ImagesDbSettings, SdkSettings, StaticFilesSettings};
    use std::path::PathBuf;
    use url::Url;

    fn valid_settings() -> Settings {
        Settings {
            static_files: StaticFilesSettings {
                base_url: Url::parse("http://localhost:8000/static/").unwrap(),
            },
            sdk: SdkSettings::default(),
            images_db: ImagesDbSettings::default(),
        }
    }

    #[test]
    fn test_valid_settings_pass() {
        let report = validate_settings(&valid_settings());
        assert!(report.is_valid());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_non_http_scheme_is_rejected() {
        let mut settings = valid_settings();
        settings.static_files.base_url = Url::parse("ftp://files.lab.local/static/").unwrap();

        let report = validate_settings(&settings);
        assert!(!report.is_valid());
        assert!(matches!(
            report.errors[0],
            ValidationError::UnsupportedUrlScheme(_)
        ));
    }

    #[test]
    fn test_missing_trailing_slash_warns() {
        let mut settings = valid_settings();
        settings.static_files.base_url = Url::parse("http://localhost:8000/static").unwrap();

        let report = validate_settings(&settings);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "static_files.base_url");
    }

    #[test]
    fn test_zero_port_and_empty_host_are_errors() {
        let mut settings = valid_settings();
        settings.sdk.host = "  ".to_string();
        settings.sdk.port = 0;

        let report = validate_settings(&settings);
        assert_eq!(report.errors.len(), 2);
    }

    #[test]
    fn test_non_json_db_path_warns() {
        let mut settings = valid_settings();
        settings.images_db.path = PathBuf::from("data/images.db");

        let report = validate_settings(&settings);
        assert!(report.is_valid());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.field == "images_db.path"));
    }
}
