use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::shared::constants::{
    DEFAULT_FALLBACK_IMAGES_DIR, DEFAULT_IMAGES_DIR, DEFAULT_KNOWN_FACES_DIR,
};

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("CAMERA_ENDPOINT must be set to the camera snapshot URL")]
    MissingEndpoint,
    #[error("CHECK_INTERVAL_SECONDS must be set")]
    MissingInterval,
    #[error("CHECK_INTERVAL_SECONDS must be a positive integer, got {0:?}")]
    InvalidInterval(String),
}

/// Settings as read from the environment or command line, unvalidated.
#[derive(Clone, Debug, Default)]
pub struct RawMonitorConfig {
    pub camera_endpoint: Option<String>,
    pub check_interval_seconds: Option<String>,
    pub save_images: Option<String>,
    pub images_dir: Option<PathBuf>,
    pub known_faces_dir: Option<PathBuf>,
    pub fallback_images_dir: Option<PathBuf>,
    pub alert_webhook_url: Option<String>,
    pub annotation_font: Option<PathBuf>,
}

/// Validated monitor settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MonitorConfig {
    pub camera_endpoint: String,
    pub check_interval: Duration,
    pub save_images: bool,
    pub images_dir: PathBuf,
    pub known_faces_dir: PathBuf,
    pub fallback_images_dir: PathBuf,
    pub alert_webhook_url: Option<String>,
    pub annotation_font: Option<PathBuf>,
}

impl RawMonitorConfig {
    pub fn validate(self) -> Result<MonitorConfig, ConfigError> {
        let camera_endpoint = self
            .camera_endpoint
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingEndpoint)?;

        let raw_interval = self
            .check_interval_seconds
            .ok_or(ConfigError::MissingInterval)?;
        let check_interval = raw_interval
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
            // Must stay representable as a point in time relative to now.
            .filter(|d| Instant::now().checked_add(*d).is_some())
            .ok_or_else(|| ConfigError::InvalidInterval(raw_interval.clone()))?;

        Ok(MonitorConfig {
            camera_endpoint,
            check_interval,
            save_images: parse_flag(self.save_images.as_deref(), true),
            images_dir: self
                .images_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_IMAGES_DIR)),
            known_faces_dir: self
                .known_faces_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_KNOWN_FACES_DIR)),
            fallback_images_dir: self
                .fallback_images_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_FALLBACK_IMAGES_DIR)),
            alert_webhook_url: self.alert_webhook_url.filter(|u| !u.trim().is_empty()),
            annotation_font: self.annotation_font,
        })
    }
}

/// Only a case-insensitive `true` enables a flag; any other value disables it.
fn parse_flag(value: Option<&str>, default: bool) -> bool {
    match value {
        Some(v) => v.trim().eq_ignore_ascii_case("true"),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn raw(endpoint: Option<&str>, interval: Option<&str>) -> RawMonitorConfig {
        RawMonitorConfig {
            camera_endpoint: endpoint.map(String::from),
            check_interval_seconds: interval.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = raw(Some("http://cam/snap.jpg"), Some("30")).validate().unwrap();
        assert_eq!(config.camera_endpoint, "http://cam/snap.jpg");
        assert_eq!(config.check_interval, Duration::from_secs(30));
        assert!(config.save_images);
        assert_eq!(config.images_dir, PathBuf::from("detected_images"));
        assert_eq!(config.known_faces_dir, PathBuf::from("known_faces"));
        assert_eq!(config.fallback_images_dir, PathBuf::from("fallback_images"));
        assert_eq!(config.alert_webhook_url, None);
        assert_eq!(config.annotation_font, None);
    }

    #[rstest]
    #[case::missing(None)]
    #[case::empty(Some(""))]
    #[case::blank(Some("   "))]
    fn test_endpoint_required(#[case] endpoint: Option<&str>) {
        assert_eq!(
            raw(endpoint, Some("10")).validate(),
            Err(ConfigError::MissingEndpoint)
        );
    }

    #[test]
    fn test_interval_required() {
        assert_eq!(
            raw(Some("http://cam"), None).validate(),
            Err(ConfigError::MissingInterval)
        );
    }

    #[rstest]
    #[case::not_a_number("ten")]
    #[case::zero("0")]
    #[case::negative("-5")]
    #[case::fractional("1.5")]
    #[case::empty("")]
    #[case::beyond_clock_range("18446744073709551615")]
    fn test_interval_must_be_positive_integer(#[case] interval: &str) {
        assert_eq!(
            raw(Some("http://cam"), Some(interval)).validate(),
            Err(ConfigError::InvalidInterval(interval.to_string()))
        );
    }

    #[rstest]
    #[case::unset(None, true)]
    #[case::lower_true(Some("true"), true)]
    #[case::upper_true(Some("TRUE"), true)]
    #[case::false_value(Some("false"), false)]
    #[case::one(Some("1"), false)]
    #[case::empty(Some(""), false)]
    fn test_save_images_flag(#[case] value: Option<&str>, #[case] expected: bool) {
        let config = RawMonitorConfig {
            save_images: value.map(String::from),
            ..raw(Some("http://cam"), Some("5"))
        }
        .validate()
        .unwrap();
        assert_eq!(config.save_images, expected);
    }

    #[test]
    fn test_blank_webhook_is_ignored() {
        let config = RawMonitorConfig {
            alert_webhook_url: Some(" ".into()),
            ..raw(Some("http://cam"), Some("5"))
        }
        .validate()
        .unwrap();
        assert_eq!(config.alert_webhook_url, None);
    }
}
