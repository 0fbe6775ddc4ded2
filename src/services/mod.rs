//! Service layer for business logic operations.
//!
//! Each configured route group gets one service; unconfigured groups
//! are `None`.

mod calendar_service;
mod firefly_service;
mod upload_service;

pub use calendar_service::CalendarService;
pub use firefly_service::{FireflyService, build_store_request, resolve_amount};
pub use upload_service::{
    MAX_FILE_NAME_BYTES, MAX_NAME_ATTEMPTS, UploadService, extension, generate_name,
    validate_extension, validate_kept_name,
};

use crate::config::Settings;
use crate::error::AppResult;
use crate::external::build_http_client;

/// Aggregates all services for convenient access.
///
/// Cloning is cheap: every service shares its state through `Arc`
/// or a pooled `reqwest::Client`.
#[derive(Clone, Default)]
pub struct Services {
    pub upload: Option<UploadService>,
    pub firefly: Option<FireflyService>,
    pub calendar: Option<CalendarService>,
}

impl Services {
    /// Builds the service of every configured route group.
    ///
    /// Checks the upload directory, reads the Firefly token and compiles
    /// the calendar filter, so any startup problem surfaces here.
    pub fn from_settings(settings: &Settings) -> AppResult<Self> {
        let http = build_http_client(&settings.client)?;

        let upload = settings
            .upload
            .as_ref()
            .map(UploadService::new)
            .transpose()?;
        let firefly = settings
            .firefly_shortcuts
            .as_ref()
            .map(|s| FireflyService::from_settings(s, http.clone()))
            .transpose()?;
        let calendar = settings
            .calendar
            .as_ref()
            .map(|s| CalendarService::new(s, http.clone()))
            .transpose()?;

        Ok(Self {
            upload,
            firefly,
            calendar,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CalendarSettings, UploadSettings};
    use crate::error::AppError;
    use tempfile::TempDir;

    #[test]
    fn test_no_groups_configured() {
        let services = Services::from_settings(&Settings::default()).unwrap();
        assert!(services.upload.is_none());
        assert!(services.firefly.is_none());
        assert!(services.calendar.is_none());
    }

    #[test]
    fn test_configured_groups_are_built() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            upload: Some(UploadSettings {
                route: "/upload".to_string(),
                target_dir: dir.path().to_path_buf(),
                filename_length: 6,
            }),
            calendar: Some(CalendarSettings {
                route: "/calendar".to_string(),
                base_url: "https://cal.example.com/feed.ics".to_string(),
                pass_param: "token".to_string(),
                filter: "VALARM".to_string(),
            }),
            ..Default::default()
        };

        let services = Services::from_settings(&settings).unwrap();
        assert_eq!(services.upload.unwrap().target_dir(), dir.path());
        assert_eq!(services.calendar.unwrap().pass_param(), "token");
        assert!(services.firefly.is_none());
    }

    #[test]
    fn test_startup_error_surfaces() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            upload: Some(UploadSettings {
                route: "/upload".to_string(),
                target_dir: dir.path().join("missing"),
                filename_length: 6,
            }),
            ..Default::default()
        };

        assert!(matches!(
            Services::from_settings(&settings),
            Err(AppError::Configuration { .. })
        ));
    }
}
