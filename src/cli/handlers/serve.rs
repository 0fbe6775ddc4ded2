//! Serve command handler
//!
//! Handles the serve command including dry-run validation and server startup.

use crate::config::Settings;
use crate::server::Server;
use crate::state::AppState;

/// Handler for the serve command
pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    /// Create a new serve command handler
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Execute the serve command with optional dry-run support
    ///
    /// Services are built before anything else, so a missing upload
    /// directory, an unreadable token file or a bad filter regex stop
    /// both modes early.
    ///
    /// # Errors
    /// - Service construction errors
    /// - Server startup errors (if not dry-run)
    pub async fn execute(&self, dry_run: bool) -> anyhow::Result<()> {
        let state = AppState::new(self.config.clone())?;

        if dry_run {
            for line in dry_run_summary(&state) {
                println!("{}", line);
            }
            println!("Dry run completed successfully - configuration is ready for deployment");
            return Ok(());
        }

        Server::new(state).run().await
    }

    /// Get the configuration
    pub fn config(&self) -> &Settings {
        &self.config
    }
}

/// Human-readable report of what `serve` would start.
pub fn dry_run_summary(state: &AppState) -> Vec<String> {
    let settings = &state.settings;
    let mut lines = vec![
        "✓ Configuration is valid".to_string(),
        format!("✓ Server would bind to: {}", settings.address),
    ];

    match &settings.allow_origin {
        Some(origin) => lines.push(format!("✓ CORS allows origin: {}", origin)),
        None => lines.push("- CORS disabled".to_string()),
    }

    if let Some(upload) = &state.services.upload {
        lines.push(format!(
            "✓ Upload target directory exists: {}",
            upload.target_dir().display()
        ));
    }
    if let Some(firefly) = &state.services.firefly {
        lines.push(format!(
            "✓ Firefly token loaded, {} shortcut(s) configured",
            firefly.shortcut_count()
        ));
    }
    if state.services.calendar.is_some() {
        lines.push("✓ Calendar filter compiled".to_string());
    }

    for (group, route) in settings.mounted_routes() {
        lines.push(format!("✓ Route {} ({})", route, group));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UploadSettings;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_serve_handler_new() {
        let config = Settings::default();
        let handler = ServeCommandHandler::new(config.clone());
        assert_eq!(handler.config(), &config);
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run() {
        let handler = ServeCommandHandler::new(Settings::default());
        assert!(handler.execute(true).await.is_ok());
    }

    #[tokio::test]
    async fn test_serve_handler_dry_run_missing_directory() {
        let dir = TempDir::new().unwrap();
        let config = Settings {
            upload: Some(UploadSettings {
                route: "/upload".to_string(),
                target_dir: dir.path().join("gone"),
                filename_length: 6,
            }),
            ..Default::default()
        };

        let result = ServeCommandHandler::new(config).execute(true).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_dry_run_summary() {
        let dir = TempDir::new().unwrap();
        let state = AppState::new(Settings {
            allow_origin: Some("*".to_string()),
            upload: Some(UploadSettings {
                route: "/upload".to_string(),
                target_dir: dir.path().to_path_buf(),
                filename_length: 6,
            }),
            ..Default::default()
        })
        .unwrap();

        let summary = dry_run_summary(&state);
        assert!(summary.iter().any(|l| l.contains("127.0.0.1:3000")));
        assert!(summary.iter().any(|l| l.contains("CORS allows origin: *")));
        assert!(summary.iter().any(|l| l.contains("Upload target directory")));
        assert!(summary.iter().any(|l| l.contains("/health")));
        assert!(summary.iter().any(|l| l.contains("/upload (upload.route)")));
    }
}
