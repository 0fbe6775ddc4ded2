//! Upload service: stores uploaded files under generated or kept names.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::config::UploadSettings;
use crate::error::{AppError, AppResult};

/// Attempts at drawing an unused generated name before giving up.
pub const MAX_NAME_ATTEMPTS: usize = 16;

/// Longest file name common filesystems accept.
pub const MAX_FILE_NAME_BYTES: usize = 255;

/// Writes uploads into one target directory.
///
/// Files are always created with `create_new`, so an upload never
/// overwrites an existing file, even under concurrent requests.
#[derive(Clone, Debug)]
pub struct UploadService {
    target_dir: Arc<PathBuf>,
    filename_length: usize,
}

impl UploadService {
    /// Creates the service, checking that the target directory exists.
    pub fn new(settings: &UploadSettings) -> AppResult<Self> {
        let metadata = std::fs::metadata(&settings.target_dir).map_err(|e| {
            AppError::Configuration {
                key: "upload.target_dir".to_string(),
                source: anyhow::Error::new(e).context(format!(
                    "cannot access upload target dir {}",
                    settings.target_dir.display()
                )),
            }
        })?;

        if !metadata.is_dir() {
            return Err(AppError::Configuration {
                key: "upload.target_dir".to_string(),
                source: anyhow::anyhow!(
                    "upload target path {} is not a directory",
                    settings.target_dir.display()
                ),
            });
        }

        Ok(Self {
            target_dir: Arc::new(settings.target_dir.clone()),
            filename_length: settings.filename_length,
        })
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    /// Streams `chunks` into a new file and returns the name it was stored under.
    ///
    /// The original name must carry an extension in both modes. With
    /// `keep_name` the original file name is used as is and an existing file
    /// of that name is a conflict. Otherwise the name is
    /// `<random>.<extension of original_name>`, redrawn on collision.
    pub async fn store<S, E>(
        &self,
        original_name: &str,
        keep_name: bool,
        chunks: S,
    ) -> AppResult<String>
    where
        S: Stream<Item = Result<Bytes, E>>,
        AppError: From<E>,
    {
        let extension = extension(original_name).ok_or_else(|| {
            AppError::bad_request(format!("file name '{}' has no extension", original_name))
        })?;

        let (name, file) = if keep_name {
            self.create_kept(original_name).await?
        } else {
            self.create_generated(extension).await?
        };

        self.write_chunks(&name, file, chunks).await?;
        Ok(name)
    }

    async fn create_kept(&self, original_name: &str) -> AppResult<(String, File)> {
        let name = validate_kept_name(original_name)?;
        match self.open_new(name).await {
            Ok(file) => Ok((name.to_string(), file)),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(AppError::conflict(format!(
                "a file named '{}' already exists",
                name
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_generated(&self, extension: &str) -> AppResult<(String, File)> {
        validate_extension(extension, self.filename_length)?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = format!("{}.{}", generate_name(self.filename_length), extension);
            match self.open_new(&name).await {
                Ok(file) => return Ok((name, file)),
                // happened to draw a name that already exists, try again
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AppError::Internal {
            source: anyhow::anyhow!(
                "no free file name after {} attempts in {}",
                MAX_NAME_ATTEMPTS,
                self.target_dir.display()
            ),
        })
    }

    async fn open_new(&self, name: &str) -> std::io::Result<File> {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(self.target_dir.join(name))
            .await
    }

    /// Copies every chunk into `file`; the file is removed if anything fails.
    async fn write_chunks<S, E>(&self, name: &str, mut file: File, chunks: S) -> AppResult<u64>
    where
        S: Stream<Item = Result<Bytes, E>>,
        AppError: From<E>,
    {
        let path = self.target_dir.join(name);
        let mut chunks = std::pin::pin!(chunks);

        let written: AppResult<u64> = async {
            let mut total = 0u64;
            while let Some(chunk) = chunks.next().await {
                let chunk = chunk?;
                file.write_all(&chunk).await?;
                total += chunk.len() as u64;
            }
            file.flush().await?;
            Ok(total)
        }
        .await;

        match written {
            Ok(bytes) => {
                tracing::info!(path = %path.display(), bytes, "Stored upload");
                Ok(bytes)
            }
            Err(e) => {
                tracing::error!(path = %path.display(), error = %e, "Error writing upload");
                drop(file);
                if let Err(remove_error) = tokio::fs::remove_file(&path).await {
                    tracing::warn!(
                        path = %path.display(),
                        error = %remove_error,
                        "Could not remove partial upload"
                    );
                }
                Err(e)
            }
        }
    }
}

/// Draws `len` characters uniformly from `[a-zA-Z0-9]`.
pub fn generate_name(len: usize) -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Extension of the last path component of `name`, without the dot.
pub fn extension(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    match base.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Accepts only a plain file name that stays inside the target directory.
pub fn validate_kept_name(name: &str) -> AppResult<&str> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.chars().any(char::is_control)
    {
        return Err(AppError::bad_request(format!(
            "'{}' is not a plain file name",
            name.escape_debug()
        )));
    }
    if name.len() > MAX_FILE_NAME_BYTES {
        return Err(AppError::bad_request(format!(
            "file name is longer than {} bytes",
            MAX_FILE_NAME_BYTES
        )));
    }
    Ok(name)
}

/// Rejects extensions that cannot form a file name with a `stem_len` stem.
pub fn validate_extension(extension: &str, stem_len: usize) -> AppResult<()> {
    if extension.chars().any(char::is_control) {
        return Err(AppError::bad_request(format!(
            "extension '{}' contains control characters",
            extension.escape_debug()
        )));
    }
    if stem_len + 1 + extension.len() > MAX_FILE_NAME_BYTES {
        return Err(AppError::bad_request(format!(
            "extension is too long, stored names are limited to {} bytes",
            MAX_FILE_NAME_BYTES
        )));
    }
    Ok(())
}
