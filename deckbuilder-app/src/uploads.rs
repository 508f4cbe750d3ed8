use async_trait::async_trait;
use chrono::Utc;
use deckbuilder_core::{CoreError, ImageStore};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

/// Writes deck images into one directory as `<unix-millis><ext>`.
pub struct DiskImageStore {
    dir: PathBuf,
    url_prefix: String,
}

impl DiskImageStore {
    pub async fn open(dir: impl Into<PathBuf>, url_prefix: &str) -> std::io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self {
            dir,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        })
    }
}

/// Extension of the client's filename including the dot, or empty.
fn extension_of(original_name: Option<&str>) -> String {
    original_name
        .and_then(|n| Path::new(n).extension())
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

#[async_trait]
impl ImageStore for DiskImageStore {
    async fn store(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<String, CoreError> {
        let ext = extension_of(original_name);
        let mut stamp = Utc::now().timestamp_millis();
        loop {
            let name = format!("{stamp}{ext}");
            let path = self.dir.join(&name);
            match OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(mut f) => {
                    f.write_all(bytes)
                        .await
                        .map_err(|_| CoreError::Storage("upload write"))?;
                    f.flush().await.map_err(|_| CoreError::Storage("upload write"))?;
                    tracing::debug!(file = %path.display(), size = bytes.len(), "stored upload");
                    return Ok(format!("{}/{}", self.url_prefix, name));
                }
                // Two uploads in the same millisecond: take the next free stamp.
                Err(e) if e.kind() == ErrorKind::AlreadyExists => stamp += 1,
                Err(_) => return Err(CoreError::Storage("upload open")),
            }
        }
    }

    async fn remove(&self, url: &str) -> Result<(), CoreError> {
        let Some(name) = url
            .strip_prefix(self.url_prefix.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return Ok(());
        };
        // Only plain names we generated; never walk out of the upload dir.
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Ok(());
        }
        match fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(_) => Err(CoreError::Storage("upload remove")),
        }
    }
}
