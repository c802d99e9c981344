// src/core/fs_ops.rs
//! File system helpers used by the report writers and the local job source

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tokio::fs;

use crate::app_log;

pub struct FsOps;

impl FsOps {
    pub async fn ensure_dir_exists(path: &Path) -> Result<()> {
        if !path.as_os_str().is_empty() && !path.exists() {
            fs::create_dir_all(path)
                .await
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
            app_log!(info, "Created directory: {}", path.display());
        }
        Ok(())
    }

    pub async fn read_file_safe(path: &Path) -> Result<String> {
        fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    pub async fn write_file_safe(path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            Self::ensure_dir_exists(parent).await?;
        }

        fs::write(path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        app_log!(debug, "Written file: {}", path.display());
        Ok(())
    }

    /// Pretty-print `value` as JSON with 4-space indentation and write it to `path`
    pub async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
        let content = to_pretty_json(value).context("Failed to serialize JSON")?;
        Self::write_file_safe(path, &content).await
    }
}

fn to_pretty_json<T: Serialize>(value: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    // serde_json only ever emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_json_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");

        FsOps::write_json(&path, &serde_json::json!({"total_jobs": 3}))
            .await
            .unwrap();

        let written = FsOps::read_file_safe(&path).await.unwrap();
        assert_eq!(written, "{\n    \"total_jobs\": 3\n}");
    }

    #[tokio::test]
    async fn test_read_missing_file_has_context() {
        let err = FsOps::read_file_safe(Path::new("/no/such/listing.html"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/listing.html"));
    }
}
