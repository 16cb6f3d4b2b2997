//! Environment/runtime helpers
//!
//! Sanity checks to ensure the broker's state directory is usable at startup.

use std::path::Path;
use tracing::{info, warn};

/// Ensure the data directory exists and is a directory.
pub async fn ensure_data_dir(data_dir: &Path) -> anyhow::Result<()> {
    match tokio::fs::metadata(data_dir).await {
        Ok(meta) if meta.is_dir() => return Ok(()),
        Ok(_) => {
            return Err(anyhow::anyhow!("{} exists but is not a directory", data_dir.display()));
        }
        Err(_) => warn!(data_dir = %data_dir.display(), "data directory missing; creating it"),
    }
    tokio::fs::create_dir_all(data_dir)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", data_dir.display()))?;
    info!(data_dir = %data_dir.display(), "data directory created");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn creates_missing_dir_and_rejects_files() -> anyhow::Result<()> {
        let root = std::env::temp_dir().join(format!("broker_env_{}", uuid::Uuid::new_v4()));
        let nested = root.join("state");
        ensure_data_dir(&nested).await?;
        assert!(tokio::fs::metadata(&nested).await?.is_dir());

        // second call on an existing dir is a no-op
        ensure_data_dir(&nested).await?;

        let file = root.join("plain.txt");
        tokio::fs::write(&file, b"x").await?;
        assert!(ensure_data_dir(&file).await.is_err());

        let _ = tokio::fs::remove_dir_all(&root).await;
        Ok(())
    }
}
