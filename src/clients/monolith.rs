use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::PageArchiver;
use crate::config::ArchiveConfig;

/// Archives pages by running the `monolith` tool, which inlines every
/// asset into one self-contained HTML file.
#[derive(Debug, Clone)]
pub struct MonolithArchiver {
    binary: String,
    extra_args: Vec<String>,
    timeout: Duration,
}

impl MonolithArchiver {
    #[must_use]
    pub fn new(binary: impl Into<String>, extra_args: Vec<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            extra_args,
            timeout,
        }
    }

    #[must_use]
    pub fn from_config(config: &ArchiveConfig) -> Self {
        Self::new(
            config.monolith_path.clone(),
            config.monolith_args.clone(),
            Duration::from_secs(config.archive_timeout_seconds),
        )
    }

    fn snapshot_path(output_dir: &Path) -> PathBuf {
        output_dir.join(format!("{}.html", Uuid::new_v4()))
    }
}

#[async_trait]
impl PageArchiver for MonolithArchiver {
    async fn archive(&self, url: &str, output_dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(output_dir)
            .await
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let output_path = Self::snapshot_path(output_dir);

        let mut command = Command::new(&self.binary);
        command
            .arg(url)
            .arg("-o")
            .arg(&output_path)
            .args(&self.extra_args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(url, output = %output_path.display(), "Running {}", self.binary);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| {
                anyhow!(
                    "{} timed out after {}s",
                    self.binary,
                    self.timeout.as_secs()
                )
            })?
            .with_context(|| format!("Failed to run {}", self.binary))?;

        if !output.status.success() {
            if let Err(e) = tokio::fs::remove_file(&output_path).await
                && e.kind() != std::io::ErrorKind::NotFound
            {
                warn!("Failed to remove partial snapshot {}: {}", output_path.display(), e);
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            );
        }

        if !tokio::fs::try_exists(&output_path).await.unwrap_or(false) {
            bail!(
                "{} reported success but wrote no file at {}",
                self.binary,
                output_path.display()
            );
        }

        info!(url, path = %output_path.display(), "Page archived");
        Ok(output_path)
    }
}
