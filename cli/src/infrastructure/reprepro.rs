//! reprepro operations
//!
//! reprepro owns the repository database, the pool and the signed indices.
//! This client only lists, includes and removes packages.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use super::process::ToolCommand;
use crate::domain::{parse_list, PackageRecord};
use crate::error::ToolError;

/// Client for one reprepro base directory
pub struct RepreproClient {
    bin: String,
    base_dir: PathBuf,
}

impl RepreproClient {
    pub fn new(bin: impl Into<String>, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            base_dir: base_dir.into(),
        }
    }

    /// Every package published under `codename`
    pub async fn list(&self, codename: &str) -> Result<Vec<PackageRecord>> {
        let output = ToolCommand::new(&self.bin)
            .arg("-b")
            .path_arg(&self.base_dir)
            .args(["list", codename])
            .output()
            .await
            .context("Failed to list packages")?;

        Ok(parse_list(&output)?)
    }

    /// Include a .deb into `codename`
    ///
    /// `arch_filter` is passed to `-A` verbatim; use
    /// [`Distribution::arch_filter`](crate::domain::Distribution::arch_filter)
    /// to expand `all`. Runs attached to the terminal so gpg can ask for the
    /// signing passphrase.
    pub async fn include_deb(
        &self,
        codename: &str,
        component: &str,
        arch_filter: &str,
        deb: &Path,
    ) -> Result<(), ToolError> {
        info!(
            "Including {} ({} / {})",
            deb.display(),
            component,
            arch_filter
        );
        ToolCommand::new(&self.bin)
            .args(["--ask-passphrase", "-C", component, "-A", arch_filter, "-Vb"])
            .path_arg(&self.base_dir)
            .args(["includedeb", codename])
            .path_arg(deb)
            .run()
            .await
    }

    /// Remove a package by name from every component of `codename`
    pub async fn remove(&self, codename: &str, package: &str) -> Result<(), ToolError> {
        info!("Removing {}", package);
        ToolCommand::new(&self.bin)
            .arg("-Vb")
            .path_arg(&self.base_dir)
            .args(["remove", codename, package])
            .run()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_propagates_failure() {
        let client = RepreproClient::new("false", "/nonexistent");
        let err = client.list("stable").await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to list packages"));
    }
}
