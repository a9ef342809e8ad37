//! Container lifecycle for locally served repositories

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use super::process::ToolCommand;

/// Document root of the httpd image
pub const HTDOCS: &str = "/usr/local/apache2/htdocs";

/// What to run when serving a repository
#[derive(Debug, Clone)]
pub struct ServeSpec {
    pub container_name: String,
    pub image: String,
    pub port: u16,
    pub repo_dir: PathBuf,
    pub password: Option<String>,
}

impl ServeSpec {
    /// Arguments for `docker run`
    pub fn run_args(&self) -> Vec<String> {
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "-d".to_string(),
            "--name".to_string(),
            self.container_name.clone(),
            "-p".to_string(),
            format!("{}:80", self.port),
            "-v".to_string(),
            format!("{}:{}:ro", self.repo_dir.display(), HTDOCS),
        ];
        if let Some(ref password) = self.password {
            args.push("-e".to_string());
            args.push(format!("REPO_PASSWORD={}", password));
        }
        args.push(self.image.clone());
        args
    }
}

pub struct DockerClient {
    bin: String,
}

impl DockerClient {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Start a detached container and return its id
    pub async fn run_detached(&self, spec: &ServeSpec) -> Result<String> {
        info!(
            "Starting {} on port {} ({})",
            spec.container_name, spec.port, spec.image
        );
        let output = ToolCommand::new(&self.bin)
            .args(spec.run_args())
            .output()
            .await
            .context("Failed to start serving container")?;

        let id = output.trim().to_string();
        if id.is_empty() {
            anyhow::bail!("docker run returned no container id");
        }
        Ok(id)
    }

    pub async fn stop(&self, container_id: &str) -> Result<()> {
        info!("Stopping container {}", container_id);
        ToolCommand::new(&self.bin)
            .args(["container", "stop", container_id])
            .output()
            .await
            .context("Failed to stop serving container")?;
        Ok(())
    }
}
