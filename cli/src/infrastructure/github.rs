//! GitHub repository creation and token discovery

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

use super::process::ToolCommand;
use crate::config::Host;
use crate::ui::Prompter;

pub struct GitHubClient {
    bin: String,
    token: String,
}

impl GitHubClient {
    pub fn new(bin: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            token: token.into(),
        }
    }

    /// Create `name` on GitHub from the local repository at `source`
    ///
    /// Adds the new repository as the `origin` remote.
    pub async fn create_repo(&self, name: &str, host: Host, source: &Path) -> Result<()> {
        info!("Creating GitHub repository {} ({})", name, host);
        ToolCommand::new(&self.bin)
            .args(["repo", "create", name, host.visibility_flag(), "--source"])
            .path_arg(source)
            .args(["--remote", "origin"])
            .env("GH_TOKEN", self.token.clone())
            .output()
            .await
            .with_context(|| format!("Failed to create GitHub repository {}", name))?;
        Ok(())
    }
}

/// Discover a GitHub token
///
/// Priority: `--token`/`GH_TOKEN` → `gh auth token` → interactive prompt.
pub async fn discover_token(
    token: Option<String>,
    gh_bin: &str,
    prompter: &dyn Prompter,
) -> Result<String> {
    if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
        return Ok(token);
    }

    if let Some(token) = try_gh_cli_token(gh_bin).await {
        debug!("Using token from gh auth");
        return Ok(token);
    }

    let token = prompter.password("GitHub token")?;
    if token.trim().is_empty() {
        anyhow::bail!("A GitHub token is required (set GH_TOKEN or pass --token)");
    }
    Ok(token)
}

async fn try_gh_cli_token(gh_bin: &str) -> Option<String> {
    ToolCommand::new(gh_bin)
        .args(["auth", "token"])
        .output()
        .await
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
