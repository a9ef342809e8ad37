//! Git operations
//!
//! Handles the git side of GitHub-hosted repositories: initialising the
//! `gh-pages` branch, committing repository changes and pushing them.

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

use super::process::ToolCommand;
use crate::error::ToolError;

/// Branch GitHub Pages serves from
pub const PAGES_BRANCH: &str = "gh-pages";

/// Remote name used for the hosting repository
pub const REMOTE: &str = "origin";

/// Credentials used for pushes
///
/// The token is handed to `gh auth git-credential` through `GH_TOKEN`, so it
/// never lands in `.git/config`.
#[derive(Debug, Clone)]
pub struct GitCredentials {
    pub gh_bin: String,
    pub token: String,
}

/// Client for git operations
pub struct GitClient {
    bin: String,
    /// Working directory for git commands
    working_dir: PathBuf,
    credentials: Option<GitCredentials>,
}

impl GitClient {
    /// Create a git client for a specific directory
    pub fn in_dir(bin: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            bin: bin.into(),
            working_dir: path.into(),
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: GitCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    fn git(&self) -> ToolCommand {
        ToolCommand::new(&self.bin).current_dir(&self.working_dir)
    }

    pub async fn init(&self) -> Result<(), ToolError> {
        self.git().arg("init").output().await.map(|_| ())
    }

    /// Create and switch to a new branch
    pub async fn checkout_new_branch(&self, branch: &str) -> Result<(), ToolError> {
        self.git()
            .args(["checkout", "-b", branch])
            .output()
            .await
            .map(|_| ())
    }

    pub async fn checkout(&self, branch: &str) -> Result<(), ToolError> {
        self.git().args(["checkout", branch]).output().await.map(|_| ())
    }

    /// Current branch name, also valid before the first commit
    pub async fn current_branch(&self) -> Result<String> {
        let output = self
            .git()
            .args(["symbolic-ref", "--short", "HEAD"])
            .output()
            .await
            .context("Failed to get current branch")?;
        Ok(output.trim().to_string())
    }

    /// Check if working tree is clean
    pub async fn is_clean(&self) -> Result<bool> {
        let output = self
            .git()
            .args(["status", "--porcelain"])
            .output()
            .await
            .context("Failed to run git status")?;
        Ok(output.trim().is_empty())
    }

    /// Stage every change, including deletions
    pub async fn add_all(&self) -> Result<(), ToolError> {
        self.git().args(["add", "--all"]).output().await.map(|_| ())
    }

    /// Create a commit
    pub async fn commit(&self, message: &str) -> Result<(), ToolError> {
        self.git()
            .args(["commit", "-m", message])
            .output()
            .await
            .map(|_| ())
    }

    pub async fn remote_url(&self, remote: &str) -> Result<String> {
        let output = self
            .git()
            .args(["config", "--get", &format!("remote.{}.url", remote)])
            .output()
            .await
            .with_context(|| format!("Failed to read the URL of remote {}", remote))?;
        Ok(output.trim().to_string())
    }

    pub async fn add_remote(&self, remote: &str, url: &str) -> Result<(), ToolError> {
        self.git()
            .args(["remote", "add", remote, url])
            .output()
            .await
            .map(|_| ())
    }

    /// Push `branch` to `remote`
    pub async fn push(&self, remote: &str, branch: &str, force: bool) -> Result<(), ToolError> {
        info!("Pushing {} to {}", branch, remote);
        let mut cmd = ToolCommand::new(&self.bin).current_dir(&self.working_dir);
        if let Some(ref creds) = self.credentials {
            cmd = cmd
                .args(["-c", "credential.helper="])
                .arg("-c")
                .arg(format!("credential.helper=!{} auth git-credential", creds.gh_bin))
                .env("GH_TOKEN", creds.token.clone());
        }
        cmd = cmd.args(["push", remote, branch]);
        if force {
            cmd = cmd.arg("--force");
        }
        cmd.output().await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_git_client_lifecycle() {
        // This test only works where git is installed
        if which::which("git").is_err() {
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let client = GitClient::in_dir("git", dir.path());

        client.init().await.unwrap();
        client.checkout_new_branch(PAGES_BRANCH).await.unwrap();
        assert_eq!(client.current_branch().await.unwrap(), PAGES_BRANCH);
        assert!(client.is_clean().await.unwrap());

        std::fs::write(dir.path().join("index.html"), "<html></html>").unwrap();
        assert!(!client.is_clean().await.unwrap());

        client
            .add_remote(REMOTE, "https://github.com/example/tools.git")
            .await
            .unwrap();
        assert_eq!(
            client.remote_url(REMOTE).await.unwrap(),
            "https://github.com/example/tools.git"
        );
    }
}
