//! Repository lifecycle commands
//!
//! Every command re-reads the filesystem to decide what to do; nothing is
//! cached between invocations.

pub mod add;
pub mod clean;
pub mod list;
pub mod remove;
pub mod serve;
pub mod setup;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::info;

use crate::config::{self, RepoSettings};
use crate::domain::{Distribution, PackageRecord};
use crate::error::exit_code;
use crate::infrastructure::{
    github, GitClient, GitCredentials, RepreproClient, PAGES_BRANCH, REMOTE,
};
use crate::paths::RepoPaths;
use crate::tools::{tools, Toolchain};
use crate::ui::Prompter;

/// How a command finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Nothing in the repository changed
    NoChanges,
}

impl Outcome {
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Done => exit_code::SUCCESS,
            Outcome::NoChanges => exit_code::NO_CHANGES,
        }
    }
}

/// Everything a command needs from the outside world
pub struct AppContext {
    pub paths: RepoPaths,
    pub tools: Toolchain,
    pub prompter: Box<dyn Prompter>,
    /// GitHub token from `--token` / `GH_TOKEN`
    pub token: Option<String>,
}

/// A repository that has been set up
#[derive(Debug)]
pub struct Repo {
    pub settings: RepoSettings,
    pub distribution: Distribution,
}

impl AppContext {
    /// Load settings and `conf/distributions`, failing if setup never ran
    pub fn load_repo(&self) -> Result<Repo> {
        self.paths.ensure_set_up()?;

        let distributions = self.paths.distributions_file();
        let text = std::fs::read_to_string(&distributions)
            .with_context(|| format!("Failed to read {}", distributions.display()))?;
        let distribution = Distribution::parse(&text)
            .with_context(|| format!("Invalid {}", distributions.display()))?;

        let settings = config::load_settings(&self.paths.settings_file())?;

        Ok(Repo {
            settings,
            distribution,
        })
    }

    pub fn reprepro(&self) -> RepreproClient {
        RepreproClient::new(self.tools.path(tools::REPREPRO), self.paths.repo_dir())
    }

    pub fn git(&self) -> GitClient {
        GitClient::in_dir(self.tools.path(tools::GIT), self.paths.repo_dir())
    }

    /// Git client able to push to GitHub
    pub async fn authenticated_git(&self) -> Result<GitClient> {
        let token = self.github_token().await?;
        Ok(self.git().with_credentials(GitCredentials {
            gh_bin: self.tools.path(tools::GH).to_string(),
            token,
        }))
    }

    pub async fn github_token(&self) -> Result<String> {
        github::discover_token(
            self.token.clone(),
            self.tools.path(tools::GH),
            self.prompter.as_ref(),
        )
        .await
    }

    /// Package list, treating a repository without a database as empty
    pub async fn snapshot(&self, repo: &Repo) -> Result<Vec<PackageRecord>> {
        if !self.paths.db_dir().is_dir() {
            return Ok(Vec::new());
        }
        self.reprepro().list(&repo.distribution.codename).await
    }

    /// Commit everything and push the pages branch
    pub async fn publish(&self, message: &str) -> Result<()> {
        let git = self.authenticated_git().await?;

        if git.current_branch().await? != PAGES_BRANCH {
            git.checkout(PAGES_BRANCH).await?;
        }
        git.add_all().await?;
        if git.is_clean().await? {
            info!("Nothing to commit");
            return Ok(());
        }
        git.commit(message).await?;

        let spinner = spinner(format!("Pushing {} to GitHub...", PAGES_BRANCH));
        let pushed = git.push(REMOTE, PAGES_BRANCH, false).await;
        spinner.finish_and_clear();
        pushed.context("Failed to push to GitHub")?;

        info!("Published {}", self.paths.name());
        Ok(())
    }
}

/// Spinner shown while a slow external command runs
pub fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
