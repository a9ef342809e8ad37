//! `setup`: create a repository from a config file
//!
//! Writes the reprepro configuration, publishes the signing key next to the
//! repository and, for GitHub hosts, creates the hosting repository and pushes
//! the initial `gh-pages` branch.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use super::{AppContext, Outcome};
use crate::config::{self, Host, RepoConfig, RepoSettings};
use crate::error::AptRepoError;
use crate::infrastructure::{GitCredentials, GitHubClient, GpgClient, PAGES_BRANCH, REMOTE};
use crate::tools::tools;
use crate::ui::{self, Prompter};

pub async fn execute(
    ctx: &AppContext,
    config_path: &Path,
    splash: Option<PathBuf>,
) -> Result<Outcome> {
    let config = config::load_repo_config(config_path)?;
    let name = ctx.paths.name().to_string();

    if let Some(ref configured) = config.name {
        if configured != &name {
            warn!(
                "Config names the repo {}, using {} from the command line",
                configured, name
            );
        }
    }

    let splash = match splash {
        Some(_) if config.host == Host::GitHubPrivate => {
            warn!("Ignoring --splash as splash pages are not supported for private GitHub repos");
            None
        }
        Some(page) if !page.is_file() => {
            anyhow::bail!("Splash page not found: {}", page.display());
        }
        other => other,
    };

    let mut needed = vec![tools::GPG];
    if !config.host.is_local() {
        needed.extend([tools::GIT, tools::GH]);
    }
    ctx.tools.require(&needed)?;

    if ctx.paths.is_populated() {
        let repo_dir = ctx.paths.repo_dir();
        if !ui::confirm_twice(
            ctx.prompter.as_ref(),
            &format!(
                "Repo already set up at {}; wipe and start over?",
                repo_dir.display()
            ),
            "Are you REALLY sure you want to wipe the repo? There is no going back from this.",
        )? {
            return Err(AptRepoError::Aborted("Setup aborted".to_string()).into());
        }
        info!("Wiping {}", repo_dir.display());
        remove_dir_if_exists(repo_dir)?;
        remove_dir_if_exists(ctx.paths.state_dir())?;
    }

    for dir in [ctx.paths.repo_dir(), ctx.paths.state_dir()] {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    config::save_settings(
        &ctx.paths.settings_file(),
        &RepoSettings {
            host: config.host,
            password: config.repo_password.clone(),
        },
    )?;

    if let Some(page) = splash {
        std::fs::copy(&page, ctx.paths.splash_page())
            .with_context(|| format!("Failed to copy splash page {}", page.display()))?;
    }

    let gpg = GpgClient::new(ctx.tools.path(tools::GPG));
    let key = resolve_key(&gpg, config.key.clone(), ctx.prompter.as_ref()).await?;

    let key_file = ctx.paths.public_key_file(&Uuid::new_v4().simple().to_string());
    gpg.export_armored(&key, &key_file).await?;

    let conf_dir = ctx.paths.conf_dir();
    std::fs::create_dir_all(&conf_dir)
        .with_context(|| format!("Failed to create {}", conf_dir.display()))?;
    let distributions = ctx.paths.distributions_file();
    std::fs::write(&distributions, config.distribution(&key).to_string())
        .with_context(|| format!("Failed to write {}", distributions.display()))?;

    if !config.host.is_local() {
        create_remote(ctx, &config).await?;
    }

    ui::print_success(&format!(
        "Repo {} set up at {}",
        name,
        ctx.paths.repo_dir().display()
    ));
    Ok(Outcome::Done)
}

/// Pick the signing key
///
/// A configured key must already be in the keyring. Otherwise the user may
/// generate a new key (which is then used) or pick an existing one.
pub async fn resolve_key(
    gpg: &GpgClient,
    configured: Option<String>,
    prompter: &dyn Prompter,
) -> Result<String> {
    if let Some(key) = configured {
        if !gpg.key_exists(&key).await? {
            return Err(AptRepoError::KeyNotFound { key }.into());
        }
        return Ok(key);
    }

    let create = prompter.confirm("Would you like to create a new GPG key to sign your packages?")?;
    if create {
        gpg.generate_key().await?;
    }

    let keys = gpg.list_keys().await?;
    if keys.is_empty() {
        return Err(AptRepoError::NoKeys.into());
    }

    if create {
        // gpg lists keys oldest first
        let newest = keys.len() - 1;
        return Ok(keys[newest].fingerprint.clone());
    }

    let items: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    let index = prompter.select("Signing key", &items)?;
    keys.get(index)
        .map(|k| k.fingerprint.clone())
        .ok_or_else(|| anyhow::anyhow!("No key at index {}", index))
}

async fn create_remote(ctx: &AppContext, config: &RepoConfig) -> Result<()> {
    warn!(
        "You are using GitHub to host your repo; files must not exceed 100 MB \
         and the entire repo must not exceed 100 GB"
    );

    let token = ctx.github_token().await?;
    let git = ctx.git().with_credentials(GitCredentials {
        gh_bin: ctx.tools.path(tools::GH).to_string(),
        token: token.clone(),
    });

    git.init().await?;
    git.checkout_new_branch(PAGES_BRANCH).await?;
    git.add_all().await?;
    git.commit("set up repo").await?;

    GitHubClient::new(ctx.tools.path(tools::GH), token)
        .create_repo(ctx.paths.name(), config.host, ctx.paths.repo_dir())
        .await?;

    git.push(REMOTE, PAGES_BRANCH, false)
        .await
        .context("Failed to push the initial gh-pages branch")?;
    Ok(())
}

fn remove_dir_if_exists(dir: &Path) -> Result<()> {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", dir.display())),
    }
}
