//! `clean`: squash the history of a GitHub-hosted repository
//!
//! Every publish adds a commit carrying the new pool and indices, so the
//! hosting repository grows without bound. Cleaning replaces the whole
//! history with one commit of the current tree and force-pushes it.

use anyhow::{Context, Result};
use tracing::info;

use super::{spinner, AppContext, Outcome};
use crate::error::AptRepoError;
use crate::infrastructure::{PAGES_BRANCH, REMOTE};
use crate::tools::tools;
use crate::ui;

pub async fn execute(ctx: &AppContext) -> Result<Outcome> {
    let repo = ctx.load_repo()?;
    let name = ctx.paths.name().to_string();
    if repo.settings.is_local() {
        return Err(AptRepoError::NotGitHub { name }.into());
    }
    ctx.tools.require(&[tools::GIT, tools::GH])?;

    if !ui::confirm_twice(
        ctx.prompter.as_ref(),
        &format!("Erase the entire git history of {}?", name),
        "Are you REALLY sure? There is no going back from this.",
    )? {
        return Err(AptRepoError::Aborted("Clean aborted".to_string()).into());
    }

    let git = ctx.authenticated_git().await?;
    let remote = git.remote_url(REMOTE).await?;
    info!("Resetting history of {} (remote {})", name, remote);

    let git_dir = ctx.paths.git_dir();
    std::fs::remove_dir_all(&git_dir)
        .with_context(|| format!("Failed to remove {}", git_dir.display()))?;

    git.init().await?;
    git.checkout_new_branch(PAGES_BRANCH).await?;
    git.add_remote(REMOTE, &remote).await?;
    git.add_all().await?;
    git.commit("clean repo").await?;

    let pb = spinner("Force-pushing clean history (may take a while)...".to_string());
    let pushed = git.push(REMOTE, PAGES_BRANCH, true).await;
    pb.finish_and_clear();
    pushed.context("Failed to push clean history")?;

    ui::print_success(&format!("Cleaned {}", name));
    Ok(Outcome::Done)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use crate::config::Host;
    use crate::error::{exit_code, exit_code_for};
    use crate::ui::testing::ScriptedPrompter;

    #[tokio::test]
    async fn test_local_repo_cannot_be_cleaned() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Host::Local, ScriptedPrompter::default());
        let err = execute(&ctx).await.unwrap_err();
        assert!(err.to_string().contains("only a repo hosted on GitHub"));
    }

    #[tokio::test]
    async fn test_clean_needs_two_confirmations() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = ScriptedPrompter::default().answer("y").answer("n");
        let mut ctx = context(dir.path(), Host::GitHub, prompter);
        // git and gh must resolve for the tool check; neither is run
        ctx.tools = ctx
            .tools
            .with_tool(tools::GIT, "/bin/sh")
            .with_tool(tools::GH, "/bin/sh");

        let git_dir = ctx.paths.git_dir();
        std::fs::create_dir_all(&git_dir).unwrap();

        let err = execute(&ctx).await.unwrap_err();
        assert_eq!(exit_code_for(&err), exit_code::NO_CHANGES);
        assert!(git_dir.exists());
    }

    #[tokio::test]
    async fn test_clean_replaces_remote_history() {
        let dir = tempfile::tempdir().unwrap();
        let prompter = ScriptedPrompter::default().answer("y").answer("y");
        let Some(ctx) = github_context(dir.path(), prompter) else {
            return;
        };
        let deb = fake_deb(dir.path(), "hello", "1.0");
        let arg = format!("{}:main", deb.display()).parse().unwrap();
        crate::commands::add::execute(&ctx, vec![arg]).await.unwrap();
        assert_eq!(remote_log(&ctx), ["update repo"]);

        assert_eq!(execute(&ctx).await.unwrap(), Outcome::Done);
        assert_eq!(remote_log(&ctx), ["clean repo"]);
        assert!(ctx.paths.repo_dir().join("db/packages").exists());
    }
}
