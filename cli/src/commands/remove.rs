//! `remove-packages`: drop packages by name and report what changed

use anyhow::Result;
use tracing::{info, warn};

use super::{AppContext, Outcome};
use crate::domain::diff;
use crate::tools::tools;
use crate::ui;

pub async fn execute(ctx: &AppContext, packages: Vec<String>) -> Result<Outcome> {
    let repo = ctx.load_repo()?;
    let local = repo.settings.is_local();

    let mut needed = vec![tools::REPREPRO];
    if !local {
        needed.extend([tools::GIT, tools::GH]);
    }
    ctx.tools.require(&needed)?;

    let codename = &repo.distribution.codename;
    let before = ctx.snapshot(&repo).await?;
    if before.is_empty() {
        warn!("No packages in repo {} to remove", ctx.paths.name());
        return Ok(Outcome::NoChanges);
    }

    let reprepro = ctx.reprepro();
    for package in &packages {
        reprepro.remove(codename, package).await?;
    }

    let after = reprepro.list(codename).await?;
    let removed = diff(&after, &before);

    if removed.is_empty() {
        warn!("No packages removed");
        return Ok(Outcome::NoChanges);
    }

    info!("Packages removed");
    ui::print_packages(&removed);
    if !local {
        ctx.publish("update repo").await?;
    }
    Ok(Outcome::Done)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use crate::commands::{add, list};
    use crate::config::Host;
    use crate::domain::DebArg;
    use crate::ui::testing::ScriptedPrompter;

    async fn add_fixture(ctx: &AppContext, dir: &std::path::Path, name: &str) {
        let deb = fake_deb(dir, name, "1.0");
        let arg: DebArg = format!("{}:main", deb.display()).parse().unwrap();
        add::execute(ctx, vec![arg]).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_then_list_excludes_package() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Host::Local, ScriptedPrompter::default());
        add_fixture(&ctx, dir.path(), "hello").await;
        add_fixture(&ctx, dir.path(), "world").await;

        let outcome = execute(&ctx, vec!["hello".into()]).await.unwrap();
        assert_eq!(outcome, Outcome::Done);

        let names: Vec<_> = list::packages(&ctx)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["world"]);
    }

    #[tokio::test]
    async fn test_remove_unknown_package_reports_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Host::Local, ScriptedPrompter::default());
        add_fixture(&ctx, dir.path(), "hello").await;

        let outcome = execute(&ctx, vec!["nonexistent".into()]).await.unwrap();
        assert_eq!(outcome, Outcome::NoChanges);
    }

    #[tokio::test]
    async fn test_remove_from_empty_repo() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Host::Local, ScriptedPrompter::default());
        let outcome = execute(&ctx, vec!["hello".into()]).await.unwrap();
        assert_eq!(outcome, Outcome::NoChanges);
    }

    #[tokio::test]
    async fn test_github_host_publishes_removal() {
        let dir = tempfile::tempdir().unwrap();
        let Some(ctx) = github_context(dir.path(), ScriptedPrompter::default()) else {
            return;
        };
        add_fixture(&ctx, dir.path(), "hello").await;

        let outcome = execute(&ctx, vec!["hello".into()]).await.unwrap();
        assert_eq!(outcome, Outcome::Done);
        assert_eq!(remote_log(&ctx), ["update repo", "update repo"]);
        assert!(list::packages(&ctx).await.unwrap().is_empty());
    }
}
