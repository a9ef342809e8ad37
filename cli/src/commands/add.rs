//! `add-packages`: include .deb files and report what changed

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info, warn};

use super::{AppContext, Outcome};
use crate::domain::{diff, DebArg};
use crate::error::{AptRepoError, ToolError};
use crate::infrastructure::DpkgClient;
use crate::tools::tools;
use crate::ui::{self, Prompter};

/// GitHub rejects files above 100 MB
pub const GITHUB_FILE_LIMIT: u64 = 100 * 1000 * 1000;

/// A package file with its placement settled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeTarget {
    pub file: PathBuf,
    pub component: String,
    pub arch: String,
}

/// Fill in missing components (asking) and architectures (inspecting)
pub async fn resolve_targets(
    args: Vec<DebArg>,
    dpkg: &DpkgClient,
    prompter: &dyn Prompter,
) -> Result<Vec<IncludeTarget>> {
    let mut targets = Vec::with_capacity(args.len());

    for arg in args {
        if !arg.file.is_file() {
            anyhow::bail!("Package file not found: {}", arg.file.display());
        }
        let file = arg.file.display().to_string();

        let arch = match arg.arch {
            Some(arch) => arch,
            None => dpkg.architecture(&arg.file).await?,
        };

        let component = match arg.component {
            Some(component) => component,
            None => {
                let answer = prompter.input(&format!("{} component", file))?;
                let answer = answer.trim().to_string();
                if answer.is_empty() {
                    return Err(AptRepoError::EmptyAnswer {
                        what: "component",
                        file,
                    }
                    .into());
                }
                answer
            }
        };

        targets.push(IncludeTarget {
            file: arg.file,
            component,
            arch,
        });
    }

    Ok(targets)
}

pub async fn execute(ctx: &AppContext, packages: Vec<DebArg>) -> Result<Outcome> {
    let repo = ctx.load_repo()?;
    let local = repo.settings.is_local();

    let mut needed = vec![tools::REPREPRO, tools::DPKG];
    if !local {
        needed.extend([tools::GIT, tools::GH]);
    }
    ctx.tools.require(&needed)?;

    let dpkg = DpkgClient::new(ctx.tools.path(tools::DPKG));
    let targets = resolve_targets(packages, &dpkg, ctx.prompter.as_ref()).await?;

    let dist = &repo.distribution;
    for target in &targets {
        if !dist.components.contains(&target.component) {
            warn!(
                "Component {} is not one of {} configured for {}",
                target.component,
                dist.components.join(", "),
                dist.codename
            );
        }
    }

    let before = ctx.snapshot(&repo).await?;
    let reprepro = ctx.reprepro();
    let mut failures = 0;

    for target in &targets {
        if !local {
            let size = std::fs::metadata(&target.file)
                .with_context(|| format!("Failed to stat {}", target.file.display()))?
                .len();
            if size > GITHUB_FILE_LIMIT {
                warn!(
                    "{} exceeds 100 MB; GitHub cannot host it, skipping",
                    target.file.display()
                );
                continue;
            }
        }

        let arch_filter = dist.arch_filter(&target.arch);
        match reprepro
            .include_deb(&dist.codename, &target.component, &arch_filter, &target.file)
            .await
        {
            Ok(()) => {}
            Err(e @ ToolError::Interrupted { .. }) => return Err(e.into()),
            Err(e) => {
                error!("reprepro error: {}", e);
                failures += 1;
            }
        }
    }

    let after = reprepro.list(&dist.codename).await?;
    let added = diff(&before, &after);

    let outcome = if added.is_empty() {
        warn!("No new packages added");
        Outcome::NoChanges
    } else {
        info!("New packages added");
        ui::print_packages(&added);
        if !local {
            ctx.publish("update repo").await?;
        }
        Outcome::Done
    };

    if failures > 0 {
        return Err(AptRepoError::IncludeFailed { count: failures }.into());
    }
    Ok(outcome)
}
