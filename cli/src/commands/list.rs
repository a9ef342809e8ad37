//! `list-packages`

use anyhow::Result;

use super::{AppContext, Outcome};
use crate::domain::PackageRecord;
use crate::tools::tools;
use crate::ui;

/// Current package list of the repository
pub async fn packages(ctx: &AppContext) -> Result<Vec<PackageRecord>> {
    let repo = ctx.load_repo()?;
    ctx.tools.require(&[tools::REPREPRO])?;
    ctx.snapshot(&repo).await
}

/// One line per package, fields separated by spaces
pub fn render_plain(records: &[PackageRecord]) -> String {
    records
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub async fn execute(ctx: &AppContext, no_format: bool) -> Result<Outcome> {
    let records = packages(ctx).await?;

    if records.is_empty() {
        println!("No packages in repo {} yet", ctx.paths.name());
    } else if no_format {
        println!("{}", render_plain(&records));
    } else {
        ui::print_header(&format!("{} ({} packages)", ctx.paths.name(), records.len()));
        ui::print_packages(&records);
    }

    Ok(Outcome::Done)
}
