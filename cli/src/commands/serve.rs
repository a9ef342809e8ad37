//! `serve`: run the repository behind httpd in a local container

use anyhow::{Context, Result};
use tracing::warn;

use super::{AppContext, Outcome};
use crate::error::AptRepoError;
use crate::infrastructure::{DockerClient, ServeSpec};
use crate::tools::tools;
use crate::ui;

pub const DEFAULT_IMAGE: &str = "httpd:2.4";

/// The stock httpd image serves everything; only a custom image can use the password
fn password_ignored(password: Option<&str>, image: &str) -> bool {
    password.is_some() && image == DEFAULT_IMAGE
}

pub async fn execute(ctx: &AppContext, port: u16, image: String, stop: bool) -> Result<Outcome> {
    let repo = ctx.load_repo()?;
    let name = ctx.paths.name().to_string();
    if !repo.settings.is_local() {
        return Err(AptRepoError::NotLocal { name }.into());
    }
    ctx.tools.require(&[tools::DOCKER])?;

    let docker = DockerClient::new(ctx.tools.path(tools::DOCKER));
    let id_file = ctx.paths.container_id_file();

    if stop {
        let container_id = match std::fs::read_to_string(&id_file) {
            Ok(id) => id.trim().to_string(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AptRepoError::NotServing { name }.into());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", id_file.display()))
            }
        };
        docker.stop(&container_id).await?;
        std::fs::remove_file(&id_file)
            .with_context(|| format!("Failed to remove {}", id_file.display()))?;
        ui::print_success(&format!("Stopped serving {}", name));
        return Ok(Outcome::Done);
    }

    if id_file.exists() {
        return Err(AptRepoError::AlreadyServing { name }.into());
    }

    if password_ignored(repo.settings.password.as_deref(), &image) {
        warn!(
            "{} does not read REPO_PASSWORD; the repo will be served without a password \
             (pass --image with an image that enforces it)",
            image
        );
    }

    let spec = ServeSpec {
        container_name: ctx.paths.container_name(),
        image,
        port,
        repo_dir: ctx.paths.repo_dir().to_path_buf(),
        password: repo.settings.password.clone(),
    };
    let container_id = docker.run_detached(&spec).await?;
    std::fs::write(&id_file, &container_id)
        .with_context(|| format!("Failed to write {}", id_file.display()))?;

    ui::print_success(&format!("Serving {} on http://localhost:{}/", name, port));
    Ok(Outcome::Done)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::commands::test_support::*;
    use crate::config::Host;
    use crate::ui::testing::ScriptedPrompter;

    #[tokio::test]
    async fn test_serve_start_and_stop() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Host::Local, ScriptedPrompter::default());
        let id_file = ctx.paths.container_id_file();

        execute(&ctx, 8080, DEFAULT_IMAGE.into(), false).await.unwrap();
        assert_eq!(std::fs::read_to_string(&id_file).unwrap(), "c0ffee1234");

        let err = execute(&ctx, 8080, DEFAULT_IMAGE.into(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("currently being served"));

        execute(&ctx, 8080, DEFAULT_IMAGE.into(), true).await.unwrap();
        assert!(!id_file.exists());

        let err = execute(&ctx, 8080, DEFAULT_IMAGE.into(), true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not currently being served"));
    }

    #[tokio::test]
    async fn test_github_repo_cannot_be_served() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = context(dir.path(), Host::GitHub, ScriptedPrompter::default());
        let err = execute(&ctx, 8080, DEFAULT_IMAGE.into(), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("cannot be served locally"));
    }

    #[test]
    fn test_password_needs_custom_image() {
        assert!(password_ignored(Some("hunter2"), DEFAULT_IMAGE));
        assert!(!password_ignored(Some("hunter2"), "example/httpd-auth:1"));
        assert!(!password_ignored(None, DEFAULT_IMAGE));
    }
}
