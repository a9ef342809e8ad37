//! # Repository Paths
//!
//! Centralized path construction for a named repository.
//!
//! ```text
//! <base-location>/<name>/            reprepro base directory (published files)
//! <base-location>/<name>/conf/distributions
//! <base-location>/<name>/db/         reprepro database, created on first include
//! <state-dir>/<name>/settings.yaml
//! <state-dir>/<name>/containerid     present while the repo is being served
//! ```

use std::path::{Path, PathBuf};

use crate::error::{AptRepoError, ConfigError};

/// Default base location for repository files, relative to `$HOME`
pub const DEFAULT_BASE_DIR: &str = "apt-repo";

/// Default state directory, relative to `$HOME`
pub const DEFAULT_STATE_DIR: &str = ".apt-repo";

/// Path builder for one named repository
#[derive(Debug, Clone)]
pub struct RepoPaths {
    name: String,
    base: PathBuf,
    repo_dir: PathBuf,
    state_dir: PathBuf,
}

impl RepoPaths {
    pub fn new(name: &str, base: &Path, state_root: &Path) -> Self {
        Self {
            name: name.to_string(),
            base: base.to_path_buf(),
            repo_dir: base.join(name),
            state_dir: state_root.join(name),
        }
    }

    /// Resolve from optional overrides, defaulting under `$HOME`
    pub fn resolve(
        name: &str,
        base: Option<PathBuf>,
        state_root: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let home = || {
            std::env::var("HOME")
                .map(PathBuf::from)
                .map_err(|_| ConfigError::NoHome)
        };
        let base = match base {
            Some(base) => base,
            None => home()?.join(DEFAULT_BASE_DIR),
        };
        let state_root = match state_root {
            Some(state_root) => state_root,
            None => home()?.join(DEFAULT_STATE_DIR),
        };
        Ok(Self::new(name, &base, &state_root))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// reprepro base directory for this repository
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    pub fn state_dir(&self) -> &Path {
        &self.state_dir
    }

    pub fn conf_dir(&self) -> PathBuf {
        self.repo_dir.join("conf")
    }

    pub fn distributions_file(&self) -> PathBuf {
        self.conf_dir().join("distributions")
    }

    pub fn db_dir(&self) -> PathBuf {
        self.repo_dir.join("db")
    }

    pub fn git_dir(&self) -> PathBuf {
        self.repo_dir.join(".git")
    }

    pub fn splash_page(&self) -> PathBuf {
        self.repo_dir.join("index.html")
    }

    /// Armored public key published next to the repository
    pub fn public_key_file(&self, file_stem: &str) -> PathBuf {
        self.repo_dir.join(format!("{}.gpg.key", file_stem))
    }

    pub fn settings_file(&self) -> PathBuf {
        self.state_dir.join("settings.yaml")
    }

    pub fn container_id_file(&self) -> PathBuf {
        self.state_dir.join("containerid")
    }

    /// Name of the container serving this repository
    pub fn container_name(&self) -> String {
        format!("apt-repo_{}", self.name)
    }

    /// Whether a previous setup left files behind
    pub fn is_populated(&self) -> bool {
        std::fs::read_dir(&self.repo_dir)
            .map(|mut entries| entries.next().is_some())
            .unwrap_or(false)
    }

    /// Fail unless `setup` has been run for this repository
    pub fn ensure_set_up(&self) -> Result<(), AptRepoError> {
        if !self.base.is_dir() {
            return Err(AptRepoError::NotSetUp {
                path: self.base.clone(),
            });
        }
        for required in [self.distributions_file(), self.settings_file()] {
            if !required.is_file() {
                return Err(AptRepoError::NotSetUp { path: required });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let paths = RepoPaths::new("tools", Path::new("/srv/apt"), Path::new("/var/lib/apt-repo"));
        assert_eq!(paths.repo_dir(), Path::new("/srv/apt/tools"));
        assert_eq!(
            paths.distributions_file(),
            PathBuf::from("/srv/apt/tools/conf/distributions")
        );
        assert_eq!(
            paths.container_id_file(),
            PathBuf::from("/var/lib/apt-repo/tools/containerid")
        );
        assert_eq!(paths.container_name(), "apt-repo_tools");
        assert_eq!(
            paths.public_key_file("abc"),
            PathBuf::from("/srv/apt/tools/abc.gpg.key")
        );
    }

    #[test]
    fn test_resolve_with_overrides() {
        let paths = RepoPaths::resolve(
            "tools",
            Some(PathBuf::from("/a")),
            Some(PathBuf::from("/b")),
        )
        .unwrap();
        assert_eq!(paths.repo_dir(), Path::new("/a/tools"));
        assert_eq!(paths.state_dir(), Path::new("/b/tools"));
    }

    #[test]
    fn test_ensure_set_up() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("repos");
        let paths = RepoPaths::new("tools", &base, &dir.path().join("state"));

        let err = paths.ensure_set_up().unwrap_err();
        assert!(err.to_string().contains("run `apt-repo <name> setup` first"));

        std::fs::create_dir_all(paths.conf_dir()).unwrap();
        std::fs::create_dir_all(paths.state_dir()).unwrap();
        assert!(paths.ensure_set_up().is_err());

        std::fs::write(paths.distributions_file(), "Codename: stable\n").unwrap();
        std::fs::write(paths.settings_file(), "host: local\n").unwrap();
        assert!(paths.ensure_set_up().is_ok());
        assert!(paths.is_populated());
    }
}
