//! Infrastructure layer - external I/O adapters
//!
//! This module contains all code that interacts with external tools:
//! - reprepro (package database and signed indices)
//! - dpkg (package inspection)
//! - gpg (signing keys)
//! - docker (local serving)
//! - git and gh (GitHub Pages hosting)

pub mod docker;
pub mod dpkg;
pub mod git;
pub mod github;
pub mod gpg;
pub mod process;
pub mod reprepro;

// Re-export commonly used types
pub use docker::{DockerClient, ServeSpec};
pub use dpkg::DpkgClient;
pub use git::{GitClient, GitCredentials, PAGES_BRANCH, REMOTE};
pub use github::GitHubClient;
pub use gpg::GpgClient;
pub use reprepro::RepreproClient;
