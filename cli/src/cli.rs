//! CLI definitions for apt-repo
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::serve::DEFAULT_IMAGE;
use crate::domain::DebArg;

#[derive(Parser)]
#[command(
    name = "apt-repo",
    version,
    about = "Create and maintain signed APT repositories",
    long_about = "Create and maintain signed APT repositories with reprepro.\nRepos are either served locally with docker or published to GitHub Pages."
)]
pub struct Cli {
    /// Name of the repo to operate on
    pub name: String,

    #[command(subcommand)]
    pub command: Commands,

    /// Directory holding all repos (default: ~/apt-repo)
    #[arg(long, env = "APT_REPO_BASE", global = true)]
    pub base_location: Option<PathBuf>,

    /// Directory holding per-repo settings (default: ~/.apt-repo)
    #[arg(long, env = "APT_REPO_STATE", global = true)]
    pub state_dir: Option<PathBuf>,

    /// GitHub token; falls back to `gh auth token`, then a prompt
    #[arg(long, env = "GH_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Set up a new repo from a YAML, JSON or TOML config file
    Setup {
        /// Repo config file
        config: PathBuf,

        /// HTML page served at the root of the repo
        #[arg(long)]
        splash: Option<PathBuf>,
    },

    /// Add .deb files to the repo
    ///
    /// Each argument is <file>.deb, <file>.deb:<component> or
    /// <file>.deb:<component>:<arch>. A missing component is prompted for;
    /// a missing arch is read from the package.
    #[command(visible_alias = "add")]
    AddPackages {
        #[arg(required = true)]
        packages: Vec<DebArg>,
    },

    /// Remove packages from the repo by name
    #[command(visible_alias = "remove")]
    RemovePackages {
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// List the packages in the repo
    #[command(visible_alias = "list")]
    ListPackages {
        /// One package per line, without a table
        #[arg(long)]
        no_format: bool,
    },

    /// Serve a local repo over HTTP from a docker container
    Serve {
        /// Host port to bind
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// httpd image to run
        #[arg(long, default_value = DEFAULT_IMAGE)]
        image: String,

        /// Stop serving instead
        #[arg(short, long)]
        stop: bool,
    },

    /// Squash the git history of a GitHub-hosted repo into one commit
    Clean,
}
