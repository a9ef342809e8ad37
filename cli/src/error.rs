//! Centralized error types for apt-repo
//!
//! Uses thiserror for typed errors that can be matched on,
//! while still being compatible with anyhow for propagation.

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    /// The command ran but nothing in the repository changed
    pub const NO_CHANGES: i32 = 1;
    pub const FAILURE: i32 = 2;
    pub const INTERRUPTED: i32 = 130;
}

/// Top-level error type for apt-repo operations
#[derive(Error, Debug)]
pub enum AptRepoError {
    #[error("{path} does not exist; please run `apt-repo <name> setup` first")]
    NotSetUp { path: PathBuf },

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("GPG key {key} does not exist")]
    KeyNotFound { key: String },

    #[error("No GPG keys available to sign the repository")]
    NoKeys,

    #[error("Repo {name} is currently being served")]
    AlreadyServing { name: String },

    #[error("Repo {name} is not currently being served")]
    NotServing { name: String },

    #[error("Repo {name} is hosted on GitHub and cannot be served locally")]
    NotLocal { name: String },

    #[error("Repo {name} is local; only a repo hosted on GitHub can be cleaned")]
    NotGitHub { name: String },

    #[error("Invalid package argument \"{arg}\" (use <file>.deb, <file>.deb:<component> or <file>.deb:<component>:<arch>)")]
    InvalidPackageArg { arg: String },

    #[error("Empty {what} given for {file}")]
    EmptyAnswer { what: &'static str, file: String },

    #[error("Cannot parse reprepro list line: {line}")]
    ListParse { line: String },

    #[error("{count} package(s) could not be included")]
    IncludeFailed { count: usize },

    #[error("{0}")]
    Aborted(String),
}

/// External tool errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Required tool `{tool}` not found in PATH (override with {env_var})")]
    NotInstalled { tool: String, env_var: String },

    #[error("Failed to start `{command}`: {message}")]
    SpawnFailed { command: String, message: String },

    #[error("`{command}` exited with code {code}{}", stderr_suffix(.stderr))]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    #[error("`{command}` was interrupted")]
    Interrupted { command: String },
}

fn stderr_suffix(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value \"{value}\" for key \"host\" (expected local, github or github-private)")]
    InvalidHost { value: String },

    #[error("Config file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse {path}: {message}")]
    ParseError { path: String, message: String },

    #[error("Required configuration missing: {field}")]
    MissingField { field: String },

    #[error("HOME not set; pass --base-location and --state-dir explicitly")]
    NoHome,
}

impl AptRepoError {
    /// Exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            AptRepoError::Aborted(_) => exit_code::NO_CHANGES,
            AptRepoError::Tool(ToolError::Interrupted { .. }) => exit_code::INTERRUPTED,
            _ => exit_code::FAILURE,
        }
    }
}

/// Resolve the exit code for an error chain
///
/// Walks the chain so a typed error wrapped in anyhow context still maps to
/// its own code.
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<AptRepoError>() {
            return e.exit_code();
        }
        if let Some(ToolError::Interrupted { .. }) = cause.downcast_ref::<ToolError>() {
            return exit_code::INTERRUPTED;
        }
    }
    exit_code::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_not_set_up_display() {
        let err = AptRepoError::NotSetUp {
            path: PathBuf::from("/tmp/apt-repo/demo"),
        };
        assert!(err.to_string().contains("run `apt-repo <name> setup` first"));
    }

    #[test]
    fn test_command_failed_display() {
        let err = ToolError::CommandFailed {
            command: "reprepro list stable".to_string(),
            code: 255,
            stderr: "database locked".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "`reprepro list stable` exited with code 255: database locked"
        );
    }

    #[test]
    fn test_exit_codes() {
        let aborted: anyhow::Error = AptRepoError::Aborted("Setup aborted".into()).into();
        assert_eq!(exit_code_for(&aborted), exit_code::NO_CHANGES);

        let failed: anyhow::Error = ToolError::CommandFailed {
            command: "gpg".into(),
            code: 2,
            stderr: String::new(),
        }
        .into();
        assert_eq!(exit_code_for(&failed), exit_code::FAILURE);

        let interrupted = Err::<(), _>(ToolError::Interrupted {
            command: "reprepro".into(),
        })
        .context("Failed to add packages")
        .unwrap_err();
        assert_eq!(exit_code_for(&interrupted), exit_code::INTERRUPTED);
    }

    #[test]
    fn test_error_conversion() {
        let tool_err = ToolError::NotInstalled {
            tool: "reprepro".into(),
            env_var: "REPREPRO_BIN".into(),
        };
        let err: AptRepoError = tool_err.into();
        assert!(matches!(err, AptRepoError::Tool(_)));
    }
}
