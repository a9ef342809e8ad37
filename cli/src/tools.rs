//! Runtime tool path resolution
//!
//! Every external program apt-repo drives is resolved the same way:
//!
//! 1. Check for an environment variable `{TOOL}_BIN` (e.g., `REPREPRO_BIN`)
//! 2. Fall back to PATH-based invocation if the envvar is not set
//!
//! Commands declare the tools they need up front and [`Toolchain::require`]
//! fails fast with a readable error before anything touches the repository.

use std::collections::HashMap;
use std::env;
use std::path::Path;

use crate::error::ToolError;

/// Get the path to an external tool
///
/// Checks for an environment variable `{TOOL}_BIN` (uppercase tool name + "_BIN").
/// Falls back to the tool name itself if the envvar is not set, which relies on PATH.
///
/// ```rust,ignore
/// // With REPREPRO_BIN="/opt/reprepro/bin/reprepro"
/// assert_eq!(get_tool_path("reprepro"), "/opt/reprepro/bin/reprepro");
///
/// // Without REPREPRO_BIN set
/// assert_eq!(get_tool_path("reprepro"), "reprepro");
/// ```
pub fn get_tool_path(tool: &str) -> String {
    env::var(env_var_for(tool)).unwrap_or_else(|_| tool.to_string())
}

/// Name of the override variable for a tool
pub fn env_var_for(tool: &str) -> String {
    format!("{}_BIN", tool.to_uppercase().replace('-', "_"))
}

/// Tool names
pub mod tools {
    pub const REPREPRO: &str = "reprepro";
    pub const GPG: &str = "gpg";
    pub const DPKG: &str = "dpkg";
    pub const DOCKER: &str = "docker";
    pub const GIT: &str = "git";
    pub const GH: &str = "gh";

    pub const ALL: [&str; 6] = [REPREPRO, GPG, DPKG, DOCKER, GIT, GH];
}

/// Resolved paths for every external tool
#[derive(Debug, Clone)]
pub struct Toolchain {
    paths: HashMap<&'static str, String>,
}

impl Toolchain {
    /// Resolve every tool from the environment
    pub fn from_env() -> Self {
        let paths = tools::ALL
            .iter()
            .map(|tool| (*tool, get_tool_path(tool)))
            .collect();
        Self { paths }
    }

    /// Point a tool at an explicit path
    pub fn with_tool(mut self, tool: &'static str, path: impl Into<String>) -> Self {
        self.paths.insert(tool, path.into());
        self
    }

    /// Path (or bare name) used to invoke `tool`
    pub fn path<'a>(&'a self, tool: &'a str) -> &'a str {
        self.paths.get(tool).map(String::as_str).unwrap_or(tool)
    }

    /// Ensure every listed tool can be executed
    pub fn require(&self, needed: &[&str]) -> Result<(), ToolError> {
        for tool in needed {
            let path = self.path(tool);
            let found = if Path::new(path).components().count() > 1 {
                Path::new(path).is_file()
            } else {
                which::which(path).is_ok()
            };
            if !found {
                return Err(ToolError::NotInstalled {
                    tool: tool.to_string(),
                    env_var: env_var_for(tool),
                });
            }
        }
        Ok(())
    }
}
