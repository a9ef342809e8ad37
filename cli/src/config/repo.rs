//! Setup configuration: what `apt-repo <name> setup <config>` reads.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::Distribution;
use crate::error::ConfigError;

/// Where the repository is published
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Host {
    /// Served from a local container
    Local,
    /// Public GitHub repository, `gh-pages` branch
    GitHub,
    /// Private GitHub repository, `gh-pages` branch
    GitHubPrivate,
}

impl Host {
    pub fn is_local(self) -> bool {
        self == Host::Local
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Host::Local => "local",
            Host::GitHub => "github",
            Host::GitHubPrivate => "github-private",
        }
    }

    /// `gh repo create` visibility flag
    pub fn visibility_flag(self) -> &'static str {
        match self {
            Host::GitHubPrivate => "--private",
            _ => "--public",
        }
    }
}

impl FromStr for Host {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Host::Local),
            "github" => Ok(Host::GitHub),
            "github-private" => Ok(Host::GitHubPrivate),
            other => Err(ConfigError::InvalidHost {
                value: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for Host {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Host> for String {
    fn from(host: Host) -> Self {
        host.as_str().to_string()
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Setup config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoConfig {
    /// Repository name; the command line name takes precedence
    #[serde(default)]
    pub name: Option<String>,

    pub host: Host,

    pub origin: String,

    pub label: String,

    pub codename: String,

    /// Architectures served by the repository
    pub arch: Vec<String>,

    pub components: Vec<String>,

    pub description: String,

    /// GPG key id used to sign the repository; prompted for when absent
    #[serde(default)]
    pub key: Option<String>,

    /// Password handed to the serving container as `REPO_PASSWORD`
    #[serde(default)]
    pub repo_password: Option<String>,
}

impl RepoConfig {
    /// Reject configs reprepro would choke on
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, empty) in [
            ("codename", self.codename.trim().is_empty()),
            ("arch", self.arch.is_empty()),
            ("components", self.components.is_empty()),
        ] {
            if empty {
                return Err(ConfigError::MissingField {
                    field: field.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Distribution stanza for this config, signed with `key`
    pub fn distribution(&self, key: &str) -> Distribution {
        Distribution {
            origin: self.origin.clone(),
            label: self.label.clone(),
            codename: self.codename.clone(),
            architectures: self.arch.clone(),
            components: self.components.clone(),
            description: self.description.clone(),
            sign_with: key.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_parse() {
        assert_eq!("local".parse::<Host>().unwrap(), Host::Local);
        assert_eq!("github-private".parse::<Host>().unwrap(), Host::GitHubPrivate);
        assert!("gitlab".parse::<Host>().is_err());
    }

    #[test]
    fn test_visibility_flag() {
        assert_eq!(Host::GitHub.visibility_flag(), "--public");
        assert_eq!(Host::GitHubPrivate.visibility_flag(), "--private");
    }

    #[test]
    fn test_distribution_from_config() {
        let config = RepoConfig {
            name: None,
            host: Host::Local,
            origin: "Example".into(),
            label: "Example".into(),
            codename: "stable".into(),
            arch: vec!["amd64".into()],
            components: vec!["main".into()],
            description: "Example packages".into(),
            key: None,
            repo_password: None,
        };
        let dist = config.distribution("ABCD1234");
        assert_eq!(dist.codename, "stable");
        assert_eq!(dist.sign_with, "ABCD1234");
        assert!(config.validate().is_ok());
    }
}
