//! The reprepro `conf/distributions` control file

use std::fmt;

use crate::error::ConfigError;

/// A single distribution stanza
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    pub origin: String,
    pub label: String,
    pub codename: String,
    pub architectures: Vec<String>,
    pub components: Vec<String>,
    pub description: String,
    pub sign_with: String,
}

impl Distribution {
    /// Parse the stanza written by `setup`
    ///
    /// Only `Codename` and `Architectures` are required; everything else
    /// defaults to empty so hand-edited files still load.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut dist = Distribution {
            origin: String::new(),
            label: String::new(),
            codename: String::new(),
            architectures: Vec::new(),
            components: Vec::new(),
            description: String::new(),
            sign_with: String::new(),
        };

        for line in text.lines() {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "Origin" => dist.origin = value.to_string(),
                "Label" => dist.label = value.to_string(),
                "Codename" => dist.codename = value.to_string(),
                "Architectures" => dist.architectures = split_words(value),
                "Components" => dist.components = split_words(value),
                "Description" => dist.description = value.to_string(),
                "SignWith" => dist.sign_with = value.to_string(),
                _ => {}
            }
        }

        if dist.codename.is_empty() {
            return Err(ConfigError::MissingField {
                field: "Codename".to_string(),
            });
        }
        if dist.architectures.is_empty() {
            return Err(ConfigError::MissingField {
                field: "Architectures".to_string(),
            });
        }
        Ok(dist)
    }

    /// Value for reprepro's `-A` flag
    ///
    /// `all` packages are included into every configured architecture.
    pub fn arch_filter(&self, arch: &str) -> String {
        if arch == "all" {
            self.architectures.join("|")
        } else {
            arch.to_string()
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Origin: {}", self.origin)?;
        writeln!(f, "Label: {}", self.label)?;
        writeln!(f, "Codename: {}", self.codename)?;
        writeln!(f, "Architectures: {}", self.architectures.join(" "))?;
        writeln!(f, "Components: {}", self.components.join(" "))?;
        writeln!(f, "Description: {}", self.description)?;
        writeln!(f, "SignWith: {}", self.sign_with)
    }
}

fn split_words(value: &str) -> Vec<String> {
    value.split_whitespace().map(str::to_string).collect()
}
