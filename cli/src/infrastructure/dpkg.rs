//! Package inspection via `dpkg --info`

use anyhow::{Context, Result};
use regex::Regex;
use std::path::Path;

use super::process::ToolCommand;

pub struct DpkgClient {
    bin: String,
}

impl DpkgClient {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Architecture declared in a .deb's control file
    pub async fn architecture(&self, deb: &Path) -> Result<String> {
        let info = ToolCommand::new(&self.bin)
            .arg("--info")
            .path_arg(deb)
            .output()
            .await
            .with_context(|| format!("Failed to inspect {}", deb.display()))?;

        parse_architecture(&info).ok_or_else(|| {
            anyhow::anyhow!("No Architecture field in control file of {}", deb.display())
        })
    }
}

/// Extract the `Architecture` field from `dpkg --info` output
pub fn parse_architecture(info: &str) -> Option<String> {
    let re = Regex::new(r"(?m)^\s*Architecture:\s*(\S+)\s*$").ok()?;
    re.captures(info).map(|c| c[1].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = " new Debian package, version 2.0.
 size 27072 bytes: control archive=1340 bytes.
 Package: hello
 Version: 2.10-2
 Architecture: arm64
 Maintainer: Santiago Vila <sanvila@debian.org>
 Description: example package based on GNU hello
";

    #[test]
    fn test_parse_architecture() {
        assert_eq!(parse_architecture(INFO).as_deref(), Some("arm64"));
    }

    #[test]
    fn test_parse_architecture_missing() {
        assert_eq!(parse_architecture(" Package: hello\n"), None);
    }
}
