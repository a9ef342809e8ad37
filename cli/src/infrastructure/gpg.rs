//! GPG key management
//!
//! Keys are listed with `--with-colons` so the output is stable across gpg
//! versions and locales.

use anyhow::{Context, Result};
use std::fmt;
use std::path::Path;
use tracing::info;

use super::process::ToolCommand;
use crate::error::ToolError;

/// A public key in the local keyring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpgKey {
    pub fingerprint: String,
    pub user_id: String,
}

impl fmt::Display for GpgKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.user_id.is_empty() {
            f.write_str(&self.fingerprint)
        } else {
            write!(f, "{} {}", self.fingerprint, self.user_id)
        }
    }
}

pub struct GpgClient {
    bin: String,
}

impl GpgClient {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    /// Whether `key` is in the keyring
    ///
    /// gpg exits with 2 when the key is unknown; any other failure is an error.
    pub async fn key_exists(&self, key: &str) -> Result<bool, ToolError> {
        let cmd = ToolCommand::new(&self.bin).args(["--list-keys", key]);
        match cmd.exit_code().await? {
            0 => Ok(true),
            2 => Ok(false),
            code => Err(ToolError::CommandFailed {
                command: cmd.display(),
                code,
                stderr: String::new(),
            }),
        }
    }

    /// Interactive key generation
    pub async fn generate_key(&self) -> Result<(), ToolError> {
        info!("Generating a new GPG key");
        ToolCommand::new(&self.bin).arg("--gen-key").run().await
    }

    /// Every public key, oldest first
    pub async fn list_keys(&self) -> Result<Vec<GpgKey>> {
        let output = ToolCommand::new(&self.bin)
            .args(["--list-keys", "--with-colons"])
            .output()
            .await
            .context("Failed to list GPG keys")?;
        Ok(parse_keys(&output))
    }

    /// Write the ASCII-armored public key to `dest`
    pub async fn export_armored(&self, key: &str, dest: &Path) -> Result<(), ToolError> {
        info!("Exporting public key {} to {}", key, dest.display());
        ToolCommand::new(&self.bin)
            .args(["--batch", "--yes", "--armor", "--output"])
            .path_arg(dest)
            .args(["--export", key])
            .output()
            .await
            .map(|_| ())
    }
}

/// Parse `gpg --list-keys --with-colons` output
///
/// The first `fpr` record after a `pub` record is the primary key's
/// fingerprint; the first `uid` record names it.
pub fn parse_keys(output: &str) -> Vec<GpgKey> {
    let mut keys: Vec<GpgKey> = Vec::new();
    let mut awaiting_fpr = false;
    let mut awaiting_uid = false;

    for line in output.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        match fields.first().copied() {
            Some("pub") => {
                awaiting_fpr = true;
                awaiting_uid = true;
            }
            Some("sub") => awaiting_fpr = false,
            Some("fpr") if awaiting_fpr => {
                if let Some(fpr) = fields.get(9).filter(|f| !f.is_empty()) {
                    keys.push(GpgKey {
                        fingerprint: fpr.to_string(),
                        user_id: String::new(),
                    });
                }
                awaiting_fpr = false;
            }
            Some("uid") if awaiting_uid => {
                if let (Some(key), Some(uid)) = (keys.last_mut(), fields.get(9)) {
                    key.user_id = uid.to_string();
                }
                awaiting_uid = false;
            }
            _ => {}
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLONS: &str = "\
tru::1:1700000000:0:3:1:5
pub:u:3072:1:1111222233334444:1600000000:1700000000::u:::scESC::::::23::0:
fpr:::::::::AAAABBBBCCCCDDDDEEEEFFFF1111222233334444:
uid:u::::1600000000::HASH1::Alice Example <alice@example.com>::::::::::0:
sub:u:3072:1:5555666677778888:1600000000:1700000000:::::e::::::23:
fpr:::::::::9999000011112222333344445555666677778888:
pub:u:255:22:AAAA000011112222:1650000000:::u:::scESC::::::ed25519::0:
fpr:::::::::0000111122223333444455556666AAAA00001111:
uid:u::::1650000000::HASH2::Bob Builder <bob@example.com>::::::::::0:
";

    #[test]
    fn test_parse_keys() {
        let keys = parse_keys(COLONS);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].fingerprint, "AAAABBBBCCCCDDDDEEEEFFFF1111222233334444");
        assert_eq!(keys[0].user_id, "Alice Example <alice@example.com>");
        assert_eq!(keys[1].fingerprint, "0000111122223333444455556666AAAA00001111");
        assert_eq!(
            keys[1].to_string(),
            "0000111122223333444455556666AAAA00001111 Bob Builder <bob@example.com>"
        );
    }

    #[test]
    fn test_parse_empty_keyring() {
        assert!(parse_keys("").is_empty());
    }
}
