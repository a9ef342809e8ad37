//! `add-packages` arguments: `<file>.deb[:<component>[:<arch>]]`

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::AptRepoError;

/// A package file with optionally pinned component and architecture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebArg {
    pub file: PathBuf,
    pub component: Option<String>,
    pub arch: Option<String>,
}

impl FromStr for DebArg {
    type Err = AptRepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AptRepoError::InvalidPackageArg { arg: s.to_string() };

        let (file, rest) = match s.split_once(".deb:") {
            Some((stem, rest)) => (format!("{}.deb", stem), Some(rest)),
            None => (s.to_string(), None),
        };

        if !file.ends_with(".deb") || file == ".deb" {
            return Err(invalid());
        }

        let (component, arch) = match rest {
            None => (None, None),
            Some(rest) => {
                let mut parts = rest.split(':');
                let component = parts.next().and_then(non_empty);
                let arch = parts.next().and_then(non_empty);
                if parts.next().is_some() {
                    return Err(invalid());
                }
                (component, arch)
            }
        };

        Ok(Self {
            file: PathBuf::from(file),
            component,
            arch,
        })
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_file() {
        let arg: DebArg = "dist/hello_1.0_amd64.deb".parse().unwrap();
        assert_eq!(arg.file, PathBuf::from("dist/hello_1.0_amd64.deb"));
        assert_eq!(arg.component, None);
        assert_eq!(arg.arch, None);
    }

    #[test]
    fn test_with_component() {
        let arg: DebArg = "hello.deb:main".parse().unwrap();
        assert_eq!(arg.file, PathBuf::from("hello.deb"));
        assert_eq!(arg.component.as_deref(), Some("main"));
        assert_eq!(arg.arch, None);
    }

    #[test]
    fn test_with_component_and_arch() {
        let arg: DebArg = "hello.deb:contrib:arm64".parse().unwrap();
        assert_eq!(arg.component.as_deref(), Some("contrib"));
        assert_eq!(arg.arch.as_deref(), Some("arm64"));

        let arg: DebArg = "hello.deb::all".parse().unwrap();
        assert_eq!(arg.component, None);
        assert_eq!(arg.arch.as_deref(), Some("all"));
    }

    #[test]
    fn test_rejects_non_deb() {
        assert!("hello.rpm".parse::<DebArg>().is_err());
        assert!("hello.deb:main:amd64:extra".parse::<DebArg>().is_err());
    }
}
