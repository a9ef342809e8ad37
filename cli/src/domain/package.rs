//! Package records as reported by `reprepro list`

use std::fmt;

use tabled::Tabled;

use crate::error::AptRepoError;

/// One package in one distribution/component/architecture
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct PackageRecord {
    pub codename: String,
    pub component: String,
    pub arch: String,
    pub name: String,
    pub version: String,
}

impl PackageRecord {
    /// Parse a single line of `reprepro list` output
    ///
    /// Format: `<codename>|<component>|<arch>: <name> <version>`
    pub fn parse_line(line: &str) -> Result<Self, AptRepoError> {
        let invalid = || AptRepoError::ListParse {
            line: line.to_string(),
        };

        let (location, package) = line.split_once(": ").ok_or_else(invalid)?;

        let mut parts = location.splitn(3, '|');
        let codename = parts.next().ok_or_else(invalid)?;
        let component = parts.next().ok_or_else(invalid)?;
        let arch = parts.next().ok_or_else(invalid)?;

        let (name, version) = package.trim().split_once(' ').ok_or_else(invalid)?;

        if [codename, component, arch, name, version]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(invalid());
        }

        Ok(Self {
            codename: codename.to_string(),
            component: component.to_string(),
            arch: arch.to_string(),
            name: name.to_string(),
            version: version.trim().to_string(),
        })
    }
}

impl fmt::Display for PackageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.codename, self.component, self.arch, self.name, self.version
        )
    }
}

/// Parse the full output of `reprepro list <codename>`
pub fn parse_list(output: &str) -> Result<Vec<PackageRecord>, AptRepoError> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(PackageRecord::parse_line)
        .collect()
}

/// Records in `after` that are absent from `before`, in `after`'s order
pub fn diff(before: &[PackageRecord], after: &[PackageRecord]) -> Vec<PackageRecord> {
    after
        .iter()
        .filter(|record| !before.contains(record))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, version: &str) -> PackageRecord {
        PackageRecord {
            codename: "stable".into(),
            component: "main".into(),
            arch: "amd64".into(),
            name: name.into(),
            version: version.into(),
        }
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_list("").unwrap().is_empty());
        assert!(parse_list("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_well_formed_line() {
        let records = parse_list("stable|main|amd64: hello 2.10-2\n").unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.codename, "stable");
        assert_eq!(r.component, "main");
        assert_eq!(r.arch, "amd64");
        assert_eq!(r.name, "hello");
        assert_eq!(r.version, "2.10-2");
    }

    #[test]
    fn test_parse_preserves_order() {
        let output = "focal|main|amd64: zsh 5.8-3\nfocal|contrib|i386: acl 2.2.53-6\n";
        let names: Vec<_> = parse_list(output)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["zsh", "acl"]);
    }

    #[test]
    fn test_parse_epoch_version() {
        let r = PackageRecord::parse_line("stable|main|all: tzdata 1:2024a-1").unwrap();
        assert_eq!(r.version, "1:2024a-1");
        assert_eq!(r.arch, "all");
    }

    #[test]
    fn test_parse_malformed_line() {
        let err = parse_list("stable|main|amd64: hello 1.0\ngarbage\n").unwrap_err();
        assert!(err.to_string().contains("garbage"));
        assert!(PackageRecord::parse_line("stable|main: hello 1.0").is_err());
        assert!(PackageRecord::parse_line("stable|main|amd64: hello").is_err());
    }

    #[test]
    fn test_display_joins_fields() {
        assert_eq!(record("hello", "1.0").to_string(), "stable main amd64 hello 1.0");
    }

    #[test]
    fn test_diff_added_and_removed() {
        let before = vec![record("a", "1"), record("b", "1")];
        let after = vec![record("a", "1"), record("b", "2"), record("c", "1")];

        assert_eq!(diff(&before, &after), vec![record("b", "2"), record("c", "1")]);
        assert_eq!(diff(&after, &before), vec![record("b", "1")]);
        assert!(diff(&after, &after).is_empty());
    }
}
