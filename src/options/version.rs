//! Binary versions and the version gate

use super::schema::OperationSchema;
use super::validate::{ValidatedOptions, Violation, ViolationKind, Violations};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{1,2})").expect("version regex"));

/// A `major.minor.patch` poppler version.
///
/// Ordering is component-wise numeric, so `9.0.0 < 21.3.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Find the first version triple in a binary's `-v` output.
    ///
    /// Poppler prints e.g. `pdftoppm version 22.02.0` followed by copyright
    /// lines, so the first match is the binary's own version.
    pub fn extract(text: &str) -> Option<Self> {
        InstalledVersion::extract(text).map(|installed| installed.version)
    }
}

impl fmt::Display for Version {
    /// Poppler switched to calendar versions (`YY.MM.patch`) at 20.x; those
    /// print with a zero-padded month like the upstream tags do.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.major >= 20 {
            write!(f, "{}.{:02}.{}", self.major, self.minor, self.patch)
        } else {
            write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
        }
    }
}

/// A version as probed from a binary, keeping the text it reported
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstalledVersion {
    pub version: Version,
    /// The matched `major.minor.patch` substring, verbatim
    pub reported: String,
}

impl InstalledVersion {
    pub fn extract(text: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(text)?;
        let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u32>().ok());
        Some(Self {
            version: Version::new(part(1)?, part(2)?, part(3)?),
            reported: caps.get(0)?.as_str().to_string(),
        })
    }
}

impl From<Version> for InstalledVersion {
    fn from(version: Version) -> Self {
        Self {
            version,
            reported: version.to_string(),
        }
    }
}

impl fmt::Display for InstalledVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.reported)
    }
}

/// True if any supplied option carries a minimum version, i.e. the caller
/// needs the installed version before the gate can run.
pub fn needs_version(schema: &OperationSchema, options: &ValidatedOptions<'_>) -> bool {
    options
        .keys()
        .any(|name| schema.option(name).is_some_and(|spec| spec.since.is_some()))
}

/// Reject supplied options introduced after `installed`.
///
/// Options without a minimum version are never checked. Violations are
/// reported in the order the options were supplied.
pub fn check_version(
    schema: &OperationSchema,
    options: &ValidatedOptions<'_>,
    installed: &InstalledVersion,
) -> std::result::Result<(), Violations> {
    let mut violations = Vec::new();

    for name in options.keys() {
        let Some(since) = schema.option(name).and_then(|spec| spec.since) else {
            continue;
        };
        if installed.version < since {
            violations.push(Violation::new(
                name,
                ViolationKind::UnsupportedVersion {
                    introduced: since,
                    installed: installed.clone(),
                },
            ));
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(Violations::from(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{validate, Operation};
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("pdftoppm version 22.02.0\nCopyright 2005-2022 The Poppler Developers", Version::new(22, 2, 0))]
    #[case("pdfinfo version 0.86.1\nCopyright 2005-2020", Version::new(0, 86, 1))]
    #[case("pdftocairo version 21.11.0", Version::new(21, 11, 0))]
    fn test_extract_version(#[case] text: &str, #[case] expected: Version) {
        assert_eq!(Version::extract(text), Some(expected));
    }

    #[test]
    fn test_extract_version_missing() {
        assert_eq!(Version::extract("pdftoppm version unknown"), None);
        assert_eq!(Version::extract(""), None);
    }

    #[test]
    fn test_installed_version_keeps_reported_text() {
        let installed = InstalledVersion::extract("pdftoppm version 0.9.01\n").unwrap();
        assert_eq!(installed.version, Version::new(0, 9, 1));
        assert_eq!(installed.to_string(), "0.9.01");
        assert_eq!(InstalledVersion::extract("pdftoppm version unknown"), None);
    }

    #[test]
    fn test_gate_message_uses_reported_version() {
        let schema = Operation::PdfToText.schema();
        let map = json!({ "cropBox": true }).as_object().cloned().unwrap();
        let validated = validate(schema, &map).unwrap();
        let installed = InstalledVersion::extract("pdftotext version 20.9.0").unwrap();

        let err = check_version(schema, &validated, &installed).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid option provided for the current version of the binary used. 'cropBox' was introduced in v21.03.0, but received v20.9.0"
        );
    }

    #[test]
    fn test_numeric_not_lexical_ordering() {
        assert!(Version::new(9, 0, 0) < Version::new(21, 3, 0));
        assert!(Version::new(0, 86, 1) < Version::new(21, 1, 0));
        assert!(Version::new(21, 3, 0) < Version::new(21, 3, 1));
        assert!(Version::new(21, 11, 0) > Version::new(21, 3, 0));
    }

    #[test]
    fn test_display_matches_upstream_tags() {
        assert_eq!(Version::new(21, 3, 0).to_string(), "21.03.0");
        assert_eq!(Version::new(22, 12, 0).to_string(), "22.12.0");
        assert_eq!(Version::new(0, 75, 0).to_string(), "0.75.0");
        assert_eq!(Version::new(9, 0, 0).to_string(), "9.0.0");
    }

    #[test]
    fn test_gate_rejects_newer_option() {
        let schema = Operation::PdfToPpm.schema();
        let map = json!({ "printProgress": true }).as_object().cloned().unwrap();
        let validated = validate(schema, &map).unwrap();

        assert!(needs_version(schema, &validated));
        let err = check_version(schema, &validated, &Version::new(20, 9, 0).into()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid option provided for the current version of the binary used. 'printProgress' was introduced in v21.03.0, but received v20.09.0"
        );
    }

    #[rstest]
    #[case(Version::new(21, 3, 0))]
    #[case(Version::new(21, 3, 1))]
    #[case(Version::new(24, 2, 0))]
    fn test_gate_accepts_equal_or_newer(#[case] installed: Version) {
        let schema = Operation::PdfToPpm.schema();
        let map = json!({ "printProgress": true }).as_object().cloned().unwrap();
        let validated = validate(schema, &map).unwrap();
        assert!(check_version(schema, &validated, &installed.into()).is_ok());
    }

    #[test]
    fn test_ungated_options_skip_probe() {
        let schema = Operation::PdfToPpm.schema();
        let map = json!({ "firstPageToConvert": 1, "pngFile": true })
            .as_object()
            .cloned()
            .unwrap();
        let validated = validate(schema, &map).unwrap();

        assert!(!needs_version(schema, &validated));
        assert!(check_version(schema, &validated, &Version::new(0, 1, 0).into()).is_ok());
    }

    #[test]
    fn test_gate_collects_every_violation() {
        let schema = Operation::PdfToPpm.schema();
        let map = json!({ "separator": "_", "printProgress": true, "hideAnnotations": true })
            .as_object()
            .cloned()
            .unwrap();
        let validated = validate(schema, &map).unwrap();

        let err = check_version(schema, &validated, &Version::new(0, 74, 0).into()).unwrap_err();
        let names: Vec<&str> = err.iter().map(|v| v.option.as_str()).collect();
        assert_eq!(names, vec!["separator", "printProgress", "hideAnnotations"]);
    }
}
