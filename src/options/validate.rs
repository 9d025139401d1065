//! Option validation
//!
//! Checks a caller's option map against an operation schema and collects
//! every violation in one pass instead of stopping at the first.

use super::schema::{OperationSchema, OptionType};
use super::version::{InstalledVersion, Version};
use serde_json::Value;
use std::fmt;

/// Caller-supplied options, keyed by option name, in supply order
pub type OptionMap = serde_json::Map<String, Value>;

/// What went wrong with one option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    UnknownOption,
    TypeMismatch {
        expected: OptionType,
        actual: &'static str,
    },
    UnsupportedVersion {
        introduced: Version,
        installed: InstalledVersion,
    },
    /// The operation needs an output positional and none was given. The
    /// violation's `option` holds the binary name.
    MissingOutput,
}

/// A single usage problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub option: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub fn new(option: impl Into<String>, kind: ViolationKind) -> Self {
        Self {
            option: option.into(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ViolationKind::UnknownOption => {
                write!(f, "Invalid option provided '{}'", self.option)
            }
            ViolationKind::TypeMismatch { expected, actual } => write!(
                f,
                "Invalid value type provided for option '{}', expected {} but received {}",
                self.option, expected, actual
            ),
            ViolationKind::UnsupportedVersion {
                introduced,
                installed,
            } => write!(
                f,
                "Invalid option provided for the current version of the binary used. '{}' was introduced in v{}, but received v{}",
                self.option, introduced, installed
            ),
            ViolationKind::MissingOutput => {
                write!(f, "Missing required output argument for {}", self.option)
            }
        }
    }
}

/// Aggregated violations, displayed joined with `"; "`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Violations(Vec<Violation>);

impl Violations {
    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn extend(&mut self, other: Violations) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.0.iter()
    }
}

impl From<Vec<Violation>> for Violations {
    fn from(violations: Vec<Violation>) -> Self {
        Self(violations)
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

/// An option map that passed [`validate`] for a particular schema.
///
/// Holds the caller's map unchanged; `null` values count as absent.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedOptions<'a> {
    map: &'a OptionMap,
}

impl<'a> ValidatedOptions<'a> {
    /// Option names that are present (non-null), in supply order
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + 'a {
        self.map
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, _)| name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.map.get(name).filter(|value| !value.is_null())
    }

    /// True if a boolean option is present and `true`
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn as_map(&self) -> &'a OptionMap {
        self.map
    }
}

/// JSON type name of a value as reported in mismatch messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
        Value::Null => "null",
    }
}

fn matches_type(value: &Value, expected: OptionType) -> bool {
    match expected {
        OptionType::Boolean => value.is_boolean(),
        OptionType::Number => value.is_number(),
        OptionType::String => value.is_string(),
    }
}

/// Collect every violation in `options` without failing early
pub fn collect_violations(schema: &OperationSchema, options: &OptionMap) -> Violations {
    let mut violations = Violations::default();

    for (name, value) in options {
        if value.is_null() {
            continue;
        }
        match schema.option(name) {
            None => violations.push(Violation::new(name, ViolationKind::UnknownOption)),
            Some(spec) if !matches_type(value, spec.kind) => violations.push(Violation::new(
                name,
                ViolationKind::TypeMismatch {
                    expected: spec.kind,
                    actual: type_name(value),
                },
            )),
            Some(_) => {}
        }
    }

    violations
}

/// Validate `options` against `schema`.
///
/// Returns the map unchanged on success. No values are coerced or defaulted.
pub fn validate<'a>(
    schema: &OperationSchema,
    options: &'a OptionMap,
) -> std::result::Result<ValidatedOptions<'a>, Violations> {
    let violations = collect_violations(schema, options);
    if violations.is_empty() {
        Ok(ValidatedOptions { map: options })
    } else {
        Err(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Operation;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn options(value: Value) -> OptionMap {
        value.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn test_unknown_option_names_the_option() {
        let map = options(json!({ "wordFile": "test" }));
        for op in Operation::ALL {
            let err = validate(op.schema(), &map).unwrap_err();
            assert_eq!(err.to_string(), "Invalid option provided 'wordFile'");
        }
    }

    #[test]
    fn test_type_mismatch_message() {
        let map = options(json!({ "pdfFile": "not-a-boolean" }));
        let err = validate(Operation::PdfToCairo.schema(), &map).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value type provided for option 'pdfFile', expected boolean but received string"
        );
    }

    #[rstest]
    #[case(Operation::PdfFonts, json!({ "firstPageToExamine": "test" }), "Invalid value type provided for option 'firstPageToExamine', expected number but received string")]
    #[case(Operation::PdfAttach, json!({ "replace": "test" }), "Invalid value type provided for option 'replace', expected boolean but received string")]
    #[case(Operation::PdfDetach, json!({ "outputPath": 3 }), "Invalid value type provided for option 'outputPath', expected string but received number")]
    #[case(Operation::PdfInfo, json!({ "printAsJson": [true] }), "Invalid value type provided for option 'printAsJson', expected boolean but received array")]
    fn test_type_mismatch_cases(
        #[case] op: Operation,
        #[case] map: Value,
        #[case] expected: &str,
    ) {
        let err = validate(op.schema(), &options(map)).unwrap_err();
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn test_violations_accumulate_in_supply_order() {
        let map = options(json!({
            "firstPageToConvert": "test",
            "lastPageToConvert": "test",
        }));
        let err = validate(Operation::PdfToHtml.schema(), &map).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value type provided for option 'firstPageToConvert', expected number but received string; Invalid value type provided for option 'lastPageToConvert', expected number but received string"
        );
    }

    #[test]
    fn test_unknown_and_mismatch_together() {
        let map = options(json!({
            "wordFile": "test",
            "pngFile": "yes",
        }));
        let err = validate(Operation::PdfToPpm.schema(), &map).unwrap_err();
        assert_eq!(err.len(), 2);
        assert_eq!(
            err.to_string(),
            "Invalid option provided 'wordFile'; Invalid value type provided for option 'pngFile', expected boolean but received string"
        );

        // Reversed supply order reverses the message order
        let map = options(json!({
            "pngFile": "yes",
            "wordFile": "test",
        }));
        let err = validate(Operation::PdfToPpm.schema(), &map).unwrap_err();
        assert!(err.to_string().starts_with("Invalid value type provided for option 'pngFile'"));
    }

    #[test]
    fn test_valid_map_is_returned_unchanged() {
        let map = options(json!({ "lastPageToConvert": 3, "firstPageToConvert": 1.5, "pngFile": false }));
        let validated = validate(Operation::PdfToPpm.schema(), &map).unwrap();
        assert_eq!(validated.as_map(), &map);
        let keys: Vec<&str> = validated.keys().collect();
        assert_eq!(keys, vec!["lastPageToConvert", "firstPageToConvert", "pngFile"]);
        assert!(!validated.flag("pngFile"));
    }

    #[test]
    fn test_null_is_absent() {
        let map = options(json!({ "wordFile": null, "pngFile": null }));
        let validated = validate(Operation::PdfToPpm.schema(), &map).unwrap();
        assert_eq!(validated.keys().count(), 0);
        assert!(validated.get("pngFile").is_none());
    }

    #[test]
    fn test_empty_map_is_valid() {
        let map = OptionMap::new();
        for op in Operation::ALL {
            assert!(validate(op.schema(), &map).is_ok());
        }
    }

    #[test]
    fn test_missing_output_message() {
        let violation = Violation::new("pdfunite", ViolationKind::MissingOutput);
        assert_eq!(
            violation.to_string(),
            "Missing required output argument for pdfunite"
        );
    }
}
