//! Argument building
//!
//! Turns validated options plus positionals into the argv a poppler binary
//! expects: flags in schema order, then inputs, then the output.

use super::schema::{FlagTemplate, OperationSchema, OutputRule, StdoutEncoding, SuccessReport};
use super::validate::{ValidatedOptions, Violation, ViolationKind};
use serde_json::Value;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// A PDF handed to an operation, either on disk or in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PdfInput {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<&str> for PdfInput {
    fn from(path: &str) -> Self {
        PdfInput::Path(PathBuf::from(path))
    }
}

impl From<String> for PdfInput {
    fn from(path: String) -> Self {
        PdfInput::Path(PathBuf::from(path))
    }
}

impl From<&Path> for PdfInput {
    fn from(path: &Path) -> Self {
        PdfInput::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for PdfInput {
    fn from(path: PathBuf) -> Self {
        PdfInput::Path(path)
    }
}

impl From<Vec<u8>> for PdfInput {
    fn from(data: Vec<u8>) -> Self {
        PdfInput::Bytes(data)
    }
}

impl From<&[u8]> for PdfInput {
    fn from(data: &[u8]) -> Self {
        PdfInput::Bytes(data.to_vec())
    }
}

/// A positional argument before the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Positional {
    /// A PDF that may need staging
    Input(PdfInput),
    /// A plain file path passed through as-is (e.g. the file to attach)
    File(PathBuf),
}

/// One argv element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Text(String),
    Path(PathBuf),
    /// Replaced by the path of staged payload `n` at invocation time
    Staged(usize),
}

impl Arg {
    /// The argv element, or `None` for a staged slot with no staged path
    pub fn to_os_string(&self, staged: &[PathBuf]) -> Option<OsString> {
        match self {
            Arg::Text(text) => Some(OsString::from(text)),
            Arg::Path(path) => Some(path.clone().into_os_string()),
            Arg::Staged(index) => staged.get(*index).map(|path| path.clone().into_os_string()),
        }
    }
}

/// Where the binary's result goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// An output file, prefix or pattern given by the caller
    File(String),
    /// Nothing was given; stdout is the result
    Stdout,
}

/// Everything needed to run one binary once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationSpec {
    pub binary: PathBuf,
    pub args: Vec<Arg>,
    /// In-memory inputs, referenced by [`Arg::Staged`]
    pub payloads: Vec<Vec<u8>>,
    pub destination: Destination,
    pub report: SuccessReport,
    pub stdout: StdoutEncoding,
}

impl InvocationSpec {
    /// Argv as displayed in logs, with staged inputs shown as `<buffer:n>`
    pub fn display_args(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| match arg {
                Arg::Text(text) => text.clone(),
                Arg::Path(path) => path.display().to_string(),
                Arg::Staged(index) => format!("<buffer:{}>", index),
            })
            .collect()
    }
}

/// Usage violation for an omitted output the operation cannot do without
pub fn check_output(schema: &OperationSchema, output: Option<&str>) -> Option<Violation> {
    match (schema.output, output) {
        (OutputRule::Required, None) => {
            Some(Violation::new(schema.binary, ViolationKind::MissingOutput))
        }
        _ => None,
    }
}

/// Stringify an option value the way it appears on the command line.
///
/// Integral numbers print without a fraction (`1`, not `1.0`).
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => {
            if let Some(i) = number.as_i64() {
                i.to_string()
            } else if let Some(u) = number.as_u64() {
                u.to_string()
            } else {
                number.as_f64().map(|f| f.to_string()).unwrap_or_default()
            }
        }
        Value::Bool(flag) => flag.to_string(),
        other => other.to_string(),
    }
}

/// Append the flags for `options`, in schema order
pub fn push_flags(schema: &OperationSchema, options: &ValidatedOptions<'_>, args: &mut Vec<Arg>) {
    for spec in schema.options {
        let Some(value) = options.get(spec.name) else {
            continue;
        };
        match spec.flag {
            FlagTemplate::Switch(flag) => {
                if value.as_bool() == Some(true) {
                    args.push(Arg::Text(flag.to_string()));
                }
            }
            FlagTemplate::Valued(flag) => {
                args.push(Arg::Text(flag.to_string()));
                args.push(Arg::Text(stringify(value)));
            }
            FlagTemplate::Local => {}
        }
    }
}

/// Build the invocation for one call.
///
/// Expects [`check_output`] to have passed; a missing required output just
/// leaves the output positional out.
pub fn build(
    schema: &OperationSchema,
    binary: PathBuf,
    positionals: Vec<Positional>,
    output: Option<&str>,
    options: &ValidatedOptions<'_>,
) -> InvocationSpec {
    let mut args = Vec::new();
    let mut payloads = Vec::new();

    push_flags(schema, options, &mut args);

    for positional in positionals {
        match positional {
            Positional::Input(PdfInput::Path(path)) | Positional::File(path) => {
                args.push(Arg::Path(path))
            }
            Positional::Input(PdfInput::Bytes(data)) => {
                args.push(Arg::Staged(payloads.len()));
                payloads.push(data);
            }
        }
    }

    let destination = match output {
        Some(output) if schema.output != OutputRule::None => {
            args.push(Arg::Text(output.to_string()));
            Destination::File(output.to_string())
        }
        _ => {
            if schema.output == OutputRule::StdoutDash {
                args.push(Arg::Text("-".to_string()));
            }
            Destination::Stdout
        }
    };

    InvocationSpec {
        binary,
        args,
        payloads,
        destination,
        report: schema.report,
        stdout: schema.stdout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{validate, OptionMap, Operation};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn options(value: Value) -> OptionMap {
        value.as_object().cloned().unwrap_or_default()
    }

    fn text_args(spec: &InvocationSpec) -> Vec<String> {
        spec.display_args()
    }

    fn build_for(
        op: Operation,
        positionals: Vec<Positional>,
        output: Option<&str>,
        map: &OptionMap,
    ) -> InvocationSpec {
        let schema = op.schema();
        let validated = validate(schema, map).unwrap();
        build(schema, PathBuf::from(schema.binary), positionals, output, &validated)
    }

    fn input(path: &str) -> Vec<Positional> {
        vec![Positional::Input(PdfInput::from(path))]
    }

    #[test]
    fn test_flags_follow_schema_order() {
        let map = options(json!({
            "lastPageToConvert": 3,
            "pngFile": true,
            "firstPageToConvert": 1,
        }));
        let spec = build_for(Operation::PdfToPpm, input("in.pdf"), Some("out"), &map);
        assert_eq!(
            text_args(&spec),
            vec!["-f", "1", "-l", "3", "-png", "in.pdf", "out"]
        );
        assert_eq!(spec.destination, Destination::File("out".to_string()));
    }

    #[test]
    fn test_false_booleans_emit_nothing() {
        let map = options(json!({ "pdfFile": false, "quiet": false }));
        let spec = build_for(Operation::PdfToCairo, input("in.pdf"), Some("out.pdf"), &map);
        assert_eq!(text_args(&spec), vec!["in.pdf", "out.pdf"]);
    }

    #[test]
    fn test_true_booleans_emit_once() {
        let map = options(json!({ "pdfFile": true }));
        let spec = build_for(Operation::PdfToCairo, input("in.pdf"), Some("out.pdf"), &map);
        let args = text_args(&spec);
        assert_eq!(args.iter().filter(|a| *a == "-pdf").count(), 1);
    }

    #[test]
    fn test_stdout_dash_when_output_omitted() {
        let map = options(json!({ "svgFile": true }));
        let spec = build_for(Operation::PdfToCairo, input("in.pdf"), None, &map);
        assert_eq!(text_args(&spec), vec!["-svg", "in.pdf", "-"]);
        assert_eq!(spec.destination, Destination::Stdout);
        assert_eq!(spec.stdout, StdoutEncoding::Binary);
    }

    #[test]
    fn test_optional_output_appends_nothing() {
        let map = options(json!({ "list": true }));
        let spec = build_for(Operation::PdfImages, input("in.pdf"), None, &map);
        assert_eq!(text_args(&spec), vec!["-list", "in.pdf"]);
    }

    #[test]
    fn test_no_output_positional_ignores_output() {
        let spec = build_for(Operation::PdfInfo, input("in.pdf"), Some("ignored"), &OptionMap::new());
        assert_eq!(text_args(&spec), vec!["in.pdf"]);
        assert_eq!(spec.destination, Destination::Stdout);
    }

    #[test]
    fn test_local_options_never_reach_argv() {
        let map = options(json!({ "printAsJson": true, "printIsoDates": true }));
        let spec = build_for(Operation::PdfInfo, input("in.pdf"), None, &map);
        assert_eq!(text_args(&spec), vec!["-isodates", "in.pdf"]);
    }

    #[test]
    fn test_valued_options() {
        let map = options(json!({ "ownerPassword": "secret", "saveSpecificFile": 2 }));
        let spec = build_for(Operation::PdfDetach, input("in.pdf"), None, &map);
        assert_eq!(text_args(&spec), vec!["-opw", "secret", "-save", "2", "in.pdf"]);
    }

    #[test]
    fn test_bytes_input_is_staged() {
        let positionals = vec![Positional::Input(PdfInput::Bytes(b"%PDF-1.4".to_vec()))];
        let spec = build_for(Operation::PdfFonts, positionals, None, &OptionMap::new());
        assert_eq!(spec.args, vec![Arg::Staged(0)]);
        assert_eq!(spec.payloads, vec![b"%PDF-1.4".to_vec()]);
    }

    #[test]
    fn test_attach_positionals() {
        let positionals = vec![
            Positional::Input(PdfInput::from("in.pdf")),
            Positional::File(PathBuf::from("notes.txt")),
        ];
        let map = options(json!({ "replace": true }));
        let spec = build_for(Operation::PdfAttach, positionals, Some("out.pdf"), &map);
        assert_eq!(
            text_args(&spec),
            vec!["-replace", "in.pdf", "notes.txt", "out.pdf"]
        );
    }

    #[test]
    fn test_unite_mixed_inputs() {
        let positionals = vec![
            Positional::Input(PdfInput::from("a.pdf")),
            Positional::Input(PdfInput::Bytes(b"b".to_vec())),
            Positional::Input(PdfInput::Bytes(b"c".to_vec())),
        ];
        let spec = build_for(Operation::PdfUnite, positionals, Some("out.pdf"), &OptionMap::new());
        assert_eq!(
            spec.args,
            vec![
                Arg::Path(PathBuf::from("a.pdf")),
                Arg::Staged(0),
                Arg::Staged(1),
                Arg::Text("out.pdf".to_string()),
            ]
        );
        assert_eq!(spec.payloads.len(), 2);
    }

    #[test]
    fn test_build_is_deterministic() {
        let map = options(json!({ "singleFile": true, "resolutionXYAxis": 150, "jpegFile": true }));
        let first = build_for(Operation::PdfToCairo, input("in.pdf"), None, &map);
        let second = build_for(Operation::PdfToCairo, input("in.pdf"), None, &map);
        assert_eq!(first, second);
    }

    #[test]
    fn test_check_output() {
        let unite = Operation::PdfUnite.schema();
        let violation = check_output(unite, None).unwrap();
        assert_eq!(violation.to_string(), "Missing required output argument for pdfunite");
        assert!(check_output(unite, Some("out.pdf")).is_none());
        assert!(check_output(Operation::PdfToText.schema(), None).is_none());
    }

    #[test]
    fn test_stringify_numbers() {
        assert_eq!(stringify(&json!(1)), "1");
        assert_eq!(stringify(&json!(1.0)), "1");
        assert_eq!(stringify(&json!(1.5)), "1.5");
        assert_eq!(stringify(&json!(-2)), "-2");
        assert_eq!(stringify(&json!("jpeg")), "jpeg");
    }

    #[test]
    fn test_staged_arg_substitution() {
        let staged = vec![PathBuf::from("/tmp/staged.pdf")];
        assert_eq!(
            Arg::Staged(0).to_os_string(&staged),
            Some(OsString::from("/tmp/staged.pdf"))
        );
    }

    #[test]
    fn test_unstaged_slot_has_no_argv_element() {
        let staged = vec![PathBuf::from("/tmp/staged.pdf")];
        assert_eq!(Arg::Staged(1).to_os_string(&staged), None);
        assert_eq!(Arg::Staged(0).to_os_string(&[]), None);
        assert_eq!(
            Arg::Text("-png".to_string()).to_os_string(&[]),
            Some(OsString::from("-png"))
        );
    }
}
