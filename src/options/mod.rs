//! Option handling for poppler operations
//!
//! Schemas describe what each binary accepts, the validator and version gate
//! check a caller's option map against them, and the argument builder turns
//! the checked map into argv.

mod args;
mod schema;
mod validate;
mod version;

pub use args::{
    build, check_output, push_flags, stringify, Arg, Destination, InvocationSpec, PdfInput,
    Positional,
};
pub use schema::{
    FlagTemplate, Operation, OperationSchema, OptionSpec, OptionType, OutputRule, PathRole,
    StdoutEncoding, SuccessReport, PRINT_AS_JSON,
};
pub use validate::{
    collect_violations, type_name, validate, OptionMap, ValidatedOptions, Violation,
    ViolationKind, Violations,
};
pub use version::{check_version, needs_version, InstalledVersion, Version};
