//! Poppler operations
//!
//! [`Poppler`] owns an installation directory and runs one binary per call.
//! Every operation goes through the same pipeline: validate the options and
//! output against the operation's schema, gate version-dependent options on
//! the installed binary, build argv, invoke.

mod info;
mod invoke;

pub use info::parse_info;
pub use invoke::{binary_bytes, invoke, probe_version, NO_ERROR};

use crate::error::{Error, Result};
use crate::options::{
    build, check_output, check_version, needs_version, validate, InstalledVersion,
    InvocationSpec, Operation, OperationSchema, OptionMap, PdfInput, Positional,
    ValidatedOptions, PRINT_AS_JSON,
};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Handle to a poppler-utils installation.
///
/// Cheap to share behind an `Arc`; concurrent calls are independent apart
/// from the cache of probed binary versions.
#[derive(Debug)]
pub struct Poppler {
    bin_dir: PathBuf,
    /// Parent for staged byte inputs; the system temp directory when unset
    staging_dir: Option<PathBuf>,
    versions: Mutex<HashMap<PathBuf, InstalledVersion>>,
}

/// Bundled binaries only exist for Windows builds, next to the executable
fn default_bin_dir() -> Result<PathBuf> {
    if cfg!(windows) {
        let exe = std::env::current_exe()?;
        if let Some(dir) = exe.parent() {
            return Ok(dir.join("poppler").join("Library").join("bin"));
        }
    }
    Err(Error::UnsupportedPlatform {
        platform: std::env::consts::OS.to_string(),
    })
}

impl Poppler {
    /// Use the binaries in `bin_dir`, or the platform default when `None`
    pub fn new(bin_dir: Option<PathBuf>) -> Result<Self> {
        let bin_dir = match bin_dir {
            Some(dir) => dir,
            None => default_bin_dir()?,
        };
        Ok(Self {
            bin_dir,
            staging_dir: None,
            versions: Mutex::new(HashMap::new()),
        })
    }

    /// Stage in-memory inputs under `dir` instead of the system temp directory
    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn bin_dir(&self) -> &Path {
        &self.bin_dir
    }

    /// Full path of the binary behind `operation`
    pub fn binary_path(&self, operation: Operation) -> PathBuf {
        let schema = operation.schema();
        self.bin_dir
            .join(format!("{}{}", schema.binary, std::env::consts::EXE_SUFFIX))
    }

    /// Installed version of the binary behind `operation`, probed once per
    /// binary and cached for the lifetime of this handle
    pub async fn installed_version(&self, operation: Operation) -> Result<InstalledVersion> {
        let binary = self.binary_path(operation);
        let cached = self.versions.lock().get(&binary).cloned();
        if let Some(installed) = cached {
            return Ok(installed);
        }

        // Racing probes of the same binary agree, so the lock is not held
        // across the await.
        let installed = probe_version(&binary).await?;
        self.versions.lock().insert(binary, installed.clone());
        Ok(installed)
    }

    /// Version already probed for `operation`'s binary, if any
    pub fn cached_version(&self, operation: Operation) -> Option<InstalledVersion> {
        self.versions
            .lock()
            .get(&self.binary_path(operation))
            .cloned()
    }

    /// Build the invocation for a call without running it.
    ///
    /// Applies the usage checks (unknown options, types, required output)
    /// but not the version gate, which needs the binary.
    pub fn invocation(
        &self,
        operation: Operation,
        positionals: Vec<Positional>,
        output: Option<&str>,
        options: &OptionMap,
    ) -> Result<InvocationSpec> {
        let schema = operation.schema();
        let validated = check_usage(schema, output, options)?;
        Ok(build(
            schema,
            self.binary_path(operation),
            positionals,
            output,
            &validated,
        ))
    }

    async fn run(
        &self,
        operation: Operation,
        positionals: Vec<Positional>,
        output: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        let schema = operation.schema();
        let validated = check_usage(schema, output, options)?;

        if needs_version(schema, &validated) {
            let installed = self.installed_version(operation).await?;
            check_version(schema, &validated, &installed).map_err(Error::Usage)?;
        }

        let spec = build(
            schema,
            self.binary_path(operation),
            positionals,
            output,
            &validated,
        );
        let result = invoke(spec, self.staging_dir.as_deref()).await?;

        if operation == Operation::PdfInfo && validated.flag(PRINT_AS_JSON) {
            return Ok(serde_json::to_string(&parse_info(&result))?);
        }
        Ok(result)
    }

    /// Embed `attachment` in `file`, writing the result to `output`
    pub async fn pdf_attach(
        &self,
        file: impl Into<PdfInput>,
        attachment: impl AsRef<Path>,
        output: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        let positionals = vec![
            Positional::Input(file.into()),
            Positional::File(attachment.as_ref().to_path_buf()),
        ];
        self.run(Operation::PdfAttach, positionals, output, options)
            .await
    }

    /// List or extract embedded files
    pub async fn pdf_detach(
        &self,
        file: impl Into<PdfInput>,
        options: &OptionMap,
    ) -> Result<String> {
        self.run(
            Operation::PdfDetach,
            vec![Positional::Input(file.into())],
            None,
            options,
        )
        .await
    }

    /// List the fonts used by a PDF
    pub async fn pdf_fonts(&self, file: impl Into<PdfInput>, options: &OptionMap) -> Result<String> {
        self.run(
            Operation::PdfFonts,
            vec![Positional::Input(file.into())],
            None,
            options,
        )
        .await
    }

    /// List images, or save them under `output_prefix`. Images saved from
    /// a byte input without a prefix are discarded with the staged input.
    pub async fn pdf_images(
        &self,
        file: impl Into<PdfInput>,
        output_prefix: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        self.run(
            Operation::PdfImages,
            vec![Positional::Input(file.into())],
            output_prefix,
            options,
        )
        .await
    }

    /// Document information. With `printAsJson` the result is a JSON object
    /// string with camelCased keys.
    pub async fn pdf_info(&self, file: impl Into<PdfInput>, options: &OptionMap) -> Result<String> {
        self.run(
            Operation::PdfInfo,
            vec![Positional::Input(file.into())],
            None,
            options,
        )
        .await
    }

    /// Split pages into files named by `output_pattern` (e.g. `page-%d.pdf`)
    pub async fn pdf_separate(
        &self,
        file: impl Into<PdfInput>,
        output_pattern: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        self.run(
            Operation::PdfSeparate,
            vec![Positional::Input(file.into())],
            output_pattern,
            options,
        )
        .await
    }

    /// Convert with pdftocairo; without `output` the converted bytes are
    /// returned, one char per byte
    pub async fn pdf_to_cairo(
        &self,
        file: impl Into<PdfInput>,
        output: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        self.run(
            Operation::PdfToCairo,
            vec![Positional::Input(file.into())],
            output,
            options,
        )
        .await
    }

    /// Convert to HTML. Resolves to pdftohtml's progress output.
    ///
    /// Without `output` the HTML lands next to the input; for a byte input
    /// that is the staging directory, which is removed after the call.
    pub async fn pdf_to_html(
        &self,
        file: impl Into<PdfInput>,
        output: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        self.run(
            Operation::PdfToHtml,
            vec![Positional::Input(file.into())],
            output,
            options,
        )
        .await
    }

    /// Rasterize pages to files starting with `output_prefix`; without a
    /// prefix the image bytes are returned, one char per byte
    pub async fn pdf_to_ppm(
        &self,
        file: impl Into<PdfInput>,
        output_prefix: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        self.run(
            Operation::PdfToPpm,
            vec![Positional::Input(file.into())],
            output_prefix,
            options,
        )
        .await
    }

    pub async fn pdf_to_ps(
        &self,
        file: impl Into<PdfInput>,
        output: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        self.run(
            Operation::PdfToPs,
            vec![Positional::Input(file.into())],
            output,
            options,
        )
        .await
    }

    pub async fn pdf_to_text(
        &self,
        file: impl Into<PdfInput>,
        output: Option<&str>,
        options: &OptionMap,
    ) -> Result<String> {
        self.run(
            Operation::PdfToText,
            vec![Positional::Input(file.into())],
            output,
            options,
        )
        .await
    }

    /// Merge `files`, in order, into `output`
    pub async fn pdf_unite<I>(
        &self,
        files: I,
        output: Option<&str>,
        options: &OptionMap,
    ) -> Result<String>
    where
        I: IntoIterator,
        I::Item: Into<PdfInput>,
    {
        let positionals = files
            .into_iter()
            .map(|file| Positional::Input(file.into()))
            .collect();
        self.run(Operation::PdfUnite, positionals, output, options)
            .await
    }
}

/// Validate options and the output positional together, so a missing output
/// is reported alongside any option problems
fn check_usage<'a>(
    schema: &OperationSchema,
    output: Option<&str>,
    options: &'a OptionMap,
) -> Result<ValidatedOptions<'a>> {
    let missing = check_output(schema, output);
    match validate(schema, options) {
        Ok(validated) => match missing {
            Some(violation) => Err(Error::Usage(vec![violation].into())),
            None => Ok(validated),
        },
        Err(mut violations) => {
            if let Some(violation) = missing {
                violations.push(violation);
            }
            Err(Error::Usage(violations))
        }
    }
}
