//! MCP Server implementation using rmcp

use crate::options::{Operation, OptionMap, PathRole, PdfInput, StdoutEncoding};
use crate::poppler::{binary_bytes, Poppler, NO_ERROR};
use anyhow::Result;
use base64::Engine;
use rmcp::{
    handler::server::tool::ToolRouter, handler::server::wrapper::Parameters, model::*,
    schemars::JsonSchema, tool, tool_handler, tool_router, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// PDF source specification
#[derive(Debug, Clone, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum PdfSource {
    /// File path (absolute or relative)
    Path {
        /// Path to the PDF file
        path: String,
    },
    /// Base64 encoded PDF data
    Base64 {
        /// Base64 encoded PDF content
        base64: String,
    },
}

impl<'de> serde::Deserialize<'de> for PdfSource {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        let Some(obj) = value.as_object() else {
            return Err(serde::de::Error::custom(format!(
                "Invalid source: expected an object with one of \"path\" or \"base64\", but got {}",
                crate::options::type_name(&value)
            )));
        };

        if let Some(v) = obj.get("path") {
            return match v.as_str() {
                Some(s) => Ok(PdfSource::Path {
                    path: s.to_string(),
                }),
                None => Err(serde::de::Error::custom("\"path\" must be a string")),
            };
        }
        if let Some(v) = obj.get("base64") {
            return match v.as_str() {
                Some(s) => Ok(PdfSource::Base64 {
                    base64: s.to_string(),
                }),
                None => Err(serde::de::Error::custom("\"base64\" must be a string")),
            };
        }

        let keys: Vec<&String> = obj.keys().collect();
        Err(serde::de::Error::custom(format!(
            "Invalid source: expected an object with one of \"path\" or \"base64\", but got keys: {:?}",
            keys
        )))
    }
}

/// Configuration for the poppler MCP server
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Directory holding the poppler binaries (platform default when unset)
    pub binary_dir: Option<PathBuf>,
    /// Directories input and output paths must stay within. Empty allows all.
    pub resource_dirs: Vec<String>,
}

/// Poppler MCP Server
#[derive(Clone)]
pub struct PdfServer {
    poppler: Arc<Poppler>,
    tool_router: ToolRouter<Self>,
    /// Server configuration
    config: Arc<ServerConfig>,
}

// ============================================================================
// Request/Response types
// ============================================================================

/// Parameters for tools that only read a PDF (pdf_info, pdf_fonts, pdf_detach)
#[derive(Debug, Deserialize, JsonSchema)]
pub struct InspectParams {
    /// PDF source to process
    pub source: PdfSource,
    /// Operation options, e.g. {"firstPageToExamine": 1}
    #[serde(default)]
    pub options: Option<OptionMap>,
}

/// Parameters for tools that produce output
#[derive(Debug, Deserialize, JsonSchema)]
pub struct ConvertParams {
    /// PDF source to process
    pub source: PdfSource,
    /// Output file, prefix or pattern. Omit to receive the result inline
    /// where the binary supports it.
    #[serde(default)]
    pub output: Option<String>,
    /// Operation options, e.g. {"pngFile": true, "firstPageToConvert": 1}
    #[serde(default)]
    pub options: Option<OptionMap>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct AttachParams {
    /// PDF to attach to
    pub source: PdfSource,
    /// Path of the file to embed
    pub attachment: String,
    /// Path of the resulting PDF
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub options: Option<OptionMap>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct UniteParams {
    /// PDFs to merge, in order
    pub sources: Vec<PdfSource>,
    /// Path of the merged PDF
    #[serde(default)]
    pub output: Option<String>,
    #[serde(default)]
    pub options: Option<OptionMap>,
}

#[derive(Debug, Serialize, JsonSchema)]
pub struct ToolResult {
    pub source: String,
    /// Binary stdout, or "No Error" when the result was written to a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Binary stdout for image/PDF conversions streamed inline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    fn failed(source: String, error: String) -> Self {
        Self {
            source,
            output: None,
            output_base64: None,
            error: Some(error),
        }
    }
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl PdfServer {
    /// Create a new PdfServer with full configuration
    pub fn with_config(config: ServerConfig) -> crate::error::Result<Self> {
        let poppler = Poppler::new(config.binary_dir.clone())?;
        Ok(Self {
            poppler: Arc::new(poppler),
            tool_router: Self::tool_router(),
            config: Arc::new(config),
        })
    }

    /// Create a new PdfServer using binaries from `binary_dir`
    pub fn with_binary_dir(binary_dir: impl Into<PathBuf>) -> crate::error::Result<Self> {
        Self::with_config(ServerConfig {
            binary_dir: Some(binary_dir.into()),
            ..ServerConfig::default()
        })
    }

    pub fn poppler(&self) -> &Poppler {
        &self.poppler
    }

    #[tool(
        description = "Embed a file into a PDF using pdfattach. Options: replace, printVersionInfo. Output is required."
    )]
    async fn pdf_attach(&self, Parameters(params): Parameters<AttachParams>) -> String {
        let result = self.process_attach(&params).await;
        Self::respond(Operation::PdfAttach, &params.source, result)
    }

    #[tool(
        description = "List (listEmbedded) or save (saveAllFiles, saveFile, saveSpecificFile) files embedded in a PDF using pdfdetach."
    )]
    async fn pdf_detach(&self, Parameters(params): Parameters<InspectParams>) -> String {
        let result = self.process_inspect(Operation::PdfDetach, &params).await;
        Self::respond(Operation::PdfDetach, &params.source, result)
    }

    #[tool(
        description = "List the fonts used in a PDF using pdffonts. Options include firstPageToExamine, lastPageToExamine, listSubstitutes."
    )]
    async fn pdf_fonts(&self, Parameters(params): Parameters<InspectParams>) -> String {
        let result = self.process_inspect(Operation::PdfFonts, &params).await;
        Self::respond(Operation::PdfFonts, &params.source, result)
    }

    #[tool(
        description = "List (list) or extract images from a PDF using pdfimages. Output is a file prefix; omit it with list."
    )]
    async fn pdf_images(&self, Parameters(params): Parameters<ConvertParams>) -> String {
        let result = self.process_convert(Operation::PdfImages, &params).await;
        Self::respond(Operation::PdfImages, &params.source, result)
    }

    #[tool(
        description = "Document information using pdfinfo. Set printAsJson to receive a JSON object (pages, encrypted, pdfVersion, ...)."
    )]
    async fn pdf_info(&self, Parameters(params): Parameters<InspectParams>) -> String {
        let result = self.process_inspect(Operation::PdfInfo, &params).await;
        Self::respond(Operation::PdfInfo, &params.source, result)
    }

    #[tool(
        description = "Split a PDF into one file per page using pdfseparate. Output is a pattern containing %d, e.g. /tmp/page-%d.pdf."
    )]
    async fn pdf_separate(&self, Parameters(params): Parameters<ConvertParams>) -> String {
        let result = self.process_convert(Operation::PdfSeparate, &params).await;
        Self::respond(Operation::PdfSeparate, &params.source, result)
    }

    #[tool(
        description = "Convert a PDF to PNG, JPEG, TIFF, PS, EPS, PDF or SVG using pdftocairo. Pick the format with pngFile, jpegFile, tiffFile, psFile, epsFile, pdfFile or svgFile. Without output the result is returned base64 encoded (images need singleFile)."
    )]
    async fn pdf_to_cairo(&self, Parameters(params): Parameters<ConvertParams>) -> String {
        let result = self.process_convert(Operation::PdfToCairo, &params).await;
        Self::respond(Operation::PdfToCairo, &params.source, result)
    }

    #[tool(description = "Convert a PDF to HTML using pdftohtml.")]
    async fn pdf_to_html(&self, Parameters(params): Parameters<ConvertParams>) -> String {
        let result = self.process_convert(Operation::PdfToHtml, &params).await;
        Self::respond(Operation::PdfToHtml, &params.source, result)
    }

    #[tool(
        description = "Rasterize PDF pages to PPM/PNG/JPEG/TIFF using pdftoppm. Output is a file prefix; without it the image is returned base64 encoded (use singleFile or a single page)."
    )]
    async fn pdf_to_ppm(&self, Parameters(params): Parameters<ConvertParams>) -> String {
        let result = self.process_convert(Operation::PdfToPpm, &params).await;
        Self::respond(Operation::PdfToPpm, &params.source, result)
    }

    #[tool(
        description = "Convert a PDF to PostScript using pdftops. Without output the PostScript is returned inline."
    )]
    async fn pdf_to_ps(&self, Parameters(params): Parameters<ConvertParams>) -> String {
        let result = self.process_convert(Operation::PdfToPs, &params).await;
        Self::respond(Operation::PdfToPs, &params.source, result)
    }

    #[tool(
        description = "Extract text from a PDF using pdftotext. Without output the text is returned inline. Options include firstPageToConvert, lastPageToConvert, maintainLayout."
    )]
    async fn pdf_to_text(&self, Parameters(params): Parameters<ConvertParams>) -> String {
        let result = self.process_convert(Operation::PdfToText, &params).await;
        Self::respond(Operation::PdfToText, &params.source, result)
    }

    #[tool(description = "Merge PDFs, in order, into a single PDF using pdfunite. Output is required.")]
    async fn pdf_unite(&self, Parameters(params): Parameters<UniteParams>) -> String {
        let source = format!("<{} sources>", params.sources.len());
        let result = match self.process_unite(&params).await {
            Ok(output) => Self::success(Operation::PdfUnite, source, output),
            Err(e) => {
                tracing::warn!(error = %e, "pdf_unite failed");
                ToolResult::failed(source, e.client_message())
            }
        };
        Self::to_json(result)
    }
}

impl PdfServer {
    fn source_name(source: &PdfSource) -> String {
        match source {
            PdfSource::Path { path } => path.clone(),
            PdfSource::Base64 { .. } => "<base64>".to_string(),
        }
    }

    fn respond(
        operation: Operation,
        source: &PdfSource,
        result: crate::error::Result<String>,
    ) -> String {
        let source = Self::source_name(source);
        let result = match result {
            Ok(output) => Self::success(operation, source, output),
            Err(e) => {
                tracing::warn!(operation = %operation, error = %e, "tool call failed");
                ToolResult::failed(source, e.client_message())
            }
        };
        Self::to_json(result)
    }

    fn success(operation: Operation, source: String, output: String) -> ToolResult {
        let inline_binary =
            operation.schema().stdout == StdoutEncoding::Binary && output != NO_ERROR;
        if inline_binary {
            let engine = base64::engine::general_purpose::STANDARD;
            ToolResult {
                source,
                output: None,
                output_base64: Some(engine.encode(binary_bytes(&output))),
                error: None,
            }
        } else {
            ToolResult {
                source,
                output: Some(output),
                output_base64: None,
                error: None,
            }
        }
    }

    fn to_json(result: ToolResult) -> String {
        let response = serde_json::json!({ "results": [result] });
        serde_json::to_string_pretty(&response).unwrap_or_default()
    }

    fn resolve_source(&self, source: &PdfSource) -> crate::error::Result<PdfInput> {
        match source {
            PdfSource::Path { path } => Ok(PdfInput::Path(self.validate_path_access(path)?)),
            PdfSource::Base64 { base64 } => {
                let engine = base64::engine::general_purpose::STANDARD;
                let data = engine.decode(base64)?;
                if data.is_empty() {
                    return Err(crate::error::Error::InvalidSource {
                        reason: "Decoded data is empty".to_string(),
                    });
                }
                Ok(PdfInput::Bytes(data))
            }
        }
    }

    /// Validate that a path is within allowed resource directories.
    /// If no resource_dirs are configured, all paths are allowed.
    fn validate_path_access(&self, path: &str) -> crate::error::Result<PathBuf> {
        if self.config.resource_dirs.is_empty() {
            return Ok(PathBuf::from(path));
        }

        let canonical = std::fs::canonicalize(path).map_err(|_| {
            crate::error::Error::PathAccessDenied {
                path: path.to_string(),
            }
        })?;

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical.starts_with(&canonical_dir) {
                    return Ok(canonical);
                }
            }
        }

        Err(crate::error::Error::PathAccessDenied {
            path: path.to_string(),
        })
    }

    /// Validate that an output path, prefix or pattern lands within allowed
    /// resource directories. Canonicalizes the parent directory since the
    /// output does not exist yet.
    fn validate_output_path_access(&self, path: &str) -> crate::error::Result<String> {
        if self.config.resource_dirs.is_empty() {
            return Ok(path.to_string());
        }

        let path_obj = std::path::Path::new(path);
        let parent = match path_obj.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => std::path::Path::new("."),
        };

        let canonical_parent = std::fs::canonicalize(parent).map_err(|_| {
            crate::error::Error::PathAccessDenied {
                path: path.to_string(),
            }
        })?;

        let canonical_target =
            canonical_parent.join(path_obj.file_name().unwrap_or(std::ffi::OsStr::new("")));

        for dir in &self.config.resource_dirs {
            if let Ok(canonical_dir) = std::fs::canonicalize(dir) {
                if canonical_target.starts_with(&canonical_dir) {
                    return Ok(canonical_target.to_string_lossy().into_owned());
                }
            }
        }

        Err(crate::error::Error::PathAccessDenied {
            path: path.to_string(),
        })
    }

    /// Check path-valued options against the sandbox and replace each with
    /// the resolved path. Non-string values are left for the validator.
    fn resolve_options(
        &self,
        operation: Operation,
        options: &Option<OptionMap>,
    ) -> crate::error::Result<OptionMap> {
        let mut options = options.clone().unwrap_or_default();
        if self.config.resource_dirs.is_empty() {
            return Ok(options);
        }

        let schema = operation.schema();
        for (name, value) in options.iter_mut() {
            let Some(role) = schema.option(name).and_then(|spec| spec.path) else {
                continue;
            };
            let Some(path) = value.as_str() else {
                continue;
            };
            let resolved = match role {
                PathRole::Input => self
                    .validate_path_access(path)?
                    .to_string_lossy()
                    .into_owned(),
                PathRole::Output => self.validate_output_path_access(path)?,
            };
            *value = serde_json::Value::String(resolved);
        }

        Ok(options)
    }

    fn resolve_output(&self, output: &Option<String>) -> crate::error::Result<Option<String>> {
        output
            .as_deref()
            .map(|path| self.validate_output_path_access(path))
            .transpose()
    }

    pub async fn process_inspect(
        &self,
        operation: Operation,
        params: &InspectParams,
    ) -> crate::error::Result<String> {
        let input = self.resolve_source(&params.source)?;
        let options = self.resolve_options(operation, &params.options)?;

        match operation {
            Operation::PdfDetach => self.poppler.pdf_detach(input, &options).await,
            Operation::PdfFonts => self.poppler.pdf_fonts(input, &options).await,
            _ => self.poppler.pdf_info(input, &options).await,
        }
    }

    pub async fn process_convert(
        &self,
        operation: Operation,
        params: &ConvertParams,
    ) -> crate::error::Result<String> {
        let input = self.resolve_source(&params.source)?;
        let output = self.resolve_output(&params.output)?;
        let output = output.as_deref();
        let options = self.resolve_options(operation, &params.options)?;

        match operation {
            Operation::PdfImages => self.poppler.pdf_images(input, output, &options).await,
            Operation::PdfSeparate => self.poppler.pdf_separate(input, output, &options).await,
            Operation::PdfToCairo => self.poppler.pdf_to_cairo(input, output, &options).await,
            Operation::PdfToHtml => self.poppler.pdf_to_html(input, output, &options).await,
            Operation::PdfToPpm => self.poppler.pdf_to_ppm(input, output, &options).await,
            Operation::PdfToPs => self.poppler.pdf_to_ps(input, output, &options).await,
            _ => self.poppler.pdf_to_text(input, output, &options).await,
        }
    }

    pub async fn process_attach(&self, params: &AttachParams) -> crate::error::Result<String> {
        let input = self.resolve_source(&params.source)?;
        let attachment = self.validate_path_access(&params.attachment)?;
        let output = self.resolve_output(&params.output)?;
        let options = self.resolve_options(Operation::PdfAttach, &params.options)?;

        self.poppler
            .pdf_attach(input, attachment, output.as_deref(), &options)
            .await
    }

    pub async fn process_unite(&self, params: &UniteParams) -> crate::error::Result<String> {
        if params.sources.is_empty() {
            return Err(crate::error::Error::InvalidSource {
                reason: "No PDF sources provided".to_string(),
            });
        }

        let inputs = params
            .sources
            .iter()
            .map(|source| self.resolve_source(source))
            .collect::<crate::error::Result<Vec<_>>>()?;
        let output = self.resolve_output(&params.output)?;
        let options = self.resolve_options(Operation::PdfUnite, &params.options)?;

        self.poppler
            .pdf_unite(inputs, output.as_deref(), &options)
            .await
    }
}

#[tool_handler]
impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "Poppler MCP Server runs poppler-utils (pdfinfo, pdftotext, pdftocairo, pdfunite, ...) \
                 on PDFs given by path or base64. Options are validated against each tool before \
                 the binary runs."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server with the platform's default binaries
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::default()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    let server = PdfServer::with_config(config)?;

    tracing::info!(
        binary_dir = %server.poppler().bin_dir().display(),
        "Poppler MCP Server ready, waiting for connections..."
    );

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
