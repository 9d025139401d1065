//! Poppler MCP Server Library
//!
//! Typed, validated access to the poppler-utils command line tools:
//! - `options`: per-binary option schemas, validation, version gating and
//!   argv construction
//! - `poppler`: the [`Poppler`] handle that runs the binaries
//! - `server`: MCP tools exposing each binary over stdio

pub mod error;
pub mod options;
pub mod poppler;
pub mod server;

pub use error::{Error, Result};
pub use options::{InstalledVersion, Operation, OptionMap, PdfInput, Version};
pub use poppler::{Poppler, NO_ERROR};
pub use server::{
    run_server, run_server_with_config, AttachParams, ConvertParams, InspectParams, PdfServer,
    PdfSource, ServerConfig, ToolResult, UniteParams,
};
