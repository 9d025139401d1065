//! Process invocation for poppler binaries
//!
//! Runs a built [`InvocationSpec`], staging in-memory inputs as temporary
//! files for the duration of the call, and normalizes the exit status into
//! either the success text or an [`Error::Process`] carrying the binary's own
//! diagnostics.
//!
//! There is no cancellation: dropping the returned future does not kill the
//! spawned process, which keeps running until it exits on its own.

use crate::error::{Error, Result};
use crate::options::{
    Destination, InstalledVersion, InvocationSpec, StdoutEncoding, SuccessReport,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tempfile::TempDir;
use tokio::process::Command;

/// Success text for calls whose result is the file the binary wrote
pub const NO_ERROR: &str = "No Error";

/// In-memory inputs written to disk for one call.
///
/// Every payload lives in one private directory, so files a binary derives
/// from a staged input's name (pdftohtml's `.html`, say) go with it.
struct Staging {
    dir: Option<TempDir>,
    paths: Vec<PathBuf>,
}

/// Run `spec` and return its normalized result.
///
/// Byte inputs are staged under `staging_root`, or the system temp
/// directory when `None`, and removed before this returns.
pub async fn invoke(spec: InvocationSpec, staging_root: Option<&Path>) -> Result<String> {
    let InvocationSpec {
        binary,
        args,
        payloads,
        destination,
        report,
        stdout,
    } = spec;

    let staging = stage_payloads(payloads, staging_root).await?;
    let argv = args
        .iter()
        .map(|arg| arg.to_os_string(&staging.paths))
        .collect::<Option<Vec<_>>>();
    let Some(argv) = argv else {
        release(staging);
        return Err(Error::Io(std::io::Error::other(
            "argument refers to an input that was not staged",
        )));
    };

    tracing::debug!(
        binary = %binary.display(),
        args = ?argv,
        staged = staging.paths.len(),
        "invoking poppler binary"
    );

    let output = run(&binary, &argv).await;
    release(staging);
    let output = output?;

    if !output.status.success() {
        let message = failure_text(&output);
        tracing::debug!(
            binary = %binary.display(),
            code = ?output.status.code(),
            "poppler binary failed"
        );
        return Err(Error::Process {
            binary: binary_name(&binary),
            code: output.status.code(),
            message,
        });
    }

    Ok(match (report, destination) {
        (SuccessReport::Marker, Destination::File(_)) => NO_ERROR.to_string(),
        _ => decode(output.stdout, stdout),
    })
}

/// Run `binary -v` and parse the version it reports.
///
/// Poppler prints the version on stderr, and older releases exit non-zero
/// for `-v`, so the exit status is ignored and both streams are searched.
pub async fn probe_version(binary: &Path) -> Result<InstalledVersion> {
    let output = run(binary, ["-v"]).await?;
    let mut text = String::from_utf8_lossy(&output.stderr).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stdout));

    let installed = InstalledVersion::extract(&text).ok_or_else(|| Error::VersionUnparseable {
        binary: binary_name(binary),
        output: text.trim().to_string(),
    })?;

    tracing::debug!(binary = %binary.display(), version = %installed, "probed poppler version");
    Ok(installed)
}

async fn run<I>(binary: &Path, args: I) -> Result<Output>
where
    I: IntoIterator,
    I::Item: AsRef<std::ffi::OsStr>,
{
    Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::BinaryNotFound {
                path: binary.display().to_string(),
            },
            _ => Error::Spawn {
                binary: binary_name(binary),
                source: e,
            },
        })
}

/// Write each payload to its own file in a fresh temporary directory.
///
/// The directory is deleted when the returned value drops, so an error part
/// way through cleans up whatever was already written.
async fn stage_payloads(payloads: Vec<Vec<u8>>, root: Option<&Path>) -> Result<Staging> {
    if payloads.is_empty() {
        return Ok(Staging {
            dir: None,
            paths: Vec::new(),
        });
    }

    let root = root.map(Path::to_path_buf);
    tokio::task::spawn_blocking(move || -> Result<Staging> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("poppler-input-");
        let dir = match &root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        let mut paths = Vec::with_capacity(payloads.len());
        for (index, data) in payloads.iter().enumerate() {
            let path = dir.path().join(format!("input-{}.pdf", index));
            let mut file = std::fs::File::create(&path)?;
            file.write_all(data)?;
            file.flush()?;
            paths.push(path);
        }

        Ok(Staging {
            dir: Some(dir),
            paths,
        })
    })
    .await
    .map_err(|e| Error::Io(std::io::Error::other(format!("Task join error: {}", e))))?
}

fn release(staging: Staging) {
    let Some(dir) = staging.dir else {
        return;
    };
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove staged inputs");
    }
}

/// stderr if the binary wrote any, stdout otherwise
fn failure_text(output: &Output) -> String {
    if output.stderr.is_empty() {
        String::from_utf8_lossy(&output.stdout).into_owned()
    } else {
        String::from_utf8_lossy(&output.stderr).into_owned()
    }
}

fn decode(stdout: Vec<u8>, encoding: StdoutEncoding) -> String {
    match encoding {
        StdoutEncoding::Text => match String::from_utf8(stdout) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        },
        StdoutEncoding::Binary => stdout.into_iter().map(char::from).collect(),
    }
}

/// Recover the raw bytes of a result decoded with [`StdoutEncoding::Binary`]
pub fn binary_bytes(text: &str) -> Vec<u8> {
    text.chars().map(|c| c as u32 as u8).collect()
}

fn binary_name(binary: &Path) -> String {
    binary
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| binary.display().to_string())
}
