use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

/// Letterhead placed on the first page of every application document.
pub const DEFAULT_HEADER_HTML: &str = concat!(
    "<div class=\"letterhead\" style=\"font-family: sans-serif; border-bottom: 1px solid #1f3a5f; padding-bottom: 6px; margin-bottom: 18px;\">",
    "<strong style=\"color: #1f3a5f; font-size: 16pt;\">Application Services</strong>",
    "<div style=\"font-size: 8pt; color: #555;\">Confidential: prepared for the named applicant only</div>",
    "</div>"
);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageNumbers {
    Hidden,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderRepeat {
    FirstPageOnly,
    EveryPage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderOptions {
    pub repeat: HeaderRepeat,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfOptions {
    pub page_numbers: PageNumbers,
    pub header: Option<HeaderOptions>,
}

impl PdfOptions {
    /// Numbered pages with the standard letterhead on the first page only.
    pub fn application_document() -> Self {
        Self {
            page_numbers: PageNumbers::Numeric,
            header: Some(HeaderOptions {
                repeat: HeaderRepeat::FirstPageOnly,
                html: DEFAULT_HEADER_HTML.to_string(),
            }),
        }
    }
}

/// A converted document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    bytes: Vec<u8>,
}

impl PdfDocument {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.clone()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// HTML to PDF engine.
pub trait PdfConverter: Send + Sync {
    fn convert(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, ConversionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("unable to prepare conversion workspace: {0}")]
    Workspace(#[source] std::io::Error),
    #[error("unable to launch {}: {source}", .binary.display())]
    Spawn {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("converter exited with {status}: {stderr}")]
    Exit { status: String, stderr: String },
    #[error("unable to read converted document: {0}")]
    Output(#[source] std::io::Error),
    #[error("converter produced an empty document")]
    Empty,
}

/// Converts HTML by shelling out to a `wkhtmltopdf` binary.
#[derive(Debug, Clone)]
pub struct WkhtmltopdfConverter {
    binary: PathBuf,
}

impl Default for WkhtmltopdfConverter {
    fn default() -> Self {
        Self::new("wkhtmltopdf")
    }
}

impl WkhtmltopdfConverter {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Command-line flags for the given options; `header_file` holds a repeating header.
    pub(crate) fn arguments(
        options: &PdfOptions,
        header_file: Option<&Path>,
        input: &Path,
        output: &Path,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["--quiet".into(), "--encoding".into(), "utf-8".into()];

        if options.page_numbers == PageNumbers::Numeric {
            args.push("--footer-center".into());
            args.push("[page]".into());
            args.push("--footer-font-size".into());
            args.push("8".into());
        }

        if let Some(path) = header_file {
            args.push("--header-html".into());
            args.push(path.as_os_str().to_owned());
        }

        args.push(input.as_os_str().to_owned());
        args.push(output.as_os_str().to_owned());
        args
    }
}

/// Place first-page-only header markup at the top of the document body.
pub(crate) fn splice_first_page_header(html: &str, header: &str) -> String {
    let lower = html.to_ascii_lowercase();
    let insert_at = lower
        .find("<body")
        .and_then(|start| lower[start..].find('>').map(|end| start + end + 1));

    match insert_at {
        Some(index) => {
            let mut spliced = String::with_capacity(html.len() + header.len());
            spliced.push_str(&html[..index]);
            spliced.push_str(header);
            spliced.push_str(&html[index..]);
            spliced
        }
        None => format!("{header}{html}"),
    }
}

fn wrap_fragment(fragment: &str) -> String {
    format!("<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{fragment}</body></html>")
}

impl PdfConverter for WkhtmltopdfConverter {
    fn convert(&self, html: &str, options: &PdfOptions) -> Result<PdfDocument, ConversionError> {
        let workspace = tempfile::tempdir().map_err(ConversionError::Workspace)?;
        let input = workspace.path().join("document.html");
        let output = workspace.path().join("document.pdf");

        let (body, header_file) = match &options.header {
            Some(header) if header.repeat == HeaderRepeat::FirstPageOnly => {
                (splice_first_page_header(html, &header.html), None)
            }
            Some(header) => {
                let header_path = workspace.path().join("header.html");
                fs::write(&header_path, wrap_fragment(&header.html))
                    .map_err(ConversionError::Workspace)?;
                (html.to_string(), Some(header_path))
            }
            None => (html.to_string(), None),
        };
        fs::write(&input, body).map_err(ConversionError::Workspace)?;

        let args = Self::arguments(options, header_file.as_deref(), &input, &output);
        debug!(binary = %self.binary.display(), ?args, "invoking pdf converter");

        let result = Command::new(&self.binary)
            .args(&args)
            .output()
            .map_err(|source| ConversionError::Spawn {
                binary: self.binary.clone(),
                source,
            })?;

        if !result.status.success() {
            return Err(ConversionError::Exit {
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }

        let bytes = fs::read(&output).map_err(ConversionError::Output)?;
        if bytes.is_empty() {
            return Err(ConversionError::Empty);
        }
        Ok(PdfDocument::new(bytes))
    }
}
