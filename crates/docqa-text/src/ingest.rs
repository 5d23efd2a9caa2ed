//! Text extractors for uploaded documents.
//!
//! All extractors fail when the result has no non-whitespace characters.

use anyhow::{anyhow, Context, Result};
use std::io::Write;
use std::process::Command;
use tracing::{info, warn};

use docqa_core::traits::TextExtractor;

const PDF_MAGIC: &[u8] = b"%PDF";

fn non_empty(text: String) -> Result<String> {
    if text.trim().is_empty() {
        return Err(anyhow!("document contains no extractable text"));
    }
    Ok(text)
}

/// UTF-8 text, decoded lossily when the bytes are not valid UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let text = match std::str::from_utf8(bytes) {
            Ok(s) => s.to_string(),
            Err(e) => {
                warn!("input is not valid UTF-8 ({}), decoding lossily", e);
                String::from_utf8_lossy(bytes).into_owned()
            }
        };
        non_empty(text.trim_start_matches('\u{feff}').to_string())
    }
}

/// PDF text through the poppler `pdftotext` binary.
#[derive(Debug, Clone)]
pub struct PdfTextExtractor {
    program: String,
}

impl Default for PdfTextExtractor {
    fn default() -> Self { Self { program: "pdftotext".to_string() } }
}

impl PdfTextExtractor {
    pub fn with_program(program: impl Into<String>) -> Self { Self { program: program.into() } }
}

impl TextExtractor for PdfTextExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("docqa-")
            .suffix(".pdf")
            .tempfile()
            .context("failed to create temporary PDF file")?;
        file.write_all(bytes).context("failed to write temporary PDF file")?;
        file.flush()?;

        let output = Command::new(&self.program)
            .arg("-enc")
            .arg("UTF-8")
            .arg(file.path())
            .arg("-")
            .output()
            .with_context(|| format!("failed to run {} (is poppler installed?)", self.program))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("{} failed: {}", self.program, stderr.trim()));
        }
        // pages are separated by form feeds
        let text = String::from_utf8_lossy(&output.stdout).replace('\u{c}', "\n");
        let text = non_empty(text.trim().to_string())?;
        info!(chars = text.chars().count(), "extracted PDF text");
        Ok(text)
    }
}

/// Dispatches on the `%PDF` magic bytes: PDFs go to `pdf`, everything else to `plain`.
#[derive(Debug, Default, Clone)]
pub struct AutoExtractor {
    pub plain: PlainTextExtractor,
    pub pdf: PdfTextExtractor,
}

impl TextExtractor for AutoExtractor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        if bytes.starts_with(PDF_MAGIC) {
            self.pdf.extract_text(bytes)
        } else {
            self.plain.extract_text(bytes)
        }
    }
}
