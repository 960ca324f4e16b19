//! Output sinks
//!
//! Both print paths implement [`OutputSink`]:
//! - [`SerialSink`]: ESC/POS stream to a directly attached printer
//! - [`SpoolerSink`]: composed text handed to the host print facility
//!
//! Each sink owns whatever it opens for exactly one `deliver` call.

use std::io::Write;
use std::path::Path;

use async_trait::async_trait;
use crab_printer::{PrintError, Printer, SerialPrinter};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::composer::render_text;
use crate::config::{SerialConfig, SpoolFormat, SpoolerConfig};
use crate::document::ReceiptDocument;
use crate::encoder::render_escpos;

/// Why a sink could not deliver
#[derive(Debug, Error)]
pub enum SinkError {
    /// No hardware printing capability in this environment
    #[error("Device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Access to the device was refused
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// I/O failed while writing to the device
    #[error("Write failure: {0}")]
    WriteFailure(String),

    /// The fallback document could not be rendered or handed to the host
    #[error("Render failure: {0}")]
    RenderFailure(String),
}

impl From<PrintError> for SinkError {
    fn from(err: PrintError) -> Self {
        match err {
            PrintError::NoDevice(msg) | PrintError::Offline(msg) => {
                SinkError::DeviceUnavailable(msg)
            }
            PrintError::PermissionDenied(msg) => SinkError::PermissionDenied(msg),
            other => SinkError::WriteFailure(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    Hardware,
    Fallback,
}

/// Destination for a rendered receipt
#[async_trait]
pub trait OutputSink: Send + Sync {
    fn kind(&self) -> SinkKind;

    /// Render `document` for this medium and deliver it
    async fn deliver(&self, document: &ReceiptDocument) -> Result<(), SinkError>;
}

/// Directly attached serial printer
pub struct SerialSink {
    config: SerialConfig,
}

impl SerialSink {
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }

    fn printer(&self) -> Result<SerialPrinter, SinkError> {
        if !self.config.enabled {
            return Err(SinkError::DeviceUnavailable(
                "serial printing disabled".to_string(),
            ));
        }
        let printer = SerialPrinter::detect(self.config.port.as_deref())?
            .with_baud_rate(self.config.baud_rate)
            .with_timeout(self.config.timeout())
            .with_chunk_size(self.config.chunk_size);
        Ok(printer)
    }
}

#[async_trait]
impl OutputSink for SerialSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Hardware
    }

    #[instrument(skip_all, fields(transaction_id = %document.transaction_id))]
    async fn deliver(&self, document: &ReceiptDocument) -> Result<(), SinkError> {
        let printer = self.printer()?;
        if !printer.is_online().await {
            return Err(SinkError::DeviceUnavailable(format!(
                "{} not present",
                printer.port()
            )));
        }
        let data = render_escpos(document).to_bytes();
        debug!(port = printer.port(), bytes = data.len(), "Sending receipt to printer");
        printer.print(&data).await?;
        Ok(())
    }
}

/// Host print facility (CUPS `lp`, `lpr`, ...)
///
/// Writes the composed text into a temporary file and passes its path to the
/// spooler command. Plain text by default, which `lp` and `lpr` print as-is;
/// [`SpoolFormat::Html`] wraps it in a monospace page sized for 80 mm paper.
/// The file is removed when `deliver` returns, whether printing started or not.
pub struct SpoolerSink {
    config: SpoolerConfig,
}

impl SpoolerSink {
    pub fn new(config: SpoolerConfig) -> Self {
        Self { config }
    }

    async fn submit(&self, path: &Path) -> Result<(), SinkError> {
        let status = tokio::process::Command::new(&self.config.command)
            .args(&self.config.args)
            .arg(path)
            .status()
            .await
            .map_err(|e| {
                SinkError::RenderFailure(format!("{}: {}", self.config.command, e))
            })?;

        if !status.success() {
            return Err(SinkError::RenderFailure(format!(
                "{} exited with {}",
                self.config.command, status
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl OutputSink for SpoolerSink {
    fn kind(&self) -> SinkKind {
        SinkKind::Fallback
    }

    #[instrument(skip_all, fields(transaction_id = %document.transaction_id, command = %self.config.command))]
    async fn deliver(&self, document: &ReceiptDocument) -> Result<(), SinkError> {
        let text = render_text(document);
        let (suffix, body) = match self.config.format {
            SpoolFormat::Text => (".txt", text),
            SpoolFormat::Html => (".html", print_document(&text)),
        };

        let mut surface = tempfile::Builder::new()
            .prefix("receipt-")
            .suffix(suffix)
            .tempfile()
            .map_err(|e| SinkError::RenderFailure(format!("cannot open print surface: {}", e)))?;
        surface
            .write_all(body.as_bytes())
            .and_then(|_| surface.flush())
            .map_err(|e| SinkError::RenderFailure(format!("cannot write print surface: {}", e)))?;

        self.submit(surface.path()).await?;
        info!("Receipt handed to host spooler");
        Ok(())
    }
}

/// Monospace HTML page at receipt paper width
pub fn print_document(text: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html><head><meta charset=\"utf-8\"><title>Receipt</title>\n",
            "<style>\n",
            "@page {{ size: 80mm auto; margin: 0; }}\n",
            "body {{ margin: 0; width: 80mm; }}\n",
            "pre {{ font-family: 'Courier New', monospace; font-size: 12px; margin: 0; }}\n",
            "</style></head>\n",
            "<body><pre>{}</pre></body></html>\n"
        ),
        escape_html(text)
    )
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
