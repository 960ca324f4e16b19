//! Printer adapters for sending ESC/POS data
//!
//! Supports:
//! - Serial printers (USB CDC / RS-232), opened per job and released after

use crate::error::{PrintError, PrintResult};
use std::io::Write;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Baud rate most receipt printers ship with
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Trait for printer adapters
#[allow(async_fn_in_trait)]
pub trait Printer {
    /// Send raw ESC/POS data to the printer
    async fn print(&self, data: &[u8]) -> PrintResult<()>;

    /// Check if the printer is online/reachable
    async fn is_online(&self) -> bool;
}

/// Serial printer
///
/// The port is opened inside each `print` call and dropped before it
/// returns, so no handle outlives a single job.
#[derive(Debug, Clone)]
pub struct SerialPrinter {
    port: String,
    baud_rate: u32,
    timeout: Duration,
    chunk_size: usize,
}

impl SerialPrinter {
    /// Create a printer on a specific port (e.g. "/dev/ttyUSB0", "COM3")
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_secs(5),
            chunk_size: 1024,
        }
    }

    /// Resolve a printer port
    ///
    /// Uses `configured` when set, otherwise the first USB serial port the
    /// OS reports.
    pub fn detect(configured: Option<&str>) -> PrintResult<Self> {
        if let Some(port) = configured.filter(|p| !p.trim().is_empty()) {
            return Ok(Self::new(port));
        }

        let ports = serialport::available_ports()
            .map_err(|e| PrintError::NoDevice(format!("Port enumeration failed: {}", e)))?;

        ports
            .into_iter()
            .find(|p| matches!(p.port_type, serialport::SerialPortType::UsbPort(_)))
            .map(|p| Self::new(p.port_name))
            .ok_or_else(|| PrintError::NoDevice("No USB serial port found".to_string()))
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bytes per write call (slow printers overflow on large writes)
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn port(&self) -> &str {
        &self.port
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Open, write, flush, close. Blocking.
    fn write_blocking(&self, data: &[u8]) -> PrintResult<()> {
        let mut port = serialport::new(&self.port, self.baud_rate)
            .timeout(self.timeout)
            .open()
            .map_err(|e| map_open_error(&self.port, e))?;

        info!("Connected, sending {} bytes", data.len());

        for chunk in data.chunks(self.chunk_size) {
            port.write_all(chunk).map_err(|e| {
                PrintError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Write failed: {}", e),
                ))
            })?;
        }
        port.flush()?;

        Ok(())
    }
}

/// Map a serialport open failure onto the printer error taxonomy
fn map_open_error(port: &str, e: serialport::Error) -> PrintError {
    match e.kind {
        serialport::ErrorKind::NoDevice => PrintError::NoDevice(format!("{}: {}", port, e)),
        serialport::ErrorKind::Io(std::io::ErrorKind::NotFound) => {
            PrintError::NoDevice(format!("{}: {}", port, e))
        }
        serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied) => {
            PrintError::PermissionDenied(format!("{}: {}", port, e))
        }
        serialport::ErrorKind::Io(std::io::ErrorKind::TimedOut) => {
            PrintError::Timeout(format!("{}: {}", port, e))
        }
        serialport::ErrorKind::InvalidInput => {
            PrintError::InvalidConfig(format!("{}: {}", port, e))
        }
        _ => PrintError::Connection(format!("{}: {}", port, e)),
    }
}

impl Printer for SerialPrinter {
    #[instrument(skip(data), fields(port = %self.port, baud = self.baud_rate, data_len = data.len()))]
    async fn print(&self, data: &[u8]) -> PrintResult<()> {
        info!("Opening serial printer");

        // serialport is synchronous, run in blocking task
        let printer = self.clone();
        let data = data.to_vec();

        tokio::task::spawn_blocking(move || printer.write_blocking(&data))
            .await
            .map_err(|e| PrintError::Connection(format!("Task join failed: {}", e)))??;

        info!("Print job sent successfully");
        Ok(())
    }

    #[instrument(fields(port = %self.port))]
    async fn is_online(&self) -> bool {
        match serialport::available_ports() {
            Ok(ports) => {
                let online = ports.iter().any(|p| p.port_name == self.port);
                if !online {
                    warn!("Printer port not present");
                }
                online
            }
            Err(e) => {
                warn!(error = %e, "Port enumeration failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_printer_defaults() {
        let printer = SerialPrinter::new("/dev/ttyUSB0");
        assert_eq!(printer.port(), "/dev/ttyUSB0");
        assert_eq!(printer.baud_rate(), 9600);
    }

    #[test]
    fn test_detect_prefers_configured_port() {
        let printer = SerialPrinter::detect(Some("COM3")).unwrap();
        assert_eq!(printer.port(), "COM3");
    }

    #[test]
    fn test_chunk_size_never_zero() {
        let printer = SerialPrinter::new("COM1").with_chunk_size(0);
        assert_eq!(printer.chunk_size, 1);
    }

    #[test]
    fn test_permission_error_mapping() {
        let err = serialport::Error::new(
            serialport::ErrorKind::Io(std::io::ErrorKind::PermissionDenied),
            "denied",
        );
        assert!(matches!(
            map_open_error("/dev/ttyUSB0", err),
            PrintError::PermissionDenied(_)
        ));
    }

    #[test]
    fn test_missing_device_mapping() {
        let err = serialport::Error::new(serialport::ErrorKind::NoDevice, "gone");
        assert!(matches!(
            map_open_error("/dev/ttyUSB9", err),
            PrintError::NoDevice(_)
        ));
    }

    #[tokio::test]
    async fn test_missing_port_is_offline() {
        let printer = SerialPrinter::new("/dev/crab-printer-does-not-exist");
        assert!(!printer.is_online().await);
    }

    #[tokio::test]
    async fn test_print_to_missing_port_fails() {
        let printer = SerialPrinter::new("/dev/crab-printer-does-not-exist");
        assert!(printer.print(&[0x1B, 0x40]).await.is_err());
    }
}
