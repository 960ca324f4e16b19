use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ReceiptError, ReceiptResult};

/// Receipt subsystem configuration
///
/// The embedding application loads this from its own settings; the receipt
/// subsystem never reads the environment itself. Every field has a default,
/// so `{}` is a valid config.
///
/// | Field | Default | Notes |
/// |-------|---------|-------|
/// | `auto_print_delay_ms` | 500 | Wait after the preview is shown before the automatic print |
/// | `serial.enabled` | true | Try the directly attached printer first |
/// | `serial.port` | auto | e.g. `/dev/ttyUSB0`, `COM3`; first USB serial port when unset |
/// | `serial.baud_rate` | 9600 | |
/// | `serial.timeout_ms` | 5000 | |
/// | `serial.chunk_size` | 1024 | Bytes per write |
/// | `spooler.command` | `lp` | Host print command, receives the document path last |
/// | `spooler.args` | `[]` | Extra arguments before the path |
/// | `spooler.format` | `text` | `text` for `lp`/`lpr`; `html` only for commands that render HTML |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReceiptConfig {
    /// Delay before the automatic print; tune per deployment
    pub auto_print_delay_ms: u64,
    pub serial: SerialConfig,
    pub spooler: SpoolerConfig,
}

/// Directly attached printer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    pub enabled: bool,
    pub port: Option<String>,
    pub baud_rate: u32,
    pub timeout_ms: u64,
    pub chunk_size: usize,
}

/// Host print facility used by the fallback path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoolerConfig {
    pub command: String,
    pub args: Vec<String>,
    pub format: SpoolFormat,
}

/// Document format handed to the spooler command
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpoolFormat {
    /// Composed receipt text as-is (`text/plain`)
    #[default]
    Text,
    /// Monospace HTML page at 80 mm paper width
    Html,
}

impl Default for ReceiptConfig {
    fn default() -> Self {
        Self {
            auto_print_delay_ms: 500,
            serial: SerialConfig::default(),
            spooler: SpoolerConfig::default(),
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            port: None,
            baud_rate: crab_printer::DEFAULT_BAUD_RATE,
            timeout_ms: 5000,
            chunk_size: 1024,
        }
    }
}

impl Default for SpoolerConfig {
    fn default() -> Self {
        Self {
            command: "lp".to_string(),
            args: Vec::new(),
            format: SpoolFormat::Text,
        }
    }
}

impl ReceiptConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> ReceiptResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ReceiptError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReceiptResult<()> {
        if self.serial.baud_rate == 0 {
            return Err(ReceiptError::Config("serial.baud_rate must be > 0".into()));
        }
        if self.serial.chunk_size == 0 {
            return Err(ReceiptError::Config("serial.chunk_size must be > 0".into()));
        }
        if self.spooler.command.trim().is_empty() {
            return Err(ReceiptError::Config("spooler.command must not be empty".into()));
        }
        Ok(())
    }

    pub fn auto_print_delay(&self) -> Duration {
        Duration::from_millis(self.auto_print_delay_ms)
    }

    pub fn with_auto_print_delay(mut self, delay: Duration) -> Self {
        self.auto_print_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_serial_port(mut self, port: impl Into<String>) -> Self {
        self.serial.port = Some(port.into());
        self
    }

    /// Skip the hardware path entirely
    pub fn without_serial(mut self) -> Self {
        self.serial.enabled = false;
        self
    }

    pub fn with_spooler(mut self, command: impl Into<String>, args: Vec<String>) -> Self {
        self.spooler = SpoolerConfig {
            command: command.into(),
            args,
            format: self.spooler.format,
        };
        self
    }

    pub fn with_spool_format(mut self, format: SpoolFormat) -> Self {
        self.spooler.format = format;
        self
    }
}

impl SerialConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
