//! ESC/POS command builder
//!
//! Provides a fluent API for building ESC/POS command streams. Commands stay
//! symbolic until [`CommandStream::to_bytes`], so callers (and tests) can
//! inspect the exact sequence before it reaches a printer.

use crate::encoding::write_text;

/// ESC/POS command vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// ESC @ - reset printer to default state
    Init,
    /// ESC E 1
    BoldOn,
    /// ESC E 0
    BoldOff,
    /// ESC a 0
    AlignLeft,
    /// ESC a 1
    AlignCenter,
    /// ESC a 2
    AlignRight,
    /// GS ! 0x01 - double height only
    DoubleHeight,
    /// GS ! 0x00
    NormalSize,
    /// LF
    LineFeed,
    /// GS V 0 - full cut
    Cut,
    /// Literal text (made wire-safe on encoding)
    Text(String),
}

impl Command {
    /// Append the byte form of this command to `buf`
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        match self {
            Command::Init => buf.extend_from_slice(&[0x1B, 0x40]),
            Command::BoldOn => buf.extend_from_slice(&[0x1B, 0x45, 0x01]),
            Command::BoldOff => buf.extend_from_slice(&[0x1B, 0x45, 0x00]),
            Command::AlignLeft => buf.extend_from_slice(&[0x1B, 0x61, 0x00]),
            Command::AlignCenter => buf.extend_from_slice(&[0x1B, 0x61, 0x01]),
            Command::AlignRight => buf.extend_from_slice(&[0x1B, 0x61, 0x02]),
            Command::DoubleHeight => buf.extend_from_slice(&[0x1D, 0x21, 0x01]),
            Command::NormalSize => buf.extend_from_slice(&[0x1D, 0x21, 0x00]),
            Command::LineFeed => buf.push(0x0A),
            Command::Cut => buf.extend_from_slice(&[0x1D, 0x56, 0x00]),
            Command::Text(s) => write_text(buf, s),
        }
    }

    /// Byte form of this command
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_to(&mut buf);
        buf
    }
}

/// Ordered sequence of commands for one print job
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandStream {
    commands: Vec<Command>,
}

impl CommandStream {
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn first(&self) -> Option<&Command> {
        self.commands.first()
    }

    pub fn last(&self) -> Option<&Command> {
        self.commands.last()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of occurrences of `command`
    pub fn count(&self, command: &Command) -> usize {
        self.commands.iter().filter(|c| *c == command).count()
    }

    /// Encode the whole stream to raw ESC/POS bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(4096);
        for command in &self.commands {
            command.write_to(&mut buf);
        }
        buf
    }
}

impl IntoIterator for CommandStream {
    type Item = Command;
    type IntoIter = std::vec::IntoIter<Command>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

/// ESC/POS command builder
///
/// Every stream starts with `Init`.
pub struct EscPosBuilder {
    commands: Vec<Command>,
}

impl EscPosBuilder {
    pub fn new() -> Self {
        Self {
            commands: vec![Command::Init],
        }
    }

    /// Append a raw command
    pub fn push(&mut self, command: Command) -> &mut Self {
        self.commands.push(command);
        self
    }

    // === Text Output ===

    /// Write text without a line feed
    pub fn text(&mut self, s: &str) -> &mut Self {
        if !s.is_empty() {
            self.commands.push(Command::Text(s.to_string()));
        }
        self
    }

    /// Write text followed by a line feed
    pub fn line(&mut self, s: &str) -> &mut Self {
        self.text(s);
        self.newline()
    }

    /// Write empty line
    pub fn newline(&mut self) -> &mut Self {
        self.commands.push(Command::LineFeed);
        self
    }

    /// Write multiple empty lines
    pub fn feed(&mut self, lines: u8) -> &mut Self {
        for _ in 0..lines {
            self.newline();
        }
        self
    }

    // === Alignment ===

    pub fn center(&mut self) -> &mut Self {
        self.push(Command::AlignCenter)
    }

    pub fn left(&mut self) -> &mut Self {
        self.push(Command::AlignLeft)
    }

    pub fn right(&mut self) -> &mut Self {
        self.push(Command::AlignRight)
    }

    // === Text Style ===

    pub fn bold(&mut self) -> &mut Self {
        self.push(Command::BoldOn)
    }

    pub fn bold_off(&mut self) -> &mut Self {
        self.push(Command::BoldOff)
    }

    pub fn double_height(&mut self) -> &mut Self {
        self.push(Command::DoubleHeight)
    }

    pub fn reset_size(&mut self) -> &mut Self {
        self.push(Command::NormalSize)
    }

    // === Paper Control ===

    /// Cut paper (full cut)
    pub fn cut(&mut self) -> &mut Self {
        self.push(Command::Cut)
    }

    // === Build ===

    pub fn build(self) -> CommandStream {
        CommandStream {
            commands: self.commands,
        }
    }
}

impl Default for EscPosBuilder {
    fn default() -> Self {
        Self::new()
    }
}
