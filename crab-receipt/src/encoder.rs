//! ESC/POS receipt renderer
//!
//! Renders the same [`ReceiptDocument`] as the text composer, so preview and
//! paper never drift apart. Centered lines are sent unpadded with
//! `AlignCenter` and the printer does the centering; tabular lines reuse the
//! composer's column layout under `AlignLeft`.

use crab_printer::{Command, CommandStream, EscPosBuilder};

use crate::composer::{item_row, total_row};
use crate::document::{ReceiptDocument, ReceiptLine, SectionKind};
use crate::models::{StoreProfile, Transaction};

/// Encode a sale as an ESC/POS command stream
pub fn encode(transaction: &Transaction, store: &StoreProfile, cashier_name: &str) -> CommandStream {
    render_escpos(&ReceiptDocument::build(transaction, store, cashier_name))
}

/// Render a document as an ESC/POS command stream
///
/// Always `Init` first and `Cut` last.
pub fn render_escpos(document: &ReceiptDocument) -> CommandStream {
    let mut r = EscPosRenderer::new();
    for section in &document.sections {
        r.section(section.kind);
        for line in &section.lines {
            r.line(line);
        }
    }
    r.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Center,
}

struct EscPosRenderer {
    b: EscPosBuilder,
    align: Align,
}

impl EscPosRenderer {
    fn new() -> Self {
        // ESC @ leaves the printer left-aligned
        Self {
            b: EscPosBuilder::new(),
            align: Align::Left,
        }
    }

    /// Sections always restate their alignment
    fn section(&mut self, kind: SectionKind) {
        let align = if kind.is_centered() {
            Align::Center
        } else {
            Align::Left
        };
        self.set_align(align);
    }

    fn set_align(&mut self, align: Align) {
        match align {
            Align::Left => self.b.left(),
            Align::Center => self.b.center(),
        };
        self.align = align;
    }

    fn ensure_align(&mut self, align: Align) {
        if self.align != align {
            self.set_align(align);
        }
    }

    fn line(&mut self, line: &ReceiptLine) {
        match line {
            ReceiptLine::Blank => {
                self.b.newline();
            }
            ReceiptLine::Divider(d) => {
                self.ensure_align(Align::Left);
                self.b.line(&d.render());
            }
            ReceiptLine::Title(text) => {
                self.ensure_align(Align::Center);
                self.b
                    .bold()
                    .double_height()
                    .line(text)
                    .reset_size()
                    .bold_off();
            }
            ReceiptLine::Centered(text) => {
                self.ensure_align(Align::Center);
                self.b.line(text);
            }
            ReceiptLine::Text(text) => {
                self.ensure_align(Align::Left);
                self.b.line(text);
            }
            ReceiptLine::Item {
                name,
                amount,
                detail,
            } => {
                self.ensure_align(Align::Left);
                self.b.line(&item_row(name, amount)).line(detail);
            }
            ReceiptLine::Amount {
                label,
                amount,
                emphasis,
            } => {
                self.ensure_align(Align::Left);
                if *emphasis {
                    self.b.bold().line(&total_row(label, amount)).bold_off();
                } else {
                    self.b.line(&total_row(label, amount));
                }
            }
        }
    }

    fn finish(mut self) -> CommandStream {
        self.b.cut();
        self.b.build()
    }
}

/// Literal text segments of a stream, in order
pub fn text_segments(stream: &CommandStream) -> Vec<&str> {
    stream
        .commands()
        .iter()
        .filter_map(|c| match c {
            Command::Text(s) => Some(s.as_str()),
            _ => None,
        })
        .collect()
}
