//! Rendering of values, listings, errors and command stamps.

use std::io::Write;

use vault_executor::{Binding, Error, Frame, Metadata, Result, Sink, Value};

/// Format an error.
pub fn format_error(err: &Error) -> String {
    format!("(error) {}", err)
}

/// Format a value for `show`.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Frame(frame) => format_frame(frame),
        other => other.to_string(),
    }
}

/// Numbered listing, Redis style.
pub fn format_list(items: &[String]) -> String {
    if items.is_empty() {
        return "(empty list)".to_string();
    }
    items
        .iter()
        .enumerate()
        .map(|(i, item)| format!("{}) {}", i + 1, item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// One `vars` line: the name and what it is bound to.
pub fn format_binding(name: &str, binding: &Binding) -> String {
    match binding {
        Binding::Value(Value::Frame(frame)) => {
            let (rows, columns) = frame.shape();
            format!("{}: frame ({} x {})", name, rows, columns)
        }
        other => format!("{}: {}", name, other.type_name()),
    }
}

/// Aligned table with the index as the first column.
fn format_frame(frame: &Frame) -> String {
    let mut table: Vec<Vec<String>> = Vec::with_capacity(frame.rows().len() + 1);
    table.push(
        std::iter::once(String::new())
            .chain(frame.columns().iter().cloned())
            .collect(),
    );
    for (label, row) in frame.index().iter().zip(frame.rows()) {
        table.push(std::iter::once(label).chain(row).map(cell).collect());
    }

    let widths: Vec<usize> = (0..table[0].len())
        .map(|c| table.iter().map(|row| row[c].chars().count()).max().unwrap_or(0))
        .collect();

    table
        .iter()
        .map(|row| {
            row.iter()
                .zip(&widths)
                .map(|(text, width)| format!("{:>width$}", text, width = *width))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Stamp printer
// =============================================================================

/// Prints each stamp on its own paragraph; metadata goes to other sinks.
pub struct Printer<W: Write> {
    out: W,
}

impl<W: Write> Printer<W> {
    /// Print to `out`
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// The underlying writer
    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for Printer<W> {
    fn emit(&mut self, stamp: Option<&str>, _metadata: Option<&Metadata>) -> Result<()> {
        if let Some(stamp) = stamp {
            writeln!(self.out, "{}", stamp).map_err(|e| Error::Storage(e.into()))?;
        }
        Ok(())
    }
}
