//! Default exporter and importer
//!
//! Frames are written as tab-separated text so that they stay readable
//! with standard tools and hash identically on every platform:
//!
//! ```text
//! \ta\tb
//! 0\t1\t1
//! 1\t1\t2
//! ```
//!
//! - The header row starts with an empty cell above the index column
//! - Lines end with `\n`
//! - Booleans are `True`/`False`, null is an empty cell
//! - Floats always carry a decimal point or exponent
//! - Cells containing tabs, newlines or quotes are double-quoted
//!
//! Every other value is written as pretty-printed JSON. The importer tries
//! JSON first and falls back to TSV, inferring each column's type. A frame
//! with no columns and a single numeric index label (`"\n0\n"`) is also
//! valid JSON and reads back as that number; `frame_from_tsv` still
//! recovers it as a frame.

use vault_core::{Error, Frame, Function, Result, Value};

/// Exporter used when a command has no `with` clause
pub fn default_exporter() -> Function {
    Function::exporter("default_exporter", export_default)
}

/// Importer used when a command has no `with` clause
pub fn default_importer() -> Function {
    Function::importer("default_importer", import_default)
}

/// JSON exporter (`json.dumps`)
pub fn json_exporter() -> Function {
    Function::exporter("json.dumps", |value: &Value| {
        Ok(serde_json::to_vec_pretty(&value.to_json())?)
    })
}

/// JSON importer (`json.loads`)
pub fn json_importer() -> Function {
    Function::importer("json.loads", |bytes: &[u8]| {
        let json: serde_json::Value = serde_json::from_slice(bytes)?;
        Ok(Value::from(json))
    })
}

/// UTF-8 text importer (`text`)
pub fn text_importer() -> Function {
    Function::importer("text", |bytes: &[u8]| {
        String::from_utf8(bytes.to_vec())
            .map(Value::String)
            .map_err(|e| Error::codec(format!("not valid UTF-8: {}", e)))
    })
}

/// Frames to TSV, everything else to pretty JSON
pub fn export_default(value: &Value) -> Result<Vec<u8>> {
    match value {
        Value::Frame(frame) => Ok(frame_to_tsv(frame).into_bytes()),
        other => Ok(serde_json::to_vec_pretty(&other.to_json())?),
    }
}

/// JSON if it parses, TSV otherwise
///
/// Single-row frames without columns are read as their index label.
pub fn import_default(bytes: &[u8]) -> Result<Value> {
    if let Ok(json) = serde_json::from_slice::<serde_json::Value>(bytes) {
        return Ok(Value::from(json));
    }
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::codec(format!("neither JSON nor UTF-8 text: {}", e)))?;
    Ok(Value::Frame(frame_from_tsv(text)?))
}

// =============================================================================
// TSV writing
// =============================================================================

/// Render a frame as TSV
pub fn frame_to_tsv(frame: &Frame) -> String {
    let mut out = String::new();

    out.push_str(
        &std::iter::once(String::new())
            .chain(frame.columns().iter().map(|c| quote_cell(c)))
            .collect::<Vec<_>>()
            .join("\t"),
    );
    out.push('\n');

    for (label, row) in frame.index().iter().zip(frame.rows()) {
        out.push_str(
            &std::iter::once(label)
                .chain(row.iter())
                .map(format_cell)
                .collect::<Vec<_>>()
                .join("\t"),
        );
        out.push('\n');
    }
    out
}

fn format_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => format_float(*f),
        Value::String(s) => quote_cell(s),
        nested => quote_cell(&nested.to_json().to_string()),
    }
}

fn format_float(f: f64) -> String {
    let text = f.to_string();
    if text.contains(['.', 'e', 'E']) || !f.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

fn quote_cell(text: &str) -> String {
    if text.contains(['\t', '\n', '\r', '"']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

// =============================================================================
// TSV reading
// =============================================================================

/// Parse TSV text (as written by `frame_to_tsv`) into a frame
///
/// The first column is the index; its header cell is ignored.
pub fn frame_from_tsv(text: &str) -> Result<Frame> {
    let mut records = split_records(text)?.into_iter();

    let header = records
        .next()
        .ok_or_else(|| Error::codec("empty TSV input"))?;
    let columns: Vec<String> = header.into_iter().skip(1).collect();

    let mut index_cells = Vec::new();
    let mut columns_cells: Vec<Vec<String>> = vec![Vec::new(); columns.len()];
    for (line, record) in records.enumerate() {
        if record.len() != columns.len() + 1 {
            return Err(Error::codec(format!(
                "row {} has {} cells, expected {}",
                line + 1,
                record.len(),
                columns.len() + 1
            )));
        }
        let mut cells = record.into_iter();
        index_cells.extend(cells.next());
        for (column, cell) in columns_cells.iter_mut().zip(cells) {
            column.push(cell);
        }
    }

    let index = infer_column(index_cells);
    let typed: Vec<Vec<Value>> = columns_cells.into_iter().map(infer_column).collect();
    let rows = (0..index.len())
        .map(|r| typed.iter().map(|column| column[r].clone()).collect())
        .collect();

    Frame::with_index(columns, index, rows)
}

/// Split into records of cells, honoring double-quoted cells
fn split_records(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                other => cell.push(other),
            }
            continue;
        }
        match c {
            '"' if cell.is_empty() => in_quotes = true,
            '\t' => record.push(std::mem::take(&mut cell)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut cell));
                records.push(std::mem::take(&mut record));
            }
            other => cell.push(other),
        }
    }

    if in_quotes {
        return Err(Error::codec("unterminated quoted cell"));
    }
    if !cell.is_empty() || !record.is_empty() {
        record.push(cell);
        records.push(record);
    }
    Ok(records)
}

fn infer_column(cells: Vec<String>) -> Vec<Value> {
    let present = || cells.iter().filter(|c| !c.is_empty());

    if present().all(|c| c.parse::<i64>().is_ok()) {
        return convert(cells, |c| c.parse().ok().map(Value::Int));
    }
    if present().all(|c| c.parse::<f64>().is_ok()) {
        return convert(cells, |c| c.parse().ok().map(Value::Float));
    }
    if present().all(|c| c == "True" || c == "False") {
        return convert(cells, |c| Some(Value::Bool(c == "True")));
    }
    convert(cells, |c| Some(Value::String(c.to_string())))
}

fn convert(cells: Vec<String>, parse: impl Fn(&str) -> Option<Value>) -> Vec<Value> {
    cells
        .iter()
        .map(|c| {
            if c.is_empty() {
                Value::Null
            } else {
                parse(c).unwrap_or(Value::Null)
            }
        })
        .collect()
}
