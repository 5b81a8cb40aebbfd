//! Markdown table transpiler.
//!
//! Parses pipe tables without any external tool. Lossy by policy: short rows
//! are padded and long rows truncated to the header width.

use std::sync::OnceLock;

use regex::Regex;

use super::model::{Alignment, Cell, CellStyle, TableModel};
use crate::content::first_block;
use crate::error::MalformedTableError;

fn separator_cell_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^:?-+:?$").expect("static regex"))
}

fn line_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>").expect("static regex"))
}

/// Wrappers checked in order; the first one that matches wins.
const STYLE_WRAPPERS: [(&str, CellStyle); 6] = [
    ("**", CellStyle { bold: true, ..CellStyle::PLAIN }),
    ("__", CellStyle { bold: true, ..CellStyle::PLAIN }),
    ("~~", CellStyle { strikethrough: true, ..CellStyle::PLAIN }),
    ("`", CellStyle { code: true, ..CellStyle::PLAIN }),
    ("*", CellStyle { italic: true, ..CellStyle::PLAIN }),
    ("_", CellStyle { italic: true, ..CellStyle::PLAIN }),
];

/// Parse the first table block of `text`.
pub fn transpile(text: &str) -> Result<TableModel, MalformedTableError> {
    let block = first_block(text);
    if block.len() < 2 {
        return Err(MalformedTableError::TooFewLines { lines: block.len() });
    }

    let header: Vec<Cell> = split_cells(block[0]).iter().map(|raw| parse_cell(raw)).collect();
    if header.is_empty() {
        return Err(MalformedTableError::NoColumns);
    }

    if !is_separator_line(block[1]) {
        return Err(MalformedTableError::BadSeparator {
            line: block[1].trim().to_string(),
        });
    }
    let alignments = split_cells(block[1]).iter().map(|c| parse_alignment(c)).collect();

    let rows = block[2..]
        .iter()
        .take_while(|line| has_unescaped_pipe(line))
        .map(|line| split_cells(line).iter().map(|raw| parse_cell(raw)).collect())
        .collect();

    Ok(TableModel::new(header, rows, alignments))
}

/// True when `line` contains a pipe that is not preceded by a backslash.
pub fn has_unescaped_pipe(line: &str) -> bool {
    let mut escaped = false;
    for ch in line.chars() {
        if ch == '|' && !escaped {
            return true;
        }
        escaped = ch == '\\';
    }
    false
}

/// A separator row: at least one delimiting pipe, every cell `:?-+:?`.
pub fn is_separator_line(line: &str) -> bool {
    if !has_unescaped_pipe(line) {
        return false;
    }
    let cells = split_cells(line);
    !cells.is_empty() && cells.iter().all(|c| separator_cell_re().is_match(c))
}

/// Split a row on unescaped pipes and trim each cell.
///
/// Fencing pipes at either end do not produce empty outer cells; `\|`
/// becomes a literal `|` inside the cell.
pub fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut chars = trimmed.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'|') => {
                current.push('|');
                chars.next();
            }
            '|' => cells.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    cells.push(current);

    if trimmed.starts_with('|') {
        cells.remove(0);
    }
    if trimmed.len() > 1 && trimmed.ends_with('|') && !trimmed.ends_with("\\|") {
        cells.pop();
    }

    cells.into_iter().map(|c| c.trim().to_string()).collect()
}

fn parse_alignment(cell: &str) -> Alignment {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Right,
        (true, false) => Alignment::Left,
        (false, false) => Alignment::Default,
    }
}

fn parse_cell(raw: &str) -> Cell {
    let text = line_break_re().replace_all(raw.trim(), "\n");

    for (marker, style) in STYLE_WRAPPERS {
        let inner = text
            .strip_prefix(marker)
            .and_then(|rest| rest.strip_suffix(marker));
        if let Some(inner) = inner {
            if !inner.trim().is_empty() {
                return Cell {
                    text: inner.to_string(),
                    style,
                };
            }
        }
    }

    Cell::plain(text.into_owned())
}
