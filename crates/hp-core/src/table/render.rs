//! Table renderers for clipboard and file delivery.

use std::fmt::Write as _;
use std::string::FromUtf8Error;

use thiserror::Error;

use super::model::{Alignment, Cell, TableModel};

/// UTF-8 byte order mark so spreadsheet apps detect the CSV encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("table has no columns")]
    NoColumns,

    #[error("csv writer failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("rendered text is not utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

fn write_records(
    table: &TableModel,
    mut writer: csv::Writer<Vec<u8>>,
) -> Result<Vec<u8>, RenderError> {
    if table.column_count() == 0 {
        return Err(RenderError::NoColumns);
    }
    for row in table.all_rows() {
        writer.write_record(row.iter().map(|cell| cell.text.as_str()))?;
    }
    writer
        .into_inner()
        .map_err(|e| RenderError::Csv(csv::Error::from(e.into_error())))
}

/// Tab-separated rendering, quoted the way spreadsheets expect on paste.
///
/// Cells that contain a tab, a quote or a line break are wrapped in double
/// quotes with inner quotes doubled, so they never spill into extra rows or
/// columns.
pub fn render_tsv(table: &TableModel) -> Result<String, RenderError> {
    let writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());
    let bytes = write_records(table, writer)?;
    Ok(String::from_utf8(bytes)?)
}

/// Comma-separated rendering with a UTF-8 BOM, for the open-externally fallback.
pub fn render_csv(table: &TableModel) -> Result<Vec<u8>, RenderError> {
    let writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .terminator(csv::Terminator::CRLF)
        .from_writer(UTF8_BOM.to_vec());
    write_records(table, writer)
}

/// HTML table rendering.
///
/// With `styled` the header gets a grey fill and cells carry their inline
/// formatting; without it only the table structure is emitted.
pub fn render_html(table: &TableModel, styled: bool) -> Result<String, RenderError> {
    if table.column_count() == 0 {
        return Err(RenderError::NoColumns);
    }

    let mut html = String::from("<html><body>\n");
    if styled {
        html.push_str("<table style=\"border-collapse:collapse\">\n");
    } else {
        html.push_str("<table>\n");
    }

    html.push_str("<thead><tr>");
    for (cell, align) in table.header().iter().zip(table.alignments()) {
        push_cell(&mut html, "th", cell, *align, styled);
    }
    html.push_str("</tr></thead>\n<tbody>\n");

    for row in table.rows() {
        html.push_str("<tr>");
        for (cell, align) in row.iter().zip(table.alignments()) {
            push_cell(&mut html, "td", cell, *align, styled);
        }
        html.push_str("</tr>\n");
    }

    html.push_str("</tbody>\n</table>\n</body></html>");
    Ok(html)
}

fn push_cell(html: &mut String, tag: &str, cell: &Cell, align: Alignment, styled: bool) {
    let mut css = String::new();
    if styled {
        css.push_str("border:1px solid #999;padding:2px 6px;");
        if tag == "th" {
            css.push_str("background:#d9d9d9;font-weight:bold;");
        }
    }
    match align {
        Alignment::Left => css.push_str("text-align:left;"),
        Alignment::Center => css.push_str("text-align:center;"),
        Alignment::Right => css.push_str("text-align:right;"),
        Alignment::Default => {}
    }

    if css.is_empty() {
        let _ = write!(html, "<{tag}>");
    } else {
        let _ = write!(html, "<{tag} style=\"{css}\">");
    }

    let body = escape_html(&cell.text).replace('\n', "<br>");
    if styled {
        let style = cell.style;
        if style.bold {
            let _ = write!(html, "<b>{body}</b>");
        } else if style.italic {
            let _ = write!(html, "<i>{body}</i>");
        } else if style.strikethrough {
            let _ = write!(html, "<s>{body}</s>");
        } else if style.code {
            let _ = write!(
                html,
                "<code style=\"font-family:Consolas,monospace;background:#f2f2f2\">{body}</code>"
            );
        } else {
            html.push_str(&body);
        }
    } else {
        html.push_str(&body);
    }

    let _ = write!(html, "</{tag}>");
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
