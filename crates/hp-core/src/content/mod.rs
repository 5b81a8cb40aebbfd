//! Content classification.
//!
//! Decides whether a clipboard snapshot goes down the document-conversion path
//! or the table path. Classification only looks at the first contiguous block
//! of the text; a second table further down is ignored.

pub mod math;

use serde::{Deserialize, Serialize};

use crate::table::parser::{has_unescaped_pipe, is_separator_line, split_cells};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    PlainMarkdown,
    MarkdownTable,
}

/// Returns the first contiguous run of non-blank lines, skipping leading blanks.
pub fn first_block(text: &str) -> Vec<&str> {
    text.lines()
        .skip_while(|line| line.trim().is_empty())
        .take_while(|line| !line.trim().is_empty())
        .collect()
}

/// Classify clipboard text.
///
/// A block is a table when its first line is a pipe row and its second line
/// is a separator. A block whose first line is fenced by pipes (`| a | b |`)
/// also counts as a table attempt even without a valid separator, so that the
/// transpiler reports the malformed structure instead of it being pasted as
/// prose.
///
/// 只检测第一个连续文本块；关闭表格路由时一律按普通 Markdown 处理。
pub fn classify(text: &str, table_routing: bool) -> ContentKind {
    if !table_routing {
        return ContentKind::PlainMarkdown;
    }

    let block = first_block(text);
    let Some(first) = block.first() else {
        return ContentKind::PlainMarkdown;
    };

    if is_fenced_row(first) {
        return ContentKind::MarkdownTable;
    }

    let separator_follows = block.get(1).is_some_and(|line| is_separator_line(line));
    if has_unescaped_pipe(first) && separator_follows {
        ContentKind::MarkdownTable
    } else {
        ContentKind::PlainMarkdown
    }
}

/// `| a | b |`: pipes at both ends and at least two non-empty cells.
fn is_fenced_row(line: &str) -> bool {
    let trimmed = line.trim();
    let Some(inner) = trimmed
        .strip_prefix('|')
        .and_then(|rest| rest.strip_suffix('|'))
    else {
        return false;
    };
    if inner.ends_with('\\') {
        return false;
    }
    split_cells(trimmed)
        .iter()
        .filter(|cell| !cell.is_empty())
        .count()
        >= 2
}
