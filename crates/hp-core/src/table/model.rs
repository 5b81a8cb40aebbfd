use serde::{Deserialize, Serialize};

/// Column alignment taken from the separator line (`:--`, `:-:`, `--:`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Default,
    Left,
    Center,
    Right,
}

/// Inline style flags of a cell. Styles never nest, so at most one is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellStyle {
    pub bold: bool,
    pub italic: bool,
    pub code: bool,
    pub strikethrough: bool,
}

impl CellStyle {
    pub const PLAIN: CellStyle = CellStyle {
        bold: false,
        italic: false,
        code: false,
        strikethrough: false,
    };

    pub fn is_plain(&self) -> bool {
        *self == Self::PLAIN
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub text: String,
    pub style: CellStyle,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: CellStyle::PLAIN,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Parsed table.
///
/// Invariant: every body row has exactly `header.len()` cells and
/// `alignments.len() == header.len()`. The parser enforces this by padding
/// and truncation; [`TableModel::new`] enforces it for hand-built tables.
///
/// 表格模型：表头单独存放，数据行按源顺序排列。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableModel {
    header: Vec<Cell>,
    rows: Vec<Vec<Cell>>,
    alignments: Vec<Alignment>,
}

impl TableModel {
    pub fn new(header: Vec<Cell>, rows: Vec<Vec<Cell>>, alignments: Vec<Alignment>) -> Self {
        let width = header.len();
        let rows = rows.into_iter().map(|row| fit_to_width(row, width)).collect();
        let mut alignments = alignments;
        alignments.resize(width, Alignment::Default);
        Self {
            header,
            rows,
            alignments,
        }
    }

    pub fn header(&self) -> &[Cell] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn alignments(&self) -> &[Alignment] {
        &self.alignments
    }

    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header followed by body rows.
    pub fn all_rows(&self) -> impl Iterator<Item = &[Cell]> {
        std::iter::once(self.header.as_slice()).chain(self.rows.iter().map(Vec::as_slice))
    }
}

/// Pads short rows with empty cells and truncates long ones.
pub(crate) fn fit_to_width(mut row: Vec<Cell>, width: usize) -> Vec<Cell> {
    row.resize_with(width, Cell::empty);
    row
}
