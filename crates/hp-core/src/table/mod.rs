//! Markdown table model, parser and renderers.

pub mod model;
pub mod parser;
pub mod render;

pub use model::{Alignment, Cell, CellStyle, TableModel};
pub use parser::transpile;
pub use render::{render_csv, render_html, render_tsv, RenderError};
