//! Export renderers: print HTML, XLSX workbook, PDF document.
//!
//! All renderers are pure functions of a derived grid plus the template
//! registry; identical input produces byte-identical output.

mod document;
mod print_view;
mod sector;
mod spreadsheet;

pub use document::write_document;
pub use print_view::{render_print_view, PrintMode};
pub use sector::filter_by_sector;
pub use spreadsheet::write_spreadsheet;
