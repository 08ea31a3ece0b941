//! rbste-core: backend-independent statement reconstruction.
//!
//! This crate holds the data model ([`TextFragment`], [`Page`], [`Row`],
//! [`OutputTable`]) and the layout heuristics that turn scattered positioned
//! text into statement rows: template filtering, y-grouping, merging of
//! wrapped description lines and amount cleanup. It knows nothing about PDF
//! parsing or spreadsheet formats.

pub mod error;
pub mod fragment;
pub mod layout;
pub mod pipeline;
pub mod rows;
pub mod table;

pub use error::LayoutError;
pub use fragment::{Page, PageRole, TextFragment};
pub use layout::{LayoutOptions, YBand, filter_page};
pub use pipeline::{page_rows, reconstruct};
pub use rows::{RowGroup, group_rows, merge_paragraphs, serialize_rows};
pub use table::{Column, OutputTable, Row, strip_currency_suffix};
