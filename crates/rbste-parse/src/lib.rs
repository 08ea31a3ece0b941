//! rbste-parse: positioned text extraction from statement PDFs.
//!
//! Loads a document with [lopdf](https://crates.io/crates/lopdf), interprets
//! each page's content stream and produces [`rbste_core::Page`] values whose
//! fragments are positioned in extractor units (16 PDF points, y measured
//! downward from the top of the page). Text is decoded through ToUnicode maps
//! where present, falling back to the font's byte encoding.

pub mod cmap;
pub mod document;
pub mod error;
pub mod font;
mod handler;
mod interpreter;
pub mod matrix;
pub mod text_state;

pub use document::{ExtractOptions, StatementDocument};
pub use error::{ExtractError, Result};
pub use rbste_core;
