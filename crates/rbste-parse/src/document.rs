//! Statement document loading and per-page text extraction.

use std::collections::HashSet;
use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use rbste_core::{Page, TextFragment};

use crate::error::{ExtractError, Result};
use crate::handler::TextRun;
use crate::interpreter::{InterpreterState, interpret_content_stream};
use crate::text_state::TextState;

/// Options controlling the extractor's coordinate system.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// PDF points per extractor unit.
    pub points_per_unit: f64,
    /// Decimal places kept in fragment coordinates.
    pub precision: u32,
    /// Maximum nesting of Form XObjects.
    pub max_recursion_depth: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            points_per_unit: 16.0,
            precision: 3,
            max_recursion_depth: 10,
        }
    }
}

impl ExtractOptions {
    fn round(&self, value: f64) -> f64 {
        let factor = 10f64.powi(self.precision as i32);
        let rounded = (value * factor).round() / factor;
        // Avoid -0.0 in output coordinates.
        if rounded == 0.0 { 0.0 } else { rounded }
    }
}

/// A loaded bank statement PDF.
pub struct StatementDocument {
    inner: Document,
    page_ids: Vec<ObjectId>,
    options: ExtractOptions,
}

impl std::fmt::Debug for StatementDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatementDocument")
            .field("page_count", &self.page_ids.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl StatementDocument {
    /// Parse a PDF from memory with default options.
    pub fn open(bytes: &[u8]) -> Result<Self> {
        Self::open_with_options(bytes, ExtractOptions::default())
    }

    pub fn open_with_options(bytes: &[u8], options: ExtractOptions) -> Result<Self> {
        Self::from_document(Document::load_mem(bytes)?, options)
    }

    fn from_document(inner: Document, options: ExtractOptions) -> Result<Self> {
        if inner.is_encrypted() {
            return Err(ExtractError::Encrypted);
        }
        // get_pages is keyed by 1-based page number.
        let page_ids = inner.get_pages().values().copied().collect();
        Ok(Self {
            inner,
            page_ids,
            options,
        })
    }

    /// Read and parse a PDF file with default options.
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Self::open(&bytes)
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Extract the text fragments of the page at `index` (0-based).
    pub fn page(&self, index: usize) -> Result<Page> {
        let page_id = *self
            .page_ids
            .get(index)
            .ok_or(ExtractError::PageOutOfRange {
                index,
                count: self.page_ids.len(),
            })?;
        let doc = &self.inner;
        let page_dict = doc.get_object(page_id).and_then(Object::as_dict)?;

        let media_box = media_box(doc, page_id)?;
        let resources = page_resources(doc, page_id)?;
        let content = page_content_bytes(doc, page_dict)?;

        let mut runs: Vec<TextRun> = Vec::new();
        if !content.is_empty() {
            interpret_content_stream(
                doc,
                &content,
                resources,
                &mut runs,
                &self.options,
                0,
                &mut InterpreterState::new(),
                &mut TextState::new(),
            )?;
        }

        let ppu = self.options.points_per_unit;
        let [x0, y0, x1, y1] = media_box;
        let texts = runs
            .into_iter()
            .map(|run| {
                let top = y1 - (run.baseline + run.font_size);
                TextFragment::new(
                    self.options.round((run.x - x0) / ppu),
                    self.options.round(top / ppu),
                    run.text,
                )
            })
            .collect::<Vec<_>>();

        tracing::debug!(page = index, fragments = texts.len(), "extracted page text");
        Ok(Page::new((x1 - x0) / ppu, (y1 - y0) / ppu, texts))
    }

    /// Extract every page in document order.
    pub fn pages(&self) -> Result<Vec<Page>> {
        (0..self.page_count()).map(|i| self.page(i)).collect()
    }
}

/// Convert a lopdf numeric object (Integer or Real) to f64.
pub(crate) fn object_to_f64(obj: &Object) -> Result<f64> {
    match obj {
        Object::Integer(i) => Ok(*i as f64),
        Object::Real(f) => Ok(f64::from(*f)),
        _ => Err(ExtractError::Parse(format!("expected number, got {obj:?}"))),
    }
}

/// Follow an indirect reference, returning the object itself otherwise.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Stream content, decompressed when a filter is present.
pub(crate) fn stream_bytes(stream: &Stream) -> Result<Vec<u8>> {
    if stream.dict.get(b"Filter").is_ok() {
        stream
            .decompressed_content()
            .map_err(|e| ExtractError::Parse(format!("failed to decompress stream: {e}")))
    } else {
        Ok(stream.content.clone())
    }
}

/// Look up a page attribute, walking `/Parent` links for inherited keys.
fn resolve_inherited<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>> {
    let mut current = page_id;
    let mut visited = HashSet::new();
    loop {
        if !visited.insert(current) {
            return Err(ExtractError::Parse("cyclic /Parent chain".into()));
        }
        let dict = doc.get_object(current).and_then(Object::as_dict)?;
        if let Ok(value) = dict.get(key) {
            return Ok(Some(resolve(doc, value)));
        }
        match dict.get(b"Parent") {
            Ok(parent) => current = parent.as_reference()?,
            Err(_) => return Ok(None),
        }
    }
}

fn media_box(doc: &Document, page_id: ObjectId) -> Result<[f64; 4]> {
    let array = resolve_inherited(doc, page_id, b"MediaBox")?
        .ok_or_else(|| ExtractError::Parse("MediaBox not found on page or ancestors".into()))?
        .as_array()?;
    match array.as_slice() {
        [a, b, c, d] => {
            let (x0, y0, x1, y1) = (
                object_to_f64(resolve(doc, a))?,
                object_to_f64(resolve(doc, b))?,
                object_to_f64(resolve(doc, c))?,
                object_to_f64(resolve(doc, d))?,
            );
            Ok([x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1)])
        }
        other => Err(ExtractError::Parse(format!(
            "expected 4-element MediaBox, got {}",
            other.len()
        ))),
    }
}

fn page_resources(doc: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    static EMPTY: std::sync::LazyLock<Dictionary> = std::sync::LazyLock::new(Dictionary::new);
    match resolve_inherited(doc, page_id, b"Resources")? {
        Some(obj) => obj
            .as_dict()
            .map_err(|_| ExtractError::Parse("/Resources is not a dictionary".into())),
        None => Ok(&*EMPTY),
    }
}

/// Concatenated page content; `/Contents` may be one stream or an array.
fn page_content_bytes(doc: &Document, page_dict: &Dictionary) -> Result<Vec<u8>> {
    let Ok(contents) = page_dict.get(b"Contents") else {
        return Ok(Vec::new());
    };
    match resolve(doc, contents) {
        Object::Stream(stream) => stream_bytes(stream),
        Object::Array(parts) => {
            let mut content = Vec::new();
            for part in parts {
                let stream = resolve(doc, part).as_stream()?;
                content.extend(stream_bytes(stream)?);
                content.push(b'\n');
            }
            Ok(content)
        }
        other => Err(ExtractError::Parse(format!(
            "/Contents is neither a stream nor an array: {other:?}"
        ))),
    }
}
