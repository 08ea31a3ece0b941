//! Content stream interpreter.
//!
//! Walks the operators decoded by [`lopdf::content::Content`], tracking the
//! CTM and text state, and reports one [`TextRun`] per text-showing operator.
//! Path, color and image operators are skipped.

use std::collections::HashMap;

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object};

use crate::document::{ExtractOptions, object_to_f64, resolve, stream_bytes};
use crate::error::{ExtractError, Result};
use crate::font::{Font, Glyph};
use crate::handler::{ContentHandler, TextRun};
use crate::matrix::Matrix;
use crate::text_state::{TextState, TextStateSnapshot};

/// Graphics state tracked across `q`/`Q` and Form XObject boundaries.
#[derive(Debug, Clone, Default)]
pub(crate) struct InterpreterState {
    ctm: Matrix,
    stack: Vec<(Matrix, TextStateSnapshot)>,
}

impl InterpreterState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn ctm(&self) -> &Matrix {
        &self.ctm
    }

    fn save(&mut self, text: TextStateSnapshot) {
        self.stack.push((self.ctm, text));
    }

    fn restore(&mut self) -> Option<TextStateSnapshot> {
        let (ctm, text) = self.stack.pop()?;
        self.ctm = ctm;
        Some(text)
    }

    /// `cm`: the new matrix is applied before the current CTM.
    fn concat(&mut self, m: Matrix) {
        self.ctm = m.multiply(&self.ctm);
    }
}

fn number(operands: &[Object], index: usize) -> Option<f64> {
    operands.get(index).and_then(|o| object_to_f64(o).ok())
}

fn string_bytes(obj: &Object) -> Option<&[u8]> {
    match obj {
        Object::String(bytes, _) => Some(bytes),
        _ => None,
    }
}

/// Interpret one content stream with the given resources.
#[allow(clippy::too_many_arguments)]
pub(crate) fn interpret_content_stream(
    doc: &Document,
    bytes: &[u8],
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
) -> Result<()> {
    if depth > options.max_recursion_depth {
        return Err(ExtractError::Interpreter(format!(
            "Form XObject recursion depth {depth} exceeds limit {}",
            options.max_recursion_depth
        )));
    }

    let content = Content::decode(bytes)
        .map_err(|e| ExtractError::Interpreter(format!("failed to decode content stream: {e}")))?;
    let mut fonts = FontCache::new(doc, resources);

    for op in &content.operations {
        let operands = op.operands.as_slice();
        match op.operator.as_str() {
            "q" => gstate.save(tstate.save_snapshot()),
            "Q" => {
                if let Some(snapshot) = gstate.restore() {
                    tstate.restore_snapshot(snapshot);
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_objects(operands) {
                    gstate.concat(m);
                }
            }

            "BT" => tstate.begin_text(),
            "ET" => {}
            "Tf" => {
                if let (Some(Object::Name(name)), Some(size)) =
                    (operands.first(), number(operands, 1))
                {
                    tstate.set_font(name.clone(), size);
                }
            }
            "Tm" => {
                if let Some(m) = Matrix::from_objects(operands) {
                    tstate.set_text_matrix(m);
                }
            }
            "Td" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    tstate.move_text_position(tx, ty);
                }
            }
            "TD" => {
                if let (Some(tx), Some(ty)) = (number(operands, 0), number(operands, 1)) {
                    tstate.move_text_position_and_set_leading(tx, ty);
                }
            }
            "T*" => tstate.move_to_next_line(),
            "TL" => {
                if let Some(v) = number(operands, 0) {
                    tstate.leading = v;
                }
            }
            "Tc" => {
                if let Some(v) = number(operands, 0) {
                    tstate.char_spacing = v;
                }
            }
            "Tw" => {
                if let Some(v) = number(operands, 0) {
                    tstate.word_spacing = v;
                }
            }
            "Tz" => {
                if let Some(v) = number(operands, 0) {
                    tstate.h_scaling = v;
                }
            }
            "Ts" => {
                if let Some(v) = number(operands, 0) {
                    tstate.rise = v;
                }
            }

            "Tj" => {
                if let Some(bytes) = operands.first().and_then(string_bytes) {
                    let font = fonts.get(&tstate.font_name);
                    show_text(&[TextItem::Glyphs(font.decode(bytes))], gstate, tstate, handler);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operands.first() {
                    let font = fonts.get(&tstate.font_name);
                    let items: Vec<TextItem> = items
                        .iter()
                        .filter_map(|item| match item {
                            Object::String(bytes, _) => Some(TextItem::Glyphs(font.decode(bytes))),
                            other => object_to_f64(other).ok().map(TextItem::Adjust),
                        })
                        .collect();
                    show_text(&items, gstate, tstate, handler);
                }
            }
            "'" => {
                tstate.move_to_next_line();
                if let Some(bytes) = operands.first().and_then(string_bytes) {
                    let font = fonts.get(&tstate.font_name);
                    show_text(&[TextItem::Glyphs(font.decode(bytes))], gstate, tstate, handler);
                }
            }
            "\"" => {
                if let (Some(aw), Some(ac)) = (number(operands, 0), number(operands, 1)) {
                    tstate.word_spacing = aw;
                    tstate.char_spacing = ac;
                }
                tstate.move_to_next_line();
                if let Some(bytes) = operands.get(2).and_then(string_bytes) {
                    let font = fonts.get(&tstate.font_name);
                    show_text(&[TextItem::Glyphs(font.decode(bytes))], gstate, tstate, handler);
                }
            }

            "Do" => {
                if let Some(Object::Name(name)) = operands.first() {
                    handle_do(doc, resources, handler, options, depth, gstate, tstate, name)?;
                }
            }
            _ => {}
        }
    }

    Ok(())
}

/// Fonts of one resource dictionary, loaded on first use.
struct FontCache<'a> {
    doc: &'a Document,
    fonts: Option<&'a Dictionary>,
    loaded: HashMap<Vec<u8>, Font>,
}

impl<'a> FontCache<'a> {
    fn new(doc: &'a Document, resources: &'a Dictionary) -> Self {
        let fonts = resources
            .get(b"Font")
            .ok()
            .map(|o| resolve(doc, o))
            .and_then(|o| o.as_dict().ok());
        Self {
            doc,
            fonts,
            loaded: HashMap::new(),
        }
    }

    fn get(&mut self, name: &[u8]) -> &Font {
        let (doc, fonts) = (self.doc, self.fonts);
        self.loaded.entry(name.to_vec()).or_insert_with(|| {
            let dict = fonts
                .and_then(|f| f.get(name).ok())
                .map(|o| resolve(doc, o))
                .and_then(|o| o.as_dict().ok());
            match dict {
                Some(dict) => Font::load(doc, dict),
                None => {
                    tracing::warn!(
                        font = %String::from_utf8_lossy(name),
                        "font not found in resources, using default"
                    );
                    Font::default()
                }
            }
        })
    }
}

enum TextItem {
    Glyphs(Vec<Glyph>),
    /// `TJ` position adjustment in thousandths of text space.
    Adjust(f64),
}

/// Report one run for the whole operator, then advance the pen past it.
fn show_text(
    items: &[TextItem],
    gstate: &InterpreterState,
    tstate: &mut TextState,
    handler: &mut dyn ContentHandler,
) {
    let trm = tstate.text_matrix().multiply(gstate.ctm());
    let (x, baseline) = trm.transform_point(0.0, tstate.rise);

    let text: String = items
        .iter()
        .filter_map(|item| match item {
            TextItem::Glyphs(glyphs) => Some(glyphs),
            TextItem::Adjust(_) => None,
        })
        .flatten()
        .map(|g| g.text.as_str())
        .collect();
    if !text.trim().is_empty() {
        handler.on_text(TextRun {
            text,
            x,
            baseline,
            font_size: tstate.font_size * trm.vertical_scale(),
        });
    }

    let th = tstate.h_scaling_normalized();
    for item in items {
        match item {
            TextItem::Glyphs(glyphs) => {
                for glyph in glyphs {
                    let mut tx = glyph.width / 1000.0 * tstate.font_size + tstate.char_spacing;
                    if glyph.is_space {
                        tx += tstate.word_spacing;
                    }
                    tstate.advance(tx * th);
                }
            }
            TextItem::Adjust(adj) => tstate.advance(-adj / 1000.0 * tstate.font_size * th),
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn handle_do(
    doc: &Document,
    resources: &Dictionary,
    handler: &mut dyn ContentHandler,
    options: &ExtractOptions,
    depth: usize,
    gstate: &mut InterpreterState,
    tstate: &mut TextState,
    name: &[u8],
) -> Result<()> {
    let display = String::from_utf8_lossy(name);
    let xobjects = resources
        .get(b"XObject")
        .map(|o| resolve(doc, o))
        .and_then(Object::as_dict)
        .map_err(|_| {
            ExtractError::Interpreter(format!("no /XObject dictionary in resources for Do /{display}"))
        })?;
    let stream = xobjects
        .get(name)
        .map(|o| resolve(doc, o))
        .and_then(Object::as_stream)
        .map_err(|e| ExtractError::Interpreter(format!("XObject /{display} unusable: {e}")))?;

    let is_form = matches!(
        stream.dict.get(b"Subtype").and_then(Object::as_name),
        Ok(b"Form")
    );
    if !is_form {
        return Ok(());
    }

    gstate.save(tstate.save_snapshot());
    if let Some(m) = stream
        .dict
        .get(b"Matrix")
        .and_then(Object::as_array)
        .ok()
        .and_then(|arr| Matrix::from_objects(arr))
    {
        gstate.concat(m);
    }

    let form_resources = stream
        .dict
        .get(b"Resources")
        .map(|o| resolve(doc, o))
        .and_then(Object::as_dict)
        .unwrap_or(resources);
    let bytes = stream_bytes(stream)?;

    interpret_content_stream(
        doc,
        &bytes,
        form_resources,
        handler,
        options,
        depth + 1,
        gstate,
        tstate,
    )?;

    if let Some(snapshot) = gstate.restore() {
        tstate.restore_snapshot(snapshot);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{Stream, dictionary};

    fn run(doc: &Document, content: &[u8], resources: &Dictionary) -> Result<Vec<TextRun>> {
        run_with_options(doc, content, resources, &ExtractOptions::default())
    }

    fn run_with_options(
        doc: &Document,
        content: &[u8],
        resources: &Dictionary,
        options: &ExtractOptions,
    ) -> Result<Vec<TextRun>> {
        let mut runs = Vec::new();
        interpret_content_stream(
            doc,
            content,
            resources,
            &mut runs,
            options,
            0,
            &mut InterpreterState::new(),
            &mut TextState::new(),
        )?;
        Ok(runs)
    }

    fn helvetica_resources(doc: &mut Document) -> Dictionary {
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        dictionary! { "Font" => dictionary! { "F1" => font_id } }
    }

    #[test]
    fn simple_text_run() {
        let mut doc = Document::with_version("1.5");
        let res = helvetica_resources(&mut doc);
        let runs = run(&doc, b"BT /F1 12 Tf 72 720 Td (Hello) Tj ET", &res).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello");
        assert_eq!(runs[0].x, 72.0);
        assert_eq!(runs[0].baseline, 720.0);
        assert_eq!(runs[0].font_size, 12.0);
    }

    #[test]
    fn consecutive_runs_advance_by_default_width() {
        let mut doc = Document::with_version("1.5");
        let res = helvetica_resources(&mut doc);
        let runs = run(&doc, b"BT /F1 10 Tf 100 500 Td (AB) Tj (C) Tj ET", &res).unwrap();
        assert_eq!(runs.len(), 2);
        // Two glyphs of 500/1000 em at 10pt.
        assert_eq!(runs[1].x, 110.0);
        assert_eq!(runs[1].baseline, 500.0);
    }

    #[test]
    fn tj_array_is_one_run_with_adjustments() {
        let mut doc = Document::with_version("1.5");
        let res = helvetica_resources(&mut doc);
        let runs = run(
            &doc,
            b"BT /F1 10 Tf 0 0 Td [(A) -1000 (B)] TJ (C) Tj ET",
            &res,
        )
        .unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "AB");
        // 5 (A) + 10 (adjustment) + 5 (B)
        assert_eq!(runs[1].x, 20.0);
    }

    #[test]
    fn whitespace_only_runs_are_dropped() {
        let mut doc = Document::with_version("1.5");
        let res = helvetica_resources(&mut doc);
        let runs = run(&doc, b"BT /F1 10 Tf (   ) Tj (x) Tj ET", &res).unwrap();
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "x");
        assert_eq!(runs[0].x, 15.0);
    }

    #[test]
    fn ctm_scales_position_and_size() {
        let mut doc = Document::with_version("1.5");
        let res = helvetica_resources(&mut doc);
        let runs = run(
            &doc,
            b"q 2 0 0 2 10 20 cm BT /F1 6 Tf 5 5 Td (x) Tj ET Q BT /F1 6 Tf 5 5 Td (y) Tj ET",
            &res,
        )
        .unwrap();
        assert_eq!(runs[0].x, 20.0);
        assert_eq!(runs[0].baseline, 30.0);
        assert_eq!(runs[0].font_size, 12.0);
        // Q restored the identity CTM.
        assert_eq!(runs[1].x, 5.0);
        assert_eq!(runs[1].font_size, 6.0);
    }

    #[test]
    fn quote_operators_move_to_next_line() {
        let mut doc = Document::with_version("1.5");
        let res = helvetica_resources(&mut doc);
        let runs = run(
            &doc,
            b"BT /F1 10 Tf 14 TL 50 700 Td (a) Tj (b) ' 1 0 (c) \" ET",
            &res,
        )
        .unwrap();
        let lines: Vec<(f64, f64)> = runs.iter().map(|r| (r.x, r.baseline)).collect();
        assert_eq!(lines, vec![(50.0, 700.0), (50.0, 686.0), (50.0, 672.0)]);
    }

    #[test]
    fn missing_font_falls_back_to_default() {
        let doc = Document::with_version("1.5");
        let runs = run(&doc, b"BT /F9 10 Tf (ok) Tj ET", &Dictionary::new()).unwrap();
        assert_eq!(runs[0].text, "ok");
    }

    #[test]
    fn form_xobject_text_is_transformed() {
        let mut doc = Document::with_version("1.5");
        let mut res = helvetica_resources(&mut doc);
        let form = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
                "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 100.into(), 200.into()],
            },
            b"BT /F1 10 Tf (inner) Tj ET".to_vec(),
        );
        let form_id = doc.add_object(form);
        res.set("XObject", dictionary! { "X1" => form_id });

        let runs = run(&doc, b"/X1 Do BT /F1 10 Tf (outer) Tj ET", &res).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "inner");
        assert_eq!((runs[0].x, runs[0].baseline), (100.0, 200.0));
        assert_eq!((runs[1].x, runs[1].baseline), (0.0, 0.0));
    }

    #[test]
    fn self_referencing_form_hits_recursion_limit() {
        let mut doc = Document::with_version("1.5");
        let form_id = doc.new_object_id();
        let resources = dictionary! { "XObject" => dictionary! { "Loop" => form_id } };
        doc.objects.insert(
            form_id,
            Object::Stream(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Form",
                    "Resources" => resources.clone(),
                },
                b"/Loop Do".to_vec(),
            )),
        );
        let options = ExtractOptions {
            max_recursion_depth: 3,
            ..ExtractOptions::default()
        };
        let err = run_with_options(&doc, b"/Loop Do", &resources, &options).unwrap_err();
        assert!(matches!(err, ExtractError::Interpreter(_)));
        assert!(err.to_string().contains("exceeds limit 3"));
    }

    #[test]
    fn unknown_xobject_is_an_error() {
        let doc = Document::with_version("1.5");
        let err = run(&doc, b"/Nope Do", &Dictionary::new()).unwrap_err();
        assert!(matches!(err, ExtractError::Interpreter(_)));
    }
}
