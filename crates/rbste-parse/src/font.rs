//! Font resources: code decoding and glyph widths.
//!
//! Only what is needed to turn a shown string into text and a horizontal
//! advance is loaded. Simple fonts use one byte per code; Type0 fonts use two
//! (statement generators emit Identity-H for their embedded fonts).

use std::collections::HashMap;

use encoding_rs::Encoding;
use lopdf::{Dictionary, Document, Object};

use crate::cmap::ToUnicodeMap;
use crate::document::{object_to_f64, resolve};

/// Glyph width used when a simple font has no `/Widths` entry for a code.
const DEFAULT_SIMPLE_WIDTH: f64 = 500.0;
/// Default `/DW` of a CID font.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone)]
enum Widths {
    Simple {
        first_char: u32,
        widths: Vec<f64>,
        missing: f64,
    },
    Cid {
        default: f64,
        widths: HashMap<u32, f64>,
        /// `c_first c_last w` entries, kept as ranges.
        ranges: Vec<(u32, u32, f64)>,
    },
}

/// One decoded glyph of a shown string.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub code: u32,
    pub text: String,
    /// Width in glyph space (thousandths of text space).
    pub width: f64,
    /// Whether this is the single-byte space, which receives word spacing.
    pub is_space: bool,
}

/// A loaded font resource.
#[derive(Debug, Clone)]
pub struct Font {
    two_byte: bool,
    to_unicode: Option<ToUnicodeMap>,
    encoding: &'static Encoding,
    widths: Widths,
}

impl Default for Font {
    /// Fallback for names missing from the page resources.
    fn default() -> Self {
        Self {
            two_byte: false,
            to_unicode: None,
            encoding: encoding_rs::WINDOWS_1252,
            widths: Widths::Simple {
                first_char: 0,
                widths: Vec::new(),
                missing: DEFAULT_SIMPLE_WIDTH,
            },
        }
    }
}

impl Font {
    /// Load a font from its dictionary.
    pub fn load(doc: &Document, dict: &Dictionary) -> Self {
        let is_type0 = matches!(dict.get(b"Subtype").and_then(Object::as_name), Ok(b"Type0"));
        let to_unicode = load_to_unicode(doc, dict);

        if is_type0 {
            let descendant = dict
                .get(b"DescendantFonts")
                .ok()
                .map(|o| resolve(doc, o))
                .and_then(|o| o.as_array().ok())
                .and_then(|arr| arr.first())
                .map(|o| resolve(doc, o))
                .and_then(|o| o.as_dict().ok());
            Self {
                two_byte: true,
                to_unicode,
                encoding: encoding_rs::UTF_16BE,
                widths: descendant.map_or(
                    Widths::Cid {
                        default: DEFAULT_CID_WIDTH,
                        widths: HashMap::new(),
                        ranges: Vec::new(),
                    },
                    |d| cid_widths(doc, d),
                ),
            }
        } else {
            Self {
                two_byte: false,
                to_unicode,
                encoding: simple_encoding(doc, dict),
                widths: simple_widths(doc, dict),
            }
        }
    }

    pub fn is_two_byte(&self) -> bool {
        self.two_byte
    }

    /// Split a shown string into glyphs, decoding each code to Unicode.
    ///
    /// Resolution order: ToUnicode map, then the font's byte encoding for
    /// simple fonts, then the code point itself for Type0 fonts.
    pub fn decode(&self, bytes: &[u8]) -> Vec<Glyph> {
        let codes: Vec<u32> = if self.two_byte {
            bytes
                .chunks(2)
                .map(|pair| match pair {
                    [hi, lo] => (u32::from(*hi) << 8) | u32::from(*lo),
                    [single] => u32::from(*single),
                    _ => 0,
                })
                .collect()
        } else {
            bytes.iter().map(|&b| u32::from(b)).collect()
        };

        codes
            .into_iter()
            .map(|code| Glyph {
                code,
                text: self.unicode_for(code),
                width: self.width(code),
                is_space: !self.two_byte && code == 32,
            })
            .collect()
    }

    fn unicode_for(&self, code: u32) -> String {
        if let Some(s) = self.to_unicode.as_ref().and_then(|m| m.lookup(code)) {
            return s.to_string();
        }
        if self.two_byte {
            return char::from_u32(code).map(String::from).unwrap_or_default();
        }
        let byte = [code as u8];
        let (decoded, _, _) = self.encoding.decode(&byte);
        decoded.into_owned()
    }

    /// Glyph width in thousandths of text space.
    pub fn width(&self, code: u32) -> f64 {
        match &self.widths {
            Widths::Simple {
                first_char,
                widths,
                missing,
            } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied()
                .unwrap_or(*missing),
            Widths::Cid {
                default,
                widths,
                ranges,
            } => widths
                .get(&code)
                .copied()
                .or_else(|| {
                    ranges
                        .iter()
                        .find(|(start, end, _)| (*start..=*end).contains(&code))
                        .map(|(_, _, w)| *w)
                })
                .unwrap_or(*default),
        }
    }
}

fn load_to_unicode(doc: &Document, dict: &Dictionary) -> Option<ToUnicodeMap> {
    let stream = resolve(doc, dict.get(b"ToUnicode").ok()?).as_stream().ok()?;
    let data = crate::document::stream_bytes(stream).ok()?;
    match ToUnicodeMap::parse(&data) {
        Ok(map) => Some(map),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable ToUnicode map");
            None
        }
    }
}

fn simple_encoding(doc: &Document, dict: &Dictionary) -> &'static Encoding {
    let name = dict.get(b"Encoding").ok().map(|o| resolve(doc, o)).and_then(|o| {
        o.as_name().ok().or_else(|| {
            o.as_dict()
                .ok()
                .and_then(|d| d.get(b"BaseEncoding").ok())
                .and_then(|b| b.as_name().ok())
        })
    });
    match name {
        Some(b"MacRomanEncoding") => encoding_rs::MACINTOSH,
        _ => encoding_rs::WINDOWS_1252,
    }
}

fn simple_widths(doc: &Document, dict: &Dictionary) -> Widths {
    let first_char = dict
        .get(b"FirstChar")
        .ok()
        .and_then(|o| object_to_f64(resolve(doc, o)).ok())
        .map_or(0, |v| v as u32);
    let widths = dict
        .get(b"Widths")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok())
        .map(|arr| {
            arr.iter()
                .map(|w| object_to_f64(resolve(doc, w)).unwrap_or(0.0))
                .collect()
        })
        .unwrap_or_default();
    let missing = dict
        .get(b"FontDescriptor")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_dict().ok())
        .and_then(|fd| fd.get(b"MissingWidth").ok())
        .and_then(|o| object_to_f64(resolve(doc, o)).ok())
        .filter(|w| *w > 0.0)
        .unwrap_or(DEFAULT_SIMPLE_WIDTH);
    Widths::Simple {
        first_char,
        widths,
        missing,
    }
}

/// Parse `/DW` and `/W` of a descendant CID font.
///
/// `/W` mixes two forms: `c [w1 w2 ...]` assigns consecutive widths from `c`,
/// and `c_first c_last w` assigns one width to a range.
fn cid_widths(doc: &Document, dict: &Dictionary) -> Widths {
    let default = dict
        .get(b"DW")
        .ok()
        .and_then(|o| object_to_f64(resolve(doc, o)).ok())
        .unwrap_or(DEFAULT_CID_WIDTH);
    let mut widths = HashMap::new();
    let mut ranges = Vec::new();

    let entries = dict
        .get(b"W")
        .ok()
        .map(|o| resolve(doc, o))
        .and_then(|o| o.as_array().ok());
    if let Some(entries) = entries {
        let mut i = 0;
        while i < entries.len() {
            let Ok(start) = object_to_f64(resolve(doc, &entries[i])) else {
                break;
            };
            let start = start as u32;
            match entries.get(i + 1).map(|o| resolve(doc, o)) {
                Some(Object::Array(list)) => {
                    for (offset, w) in list.iter().enumerate() {
                        let code = u32::try_from(offset).ok().and_then(|o| start.checked_add(o));
                        if let (Some(code), Ok(w)) = (code, object_to_f64(resolve(doc, w))) {
                            widths.insert(code, w);
                        }
                    }
                    i += 2;
                }
                Some(end) => {
                    let (Ok(end), Some(Ok(w))) = (
                        object_to_f64(end),
                        entries.get(i + 2).map(|o| object_to_f64(resolve(doc, o))),
                    ) else {
                        break;
                    };
                    // Inverted ranges match nothing.
                    ranges.push((start, end as u32, w));
                    i += 3;
                }
                None => break,
            }
        }
    }

    Widths::Cid {
        default,
        widths,
        ranges,
    }
}
