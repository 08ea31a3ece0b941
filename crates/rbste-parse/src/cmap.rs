//! ToUnicode CMap parsing.
//!
//! Statement fonts are usually embedded subsets whose glyph codes mean nothing
//! without the `/ToUnicode` stream. Only the `bfchar` and `bfrange` sections
//! are read; everything else in the CMap program is skipped.

use std::collections::HashMap;

use crate::error::{ExtractError, Result};

/// Character code → Unicode string mapping from a `/ToUnicode` stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToUnicodeMap {
    mappings: HashMap<u32, String>,
}

#[derive(Debug, PartialEq)]
enum Token<'a> {
    Hex(&'a str),
    ArrayStart,
    ArrayEnd,
    Word(&'a str),
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if c.is_whitespace() {
            rest = &rest[c.len_utf8()..];
        } else if c == '%' {
            rest = rest.find('\n').map_or("", |nl| &rest[nl..]);
        } else if c == '<' {
            match rest[1..].find('>') {
                Some(end) => {
                    tokens.push(Token::Hex(&rest[1..1 + end]));
                    rest = &rest[end + 2..];
                }
                None => break,
            }
        } else if c == '[' {
            tokens.push(Token::ArrayStart);
            rest = &rest[1..];
        } else if c == ']' {
            tokens.push(Token::ArrayEnd);
            rest = &rest[1..];
        } else {
            let end = rest
                .find(|ch: char| ch.is_whitespace() || "<[]%".contains(ch))
                .unwrap_or(rest.len())
                .max(c.len_utf8());
            tokens.push(Token::Word(&rest[..end]));
            rest = &rest[end..];
        }
    }
    tokens
}

fn hex_code(hex: &str) -> Result<u32> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    u32::from_str_radix(&digits, 16)
        .map_err(|e| ExtractError::Font(format!("invalid CMap code <{hex}>: {e}")))
}

/// Decode a hex string of UTF-16BE code units.
fn utf16_hex(hex: &str) -> Result<String> {
    let digits: String = hex.chars().filter(|c| !c.is_whitespace()).collect();
    let digits = if digits.len() % 4 == 2 {
        format!("00{digits}")
    } else {
        digits
    };
    if digits.len() % 4 != 0 {
        return Err(ExtractError::Font(format!(
            "CMap destination <{hex}> is not UTF-16BE"
        )));
    }
    let units = digits
        .as_bytes()
        .chunks(4)
        .map(|chunk| {
            let s = std::str::from_utf8(chunk).unwrap_or_default();
            u16::from_str_radix(s, 16)
                .map_err(|e| ExtractError::Font(format!("invalid CMap destination <{hex}>: {e}")))
        })
        .collect::<Result<Vec<u16>>>()?;
    Ok(String::from_utf16_lossy(&units))
}

/// Destination for code `offset` positions past the start of a range: the
/// last UTF-16 unit is incremented.
fn offset_destination(start: &str, offset: u32) -> Option<String> {
    let mut units: Vec<u16> = start.encode_utf16().collect();
    let last = units.last_mut()?;
    *last = u16::try_from(u32::from(*last) + offset).ok()?;
    Some(String::from_utf16_lossy(&units))
}

impl ToUnicodeMap {
    /// Parse the decoded bytes of a `/ToUnicode` stream.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let text = String::from_utf8_lossy(data);
        let tokens = tokenize(&text);
        let mut mappings = HashMap::new();

        let mut i = 0;
        while i < tokens.len() {
            match tokens[i] {
                Token::Word("beginbfchar") => {
                    i += 1;
                    while let (Some(Token::Hex(src)), Some(Token::Hex(dst))) =
                        (tokens.get(i), tokens.get(i + 1))
                    {
                        mappings.insert(hex_code(src)?, utf16_hex(dst)?);
                        i += 2;
                    }
                }
                Token::Word("beginbfrange") => {
                    i += 1;
                    while let (Some(Token::Hex(lo)), Some(Token::Hex(hi))) =
                        (tokens.get(i), tokens.get(i + 1))
                    {
                        let (lo, hi) = (hex_code(lo)?, hex_code(hi)?);
                        i += 2;
                        match tokens.get(i) {
                            Some(Token::Hex(dst)) => {
                                let start = utf16_hex(dst)?;
                                // Stops once the destination leaves the
                                // UTF-16 unit range.
                                for code in lo..=hi {
                                    match offset_destination(&start, code - lo) {
                                        Some(s) => mappings.insert(code, s),
                                        None => break,
                                    };
                                }
                                i += 1;
                            }
                            Some(Token::ArrayStart) => {
                                i += 1;
                                let mut code = Some(lo);
                                while let Some(Token::Hex(dst)) = tokens.get(i) {
                                    if let Some(c) = code.filter(|c| *c <= hi) {
                                        mappings.insert(c, utf16_hex(dst)?);
                                    }
                                    code = code.and_then(|c| c.checked_add(1));
                                    i += 1;
                                }
                                if let Some(Token::ArrayEnd) = tokens.get(i) {
                                    i += 1;
                                }
                            }
                            _ => break,
                        }
                    }
                }
                _ => i += 1,
            }
        }

        Ok(Self { mappings })
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bfchar_single_mappings() {
        let data = b"/CIDInit /ProcSet findresource begin\n\
            2 beginbfchar\n<0003> <0020>\n<0024> <0410>\nendbfchar\nend";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.lookup(0x0003), Some(" "));
        assert_eq!(map.lookup(0x0024), Some("\u{0410}"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn bfrange_incrementing_destination() {
        let data = b"1 beginbfrange\n<0410> <0413> <0430>\nendbfrange";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.lookup(0x0410), Some("\u{0430}"));
        assert_eq!(map.lookup(0x0413), Some("\u{0433}"));
        assert_eq!(map.lookup(0x0414), None);
    }

    #[test]
    fn bfrange_array_destination() {
        let data = b"1 beginbfrange\n<01> <03> [<0052> <0055> <0052>]\nendbfrange";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.lookup(1), Some("R"));
        assert_eq!(map.lookup(2), Some("U"));
        assert_eq!(map.lookup(3), Some("R"));
    }

    #[test]
    fn huge_bfrange_stops_at_destination_limit() {
        let data = b"1 beginbfrange <00000000> <FFFFFFFF> <FFF0> endbfrange";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.len(), 16);
        assert_eq!(map.lookup(0), Some("\u{FFF0}"));
        assert_eq!(map.lookup(15), Some("\u{FFFF}"));
        assert_eq!(map.lookup(16), None);
    }

    #[test]
    fn bfrange_array_at_top_of_code_space() {
        let data = b"1 beginbfrange <FFFFFFFF> <FFFFFFFF> [<0041> <0042>] endbfrange";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.lookup(u32::MAX), Some("A"));
    }

    #[test]
    fn bfrange_array_with_extra_destinations_is_bounded() {
        let data = b"1 beginbfrange <01> <02> [<0041> <0042> <0043>] endbfrange 1 beginbfchar <05> <0045> endbfchar";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.lookup(2), Some("B"));
        assert_eq!(map.lookup(3), None);
        assert_eq!(map.lookup(5), Some("E"));
    }

    #[test]
    fn multiple_sections_and_one_line_layout() {
        let data = b"1 beginbfchar <41> <0041> endbfchar 1 beginbfchar <42> <0042> endbfchar";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.lookup(0x41), Some("A"));
        assert_eq!(map.lookup(0x42), Some("B"));
    }

    #[test]
    fn ligature_destination() {
        let data = b"1 beginbfchar <1F> <00660069> endbfchar";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.lookup(0x1F), Some("fi"));
    }

    #[test]
    fn comments_are_skipped() {
        let data = b"% <99> <0041>\n1 beginbfchar <41> <0041> endbfchar";
        let map = ToUnicodeMap::parse(data).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn invalid_hex_is_font_error() {
        let data = b"1 beginbfchar <zz> <0041> endbfchar";
        let err = ToUnicodeMap::parse(data).unwrap_err();
        assert!(matches!(err, ExtractError::Font(_)));
    }

    #[test]
    fn empty_stream() {
        assert!(ToUnicodeMap::parse(b"").unwrap().is_empty());
    }
}
