//! Line based .bff decoder.
//!
//! The file is a `META_BEGIN`/`META_END` section with `KEY value` lines followed
//! by glyph blocks:
//!
//! ```text
//! META_BEGIN
//!   NAME Arial
//!   SIZE 10
//!   STYLE 1
//! META_END
//!
//! BEGIN 65
//!   1;2
//!   ff;0
//! END
//! ```
//!
//! Blank lines and lines starting with `#` are ignored everywhere. Broken
//! metadata aborts the whole decode, a broken glyph block only loses that glyph.

use std::{collections::BTreeMap, io::BufRead, mem};

use crate::{ByteFont, ByteFontError, FontMetadata, GlyphBitmap, Result, GLYPH_BEGIN, GLYPH_END, META_BEGIN, META_END};

enum State {
    SeekingMeta,
    InMeta(BTreeMap<String, String>),
    SeekingGlyph,
    InGlyph { ch: char, rows: Vec<Vec<u8>> },
}

/// Result of a decode that got past the metadata section.
#[derive(Debug)]
pub struct Decoded {
    pub font: ByteFont,
    /// Glyph blocks that were dropped, in file order.
    pub skipped: Vec<ByteFontError>,
}

/// Push style decoder, feed it one line at a time.
pub struct ByteFontReader {
    state: State,
    font: Option<ByteFont>,
    skipped: Vec<ByteFontError>,
    line_number: usize,
}

impl Default for ByteFontReader {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteFontReader {
    pub fn new() -> Self {
        Self {
            state: State::SeekingMeta,
            font: None,
            skipped: Vec::new(),
            line_number: 0,
        }
    }

    /// Processes the next line. Only metadata errors are returned, glyph errors
    /// are logged and collected.
    pub fn feed_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        match mem::replace(&mut self.state, State::SeekingGlyph) {
            State::SeekingMeta => {
                self.state = if line == META_BEGIN {
                    State::InMeta(BTreeMap::new())
                } else if line == META_END {
                    return Err(ByteFontError::MissingMetadata);
                } else {
                    State::SeekingMeta
                };
            }
            State::InMeta(mut meta) => {
                if line == META_BEGIN {
                    self.state = State::InMeta(BTreeMap::new());
                } else if line == META_END {
                    let metadata = FontMetadata::from_meta(&meta)?;
                    log::debug!("read meta for '{}' size {} style {}", metadata.name(), metadata.size(), metadata.style());
                    self.font = Some(ByteFont::new(metadata));
                    self.state = State::SeekingGlyph;
                } else {
                    if let Some((key, value)) = line.split_once(' ') {
                        meta.insert(key.to_lowercase(), value.to_string());
                    }
                    self.state = State::InMeta(meta);
                }
            }
            State::SeekingGlyph => {
                if let Some(code) = line.strip_prefix(GLYPH_BEGIN).and_then(|l| l.strip_prefix(' ')) {
                    self.begin_glyph(code, line);
                }
            }
            State::InGlyph { ch, mut rows } => {
                if let Some(code) = line.strip_prefix(GLYPH_BEGIN).and_then(|l| l.strip_prefix(' ')) {
                    log::warn!("glyph {ch:?} not terminated before line {}, dropped", self.line_number);
                    self.begin_glyph(code, line);
                } else if line == GLYPH_END {
                    self.commit_glyph(ch, &rows);
                } else {
                    match self.parse_row(line, ch, rows.first().map(Vec::len)) {
                        Ok(row) => {
                            rows.push(row);
                            self.state = State::InGlyph { ch, rows };
                        }
                        Err(err) => self.skip(err),
                    }
                }
            }
        }
        Ok(())
    }

    fn begin_glyph(&mut self, code: &str, line: &str) {
        match code.parse::<u32>().ok().and_then(char::from_u32) {
            Some(ch) => self.state = State::InGlyph { ch, rows: Vec::new() },
            None => self.skip(ByteFontError::InvalidCodePoint {
                line: self.line_number,
                text: line.to_string(),
            }),
        }
    }

    fn parse_row(&self, line: &str, ch: char, expected: Option<usize>) -> Result<Vec<u8>> {
        let invalid = || ByteFontError::InvalidHexRow {
            line: self.line_number,
            text: line.to_string(),
            ch,
        };
        let mut row = Vec::new();
        for token in line.split(';') {
            if token.is_empty() || !token.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            row.push(u8::from_str_radix(token, 16).map_err(|_| invalid())?);
        }
        if let Some(expected) = expected {
            if row.len() != expected {
                return Err(ByteFontError::RaggedGlyph {
                    line: self.line_number,
                    ch,
                    expected,
                    actual: row.len(),
                });
            }
        }
        Ok(row)
    }

    fn commit_glyph(&mut self, ch: char, rows: &[Vec<u8>]) {
        let Some(font) = &mut self.font else {
            return;
        };
        let glyph = match GlyphBitmap::from_rows(rows) {
            Ok(glyph) => glyph,
            Err(err) => {
                log::error!("glyph {ch:?} ending at line {}: {err}", self.line_number);
                return;
            }
        };
        if glyph.is_empty() {
            log::warn!("glyph {ch:?} ending at line {} has no data, skipped", self.line_number);
            return;
        }
        if !font.add_char(ch, glyph) {
            log::warn!("duplicate glyph {ch:?} at line {} ignored", self.line_number);
        }
    }

    fn skip(&mut self, err: ByteFontError) {
        log::error!("{err}!");
        self.skipped.push(err);
        self.state = State::SeekingGlyph;
    }

    /// Ends the input. Fails if no metadata section was completed.
    pub fn finish(self) -> Result<Decoded> {
        if let State::InGlyph { ch, .. } = &self.state {
            log::warn!("input ended inside glyph {ch:?}, dropped");
        }
        let Some(font) = self.font else {
            return Err(ByteFontError::MissingMetadata);
        };
        Ok(Decoded { font, skipped: self.skipped })
    }
}

/// Decodes a whole .bff stream and reports the glyph blocks that were dropped.
pub fn decode(reader: impl BufRead) -> Result<Decoded> {
    let mut decoder = ByteFontReader::new();
    for line in reader.lines() {
        decoder.feed_line(&line?)?;
    }
    decoder.finish()
}

pub fn read_byte_font(reader: impl BufRead) -> Result<ByteFont> {
    let decoded = decode(reader)?;
    if !decoded.skipped.is_empty() {
        log::warn!("{} glyph(s) of '{}' could not be read", decoded.skipped.len(), decoded.font.name());
    }
    Ok(decoded.font)
}

pub fn from_bff_str(text: &str) -> Result<ByteFont> {
    read_byte_font(text.as_bytes())
}
