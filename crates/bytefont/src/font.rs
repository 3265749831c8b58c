use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use crate::{read_byte_font, write_byte_font, ByteFontError, FontMetadata, GlyphBitmap, Result, WriteOptions};

/// A bitmap font loaded from or written to a .bff file.
///
/// Glyph data is never handed out by reference, every accessor returns a copy.
///
/// Glyphs are keyed by `char`, so surrogate code points (`0xD800..=0xDFFF`)
/// cannot be stored. The reader drops `BEGIN` blocks naming one and reports
/// them as [`ByteFontError::InvalidCodePoint`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ByteFont {
    metadata: FontMetadata,
    glyphs: HashMap<char, GlyphBitmap>,
}

impl ByteFont {
    pub fn new(metadata: FontMetadata) -> Self {
        Self {
            metadata,
            glyphs: HashMap::new(),
        }
    }

    pub fn metadata(&self) -> &FontMetadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    pub fn size(&self) -> i32 {
        self.metadata.size()
    }

    pub fn style(&self) -> i32 {
        self.metadata.style()
    }

    /// The explicit height if there is one, otherwise 8 times the largest
    /// glyph byte height (0 for a font without glyphs).
    pub fn height(&self) -> i32 {
        if let Some(height) = self.metadata.explicit_height() {
            return height;
        }
        self.glyphs.values().map(GlyphBitmap::pixel_height).max().unwrap_or(0) as i32
    }

    pub fn explicit_height(&self) -> Option<i32> {
        self.metadata.explicit_height()
    }

    pub fn char_count(&self) -> usize {
        self.glyphs.len()
    }

    pub fn contains(&self, ch: char) -> bool {
        self.glyphs.contains_key(&ch)
    }

    /// Copy of the glyph for `ch`, an empty bitmap if the font has none.
    pub fn get_bytes(&self, ch: char) -> GlyphBitmap {
        self.glyph(ch).unwrap_or_default()
    }

    pub fn glyph(&self, ch: char) -> Option<GlyphBitmap> {
        self.glyphs.get(&ch).cloned()
    }

    /// All stored code points in ascending order.
    pub fn chars(&self) -> Vec<char> {
        let mut chars: Vec<char> = self.glyphs.keys().copied().collect();
        chars.sort_unstable();
        chars
    }

    /// Adds a glyph unless `ch` already has one. Empty bitmaps are never stored.
    ///
    /// Returns `false` if nothing was added; the existing glyph stays untouched.
    pub fn add_char(&mut self, ch: char, glyph: GlyphBitmap) -> bool {
        if glyph.is_empty() {
            return false;
        }
        if self.glyphs.contains_key(&ch) {
            return false;
        }
        self.glyphs.insert(ch, glyph);
        true
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| ByteFontError::open_file(path, e.to_string()))?;
        read_byte_font(BufReader::new(file))
    }

    pub fn save(&self, path: impl AsRef<Path>, options: &WriteOptions) -> Result<()> {
        let path = path.as_ref();
        self.metadata.validate()?;
        let file = File::create(path).map_err(|e| ByteFontError::open_file(path, e.to_string()))?;
        let mut writer = BufWriter::new(file);
        write_byte_font(self, options, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
