use std::io::Write;

use crate::{ByteFont, FontMetadata, GlyphBitmap, Result, HEIGHT_UNSPECIFIED, KEY_HEIGHT, KEY_NAME, KEY_SIZE, KEY_STYLE};

pub const META_BEGIN: &str = "META_BEGIN";
pub const META_END: &str = "META_END";
pub const GLYPH_BEGIN: &str = "BEGIN";
pub const GLYPH_END: &str = "END";

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Emit a `# char 'X' with decimal value 'N'` line in front of every glyph.
    pub comments: bool,
}

/// Streams a .bff file: one [`ByteFontWriter::write_meta`] call followed by any
/// number of [`ByteFontWriter::write_glyph`] calls.
pub struct ByteFontWriter<W: Write> {
    out: W,
    options: WriteOptions,
    glyphs_written: usize,
}

impl<W: Write> ByteFontWriter<W> {
    pub fn new(out: W, options: WriteOptions) -> Self {
        Self {
            out,
            options,
            glyphs_written: 0,
        }
    }

    /// Fails with [`crate::ByteFontError::InvalidMetadata`] before writing
    /// anything if the reader could not load `meta` back.
    pub fn write_meta(&mut self, meta: &FontMetadata) -> Result<()> {
        meta.validate()?;
        writeln!(self.out, "{META_BEGIN}")?;
        self.write_meta_line(KEY_NAME, meta.name())?;
        self.write_meta_line(KEY_SIZE, &meta.size().to_string())?;
        self.write_meta_line(KEY_STYLE, &meta.style().to_string())?;
        if meta.height() != HEIGHT_UNSPECIFIED {
            self.write_meta_line(KEY_HEIGHT, &meta.height().to_string())?;
        }
        for (key, value) in meta.extra() {
            self.write_meta_line(key, value)?;
        }
        writeln!(self.out, "{META_END}")?;
        writeln!(self.out)?;
        Ok(())
    }

    fn write_meta_line(&mut self, key: &str, value: &str) -> Result<()> {
        writeln!(self.out, "{INDENT}{} {value}", key.to_uppercase())?;
        Ok(())
    }

    /// Writes one glyph block. Returns `false` and writes nothing for an empty bitmap.
    pub fn write_glyph(&mut self, ch: char, glyph: &GlyphBitmap) -> Result<bool> {
        if glyph.is_empty() {
            return Ok(false);
        }
        if self.options.comments {
            writeln!(self.out, "# char '{}' with decimal value '{}'", ch.escape_debug(), ch as u32)?;
        }
        writeln!(self.out, "{GLYPH_BEGIN} {}", ch as u32)?;
        for row in glyph.rows() {
            let tokens: Vec<String> = row.iter().map(|b| format!("{b:x}")).collect();
            writeln!(self.out, "{INDENT}{}", tokens.join(";"))?;
        }
        writeln!(self.out, "{GLYPH_END}")?;
        self.glyphs_written += 1;
        Ok(true)
    }

    pub fn glyphs_written(&self) -> usize {
        self.glyphs_written
    }

    pub fn into_inner(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Encodes a whole font, glyphs in ascending code point order.
pub fn write_byte_font(font: &ByteFont, options: &WriteOptions, out: impl Write) -> Result<()> {
    let mut writer = ByteFontWriter::new(out, *options);
    writer.write_meta(font.metadata())?;
    for ch in font.chars() {
        writer.write_glyph(ch, &font.get_bytes(ch))?;
    }
    writer.into_inner()?;
    Ok(())
}

/// Encodes a whole font into a string.
pub fn to_bff_string(font: &ByteFont, options: &WriteOptions) -> Result<String> {
    let mut out = Vec::new();
    write_byte_font(font, options, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
