//! Turning a rasterizer's output into a .bff file.

use std::{io::Write, ops::Range, time::Instant};

use crate::{pack, ByteFontWriter, FontMetadata, GlyphBitmap, PixelGrid, Result, WriteOptions};

/// Source of monochrome glyph images, usually backed by a font file.
pub trait Rasterizer {
    /// Height of one text line in pixels. Every rendered glyph uses it as row count.
    fn line_height(&self) -> u32;

    /// Rendered width of `ch` in pixels.
    fn advance_width(&self, ch: char) -> u32;

    /// Renders `ch` into an `advance_width x line_height` grid.
    ///
    /// Returns `None` if the font has no glyph for `ch`.
    fn render(&self, ch: char) -> Option<PixelGrid>;
}

/// Renders `ch` and packs it. Code points without a glyph produce an empty bitmap.
pub fn rasterize_glyph(rasterizer: &impl Rasterizer, ch: char) -> GlyphBitmap {
    match rasterizer.render(ch) {
        Some(grid) => pack(&grid, rasterizer.line_height() as usize),
        None => GlyphBitmap::default(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateStats {
    pub written: usize,
    pub skipped: usize,
}

/// Writes the metadata and every glyph of `range` that renders to at least one column.
pub fn generate(rasterizer: &impl Rasterizer, meta: &FontMetadata, range: Range<u32>, options: &WriteOptions, out: impl Write) -> Result<GenerateStats> {
    let start = Instant::now();
    let mut writer = ByteFontWriter::new(out, *options);
    let mut stats = GenerateStats::default();

    writer.write_meta(meta)?;
    for code in range {
        let Some(ch) = char::from_u32(code) else {
            stats.skipped += 1;
            continue;
        };
        let glyph = rasterize_glyph(rasterizer, ch);
        log::trace!("{:?} | {} : {{\n{glyph}\n}}", ch, code);
        if !writer.write_glyph(ch, &glyph)? {
            log::debug!("skipping {ch:?} ({code}), nothing rendered");
            stats.skipped += 1;
        }
    }
    stats.written = writer.glyphs_written();
    writer.into_inner()?;

    log::debug!(
        "wrote {} glyphs, skipped {} ({}ms)",
        stats.written,
        stats.skipped,
        start.elapsed().as_millis()
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Draws a filled box for 'A'..='Z', nothing else.
    struct BoxRasterizer;

    impl Rasterizer for BoxRasterizer {
        fn line_height(&self) -> u32 {
            9
        }

        fn advance_width(&self, ch: char) -> u32 {
            if ch.is_ascii_uppercase() {
                3
            } else {
                0
            }
        }

        fn render(&self, ch: char) -> Option<PixelGrid> {
            if !ch.is_ascii_uppercase() {
                return None;
            }
            let mut grid = PixelGrid::new(self.advance_width(ch) as usize, self.line_height() as usize);
            for x in 0..grid.width() {
                for y in 0..grid.height() {
                    grid.set(x, y, true);
                }
            }
            Some(grid)
        }
    }

    #[test]
    fn test_rasterize_glyph() {
        let glyph = rasterize_glyph(&BoxRasterizer, 'B');
        assert_eq!(glyph.columns(), vec![vec![0xFF, 0x01]; 3]);
        assert!(rasterize_glyph(&BoxRasterizer, 'b').is_empty());
    }

    #[test]
    fn test_generate_skips_empty() {
        let mut out = Vec::new();
        let stats = generate(&BoxRasterizer, &FontMetadata::new("Box", 9, 1), 0x40..0x43, &WriteOptions::default(), &mut out).unwrap();
        assert_eq!(stats, GenerateStats { written: 2, skipped: 1 });
        let text = String::from_utf8(out).unwrap();
        assert!(!text.contains("BEGIN 64"));
        assert!(text.contains("BEGIN 65\n  ff;ff;ff\n  1;1;1\nEND\n"));
        assert!(text.contains("BEGIN 66\n"));
    }

    #[test]
    fn test_generate_skips_surrogates() {
        let mut out = Vec::new();
        let stats = generate(&BoxRasterizer, &FontMetadata::new("Box", 9, 1), 0xD800..0xD802, &WriteOptions::default(), &mut out).unwrap();
        assert_eq!(stats, GenerateStats { written: 0, skipped: 2 });
    }
}
