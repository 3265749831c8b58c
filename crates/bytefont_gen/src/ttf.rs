//! [`Rasterizer`] backed by a TrueType/OpenType font file.

use std::{fs, path::Path};

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use anyhow::Context;
use bytefont::{ByteFontType, PixelGrid, Rasterizer};

/// Coverage at or above this counts as ink.
const INK_THRESHOLD: f32 = 0.5;

/// Horizontal shift per row for synthetic italics.
const ITALIC_SLOPE: i32 = 4;

pub struct TtfRasterizer {
    font: FontVec,
    scale: PxScale,
    style: i32,
}

impl TtfRasterizer {
    /// Loads `path`. One point of `size` is one pixel.
    pub fn load(path: &Path, size: i32, style: i32) -> anyhow::Result<Self> {
        let data = fs::read(path).with_context(|| format!("reading font '{}'", path.display()))?;
        let font = FontVec::try_from_vec(data).with_context(|| format!("'{}' is not a TrueType/OpenType font", path.display()))?;
        Ok(Self {
            font,
            scale: PxScale::from(size as f32),
            style,
        })
    }

    fn is_bold(&self) -> bool {
        self.style & ByteFontType::Bold.value() != 0
    }

    fn is_italic(&self) -> bool {
        self.style & ByteFontType::Italic.value() != 0
    }

    fn baseline(&self) -> usize {
        self.font.as_scaled(self.scale).ascent().ceil() as usize
    }
}

impl Rasterizer for TtfRasterizer {
    fn line_height(&self) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        (scaled.ascent() - scaled.descent() + scaled.line_gap()).ceil() as u32
    }

    fn advance_width(&self, ch: char) -> u32 {
        let scaled = self.font.as_scaled(self.scale);
        let width = scaled.h_advance(scaled.glyph_id(ch)) as u32;
        if self.is_bold() && width > 0 {
            width + 1
        } else {
            width
        }
    }

    fn render(&self, ch: char) -> Option<PixelGrid> {
        let id = self.font.glyph_id(ch);
        if id.0 == 0 {
            return None;
        }
        let mut grid = PixelGrid::new(self.advance_width(ch) as usize, self.line_height() as usize);
        let baseline = self.baseline();
        let glyph = id.with_scale_and_position(self.scale, point(0.0, baseline as f32));

        // glyphs without outline (space) stay blank
        if let Some(outlined) = self.font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = bounds.min.x as i32 + x as i32;
                let py = bounds.min.y as i32 + y as i32;
                if coverage >= INK_THRESHOLD && px >= 0 && py >= 0 {
                    grid.set(px as usize, py as usize, true);
                }
            });
        }

        if self.is_italic() {
            grid = oblique(&grid, baseline);
        }
        if self.is_bold() {
            grid = embolden(&grid);
        }
        Some(grid)
    }
}

/// Widens every stroke by one pixel to the right.
pub fn embolden(grid: &PixelGrid) -> PixelGrid {
    let mut result = grid.clone();
    for y in 0..grid.height() {
        for x in 1..grid.width() {
            if grid.get(x - 1, y) {
                result.set(x, y, true);
            }
        }
    }
    result
}

/// Shears rows above `baseline` to the right and rows below it to the left.
pub fn oblique(grid: &PixelGrid, baseline: usize) -> PixelGrid {
    let mut result = PixelGrid::new(grid.width(), grid.height());
    for y in 0..grid.height() {
        let shift = (baseline as i32 - y as i32) / ITALIC_SLOPE;
        for x in 0..grid.width() {
            let target = x as i32 + shift;
            if grid.get(x, y) && target >= 0 {
                result.set(target as usize, y, true);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_embolden() {
        let grid = PixelGrid::from_ascii(&["#--", "-#-", "--#"]);
        assert_eq!(embolden(&grid), PixelGrid::from_ascii(&["##-", "-##", "--#"]));
    }

    #[test]
    fn test_oblique() {
        let grid = PixelGrid::from_ascii(&["#---", "#---", "#---", "#---", "#---", "#---", "#---", "#---", "#---", "#---"]);
        let slanted = oblique(&grid, 8);
        // row 0 is 8 rows above the baseline: 2 pixels right
        assert!(slanted.get(2, 0));
        assert!(slanted.get(1, 4));
        assert!(slanted.get(0, 8));
        assert!(slanted.get(0, 9));
        assert_eq!(slanted.width(), 4);
    }

    #[test]
    fn test_load_rejects_non_fonts() {
        let path = std::env::temp_dir().join(format!("bytefont_gen_not_a_font_{}.ttf", std::process::id()));
        fs::write(&path, b"definitely not a font").unwrap();
        let result = TtfRasterizer::load(&path, 10, 1);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        assert!(TtfRasterizer::load(Path::new("no/such/font.ttf"), 10, 1).is_err());
    }
}
