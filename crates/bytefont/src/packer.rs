//! Packing of monochrome pixel grids into column-major byte planes.

use crate::GlyphBitmap;

/// Number of bytes per column used to store `pixel_height` rows.
///
/// This is not `ceil(h / 8)`: heights with a remainder get a rounding bias of 4
/// before dividing and one extra byte on top (7 rows take 2 bytes). Existing
/// .bff files are sized with this rule so it must stay as is.
pub const fn byte_height(pixel_height: usize) -> usize {
    if pixel_height % 8 > 0 {
        (pixel_height + 4) / 8 + 1
    } else {
        pixel_height / 8
    }
}

/// A monochrome pixel grid addressed as `grid[x][y]`, `true` = ink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Builds a grid from text rows, `#` is ink and everything else background.
    /// Shorter rows are padded with background.
    pub fn from_ascii(rows: &[&str]) -> Self {
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        let mut grid = Self::new(width, rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                grid.set(x, y, ch == '#');
            }
        }
        grid
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.pixels[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, ink: bool) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = ink;
        }
    }
}

/// Packs the grid into `width x byte_height(height)` bytes.
///
/// `height` is the declared row count; rows beyond the grid are background and
/// grid rows beyond `height` are dropped.
pub fn pack(grid: &PixelGrid, height: usize) -> GlyphBitmap {
    let mut result = GlyphBitmap::new(grid.width(), byte_height(height));
    if result.is_empty() {
        return result;
    }
    for x in 0..grid.width() {
        for y in 0..height.min(grid.height()) {
            if grid.get(x, y) {
                result.set_pixel(x, y, true);
            }
        }
    }
    result
}
