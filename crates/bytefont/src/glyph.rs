use std::fmt::Display;

use crate::{ByteFontError, Result};

/// A 1 bit per pixel glyph packed into vertical bytes.
///
/// Storage is column-major: `columns[x][byte_row]`. Bit `n` of a byte is the
/// pixel at vertical offset `8 * byte_row + n`, so the LSB is the topmost pixel
/// of the byte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GlyphBitmap {
    columns: Vec<Vec<u8>>,
}

impl GlyphBitmap {
    /// An all-background glyph of `width` columns and `byte_height` bytes per column.
    pub fn new(width: usize, byte_height: usize) -> Self {
        if width == 0 || byte_height == 0 {
            return Self::default();
        }
        Self {
            columns: vec![vec![0; byte_height]; width],
        }
    }

    /// Creates a glyph from column-major data. All columns must share one byte height.
    pub fn from_columns(columns: Vec<Vec<u8>>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some((column, c)) = columns.iter().enumerate().find(|(_, c)| c.len() != expected) {
                return Err(ByteFontError::NonUniformColumns {
                    column,
                    expected,
                    actual: c.len(),
                });
            }
            if expected == 0 {
                return Ok(Self::default());
            }
        }
        Ok(Self { columns })
    }

    /// Creates a glyph from byte rows as they appear in a .bff file (`rows[byte_row][x]`).
    pub fn from_rows(rows: &[Vec<u8>]) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for (y, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(ByteFontError::NonUniformRows {
                    row: y,
                    expected: width,
                    actual: row.len(),
                });
            }
            for (x, b) in row.iter().enumerate() {
                columns[x].push(*b);
            }
        }
        Self::from_columns(columns)
    }

    /// Number of pixel columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Bytes per column.
    pub fn byte_height(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn pixel_height(&self) -> usize {
        self.byte_height() * 8
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.byte_height() == 0
    }

    pub fn get_pixel(&self, x: usize, y: usize) -> bool {
        self.columns.get(x).and_then(|c| c.get(y >> 3)).is_some_and(|b| b & (1 << (y & 7)) != 0)
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, ink: bool) {
        let Some(b) = self.columns.get_mut(x).and_then(|c| c.get_mut(y >> 3)) else {
            return;
        };
        if ink {
            *b |= 1 << (y & 7);
        } else {
            *b &= !(1 << (y & 7));
        }
    }

    /// Returns an owned copy of the column data.
    pub fn columns(&self) -> Vec<Vec<u8>> {
        self.columns.clone()
    }

    /// Iterates the byte rows in file order, each yielding one byte per column.
    pub fn rows(&self) -> impl Iterator<Item = Vec<u8>> + '_ {
        (0..self.byte_height()).map(move |y| self.columns.iter().map(|c| c[y]).collect())
    }
}

impl Display for GlyphBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = String::new();
        for y in 0..self.pixel_height() {
            s.push_str(&format!("{y:2}:\t"));
            for x in 0..self.width() {
                s.push(if self.get_pixel(x, y) { '#' } else { '-' });
            }
            s.push('\n');
        }
        write!(f, "{s}---")
    }
}
