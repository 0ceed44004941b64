use std::fmt;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SignatureError};
use crate::types::binary_matrix::BinaryMatrix;
use crate::types::grid::{binary_cell, binary_char, format_grid, parse_grid};
use crate::types::position::MatrixPosition;

/// Foreground pixel state.
pub const BLACK: bool = true;
/// Background pixel state.
pub const WHITE: bool = false;

/// Inclusive rectangle of rows `top..=bottom` and columns `left..=right`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl BoundingBox {
    pub fn width(&self) -> usize {
        self.right - self.left + 1
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top + 1
    }

    /// Integer midpoint of the box.
    pub fn center(&self) -> MatrixPosition {
        MatrixPosition::new((self.top + self.bottom) / 2, (self.left + self.right) / 2)
    }

    /// Grow the box by `margin` on every side, clamped to an image of the given size.
    pub fn expand(&self, margin: usize, height: usize, width: usize) -> Self {
        Self {
            top: self.top.saturating_sub(margin),
            bottom: (self.bottom + margin).min(height.saturating_sub(1)),
            left: self.left.saturating_sub(margin),
            right: (self.right + margin).min(width.saturating_sub(1)),
        }
    }
}

/// A two-state raster. `true` is Black (foreground), `false` is White.
///
/// Pixels are stored row-major and addressed as `(m, n)`: row first, column second,
/// origin top-left. Equality compares every pixel.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinaryImage {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl BinaryImage {
    /// Create an all-White image.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![WHITE; width * height],
        }
    }

    /// Wrap a row-major pixel buffer.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<bool>) -> Result<Self> {
        if pixels.len() != width * height {
            return Err(SignatureError::DimensionMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from equally sized rows of pixel states.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let matrix = BinaryMatrix::from_rows(rows)?;
        Self::from_pixels(matrix.width(), matrix.height(), matrix.cells().to_vec())
    }

    /// Build an image from rows of bytes, where any non-zero byte is Black.
    pub fn from_byte_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let rows: Vec<Vec<bool>> = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|value| *value != 0).collect())
            .collect();
        Self::from_rows(&rows)
    }

    /// Build an image from text art where `#` is Black and a space is White.
    pub fn from_ascii_art<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let text = rows.iter().map(|row| row.as_ref()).collect::<Vec<_>>().join("\n");
        let (width, height, pixels) = parse_grid(&text, |character| match character {
            '#' => Some(BLACK),
            ' ' => Some(WHITE),
            _ => None,
        })?;
        Self::from_pixels(width, height, pixels)
    }

    /// Parse a `0`/`1` grid with `\r\n` row separators.
    pub fn from_matrix_string(text: &str) -> Result<Self> {
        let (width, height, pixels) = parse_grid(text, binary_cell)?;
        Self::from_pixels(width, height, pixels)
    }

    /// Compute every pixel independently, one row per rayon task.
    pub fn from_fn_par<F>(width: usize, height: usize, pixel: F) -> Self
    where
        F: Fn(MatrixPosition) -> bool + Send + Sync,
    {
        let mut image = Self::new(width, height);
        if width == 0 {
            return image;
        }
        image
            .pixels
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(m, row)| {
                for (n, value) in row.iter_mut().enumerate() {
                    *value = pixel(MatrixPosition::new(m, n));
                }
            });
        image
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.pixels.chunks(self.width.max(1)).take(self.height)
    }

    pub fn get(&self, m: usize, n: usize) -> bool {
        self.pixels[m * self.width + n]
    }

    pub fn at(&self, position: MatrixPosition) -> bool {
        self.get(position.m, position.n)
    }

    pub fn set(&mut self, m: usize, n: usize, value: bool) {
        self.pixels[m * self.width + n] = value;
    }

    /// Pixel lookup that treats everything outside the image as White.
    pub fn get_or_white(&self, m: i64, n: i64) -> bool {
        if m < 0 || n < 0 || m >= self.height as i64 || n >= self.width as i64 {
            return WHITE;
        }
        self.get(m as usize, n as usize)
    }

    pub fn contains(&self, position: MatrixPosition) -> bool {
        position.m < self.height && position.n < self.width
    }

    pub fn black_count(&self) -> usize {
        self.pixels.iter().filter(|pixel| **pixel).count()
    }

    /// True when the image holds no Black pixel.
    pub fn is_blank(&self) -> bool {
        !self.pixels.contains(&BLACK)
    }

    pub fn find_top_most(&self) -> Option<usize> {
        self.rows().position(|row| row.contains(&BLACK))
    }

    pub fn find_bottom_most(&self) -> Option<usize> {
        self.rows()
            .enumerate()
            .filter(|(_, row)| row.contains(&BLACK))
            .map(|(m, _)| m)
            .last()
    }

    pub fn find_left_most(&self) -> Option<usize> {
        (0..self.width).find(|n| self.column_has_black(*n))
    }

    pub fn find_right_most(&self) -> Option<usize> {
        (0..self.width).rev().find(|n| self.column_has_black(*n))
    }

    fn column_has_black(&self, n: usize) -> bool {
        (0..self.height).any(|m| self.get(m, n))
    }

    /// Smallest box holding every Black pixel, `None` for a blank image.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        Some(BoundingBox {
            top: self.find_top_most()?,
            bottom: self.find_bottom_most()?,
            left: self.find_left_most()?,
            right: self.find_right_most()?,
        })
    }

    /// Copy the rectangle `region`, clipped to the image.
    pub fn sub_image(&self, region: BoundingBox) -> Self {
        if self.width == 0 || self.height == 0 {
            return self.clone();
        }
        let region = region.expand(0, self.height, self.width);
        let mut output = Self::new(region.width(), region.height());
        for m in 0..region.height() {
            let source_start = (region.top + m) * self.width + region.left;
            let target_start = m * output.width;
            output.pixels[target_start..target_start + output.width]
                .copy_from_slice(&self.pixels[source_start..source_start + output.width]);
        }
        output
    }

    /// Extract a `height` x `width` window around `center`.
    ///
    /// Windows larger than 2 are centered on the position (offset `size / 2`);
    /// smaller windows start at it. Cells outside the image are White.
    pub fn neighbor_matrix(&self, center: MatrixPosition, height: usize, width: usize) -> BinaryMatrix {
        let offset_m = (if height > 2 { height / 2 } else { 0 }) as i64;
        let offset_n = (if width > 2 { width / 2 } else { 0 }) as i64;
        let mut matrix = BinaryMatrix::new(width, height);
        for i in 0..height {
            for j in 0..width {
                let m = center.m as i64 - offset_m + i as i64;
                let n = center.n as i64 - offset_n + j as i64;
                matrix.set(i, j, self.get_or_white(m, n));
            }
        }
        matrix
    }

    pub fn to_matrix_string(&self) -> String {
        format_grid(self.width, &self.pixels, binary_char)
    }
}

impl fmt::Debug for BinaryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BinaryImage {}x{}", self.width, self.height)?;
        for row in self.rows() {
            let line: String = row.iter().map(|pixel| if *pixel { '#' } else { '.' }).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
