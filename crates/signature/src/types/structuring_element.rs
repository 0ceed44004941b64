use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SignatureError};
use crate::types::binary_matrix::BinaryMatrix;
use crate::types::grid::{format_grid, parse_grid};

/// One cell of a hit-and-miss pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelCell {
    /// Must be White (`0`).
    White,
    /// Must be Black (`1`).
    Black,
    /// Don't care (`-1`, printed as `x`).
    Ignore,
}

impl SelCell {
    pub fn from_value(value: i8) -> Result<Self> {
        match value {
            0 => Ok(Self::White),
            1 => Ok(Self::Black),
            -1 => Ok(Self::Ignore),
            value => Err(SignatureError::InvalidStructuringValue { value }),
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Self::White => 0,
            Self::Black => 1,
            Self::Ignore => -1,
        }
    }

    /// Whether a pixel state satisfies this cell.
    pub fn accepts(self, pixel: bool) -> bool {
        match self {
            Self::White => !pixel,
            Self::Black => pixel,
            Self::Ignore => true,
        }
    }

    fn symbol(self) -> char {
        match self {
            Self::White => '0',
            Self::Black => '1',
            Self::Ignore => 'x',
        }
    }
}

/// A rectangular hit-and-miss pattern with don't-care cells.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructuringElement {
    width: usize,
    height: usize,
    cells: Vec<SelCell>,
}

impl StructuringElement {
    /// Build an element from a fixed-size grid of cells.
    pub fn from_grid<const W: usize, const H: usize>(grid: [[SelCell; W]; H]) -> Self {
        Self {
            width: W,
            height: H,
            cells: grid.iter().flatten().copied().collect(),
        }
    }

    /// Build an element from rows of `-1`/`0`/`1` values.
    pub fn from_values<R: AsRef<[i8]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map(|row| row.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * rows.len());
        for (row_index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(SignatureError::RaggedMatrix {
                    row: row_index,
                    expected: width,
                    actual: row.len(),
                });
            }
            for value in row {
                cells.push(SelCell::from_value(*value)?);
            }
        }
        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Parse a pattern such as `"000\r\nxxx\r\n111"`.
    pub fn from_pattern_string(text: &str) -> Result<Self> {
        let (width, height, cells) = parse_grid(text, |character| match character {
            '0' => Some(SelCell::White),
            '1' => Some(SelCell::Black),
            'x' => Some(SelCell::Ignore),
            _ => None,
        })?;
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, m: usize, n: usize) -> SelCell {
        self.cells[m * self.width + n]
    }

    /// True when every non-ignored cell agrees with `matrix`. A matrix of another
    /// size never matches.
    pub fn matches(&self, matrix: &BinaryMatrix) -> bool {
        if matrix.width() != self.width || matrix.height() != self.height {
            return false;
        }
        self.cells
            .iter()
            .zip(matrix.cells())
            .all(|(cell, pixel)| cell.accepts(*pixel))
    }
}

impl fmt::Display for StructuringElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_grid(self.width, &self.cells, |cell| cell.symbol()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_marks_ignored_cells() {
        let element = StructuringElement::from_values(&[[-1i8, 1, 0], [-1, 0, 1], [-1, 1, -1]])
            .expect("Should build element");
        assert_eq!(element.to_string(), "x10\r\nx01\r\nx1x");
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        let result = StructuringElement::from_values(&[[0i8, 2]]);
        assert!(matches!(result, Err(SignatureError::InvalidStructuringValue { value: 2 })));
    }

    #[test]
    fn test_matches_ignores_dont_care_cells() {
        let element = StructuringElement::from_pattern_string("000\r\nxxx\r\n111").expect("Should parse pattern");
        let matrix = BinaryMatrix::from_matrix_string("000\r\n100\r\n111").expect("Should parse matrix");
        assert!(element.matches(&matrix));

        let miss = BinaryMatrix::from_matrix_string("010\r\n100\r\n111").expect("Should parse matrix");
        assert!(!element.matches(&miss));
    }

    #[test]
    fn test_size_mismatch_never_matches() {
        let element = StructuringElement::from_pattern_string("xx\r\nxx").expect("Should parse pattern");
        assert!(!element.matches(&BinaryMatrix::new(3, 3)));
    }

    #[test]
    fn test_from_grid_preserves_layout() {
        use SelCell::{Black as K, Ignore as X, White as O};
        let element = StructuringElement::from_grid([[O, X], [K, O]]);
        assert_eq!(element.to_string(), "0x\r\n10");
        assert_eq!(element.get(1, 0).value(), 1);
    }
}
