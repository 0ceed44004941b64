use std::fmt;
use std::str::FromStr;

use crate::error::{Result, SignatureError};
use crate::types::grid::{binary_cell, binary_char, format_grid, parse_grid};

/// A small window of pixels taken around an image position.
///
/// Cells are `true` for Black and `false` for White, addressed as `(m, n)`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BinaryMatrix {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl BinaryMatrix {
    /// Create an all-White matrix.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Build a matrix from equally sized rows.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
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
            cells.extend_from_slice(row);
        }
        Ok(Self {
            width,
            height: rows.len(),
            cells,
        })
    }

    /// Parse a `0`/`1` grid such as `"010\r\n101\r\n110"`.
    pub fn from_matrix_string(text: &str) -> Result<Self> {
        let (width, height, cells) = parse_grid(text, binary_cell)?;
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

    pub fn get(&self, m: usize, n: usize) -> bool {
        self.cells[m * self.width + n]
    }

    pub fn set(&mut self, m: usize, n: usize, value: bool) {
        self.cells[m * self.width + n] = value;
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn black_count(&self) -> usize {
        self.cells.iter().filter(|cell| **cell).count()
    }

    /// Fraction of Black cells, `0.0` for an empty matrix.
    pub fn average_value(&self) -> f32 {
        if self.cells.is_empty() {
            return 0.0;
        }
        self.black_count() as f32 / self.cells.len() as f32
    }

    pub fn to_matrix_string(&self) -> String {
        format_grid(self.width, &self.cells, binary_char)
    }
}

impl fmt::Display for BinaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_matrix_string())
    }
}

impl fmt::Debug for BinaryMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "BinaryMatrix {}x{}", self.width, self.height)?;
        f.write_str(&self.to_matrix_string())
    }
}

impl FromStr for BinaryMatrix {
    type Err = SignatureError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_matrix_string(s)
    }
}
