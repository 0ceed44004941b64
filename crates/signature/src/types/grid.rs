//! Textual grid helpers shared by the matrix types.

use crate::error::{Result, SignatureError};

/// Parse a rectangular character grid. Rows are separated by `\r\n` or `\n`; a
/// trailing separator is ignored.
pub(crate) fn parse_grid<T, F>(text: &str, mut cell: F) -> Result<(usize, usize, Vec<T>)>
where
    F: FnMut(char) -> Option<T>,
{
    let mut width = None;
    let mut height = 0;
    let mut cells = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let mut row_width = 0;
        for (column, character) in line.chars().enumerate() {
            let value = cell(character).ok_or(SignatureError::InvalidMatrixCharacter {
                character,
                line: line_index,
                column,
            })?;
            cells.push(value);
            row_width += 1;
        }

        match width {
            None => width = Some(row_width),
            Some(expected) if expected != row_width => {
                return Err(SignatureError::RaggedMatrix {
                    row: line_index,
                    expected,
                    actual: row_width,
                });
            }
            Some(_) => {}
        }
        height += 1;
    }

    Ok((width.unwrap_or(0), height, cells))
}

/// Render a row-major grid with `\r\n` between rows.
pub(crate) fn format_grid<T, F>(width: usize, cells: &[T], mut cell: F) -> String
where
    F: FnMut(&T) -> char,
{
    if width == 0 {
        return String::new();
    }
    cells
        .chunks(width)
        .map(|row| row.iter().map(&mut cell).collect::<String>())
        .collect::<Vec<_>>()
        .join("\r\n")
}

pub(crate) fn binary_cell(character: char) -> Option<bool> {
    match character {
        '0' => Some(false),
        '1' => Some(true),
        _ => None,
    }
}

pub(crate) fn binary_char(value: &bool) -> char {
    if *value { '1' } else { '0' }
}
