use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignatureError {
    #[error("Failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),

    #[error("The number of sampling lines must be between 4 and 360, got {value}")]
    InvalidSamplingRate { value: u32 },

    #[error("Invalid character '{character}' at line {line}, column {column} of matrix string")]
    InvalidMatrixCharacter {
        character: char,
        line: usize,
        column: usize,
    },

    #[error("Row {row} has {actual} cells, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Pixel buffer holds {actual} values, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid {stage} setting: {reason}")]
    InvalidStageSetting { stage: &'static str, reason: String },

    #[error("Structuring element values must be -1, 0 or 1, got {value}")]
    InvalidStructuringValue { value: i8 },

    #[error("Palette index {index} is out of range for a palette of {palette_len} colors")]
    PaletteIndexOutOfRange { index: u8, palette_len: usize },

    #[error("Signature template for number {digit} not found at {path}")]
    TemplateMissing { digit: u8, path: PathBuf },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SignatureError>;
