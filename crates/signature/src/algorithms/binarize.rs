use image::Rgb;

use crate::{
    error::{Result, SignatureError},
    traits::Binarizer,
    types::BinaryImage,
};

/// Black when any channel falls below the threshold
#[derive(Debug, Clone, Copy)]
pub struct ChannelMinimumBinarizer {
    pub threshold: u8,
}

impl Default for ChannelMinimumBinarizer {
    fn default() -> Self {
        Self { threshold: 50 }
    }
}

impl Binarizer for ChannelMinimumBinarizer {
    fn name(&self) -> &'static str {
        "channel_minimum"
    }

    fn is_black(&self, color: Rgb<u8>) -> bool {
        let [r, g, b] = color.0;
        r < self.threshold || g < self.threshold || b < self.threshold
    }
}

/// White when the integer average of the channels exceeds the threshold
#[derive(Debug, Clone, Copy)]
pub struct AverageLuminanceBinarizer {
    pub threshold: u8,
}

impl Default for AverageLuminanceBinarizer {
    fn default() -> Self {
        Self { threshold: 120 }
    }
}

impl Binarizer for AverageLuminanceBinarizer {
    fn name(&self) -> &'static str {
        "average_luminance"
    }

    fn is_black(&self, color: Rgb<u8>) -> bool {
        let [r, g, b] = color.0;
        let average = (u16::from(r) + u16::from(g) + u16::from(b)) / 3;
        average <= u16::from(self.threshold)
    }
}

/// A palette-indexed raster: one palette index per pixel, row-major.
#[derive(Debug, Clone)]
pub struct IndexedRaster {
    width: u32,
    height: u32,
    indices: Vec<u8>,
    palette: Vec<Rgb<u8>>,
}

impl IndexedRaster {
    /// Validate that the buffer fits the dimensions and every index resolves.
    pub fn new(width: u32, height: u32, indices: Vec<u8>, palette: Vec<Rgb<u8>>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if indices.len() != expected {
            return Err(SignatureError::DimensionMismatch {
                expected,
                actual: indices.len(),
            });
        }
        if let Some(index) = indices.iter().find(|index| usize::from(**index) >= palette.len()) {
            return Err(SignatureError::PaletteIndexOutOfRange {
                index: *index,
                palette_len: palette.len(),
            });
        }
        Ok(Self {
            width,
            height,
            indices,
            palette,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resolved color of the pixel at row `m`, column `n`.
    pub fn color_at(&self, m: usize, n: usize) -> Rgb<u8> {
        let index = self.indices[m * self.width as usize + n];
        self.palette[usize::from(index)]
    }

    /// Threshold the raster after resolving every pixel through the palette.
    pub fn binarize(&self, binarizer: &dyn Binarizer) -> BinaryImage {
        BinaryImage::from_fn_par(self.width as usize, self.height as usize, |p| {
            binarizer.is_black(self.color_at(p.m, p.n))
        })
    }
}
