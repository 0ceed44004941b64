use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

use crate::{
    error::Result,
    traits::Binarizer,
    types::{BinaryImage, SamplingLine},
};

pub const FIREBRICK: Rgb<u8> = Rgb([178, 34, 34]);
pub const LIGHT_BLUE: Rgb<u8> = Rgb([173, 216, 230]);

/// Background of a rendered binary image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Background {
    Solid(Rgb<u8>),
    Transparent,
}

/// Colors used to render a binary image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorSettings {
    pub foreground: Rgb<u8>,
    pub background: Background,
}

impl Default for ColorSettings {
    /// Black on white
    fn default() -> Self {
        Self {
            foreground: Rgb([0, 0, 0]),
            background: Background::Solid(Rgb([255, 255, 255])),
        }
    }
}

impl ColorSettings {
    /// Black on a transparent background
    pub fn transparent_background() -> Self {
        Self {
            background: Background::Transparent,
            ..Self::default()
        }
    }

    pub fn with_foreground(mut self, foreground: Rgb<u8>) -> Self {
        self.foreground = foreground;
        self
    }

    fn background_pixel(&self) -> Rgba<u8> {
        match self.background {
            Background::Solid(Rgb([r, g, b])) => Rgba([r, g, b, 255]),
            Background::Transparent => Rgba([255, 255, 255, 0]),
        }
    }

    fn foreground_pixel(&self) -> Rgba<u8> {
        let Rgb([r, g, b]) = self.foreground;
        Rgba([r, g, b, 255])
    }
}

/// Decode an image file
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
    Ok(image::open(path)?)
}

/// Threshold a decoded raster. Fully transparent pixels count as White.
pub fn binarize_image(raw: &DynamicImage, binarizer: &dyn Binarizer) -> BinaryImage {
    let rgb = if raw.color().has_alpha() {
        let rgba = raw.to_rgba8();
        RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            let Rgba([r, g, b, a]) = *rgba.get_pixel(x, y);
            if a == 0 { Rgb([255, 255, 255]) } else { Rgb([r, g, b]) }
        })
    } else {
        raw.to_rgb8()
    };
    binarizer.binarize(&rgb)
}

/// Render a binary image with the given colors
pub fn render(image: &BinaryImage, settings: &ColorSettings) -> RgbaImage {
    let foreground = settings.foreground_pixel();
    let background = settings.background_pixel();
    RgbaImage::from_fn(image.width() as u32, image.height() as u32, |x, y| {
        if image.get(y as usize, x as usize) { foreground } else { background }
    })
}

/// Read back a raster produced by [`render`]. A pixel is Black when it is
/// opaque and closer to the foreground color than to the background.
pub fn read_rendered(raster: &RgbaImage, settings: &ColorSettings) -> BinaryImage {
    let foreground = settings.foreground_pixel();
    let background = settings.background_pixel();
    let distance = |a: &Rgba<u8>, b: &Rgba<u8>| -> u32 {
        (0..3).map(|c| u32::from(a[c].abs_diff(b[c]))).sum()
    };

    BinaryImage::from_fn_par(raster.width() as usize, raster.height() as usize, |p| {
        let pixel = raster.get_pixel(p.n as u32, p.m as u32);
        if pixel[3] == 0 {
            return false;
        }
        match settings.background {
            Background::Transparent => true,
            Background::Solid(_) => distance(pixel, &foreground) < distance(pixel, &background),
        }
    })
}

/// Overlays sampling lines on a rendered image: points on the shape in
/// firebrick, the rest in light blue
#[derive(Debug, Clone, Copy, Default)]
pub struct SamplingLinePlotter {
    pub settings: ColorSettings,
}

impl SamplingLinePlotter {
    pub fn plot(&self, source: &BinaryImage, lines: &[SamplingLine]) -> RgbaImage {
        let mut raster = render(source, &self.settings);
        for line in lines {
            for position in line.positions() {
                if !source.contains(position) {
                    continue;
                }
                let Rgb([r, g, b]) = if source.at(position) { FIREBRICK } else { LIGHT_BLUE };
                raster.put_pixel(position.n as u32, position.m as u32, Rgba([r, g, b, 255]));
            }
        }
        raster
    }
}
