pub mod debug;
pub mod raster;
pub mod templates;

pub use debug::DebugImageWriter;
pub use raster::{Background, ColorSettings, SamplingLinePlotter, binarize_image, load_image, read_rendered, render};
pub use templates::{Digit, TemplateSet};
