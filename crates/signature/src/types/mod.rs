pub mod binary_image;
pub mod binary_matrix;
pub(crate) mod grid;
pub mod position;
pub mod shape_signature;
pub mod structuring_element;

pub use binary_image::{BLACK, BinaryImage, BoundingBox, WHITE};
pub use binary_matrix::BinaryMatrix;
pub use position::MatrixPosition;
pub use shape_signature::{
    MAX_SAMPLING_RATE, MIN_SAMPLING_RATE, SamplingLine, SamplingPoint, ShapeSignature, check_sampling_rate,
};
pub use structuring_element::{SelCell, StructuringElement};
