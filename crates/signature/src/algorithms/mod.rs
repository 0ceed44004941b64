pub mod binarize;
pub mod crop;
pub mod matching;
pub mod plot;
pub mod shrink;
pub mod reader;
pub mod smooth;
pub mod thin;

pub use binarize::*;
pub use crop::*;
pub use matching::*;
pub use plot::*;
pub use shrink::*;
pub use reader::*;
pub use smooth::*;
pub use thin::*;
