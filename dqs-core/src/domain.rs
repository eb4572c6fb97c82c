pub mod metadata;
pub mod normalize;
pub mod insights;
pub mod prompt;

pub use metadata::*;
pub use insights::*;
pub use prompt::*;
