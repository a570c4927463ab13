pub mod consolidate;
pub mod error;
pub mod flatten;
pub mod io;
pub mod merge;
pub mod model;
pub mod normalize;
pub mod quality;
pub mod registry;
pub mod summary;
pub mod zone;

pub use error::{ConsolidationError, Result};
