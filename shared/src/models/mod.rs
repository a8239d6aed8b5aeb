//! Domain models for the Greenhouse Harvest Planning system

mod crop;
mod plan;
mod selection;

pub use crop::*;
pub use plan::*;
pub use selection::*;
