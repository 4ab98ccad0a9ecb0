// Domain value objects
pub mod classification;
pub mod trigger_source;

pub use classification::*;
pub use trigger_source::*;
