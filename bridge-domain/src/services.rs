// Domain services
pub mod reference_cache;

pub use reference_cache::*;
