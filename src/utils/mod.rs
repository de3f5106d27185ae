//! contains utils used to load inputs and describe a run

pub mod files;
pub mod parameters;

pub use files::*;
pub use parameters::*;
