pub mod best_match;
pub mod collect;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lut;
pub mod results;
pub mod span;
pub mod sweep;

pub use error::{Result, TuneError};
