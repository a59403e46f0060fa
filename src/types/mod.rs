//! Type definitions for timegrid

mod error;
mod log;

pub use error::*;
pub use log::*;
