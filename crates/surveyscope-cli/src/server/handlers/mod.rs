//! API request handlers.

mod chart;
mod data;
mod export;

pub use chart::*;
pub use data::*;
pub use export::*;
