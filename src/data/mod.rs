pub mod cell;
pub mod dataset;
pub mod datetime;
pub mod loader;
pub mod parser;

pub use cell::CellValue;
pub use dataset::{Dataset, Record};
