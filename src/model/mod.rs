//! Output model for extracted workbook metadata.

mod field;

pub use field::*;
