//! Output formatters for CSV tables and Markdown summaries.

mod csv;
mod markdown;

pub use self::csv::*;
pub use markdown::*;
