//! Grid scanners.

pub mod context;
pub mod multi_row;
pub mod single_row;

pub use context::{ContextScorer, KeywordContext, NoContext};
pub use multi_row::MultiRowScanner;
pub use single_row::SingleRowScanner;
