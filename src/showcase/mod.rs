//! Material for the non-benchmark pages: snippets, live error messages and
//! the lazy-execution pipeline.

pub mod content;
pub mod diagnostics;
pub mod lazy_demo;
pub mod table;

pub use table::TableView;
