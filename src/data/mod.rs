//! Data layer: input files, admission and results types.
//!
//! Architecture:
//! ```text
//!  archive/*.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │ scanner  │  directory listing → Vec<FileDescriptor>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader  │  admit prefix under SizeBudget, read via strategy
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  model   │  MetricRecord / ResultsTable
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod scanner;
