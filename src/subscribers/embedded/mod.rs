//! # Built-in subscribers
//!
//! - [`LogWriter`]: renders registry events through `tracing` (demo/debug).

mod log;

pub use log::LogWriter;
