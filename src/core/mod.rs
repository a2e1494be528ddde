//! Core utilities for the AQS county collector
//!
//! This module consolidates the pieces the collection commands share:
//! - `output`: CSV extract naming and writing
//! - `throttle`: minimum-interval pacing of outbound requests
//! - `buffer`: per-state accumulation of record batches

pub mod buffer;
pub mod output;
pub mod throttle;

// Re-export commonly used items for convenience
pub use buffer::{PendingFlush, StateBuffer};
pub use output::{output_file_name, output_path, write_csv};
pub use throttle::Throttle;
