//! Command implementations for the AQS county collector

pub mod common;
pub mod resumable;
pub mod single_output;

pub use common::CollectParams;
