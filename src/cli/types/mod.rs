//! Type-safe wrappers and enums for AQS collection runs.

pub mod policy;
pub mod time;
