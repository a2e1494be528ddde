//! EPA AQS API access: HTTP client and response types.

pub mod http;
pub mod types;

pub use http::{AqsClient, ClientOptions, Credentials};
pub use types::{CodeRow, CodeTable, QueryOutcome, Record, RecordSet};
