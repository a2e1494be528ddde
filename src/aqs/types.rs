use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;


/// One row of an AQS response, keys in the order the API sent them.
pub type Record = Map<String, Value>;

/// Top-level envelope shared by every AQS endpoint.
///
/// `Header` is ignored; only the `Data` array is consumed.
#[derive(Debug, Deserialize)]
pub struct AqsEnvelope<T> {
    #[serde(rename = "Data")]
    pub data: Option<Vec<T>>,
}

/// Outcome of a single AQS request.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<T> {
    /// HTTP 200 with a parsed `Data` payload
    Data(T),
    /// Any other HTTP status; the body is not inspected
    Status(u16),
}

impl<T> QueryOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> QueryOutcome<U> {
        match self {
            QueryOutcome::Data(d) => QueryOutcome::Data(f(d)),
            QueryOutcome::Status(s) => QueryOutcome::Status(s),
        }
    }

    #[cfg(test)]
    pub(crate) fn into_data(self) -> Option<T> {
        match self {
            QueryOutcome::Data(d) => Some(d),
            QueryOutcome::Status(_) => None,
        }
    }
}

/// Row of a reference list (states, counties, parameters).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CodeRow {
    pub code: String,
    #[serde(default)]
    pub value_represented: String,
}

impl CodeRow {
    pub fn new(code: impl Into<String>, value_represented: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            value_represented: value_represented.into(),
        }
    }
}

/// Reference code table as returned by the `list/*` endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct CodeTable(pub Vec<CodeRow>);

impl CodeTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The `code` column only.
    pub fn codes(&self) -> Vec<String> {
        self.0.iter().map(|row| row.code.clone()).collect()
    }

    /// All rows except the last `n`.
    ///
    /// The AQS state list ends with non-US entries that are never collected.
    pub fn without_trailing(&self, n: usize) -> &[CodeRow] {
        &self.0[..self.0.len().saturating_sub(n)]
    }
}

/// Tabular record set parsed from a `Data` array.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RecordSet(pub Vec<Record>);

impl RecordSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rows(&self) -> &[Record] {
        &self.0
    }

    /// Concatenate batches in order.
    pub fn concat(batches: impl IntoIterator<Item = RecordSet>) -> RecordSet {
        RecordSet(batches.into_iter().flat_map(|b| b.0).collect())
    }

    /// Union of the keys of every row, in first-seen order.
    pub fn columns(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut columns: Vec<String> = Vec::new();
        for row in &self.0 {
            for key in row.keys() {
                if seen.insert(key.as_str()) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }
}
