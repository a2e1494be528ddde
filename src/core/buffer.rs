//! Per-state accumulation of measurement batches.
//!
//! A [`StateBuffer`] holds at most one state's worth of unflushed data. Moving
//! to the next state hands back the previous state's rows as a
//! [`PendingFlush`] for the caller to write, leaving the buffer empty.

use crate::aqs::types::RecordSet;

/// Rows collected for one state, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingFlush {
    pub state: String,
    pub records: RecordSet,
}

#[derive(Debug, Default)]
pub struct StateBuffer {
    state: Option<String>,
    batches: Vec<RecordSet>,
}

impl StateBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accumulating for `state`.
    ///
    /// Returns the previous state's rows when it collected any; a previous
    /// state with no rows is dropped without a flush.
    pub fn begin(&mut self, state: &str) -> Option<PendingFlush> {
        let previous = self.take();
        self.state = Some(state.to_string());
        previous.filter(|p| !p.records.is_empty())
    }

    pub fn push(&mut self, batch: RecordSet) {
        self.batches.push(batch);
    }

    /// Final flush at the end of a run, returned whenever a state was begun
    /// even if it collected nothing.
    pub fn finish(mut self) -> Option<PendingFlush> {
        self.take()
    }

    fn take(&mut self) -> Option<PendingFlush> {
        let state = self.state.take()?;
        let records = RecordSet::concat(std::mem::take(&mut self.batches));
        Some(PendingFlush { state, records })
    }
}
