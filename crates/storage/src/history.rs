// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded, most-recent-first operation log

use chrono::{DateTime, Utc};
use gw_core::config::DEFAULT_MAX_HISTORY;
use gw_core::{Operation, OperationId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Ordered record of reversible operations.
///
/// Index 0 is the most recent operation. The log never holds more than
/// `max_size` entries: pushing onto a full log evicts from the back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "HistoryDocument", into = "HistoryDocument")]
pub struct OperationLog {
    max_size: usize,
    operations: VecDeque<Operation>,
}

/// On-disk layout of the log
#[derive(Serialize, Deserialize)]
struct HistoryDocument {
    #[serde(default = "default_max_size")]
    max_size: usize,
    #[serde(default)]
    operations: Vec<Operation>,
}

fn default_max_size() -> usize {
    DEFAULT_MAX_HISTORY
}

impl From<HistoryDocument> for OperationLog {
    fn from(doc: HistoryDocument) -> Self {
        let mut log = OperationLog::new(doc.max_size);
        log.operations = doc.operations.into();
        log.enforce_bound();
        log
    }
}

impl From<OperationLog> for HistoryDocument {
    fn from(log: OperationLog) -> Self {
        HistoryDocument {
            max_size: log.max_size,
            operations: log.operations.into(),
        }
    }
}

impl Default for OperationLog {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

impl OperationLog {
    /// Create an empty log; a bound of zero is raised to one
    pub fn new(max_size: usize) -> Self {
        Self {
            max_size: max_size.max(1),
            operations: VecDeque::new(),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Change the bound, evicting the oldest entries if now over it
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size.max(1);
        self.enforce_bound();
    }

    /// Insert as the most recent entry; returns how many entries were evicted
    pub fn push(&mut self, op: Operation) -> usize {
        self.operations.push_front(op);
        self.enforce_bound()
    }

    fn enforce_bound(&mut self) -> usize {
        let evicted = self.operations.len().saturating_sub(self.max_size);
        self.operations.truncate(self.max_size);
        if evicted > 0 {
            tracing::debug!(evicted, max_size = self.max_size, "evicted oldest operations");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Entry at `index`, 0 being the most recent
    pub fn get(&self, index: usize) -> Option<&Operation> {
        self.operations.get(index)
    }

    pub fn find(&self, id: &OperationId) -> Option<&Operation> {
        self.operations.iter().find(|op| &op.id == id)
    }

    pub fn remove(&mut self, id: &OperationId) -> Option<Operation> {
        let index = self.operations.iter().position(|op| &op.id == id)?;
        self.operations.remove(index)
    }

    /// Iterate most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Operation> {
        self.operations.iter()
    }

    /// IDs of the `n` most recent operations, most recent first
    pub fn recent_ids(&self, n: usize) -> Vec<OperationId> {
        self.operations.iter().take(n).map(|op| op.id.clone()).collect()
    }

    /// Operations recorded inside the inclusive time range
    pub fn between(
        &self,
        since: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Vec<&Operation> {
        self.operations
            .iter()
            .filter(|op| op.within(since, until))
            .collect()
    }
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;
