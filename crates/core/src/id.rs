// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operation ID generation

use crate::operation::OperationId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Generates process-unique operation identifiers
pub trait IdGen: Clone + Send + Sync {
    fn next(&self) -> OperationId;
}

/// UUID-based generator for production use
#[derive(Clone, Copy, Debug, Default)]
pub struct UuidIdGen;

impl IdGen for UuidIdGen {
    fn next(&self) -> OperationId {
        OperationId::new(uuid::Uuid::new_v4().to_string())
    }
}

/// Sequential generator for tests (`op-1`, `op-2`, ...)
#[derive(Clone, Debug)]
pub struct SequentialIdGen {
    prefix: String,
    counter: Arc<AtomicU64>,
}

impl SequentialIdGen {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for SequentialIdGen {
    fn default() -> Self {
        Self::new("op")
    }
}

impl IdGen for SequentialIdGen {
    fn next(&self) -> OperationId {
        let n = self.counter.fetch_add(1, Ordering::SeqCst);
        OperationId::new(format!("{}-{}", self.prefix, n))
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
