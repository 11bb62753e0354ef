// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Operations recorded in the undo history
//!
//! An [`Operation`] captures the commit a workflow step started from
//! (`ref`) plus enough metadata to reverse it. The `category` selects the
//! reversal strategy; `type` is the finer-grained name of the step that ran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a recorded operation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(pub String);

impl OperationId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First eight characters, for display
    pub fn short(&self) -> &str {
        let end = self
            .0
            .char_indices()
            .nth(8)
            .map_or(self.0.len(), |(i, _)| i);
        &self.0[..end]
    }
}

impl std::fmt::Display for OperationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OperationId {
    fn from(s: String) -> Self {
        OperationId(s)
    }
}

impl From<&str> for OperationId {
    fn from(s: &str) -> Self {
        OperationId(s.to_string())
    }
}

/// Reversal category of an operation.
///
/// Unknown categories written by other versions survive a load/save cycle
/// unchanged as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OperationCategory {
    Commit,
    Merge,
    Rebase,
    Other(String),
}

impl OperationCategory {
    pub fn as_str(&self) -> &str {
        match self {
            OperationCategory::Commit => "commit",
            OperationCategory::Merge => "merge",
            OperationCategory::Rebase => "rebase",
            OperationCategory::Other(name) => name,
        }
    }
}

impl From<String> for OperationCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "commit" => OperationCategory::Commit,
            "merge" => OperationCategory::Merge,
            "rebase" => OperationCategory::Rebase,
            _ => OperationCategory::Other(s),
        }
    }
}

impl From<&str> for OperationCategory {
    fn from(s: &str) -> Self {
        OperationCategory::from(s.to_string())
    }
}

impl From<OperationCategory> for String {
    fn from(category: OperationCategory) -> Self {
        match category {
            OperationCategory::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Side information needed to reverse an operation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Branch checked out when the operation was recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Whether local edits were stashed around the operation
    #[serde(default)]
    pub stashed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stash_ref: Option<String>,
    /// Fields written by other versions, kept so a save does not drop them
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl OperationMetadata {
    pub fn on_branch(branch: impl Into<String>) -> Self {
        Self {
            branch: Some(branch.into()),
            ..Self::default()
        }
    }

    /// Mark the operation as bracketed by the given stash
    pub fn with_stash(mut self, stash_ref: impl Into<String>) -> Self {
        self.stashed = true;
        self.stash_ref = Some(stash_ref.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_files(mut self, files: Vec<String>) -> Self {
        self.files = files;
        self
    }
}

/// A reversible workflow operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    pub id: OperationId,
    #[serde(rename = "type")]
    pub kind: String,
    pub category: OperationCategory,
    pub description: String,
    pub command: String,
    pub timestamp: DateTime<Utc>,
    /// Commit hash captured before the operation mutated anything
    #[serde(rename = "ref")]
    pub git_ref: String,
    #[serde(default)]
    pub metadata: OperationMetadata,
}

impl Operation {
    /// Whether the operation falls inside an optional `[since, until]` range
    pub fn within(&self, since: Option<DateTime<Utc>>, until: Option<DateTime<Utc>>) -> bool {
        let after_start = since.map_or(true, |s| self.timestamp >= s);
        let before_end = until.map_or(true, |u| self.timestamp <= u);
        after_start && before_end
    }
}

#[cfg(test)]
#[path = "operation_tests.rs"]
mod tests;
