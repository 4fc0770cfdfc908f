//! Common types used across the search module
//!
//! Queue entries, index records and drain summaries shared by the queue,
//! the index manager and the batch drainer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::errors::SearchError;

/// Pending action for one content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexAction {
    Index,
    Delete,
}

impl IndexAction {
    /// Stable name used in the durable queue store
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IndexAction::Index => "index",
            IndexAction::Delete => "delete",
        }
    }
}

impl fmt::Display for IndexAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndexAction {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(IndexAction::Index),
            "delete" => Ok(IndexAction::Delete),
            other => Err(SearchError::Queue(format!("unknown queue action '{other}'"))),
        }
    }
}

/// One pending queue entry; at most one exists per `item_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub item_id: String,
    pub action: IndexAction,
}

impl QueueEntry {
    #[must_use]
    pub fn index(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            action: IndexAction::Index,
        }
    }

    #[must_use]
    pub fn delete(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            action: IndexAction::Delete,
        }
    }
}

/// Document written to the index store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexRecord {
    pub id: String,
    pub title: String,
    pub article: String,
}

/// Summary of one drain cycle, reported to operational logging
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrainReport {
    pub processed: usize,
    pub errors: Vec<String>,
}

impl DrainReport {
    /// True when the cycle neither applied nor rejected anything
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processed == 0 && self.errors.is_empty()
    }
}
