//! Node id generation
//!
//! Every component that creates nodes takes an `IdGenerator`, so the text
//! parser, the template importer and an interactive editor all draw ids from
//! the same source. Ids are unique within one document only.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Source of fresh node ids.
pub trait IdGenerator: Send + Sync {
    fn next(&self) -> String;
}

/// Random v4 UUIDs; the default generator.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// `<prefix>-1`, `<prefix>-2`, ... Deterministic, for tests and reproducible output.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    counter: AtomicU64,
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new("node")
    }
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Number of ids handed out so far.
    pub fn issued(&self) -> u64 {
        self.counter.load(Ordering::Relaxed)
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.prefix, n)
    }
}

/// Configurable choice of generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    #[default]
    Uuid,
    Sequential,
}

impl IdStrategy {
    pub fn generator(self, prefix: &str) -> Arc<dyn IdGenerator> {
        match self {
            IdStrategy::Uuid => Arc::new(UuidIdGenerator),
            IdStrategy::Sequential => Arc::new(SequentialIdGenerator::new(prefix)),
        }
    }
}

impl fmt::Display for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStrategy::Uuid => write!(f, "uuid"),
            IdStrategy::Sequential => write!(f, "sequential"),
        }
    }
}
