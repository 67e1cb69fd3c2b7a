//! Domain layer: outline tree, ids and title handling
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod document;
pub mod error;
pub mod id;
pub mod market;
pub mod node;

pub use document::{OutlineIter, TocDocument};
pub use error::{DomainError, DomainResult};
pub use id::{IdGenerator, IdStrategy, SequentialIdGenerator, UuidIdGenerator};
pub use market::{extract_market_name, MarketNameExtractor, DEFAULT_QUALIFIERS};
pub use node::{Level, NodePath, TocNode};
