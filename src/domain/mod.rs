//! Domain layer: entities and parsing rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod numeric;
pub mod types;

pub use entities::*;
pub use error::DomainError;
pub use numeric::{parse_unsigned, Parsed};
pub use types::{node_id, relation_id, resolve_node, resolve_relation};
