//! Domain layer: trees, forests and the growth/reap rules
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod forest;
pub mod tree;

pub use error::DomainError;
pub use forest::{Forest, ReapEvent};
pub use tree::{Species, Tree};
