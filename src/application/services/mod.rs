//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (FileSystem)
//! but are themselves concrete structs, not traits.

mod import;
mod store;

pub use import::{ImportOutput, ImportService};
pub use store::ForestStore;
