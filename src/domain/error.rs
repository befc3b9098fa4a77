//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors are reported conditions; the forest is left unchanged.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Tree number {0} does not exist")]
    TreeNotFound(i64),
}
