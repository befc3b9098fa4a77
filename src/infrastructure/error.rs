//! Infrastructure-level errors: failures of the console the session runs on

use thiserror::Error;

/// The interactive console could not be read or written.
///
/// Unlike bad input, which the session reports and recovers from, these end
/// the simulation.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("console {action} failed")]
    Console {
        action: &'static str,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    pub fn console(action: &'static str, source: std::io::Error) -> Self {
        Self::Console { action, source }
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;
