//! Error types for the solver core

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Elimination or enumeration admits zero assignments. Always fatal to
    /// the current call; indicates contradictory constraints or a violated
    /// precondition. Never recovered internally.
    #[error("constraints admit no mine assignment")]
    InconsistentConstraints,
}

pub type Result<T> = std::result::Result<T, SolverError>;
