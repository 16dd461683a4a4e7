use thiserror::Error;

pub type Result<T> = std::result::Result<T, RosterError>;

/// Terminal failures of a roster request. None of these are retried here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    /// A (department, nurse, day, slot) key outside the variable space was referenced.
    #[error("Model construction error: {0}")]
    ModelConstruction(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The solver proved that no roster satisfies every rule.
    #[error("Infeasible model: no roster satisfies every scheduling rule")]
    Infeasible,

    /// Search stopped before any roster was found; feasibility is unknown.
    #[error("Solver stopped before finding any roster (timeout or abort)")]
    TimeoutOrAbort,

    #[error("Solver error: {0}")]
    Solver(String),
}
