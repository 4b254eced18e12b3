use thiserror::Error;

#[derive(Debug, Error)]
pub enum TentError {
    #[error("Not enough beds: {capacity} beds for {participants} participants")]
    Capacity { capacity: usize, participants: usize },
    #[error("Invalid configuration: {0}")]
    Configuration(String),
    #[error("Invalid participant data: {0}")]
    DataIntegrity(String),
    #[error("Model is infeasible under {} constraints", constraints.len())]
    Infeasible { constraints: Vec<String> },
    #[error("Solver failed: {0}")]
    SolverFailure(String),
    #[error("Solver returned an inconsistent solution: {0}")]
    InternalConsistency(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}
