use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;

/// Errors which abort a simulation run before any results are produced
#[derive(Debug)]
pub enum SimulationError {
    /// The cache parameters are missing or out of range
    Configuration(String),
    /// The cache is too large to allocate on this machine
    Allocation(String),
    /// A file could not be opened, read, or written
    Io {
        context: String,
        source: io::Error,
    },
}

impl SimulationError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

impl Display for SimulationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::Configuration(message) => write!(f, "Invalid cache configuration: {message}"),
            SimulationError::Allocation(message) => write!(f, "Failed to allocate cache memory: {message}"),
            SimulationError::Io { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl Error for SimulationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimulationError::Configuration(_) | SimulationError::Allocation(_) => None,
            SimulationError::Io { source, .. } => Some(source),
        }
    }
}
