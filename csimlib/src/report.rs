use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::SimulationError;

/// The name of the file the results are persisted to, in the working directory
pub const RESULTS_FILE: &str = ".csim_results";

/// The result of a cache simulation. Can be serialised to JSON, and displays as the summary line
#[derive(Debug, Default, Copy, Clone, Serialize, Deserialize, Eq, PartialEq)]
pub struct SimulationResult {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl SimulationResult {
    /// The total number of cache accesses counted so far
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Persists the result as `<hits> <misses> <evictions>`, replacing any existing file
    ///
    /// # Arguments
    ///
    /// * `path`: Where to write, usually [`RESULTS_FILE`]
    ///
    /// returns: Result<(), SimulationError>
    pub fn write_results(&self, path: impl AsRef<Path>) -> Result<(), SimulationError> {
        let path = path.as_ref();
        fs::write(path, format!("{} {} {}\n", self.hits, self.misses, self.evictions))
            .map_err(|e| SimulationError::io(format!("Couldn't write the results file at path {}", path.display()), e))
    }
}

impl Display for SimulationResult {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "hits:{} misses:{} evictions:{}", self.hits, self.misses, self.evictions)
    }
}
