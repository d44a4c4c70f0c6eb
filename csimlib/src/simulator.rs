use std::fmt::{Display, Formatter};
use std::io::BufRead;
use std::time::{Duration, Instant};
use log::debug;
use crate::address::Address;
use crate::cache::{AccessOutcome, Cache, CacheTrait};
use crate::config::CacheParameters;
use crate::error::SimulationError;
use crate::report::SimulationResult;
use crate::trace::{parse_line, Operation, TraceRecord};

/// The simulator replays trace records against a cache, and collects results.
///
/// It supports calling simulate multiple times, and will update the time taken to simulate and the
/// results accordingly
pub struct Simulator {
    cache: Cache,
    result: SimulationResult,
    verbose: bool,
    simulation_time: Duration,
}

/// What happened to a single trace record. Only produced in verbose mode
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RecordReport {
    pub operation: Operation,
    pub address: Address,
    pub size: u64,
    /// One outcome per cache access, in the order the accesses happened
    pub outcomes: Vec<AccessOutcome>,
}

impl Display for RecordReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:x},{}", self.operation, self.address, self.size)?;
        for label in self.outcomes.iter().flat_map(|outcome| outcome.labels()) {
            write!(f, " {label}")?;
        }
        Ok(())
    }
}

impl Simulator {
    /// Creates a new simulator with an empty cache
    ///
    /// # Arguments
    ///
    /// * `parameters`: The cache parameters, which should already be validated
    /// * `verbose`: Whether a [`RecordReport`] is produced for every data access
    ///
    /// returns: Result<Simulator, SimulationError>, failing if the cache can't be allocated
    pub fn new(parameters: &CacheParameters, verbose: bool) -> Result<Self, SimulationError> {
        Ok(Self {
            cache: Cache::new(parameters)?,
            result: SimulationResult::default(),
            verbose,
            simulation_time: Duration::new(0, 0),
        })
    }

    /// Accesses the cache once, counting the outcome
    fn touch(&mut self, address: Address) -> AccessOutcome {
        let outcome = self.cache.access(address);
        if outcome.is_hit() {
            self.result.hits += 1;
        } else {
            self.result.misses += 1;
            if outcome.is_eviction() {
                self.result.evictions += 1;
            }
        }
        outcome
    }

    /// Applies a single record to the cache
    ///
    /// Loads and stores access the cache once, modifies access it twice, and instruction fetches
    /// are ignored
    ///
    /// returns: The outcome of each access, in order
    pub fn apply(&mut self, record: &TraceRecord) -> Vec<AccessOutcome> {
        (0..record.operation.access_count())
            .map(|_| self.touch(record.address))
            .collect()
    }

    /// Simulates the cache over a whole trace
    ///
    /// Lines which can't be parsed are skipped and not counted. In verbose mode `on_record` is
    /// called for every data access record, after it has been applied
    ///
    /// # Arguments
    ///
    /// * `reader`: The trace, one record per line
    /// * `on_record`: Receives verbose reports
    ///
    /// returns: Result<&SimulationResult, SimulationError>
    pub fn simulate<Source: BufRead, F: FnMut(&RecordReport)>(
        &mut self,
        reader: Source,
        mut on_record: F,
    ) -> Result<&SimulationResult, SimulationError> {
        let start = Instant::now();
        for (number, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| SimulationError::io(format!("Couldn't read line {} of the trace", number + 1), e))?;
            let line = line.trim_end_matches('\r');
            let Some(record) = parse_line(line) else {
                if !line.is_empty() {
                    debug!("Skipping unrecognised trace line {}: {line:?}", number + 1);
                }
                continue;
            };
            if record.operation == Operation::Instruction {
                continue;
            }
            let outcomes = self.apply(&record);
            if self.verbose {
                on_record(&RecordReport {
                    operation: record.operation,
                    address: record.address,
                    size: record.size,
                    outcomes,
                });
            }
        }
        let end = Instant::now();
        self.simulation_time += end - start;
        debug!("Simulation finished: {}", self.result);
        Ok(&self.result)
    }

    pub fn result(&self) -> &SimulationResult {
        &self.result
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Gets the wall-clock execution time for processing
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of lines which are still invalid
    pub fn get_invalid_line_count(&self) -> usize {
        self.cache.get_invalid_line_count()
    }
}
