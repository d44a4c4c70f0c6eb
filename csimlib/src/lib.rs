//! # CsimLib
//!
//! Csimlib is a library for simulating a single set-associative cache with least recently used
//! replacement over a valgrind-style memory trace
//!
//! Only address metadata is modelled. Each line records whether it is valid and which tag it holds,
//! and the simulator counts hits, misses and evictions for the whole trace

/// Splits addresses into a tag and a set index
pub mod address;

/// Contains the cache model: lines, sets, and the LRU access operation
pub mod cache;

/// Contains the cache parameters, which can be parsed from JSON or built from command line values
pub mod config;

/// Error type shared by the library
pub mod error;

/// Opens trace files for sequential reading
pub mod io;

/// Contains the result counters and the writers for the summary line and the results file
pub mod report;

/// Contains the simulator, which drives the cache with a trace and collects results
pub mod simulator;

/// Parses individual trace lines into records
pub mod trace;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
