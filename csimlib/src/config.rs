use serde::{Deserialize, Serialize};
use crate::error::SimulationError;

/// The shape of a cache: 2^s sets of E lines, each line holding a 2^b byte block
///
/// Can be deserialised from JSON, accepting either the long field names or the short `s`, `E`, `b`
/// names used on the command line
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct CacheParameters {
    #[serde(alias = "s")]
    pub set_bits: u32,
    #[serde(alias = "E")]
    pub associativity: u32,
    #[serde(alias = "b")]
    pub block_bits: u32,
}

impl CacheParameters {
    /// Creates a validated set of parameters
    ///
    /// # Arguments
    ///
    /// * `set_bits`: The number of set index bits, s
    /// * `associativity`: The number of lines per set, E
    /// * `block_bits`: The number of block offset bits, b
    ///
    /// returns: Result<CacheParameters, SimulationError>
    pub fn new(set_bits: u32, associativity: u32, block_bits: u32) -> Result<Self, SimulationError> {
        let parameters = Self {
            set_bits,
            associativity,
            block_bits,
        };
        parameters.validate()?;
        Ok(parameters)
    }

    /// Builds parameters from optional values, as supplied by a command line. Values missing from
    /// the command line are taken from `fallback` (usually a JSON parameter file) if present
    pub fn from_parts(
        set_bits: Option<u32>,
        associativity: Option<u32>,
        block_bits: Option<u32>,
        fallback: Option<&CacheParameters>,
    ) -> Result<Self, SimulationError> {
        let missing = |name: &str| SimulationError::Configuration(format!("missing value for {name}"));
        let set_bits = set_bits.or(fallback.map(|p| p.set_bits)).ok_or_else(|| missing("-s"))?;
        let associativity = associativity.or(fallback.map(|p| p.associativity)).ok_or_else(|| missing("-E"))?;
        let block_bits = block_bits.or(fallback.map(|p| p.block_bits)).ok_or_else(|| missing("-b"))?;
        Self::new(set_bits, associativity, block_bits)
    }

    /// Checks all values are strictly positive, and that the tag keeps at least one bit
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.set_bits == 0 {
            return Err(SimulationError::Configuration("set index bits (-s) must be at least 1".to_string()));
        }
        if self.associativity == 0 {
            return Err(SimulationError::Configuration("associativity (-E) must be at least 1".to_string()));
        }
        if self.block_bits == 0 {
            return Err(SimulationError::Configuration("block bits (-b) must be at least 1".to_string()));
        }
        let address_bits = self.set_bits.saturating_add(self.block_bits);
        if address_bits >= u64::BITS {
            return Err(SimulationError::Configuration(format!(
                "set index bits and block bits must total less than {}, got {}",
                u64::BITS,
                address_bits
            )));
        }
        Ok(())
    }

    pub fn num_sets(&self) -> u64 {
        1 << self.set_bits
    }

    pub fn block_size(&self) -> u64 {
        1 << self.block_bits
    }

    pub fn num_lines(&self) -> u64 {
        self.num_sets() * self.associativity as u64
    }
}
