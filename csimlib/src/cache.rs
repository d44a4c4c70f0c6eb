use log::trace;
use crate::address::{decode, Address};
use crate::config::CacheParameters;
use crate::error::SimulationError;

/// The result of a single cache access
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AccessOutcome {
    Hit,
    /// The block was loaded into a line which was still invalid
    MissNoEvict,
    /// The block replaced the least recently used line of a full set
    MissWithEvict {
        evicted_tag: u64,
    },
}

impl AccessOutcome {
    pub fn is_hit(&self) -> bool {
        matches!(self, AccessOutcome::Hit)
    }

    pub fn is_eviction(&self) -> bool {
        matches!(self, AccessOutcome::MissWithEvict { .. })
    }

    /// The labels printed for this outcome in verbose mode, in order
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            AccessOutcome::Hit => &["hit"],
            AccessOutcome::MissNoEvict => &["miss"],
            AccessOutcome::MissWithEvict { .. } => &["miss", "eviction"],
        }
    }
}

/// A generic trait for caches
///
/// The simulator only needs a single access operation plus some metadata for debugging, so this
/// is kept small. Counting hits and misses is the responsibility of the caller
pub trait CacheTrait {
    /// Converts an address into a tag and a set index
    ///
    /// # Arguments
    ///
    /// * `input`: The address to split
    ///
    /// returns: (u64, u64)
    fn address_to_tag_and_set(&self, input: Address) -> (u64, u64);

    /// Accesses the line holding `input`, updating the recency order of its set on hits and misses
    ///
    /// # Arguments
    ///
    /// * `input`: The address of the access. Only the block matters, hence no size argument
    ///
    /// returns: AccessOutcome
    fn access(&mut self, input: Address) -> AccessOutcome;

    /// Gets the number of lines which have never been filled. Useful for analysing cache
    /// performance or debugging
    fn get_invalid_line_count(&self) -> usize;
}

/// Identity metadata for one line. No data is stored
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CacheLine {
    pub valid: bool,
    pub tag: u64,
}

/// The lines of a single set, ordered from most recently used (index 0) to least recently used
/// (the last index)
///
/// Recency is purely positional. Every access moves the touched line to the front with a rotation,
/// so the victim on a full set is always the last line
#[derive(Clone, Debug)]
pub struct CacheSet {
    lines: Box<[CacheLine]>,
}

impl CacheSet {
    pub fn new(associativity: usize) -> Self {
        Self {
            lines: vec![CacheLine::default(); associativity].into_boxed_slice(),
        }
    }

    /// Like [`CacheSet::new`], but reports a failed allocation instead of aborting
    pub fn try_new(associativity: usize) -> Result<Self, SimulationError> {
        let mut lines = Vec::new();
        lines
            .try_reserve_exact(associativity)
            .map_err(|e| SimulationError::Allocation(format!("{associativity} lines for a set: {e}")))?;
        lines.resize(associativity, CacheLine::default());
        Ok(Self {
            lines: lines.into_boxed_slice(),
        })
    }

    pub fn lines(&self) -> &[CacheLine] {
        &self.lines
    }

    /// Moves the line at `index` to the front, keeping the relative order of the lines before it
    fn promote(&mut self, index: usize) {
        self.lines[..=index].rotate_right(1);
    }

    /// Looks up `tag` in this set and updates the recency order
    pub fn access(&mut self, tag: u64) -> AccessOutcome {
        if let Some(index) = self.lines.iter().position(|line| line.valid && line.tag == tag) {
            self.promote(index);
            return AccessOutcome::Hit;
        }
        if let Some(index) = self.lines.iter().position(|line| !line.valid) {
            self.lines[index] = CacheLine { valid: true, tag };
            self.promote(index);
            return AccessOutcome::MissNoEvict;
        }
        // Set is full, replace the least recently used line
        let last = self.lines.len() - 1;
        let evicted_tag = std::mem::replace(&mut self.lines[last].tag, tag);
        self.promote(last);
        AccessOutcome::MissWithEvict { evicted_tag }
    }

    pub fn valid_line_count(&self) -> usize {
        self.lines.iter().filter(|line| line.valid).count()
    }
}

/// A set-associative cache with LRU replacement
///
/// All 2^s sets are allocated up front with every line invalid, and live for the whole run
pub struct Cache {
    sets: Vec<CacheSet>,
    set_bits: u32,
    block_bits: u32,
}

impl Cache {
    /// Allocates the cache, failing with [`SimulationError::Allocation`] when the sets don't fit
    /// into memory or into `usize`
    pub fn new(parameters: &CacheParameters) -> Result<Self, SimulationError> {
        let num_sets = usize::try_from(parameters.num_sets())
            .map_err(|_| SimulationError::Allocation(format!("{} sets exceed the address space", parameters.num_sets())))?;
        let associativity = usize::try_from(parameters.associativity)
            .map_err(|_| SimulationError::Allocation(format!("{} lines per set exceed the address space", parameters.associativity)))?;
        let mut sets = Vec::new();
        sets.try_reserve_exact(num_sets)
            .map_err(|e| SimulationError::Allocation(format!("{num_sets} sets: {e}")))?;
        for _ in 0..num_sets {
            sets.push(CacheSet::try_new(associativity)?);
        }
        Ok(Self {
            sets,
            set_bits: parameters.set_bits,
            block_bits: parameters.block_bits,
        })
    }

    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }
}

impl CacheTrait for Cache {
    fn address_to_tag_and_set(&self, input: Address) -> (u64, u64) {
        decode(input, self.set_bits, self.block_bits)
    }

    fn access(&mut self, input: Address) -> AccessOutcome {
        let (tag, set) = self.address_to_tag_and_set(input);
        // The set index is masked to s bits, so it is always in range
        let outcome = self.sets[set as usize].access(tag);
        if let AccessOutcome::MissWithEvict { evicted_tag } = outcome {
            trace!("set {set}: evicted tag {evicted_tag:#x} for tag {tag:#x}");
        }
        outcome
    }

    fn get_invalid_line_count(&self) -> usize {
        self.sets
            .iter()
            .map(|set| set.lines().len() - set.valid_line_count())
            .sum()
    }
}
