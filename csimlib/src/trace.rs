use std::fmt::{Display, Formatter};
use lazy_static::lazy_static;
use regex::Regex;
use crate::address::Address;

lazy_static! {
    // Data accesses start with a space, then a one letter code, then `<hex address>,<decimal size>`
    static ref ACCESS_PATTERN: Regex =
        Regex::new(r"^ (?P<op>[LSM])\s+(?P<address>[0-9a-fA-F]{1,16}),(?P<size>[0-9]+)\s*$").unwrap();
    static ref INSTRUCTION_PATTERN: Regex =
        Regex::new(r"^I\s+(?P<address>[0-9a-fA-F]{1,16}),(?P<size>[0-9]+)").unwrap();
}

/// The kind of a trace record
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Operation {
    /// An instruction fetch, which never touches the data cache
    Instruction,
    Load,
    Store,
    /// A load immediately followed by a store to the same address
    Modify,
}

impl Operation {
    /// How many times the cache is accessed for this operation
    pub fn access_count(&self) -> usize {
        match self {
            Operation::Instruction => 0,
            Operation::Load | Operation::Store => 1,
            Operation::Modify => 2,
        }
    }

    pub fn code(&self) -> char {
        match self {
            Operation::Instruction => 'I',
            Operation::Load => 'L',
            Operation::Store => 'S',
            Operation::Modify => 'M',
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "L" => Some(Operation::Load),
            "S" => Some(Operation::Store),
            "M" => Some(Operation::Modify),
            _ => None,
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One parsed trace line
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TraceRecord {
    pub operation: Operation,
    pub address: Address,
    /// Size of the access in bytes. Not used by the cache model
    pub size: u64,
}

impl Display for TraceRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {:x},{}", self.operation, self.address, self.size)
    }
}

/// Parses a single trace line, without its line terminator
///
/// Any line not starting with a space is an instruction fetch. Its fields are parsed when they are
/// well formed, and left as zero otherwise, as the record is never applied to the cache.
///
/// Lines starting with a space must carry a known operation code and well formed fields, otherwise
/// `None` is returned and the line should be skipped. Empty lines are also `None`
///
/// # Examples
///
/// ```
/// use csimlib::trace::{parse_line, Operation};
/// let record = parse_line(" M 7ff000418,8").unwrap();
/// assert_eq!(record.operation, Operation::Modify);
/// assert_eq!(record.address, 0x7ff000418);
/// assert_eq!(record.size, 8);
/// assert!(parse_line(" X 10,1").is_none());
/// ```
pub fn parse_line(line: &str) -> Option<TraceRecord> {
    if line.is_empty() {
        return None;
    }
    if !line.starts_with(' ') {
        let (address, size) = INSTRUCTION_PATTERN
            .captures(line)
            .and_then(|tokens| parse_fields(tokens.name("address")?.as_str(), tokens.name("size")?.as_str()))
            .unwrap_or((0, 0));
        return Some(TraceRecord {
            operation: Operation::Instruction,
            address,
            size,
        });
    }
    let tokens = ACCESS_PATTERN.captures(line)?;
    let operation = Operation::from_code(tokens.name("op")?.as_str())?;
    let (address, size) = parse_fields(tokens.name("address")?.as_str(), tokens.name("size")?.as_str())?;
    Some(TraceRecord {
        operation,
        address,
        size,
    })
}

fn parse_fields(address: &str, size: &str) -> Option<(Address, u64)> {
    // The pattern only admits digits, so the only failure is overflow. Size isn't used by the cache
    // model, so saturate rather than drop the access
    let size = size.parse().unwrap_or(u64::MAX);
    Some((Address::from_str_radix(address, 16).ok()?, size))
}
