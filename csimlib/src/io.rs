use std::fs::File;
use std::io::BufRead;
use std::path::Path;
use crate::error::SimulationError;

/// Opens a trace file for sequential, line by line reading
///
/// # Arguments
///
/// * `path`: The path of the trace file
///
/// returns: Result<impl BufRead, SimulationError>
pub fn open_trace(path: impl AsRef<Path>) -> Result<impl BufRead, SimulationError> {
    let path = path.as_ref();
    let file = File::open(path)
        .map_err(|e| SimulationError::io(format!("Couldn't open the trace file at path {}", path.display()), e))?;
    get_reader(file)
}

pub fn get_reader(file: File) -> Result<impl BufRead, SimulationError> {
    // Compatibility on other systems
    #[cfg(not(unix))]
    {
        use std::io::BufReader;
        // Traces are read once from start to end, so a large buffer keeps the number of reads down
        const BUFFER_SIZE: usize = 64 * 4096;
        Ok(BufReader::with_capacity(BUFFER_SIZE, file))
    }
    // Memory map the file on unix systems
    #[cfg(unix)]
    {
        use std::io::Cursor;
        use memmap2::{Advice, Mmap};
        // Safety: the map is read only, and the trace is not expected to change during a run
        unsafe {
            let m = Mmap::map(&file).map_err(|e| SimulationError::io("Couldn't memory map the trace file", e))?;
            m.advise(Advice::Sequential)
                .map_err(|e| SimulationError::io("Failed to provide access advice to the OS", e))?;
            Ok(Cursor::new(m))
        }
    }
}
