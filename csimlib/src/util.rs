use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use regex::Regex;
use crate::config::CacheParameters;

/// The directory holding the sample traces, relative to the workspace root
pub const TRACE_FILES_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../traces");
/// The directory holding expected results, named `<trace>-<s>-<E>-<b>.json`
pub const EXPECTED_OUTPUTS_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../traces/expected");

pub struct TestCasePaths {
    pub name: String,
    pub parameters: CacheParameters,
    pub trace: PathBuf,
    pub output: PathBuf,
}

/// Finds every expected output in `EXPECTED_OUTPUTS_PATH`, along with the trace and parameters
/// encoded in its file name. Cases are sorted by file name
pub fn get_test_cases() -> Result<Vec<TestCasePaths>, Box<dyn Error>> {
    get_test_cases_in(Path::new(TRACE_FILES_PATH), Path::new(EXPECTED_OUTPUTS_PATH))
}

pub fn get_test_cases_in(trace_dir: &Path, output_dir: &Path) -> Result<Vec<TestCasePaths>, Box<dyn Error>> {
    let mut out = Vec::new();
    let output_pattern = Regex::new(r"^(?P<trace>[0-9a-zA-Z_]+)-(?P<s>[0-9]+)-(?P<e>[0-9]+)-(?P<b>[0-9]+)\.json$")?;
    let mut files = Vec::new();
    for entry in fs::read_dir(output_dir)? {
        // Get file name
        let file_name = entry?
            .file_name()
            .into_string()
            .map_err(|e| format!("Can't convert OS string ({e:?}) to standard string"))?;
        if output_pattern.is_match(&file_name) {
            files.push(file_name);
        }
    }
    files.sort();
    for file_name in files {
        // Get components of name
        let tokens = output_pattern.captures(&file_name).ok_or("Couldn't parse the file name".to_string())?;
        let trace = tokens.name("trace").ok_or("Couldn't get the trace from the output file name".to_string())?.as_str();
        let parameters = CacheParameters::new(
            tokens["s"].parse()?,
            tokens["e"].parse()?,
            tokens["b"].parse()?,
        )?;
        out.push(TestCasePaths {
            name: file_name.trim_end_matches(".json").to_string(),
            parameters,
            trace: trace_dir.join(format!("{trace}.trace")),
            output: output_dir.join(&file_name),
        })
    }
    Ok(out)
}
