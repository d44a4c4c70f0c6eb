use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;
use clap::Parser;
use env_logger::Env;
use log::debug;
use csimlib::config::CacheParameters;
use csimlib::io::open_trace;
use csimlib::report::RESULTS_FILE;
use csimlib::simulator::Simulator;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Set-associative LRU cache simulator for valgrind memory traces"))]
struct Args {
    /// Number of set index bits (the cache has 2^s sets)
    #[arg(short = 's')]
    set_bits: Option<u32>,

    /// Associativity (number of lines per set)
    #[arg(short = 'E')]
    associativity: Option<u32>,

    /// Number of block bits (blocks are 2^b bytes)
    #[arg(short = 'b')]
    block_bits: Option<u32>,

    /// Name of the valgrind trace to replay
    #[arg(short = 't')]
    trace: PathBuf,

    /// Display trace info for every data access
    #[arg(short = 'v')]
    verbose: bool,

    /// JSON file with cache parameters, overridden by -s, -E and -b
    #[arg(long)]
    config: Option<PathBuf>,

    /// Also print the result as JSON
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    env_logger::init_from_env(Env::default().filter_or("CSIM_LOG", "warn"));
    let args = Args::parse();
    let file_parameters: Option<CacheParameters> = match &args.config {
        Some(path) => {
            let config_file = File::open(path).map_err(|e| format!("Couldn't open the config file at path {}: {e}", path.display()))?;
            Some(serde_json::from_reader(BufReader::new(config_file)).map_err(|e| format!("Couldn't parse the config file: {e}"))?)
        }
        None => None,
    };
    let parameters = CacheParameters::from_parts(args.set_bits, args.associativity, args.block_bits, file_parameters.as_ref())
        .map_err(|e| e.to_string())?;
    debug!("Using {parameters:?}");
    let trace_reader = open_trace(&args.trace).map_err(|e| e.to_string())?;
    let mut simulator = Simulator::new(&parameters, args.verbose).map_err(|e| e.to_string())?;
    let result = *simulator
        .simulate(trace_reader, |report| println!("{report}"))
        .map_err(|e| e.to_string())?;
    println!("{result}");
    result.write_results(RESULTS_FILE).map_err(|e| e.to_string())?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes argument parsing, setup, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed cache parameters: {parameters:?}");
        println!(
            "Cache geometry: {} sets, {} lines per set, {} byte blocks",
            parameters.num_sets(),
            parameters.associativity,
            parameters.block_size()
        );
        println!("Invalid cache lines: {} of {}", simulator.get_invalid_line_count(), parameters.num_lines());
    }
    Ok(())
}
