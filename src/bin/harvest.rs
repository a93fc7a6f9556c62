//! harvest CLI
//!
//! Reads scraped text blocks from a JSON file, runs the extraction pipeline and
//! writes the resolved candidates as JSON.

use std::path::PathBuf;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use candidate_harvest::export::{read_blocks, write_candidates};
use candidate_harvest::{HarvestConfig, HarvestResult, Pipeline};

/// Command-line options.
struct Args {
    input: PathBuf,
    output: PathBuf,
    config: Option<PathBuf>,
    vocabulary: Option<PathBuf>,
    workers: Option<usize>,
    max_candidates: Option<usize>,
    per_page: Option<usize>,
}

fn value_of(args: &[String], i: usize, flag: &str) -> String {
    match args.get(i + 1) {
        Some(value) => value.clone(),
        None => {
            eprintln!("error: {flag} requires a value");
            std::process::exit(1);
        }
    }
}

fn number_of(args: &[String], i: usize, flag: &str) -> usize {
    let raw = value_of(args, i, flag);
    raw.parse().unwrap_or_else(|_| {
        eprintln!("error: invalid number for {flag}: {raw}");
        std::process::exit(1);
    })
}

fn print_help() {
    println!("harvest - extract candidate profiles from scraped text blocks");
    println!();
    println!("USAGE:");
    println!("    harvest --input <FILE> [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -i, --input <FILE>            Block file (JSON array)");
    println!("    -o, --output <FILE>           Output file [default: candidates.json]");
    println!("    -c, --config <FILE>           Harvest config (JSON)");
    println!("        --vocabulary <FILE>       Vocabulary tables (JSON)");
    println!("    -w, --workers <N>             Page worker threads");
    println!("        --max-candidates <N>      Stop accumulating after N records");
    println!("        --per-page <N>            Records kept per page");
    println!("    -h, --help                    Print help information");
}

fn parse_args() -> Args {
    let args: Vec<String> = std::env::args().collect();
    let mut input = None;
    let mut parsed = Args {
        input: PathBuf::new(),
        output: PathBuf::from("candidates.json"),
        config: None,
        vocabulary: None,
        workers: None,
        max_candidates: None,
        per_page: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--input" | "-i" => input = Some(PathBuf::from(value_of(&args, i, "--input"))),
            "--output" | "-o" => parsed.output = PathBuf::from(value_of(&args, i, "--output")),
            "--config" | "-c" => parsed.config = Some(PathBuf::from(value_of(&args, i, "--config"))),
            "--vocabulary" => {
                parsed.vocabulary = Some(PathBuf::from(value_of(&args, i, "--vocabulary")));
            }
            "--workers" | "-w" => parsed.workers = Some(number_of(&args, i, "--workers")),
            "--max-candidates" => {
                parsed.max_candidates = Some(number_of(&args, i, "--max-candidates"));
            }
            "--per-page" => parsed.per_page = Some(number_of(&args, i, "--per-page")),
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            arg => {
                eprintln!("error: unknown argument: {arg}");
                std::process::exit(1);
            }
        }
        i += 2;
    }

    match input {
        Some(path) => parsed.input = path,
        None => {
            eprintln!("error: --input is required");
            std::process::exit(1);
        }
    }
    parsed
}

fn build_config(args: &Args) -> HarvestResult<HarvestConfig> {
    let mut config = match &args.config {
        Some(path) => HarvestConfig::from_file(path)?,
        None => HarvestConfig::default(),
    };
    if let Some(path) = &args.vocabulary {
        config = config.with_vocabulary_path(path);
    }
    if let Some(workers) = args.workers {
        config = config.with_workers(workers);
    }
    if let Some(cap) = args.max_candidates {
        config = config.with_max_candidates(cap);
    }
    if let Some(limit) = args.per_page {
        config = config.with_per_page_limit(limit);
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> HarvestResult<()> {
    let config = build_config(args)?;
    let pipeline = Pipeline::from_config(config)?;
    let blocks = read_blocks(&args.input)?;
    let report = pipeline.run_blocks(blocks)?;
    write_candidates(&args.output, &report.candidates)?;

    let stats = report.stats;
    tracing::info!(
        pages = stats.pages_seen,
        pages_accepted = stats.pages_accepted,
        blocks = stats.blocks_seen,
        duplicates = stats.duplicates_skipped,
        rejected = stats.rejected,
        dropped = stats.dropped,
        accumulated = stats.accumulated,
        resolved = stats.resolved,
        output = %args.output.display(),
        "Done"
    );
    Ok(())
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,candidate_harvest=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let args = parse_args();
    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
