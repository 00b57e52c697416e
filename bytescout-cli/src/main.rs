use bytescout::{
    config::{CliOverrides, SearchConfig},
    generate_test_data,
    results::MatchSet,
    verify_expected, verify_matches, Algorithm, SearchError, Searcher,
};
use bytesize::ByteSize;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rand::{rngs::StdRng, SeedableRng};
use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, SearchError>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
struct CliSearchArgs {
    /// Pattern to search for, matched byte for byte
    #[arg(short = 'p', long)]
    pattern: Option<String>,

    /// File to search
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Matching algorithm (kmp|simd)
    #[arg(short = 'a', long)]
    algorithm: Option<Algorithm>,

    /// Number of worker threads
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Verify every reported match against the file
    #[arg(long)]
    verify: bool,

    /// Show only the match count
    #[arg(short, long)]
    stats: bool,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Parser)]
struct CliBenchArgs {
    /// Size of the synthetic buffer (e.g. 64MiB, 1GB)
    #[arg(long, default_value = "64MiB")]
    size: ByteSize,

    /// Number of pattern copies to plant
    #[arg(long, default_value = "1000")]
    count: usize,

    /// Pattern to plant and search for
    #[arg(short = 'p', long, default_value = "ABABCABAB")]
    pattern: String,

    /// Algorithm to run; both are run when omitted
    #[arg(short = 'a', long)]
    algorithm: Option<Algorithm>,

    /// Number of worker threads (default: CPU cores)
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Seed for pattern placement
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Search a file for every occurrence of a byte pattern
    Search(Box<CliSearchArgs>),

    /// Search a synthetic buffer with planted matches and check the result
    Bench(Box<CliBenchArgs>),
}

fn main() -> Result<()> {
    run()
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Search(args) => run_search(*args),
        Commands::Bench(args) => run_bench(*args),
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second init (e.g. in tests) keeps the first subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn run_search(args: CliSearchArgs) -> Result<()> {
    let file_config = SearchConfig::load_from(args.config.as_deref())
        .map_err(|e| SearchError::config_error(e.to_string()))?;

    let config = file_config.merge_with_cli(CliOverrides {
        pattern: args.pattern,
        input: args.file,
        algorithm: args.algorithm,
        thread_count: args.threads,
        verify: args.verify,
        stats_only: args.stats,
        json: args.json,
        log_level: args.log_level,
    });
    init_logging(&config.log_level);
    debug!("Effective configuration: {:?}", config);

    if config.pattern.is_empty() {
        return Err(SearchError::config_error(
            "a pattern is required (-p or `pattern` in the config file)",
        ));
    }
    let input = config.input.clone().ok_or_else(|| {
        SearchError::config_error("an input file is required (-f or `input` in the config file)")
    })?;

    let searcher = Searcher::from_config(&config);
    let started = Instant::now();
    let result = searcher.search_file(&input, config.pattern_bytes())?;
    let elapsed = started.elapsed();

    if config.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| SearchError::IoError(e.into()))?;
        println!("{}", json);
    } else {
        print_search_results(&result, &input, config.stats_only, elapsed);
    }

    searcher.metrics().log_stats();
    Ok(())
}

fn run_bench(args: CliBenchArgs) -> Result<()> {
    init_logging(&args.log_level);

    let size = usize::try_from(args.size.as_u64())
        .map_err(|_| SearchError::invalid_input(format!("{} does not fit in memory", args.size)))?;
    let pattern = args.pattern.as_bytes();
    let threads = args
        .threads
        .unwrap_or_else(|| SearchConfig::default().thread_count);
    let algorithms = match args.algorithm {
        Some(algorithm) => vec![algorithm],
        None => Algorithm::ALL.to_vec(),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let planted = generate_test_data(size, pattern, args.count, &mut rng)?;
    println!(
        "Generated {} with {} planted copies of \"{}\"",
        ByteSize(size as u64),
        planted.offsets.len(),
        args.pattern
    );

    for algorithm in algorithms {
        let searcher = Searcher::new(algorithm, threads.get());
        let started = Instant::now();
        let result = searcher.search(&planted.data, pattern)?;
        let elapsed = started.elapsed();

        verify_matches(&planted.data, pattern, &result.offsets)?;
        verify_expected(&result.offsets, &planted.offsets)?;
        info!("{} run verified against planted offsets", algorithm);

        print_bench_line(&result, threads.get(), elapsed);
    }

    Ok(())
}

fn print_search_results(result: &MatchSet, path: &Path, stats_only: bool, elapsed: Duration) {
    if !stats_only {
        println!(
            "{} ({}, {}, {} chunks)",
            path.display().to_string().blue(),
            ByteSize(result.buffer_len as u64),
            result.algorithm,
            result.chunks.len()
        );
        for offset in result {
            println!("{}", format!("{:#010x}  {}", offset, offset).green());
        }
    }

    println!(
        "\nFound {} matches in {}",
        result.total_matches,
        path.display()
    );
    println!("Searched in {}", format_elapsed(elapsed));
}

fn print_bench_line(result: &MatchSet, threads: usize, elapsed: Duration) {
    let secs = elapsed.as_secs_f64().max(1e-9);
    let throughput = (result.buffer_len as f64 / secs) as u64;
    println!(
        "{:>4} x{:<3} {} matches in {} ({}/s) {}",
        result.algorithm,
        threads,
        result.total_matches,
        format_elapsed(elapsed),
        ByteSize(throughput),
        "verified".green()
    );
}

fn format_elapsed(elapsed: Duration) -> humantime::FormattedDuration {
    // Sub-microsecond digits are noise for a whole-buffer scan.
    humantime::format_duration(Duration::from_micros(elapsed.as_micros() as u64))
}
