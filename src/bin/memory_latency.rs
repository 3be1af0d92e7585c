//! Sweep memory access latency over geometrically growing array sizes.
//!
//! # Usage
//!
//! ```bash
//! # Sizes 100 B .. 64 MiB, growing by 1.5x, 1M iterations per measurement
//! cargo run --release --bin memory_latency -- 67108864 1.5 1000000
//!
//! # With a header row, detected cache sizes and a progress bar on stderr
//! cargo run --release --bin memory_latency -- 67108864 1.5 1000000 \
//!   --header --show-caches --progress
//!
//! # JSON lines instead of CSV
//! cargo run --release --bin memory_latency -- 1048576 2 100000 --format json
//! ```
//!
//! Rows are written to stdout as `size_bytes,random_offset_ns,sequential_offset_ns`.
//! Diagnostics go to stderr; `-v`/`-vv` raise the log level, `RUST_LOG`
//! overrides it and `MEMORY_LATENCY_QUIET=1` behaves like `--quiet`.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::LevelFilter;

use memory_latency::output::{OutputFormat, PointWriter};
use memory_latency::topology::{self, detect_caches, last_level, page_table_eviction_threshold};
use memory_latency::{quiet_from_env, SweepConfig, SweepRunner};

/// Memory access latency sweep
#[derive(Parser, Debug)]
#[command(name = "memory_latency")]
#[command(about = "Measure random and sequential memory access latency across array sizes")]
#[command(version)]
struct Args {
    /// Largest array size in bytes (at least 100)
    max_size: u64,

    /// Growth factor between consecutive array sizes (greater than 1.0)
    #[arg(allow_negative_numbers = true)]
    factor: f64,

    /// Iterations per measurement phase (greater than 0)
    repeat: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,

    /// Print a CSV header row before the results
    #[arg(long)]
    header: bool,

    /// Show a progress bar on stderr (updated between sizes only)
    #[arg(long)]
    progress: bool,

    /// Print the detected cache hierarchy to stderr before sweeping
    #[arg(long)]
    show_caches: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, _) => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn report_caches() {
    let caches = detect_caches();
    if caches.is_empty() {
        eprintln!("[memory_latency] cache topology not available on this host");
        return;
    }
    for cache in &caches {
        eprintln!("[memory_latency] {}", cache);
    }
    if let Some(llc) = last_level(&caches) {
        let page_size = topology::DEFAULT_PAGE_SIZE;
        let address_size = topology::ADDRESS_SIZE_BYTES;
        let threshold = page_table_eviction_threshold(page_size, address_size, llc.size_bytes);
        eprintln!(
            "[memory_latency] page-table eviction threshold: {:.0} bytes",
            threshold
        );
    }
}

fn progress_bar(total: u64) -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::stderr());
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} | {msg}")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    bar.set_style(style);
    bar
}

fn main() -> ExitCode {
    let args = Args::parse();
    let quiet = args.quiet || quiet_from_env();
    init_logging(args.verbose, quiet);

    let config = match SweepConfig::new(args.max_size, args.factor, args.repeat) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if args.show_caches && !quiet {
        report_caches();
    }

    let bar = (args.progress && !quiet).then(|| progress_bar(config.sizes().count() as u64));

    let stdout = io::stdout();
    let mut writer = PointWriter::new(stdout.lock(), args.format);
    if args.header {
        if let Err(e) = writer.write_header() {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let runner = SweepRunner::new();
    let result = runner.run(&config, |point| {
        writer.write_point(point)?;
        if let Some(bar) = &bar {
            bar.set_message(format!("{} bytes", point.size_bytes));
            bar.inc(1);
        }
        Ok(())
    });

    if let Some(bar) = &bar {
        bar.finish_and_clear();
    }

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
