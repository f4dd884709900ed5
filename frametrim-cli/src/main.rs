use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use frametrim::{FrameSet, TraceApi, TrimOptions, TrimSelection};

#[derive(Parser, Debug)]
#[command(name = "frametrim", version)]
struct Cli {
    /// Debug log output (repeat for trace level).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reduce a trace to the given frames and the calls they depend on.
    Trim(TrimArgs),
    /// Print per-frame call counts.
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct TrimArgs {
    /// Input trace (JSON lines).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frames to keep replayable, e.g. `10` or `3,7-9`.
    #[arg(short, long)]
    frames: FrameSet,

    /// Frames kept without their end-of-frame call.
    #[arg(short, long = "setupframes")]
    setup_frames: Option<FrameSet>,

    /// Keep every state call instead of only the last one per state.
    #[arg(short, long = "keep-all-states")]
    keep_all_states: bool,

    /// Keep the end-of-frame calls between the setup frames and the kept frames.
    #[arg(long)]
    swap_to_finish: bool,

    /// Graphics API of the trace; detected from the calls when omitted.
    #[arg(long)]
    api: Option<TraceApi>,

    /// Print the N frames with the most calls.
    #[arg(short, long = "top-calls-per-frame", default_value_t = 0)]
    top_calls_per_frame: usize,

    /// Output trace; defaults to `<input stem>-trim.jsonl` next to the input.
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Also write the trim report as JSON.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Input trace (JSON lines).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of busiest frames to list.
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);
    match cli.cmd {
        Command::Trim(args) => cmd_trim(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => tracing::Level::ERROR,
        (false, 0) => tracing::Level::INFO,
        (false, 1) => tracing::Level::DEBUG,
        (false, _) => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn default_out_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "trace".to_owned());
    input.with_file_name(format!("{stem}-trim.jsonl"))
}

fn cmd_trim(args: TrimArgs) -> anyhow::Result<()> {
    let api = match args.api {
        Some(api) => api,
        None => TraceApi::detect_stream(frametrim::open_trace(&args.in_path)?)?,
    };

    let mut selection =
        TrimSelection::new(args.frames).with_top_calls_per_frame(args.top_calls_per_frame);
    if let Some(setup) = args.setup_frames {
        selection = selection.with_setup_frames(setup);
    }
    let opts = TrimOptions {
        keep_all_state_calls: args.keep_all_states,
        swaps_to_finish: args.swap_to_finish,
    };

    eprintln!(
        "frametrim may not retain every call the target frames need; check the result and \
         add setup frames or --keep-all-states if it does not replay as expected."
    );
    let report =
        frametrim::trim_stream(frametrim::open_trace(&args.in_path)?, api, &selection, opts)?;

    let out_path = args.out.unwrap_or_else(|| default_out_path(&args.in_path));
    // The input is read again while the output is written.
    if out_path == args.in_path {
        anyhow::bail!("output trace '{}' is the input trace", out_path.display());
    }
    if let Some(parent) = out_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let file = File::create(&out_path)
        .with_context(|| format!("create output trace '{}'", out_path.display()))?;
    let written = frametrim::write_kept_calls(
        BufWriter::new(file),
        frametrim::open_trace(&args.in_path)?,
        &report.keep_set(),
    )?;

    if let Some(path) = &args.report {
        let json = serde_json::to_string_pretty(&report).context("serialize trim report")?;
        std::fs::write(path, json)
            .with_context(|| format!("write report '{}'", path.display()))?;
    }

    eprintln!(
        "{api}: scanned {} calls in {} frames, kept {written}",
        report.calls_scanned, report.frames_scanned
    );
    for (kind, count) in &report.diagnostics {
        eprintln!("  {kind}: {count}");
    }
    if !report.frame_call_counts.is_empty() {
        eprintln!("Calls per frame:");
        for fc in &report.frame_call_counts {
            eprintln!("  Frame[{}] = {}", fc.frame, fc.calls);
        }
    }
    eprintln!("wrote {}", out_path.display());
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let calls = frametrim::load_trace(&args.in_path)?;
    let stats = frametrim::frame_stats(&calls);
    println!(
        "{}: {} calls in {} frames ({:.1} per frame)",
        TraceApi::detect(&calls),
        stats.calls,
        stats.frames.len(),
        stats.mean_calls()
    );
    for fc in stats.top(args.top) {
        println!("  Frame[{}] = {}", fc.frame, fc.calls);
    }
    Ok(())
}
