use std::fs::{self, File};
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use pacmon_core::{MessageSource, Monitor, ReportMode, SourceEvent, StreamSource, decode};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod render;

use render::View;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("PACMON_BUILD_COMMIT"),
    " ",
    env!("PACMON_BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "pacmon")]
#[command(version, long_version = LONG_VERSION)]
#[command(
    about = "Decode PACMAN message streams and report per-channel packet health.",
    long_about = None,
    after_help = "Input is a capture of back-to-back messages, a glob matching one file, or '-' for stdin.\n\nExamples:\n  pacmon dump run.bin --pretty\n  pacmon stats run.bin -o report.json\n  bridge | pacmon monitor - --interval-ms 1000 --view all\n\nSet PACMON_LOG (e.g. PACMON_LOG=debug) to control diagnostics on stderr."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print every message, as raw hex or decoded.
    Dump {
        /// Capture file, glob, or '-' for stdin
        input: PathBuf,

        /// Decode messages instead of printing raw bytes
        #[arg(long)]
        pretty: bool,
    },
    /// Decode a whole input and write a JSON statistics report.
    Stats {
        /// Capture file, glob, or '-' for stdin
        input: PathBuf,

        /// Output report path (JSON)
        #[arg(short = 'o', long, required_unless_present = "stdout")]
        report: Option<PathBuf>,

        /// Write JSON report to stdout
        #[arg(long, conflicts_with = "report")]
        stdout: bool,

        /// Pretty-print JSON output
        #[arg(long, conflicts_with = "compact")]
        pretty: bool,

        /// Compact JSON output (default)
        #[arg(long)]
        compact: bool,

        /// Suppress non-error output
        #[arg(long)]
        quiet: bool,
    },
    /// Print statistics tables periodically while reading an input.
    Monitor {
        /// Capture file, glob, or '-' for stdin
        input: PathBuf,

        /// Milliseconds between reports
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Reset counters after every report instead of accumulating
        #[arg(long)]
        windowed: bool,

        /// Per-channel tables to show
        #[arg(long, value_enum, default_value_t = View::Data)]
        view: View,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(false)
        .without_time()
        .with_env_filter(
            EnvFilter::try_from_env("PACMON_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    debug!("{} {}", env!("CARGO_PKG_NAME"), LONG_VERSION);

    let result = match cli.command {
        Commands::Dump { input, pretty } => cmd_dump(input, pretty),
        Commands::Stats {
            input,
            report,
            stdout,
            pretty,
            compact,
            quiet,
        } => cmd_stats(input, report, stdout, pretty, compact, quiet),
        Commands::Monitor {
            input,
            interval_ms,
            windowed,
            view,
        } => cmd_monitor(input, interval_ms, windowed, view),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(format!("{:#}", err), None)
    }
}

fn cmd_dump(input: PathBuf, pretty: bool) -> Result<(), CliError> {
    let (_, mut source) = open_input(&input)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    while let Some(event) = source
        .next_event()
        .context("failed to read message stream")?
    {
        let SourceEvent::Message(raw) = event else {
            continue;
        };
        let line = if pretty {
            match decode(&raw.bytes) {
                Ok(msg) => render::format_message(&msg),
                Err(err) => format!("<undecodable message at offset {}: {}>", raw.offset, err),
            }
        } else {
            render::hex_line(&raw.bytes)
        };
        if let Err(err) = writeln!(out, "{}", line) {
            if err.kind() == io::ErrorKind::BrokenPipe {
                return Ok(());
            }
            return Err(anyhow::Error::new(err)
                .context("failed to write output")
                .into());
        }
    }
    Ok(())
}

fn cmd_stats(
    input: PathBuf,
    report: Option<PathBuf>,
    stdout: bool,
    pretty: bool,
    compact: bool,
    quiet: bool,
) -> Result<(), CliError> {
    let report = if stdout {
        None
    } else {
        Some(report.ok_or_else(|| {
            CliError::new(
                "missing output path",
                Some("use -o/--report or --stdout".to_string()),
            )
        })?)
    };

    let (label, source) = open_input(&input)?;
    if let (Some(report_path), InputLabel::File(input_path)) = (report.as_ref(), &label) {
        if same_file(report_path, input_path) {
            return Err(CliError::new(
                format!(
                    "report path must differ from input: {}",
                    report_path.display()
                ),
                Some("choose a different output path".to_string()),
            ));
        }
    }

    let mut rep = pacmon_core::analyze_source(&label.to_string(), source)
        .context("message stream analysis failed")?;
    rep.generated_at = now_rfc3339();
    let json = serialize_report(&rep, pretty, compact)?;

    let Some(report) = report else {
        print!("{}", json);
        return Ok(());
    };

    if let Some(parent) = report.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }
    }
    fs::write(&report, json)
        .with_context(|| format!("Failed to write report: {}", report.display()))?;

    if !quiet {
        eprintln!(
            "OK: {} messages ({} skipped) -> {}",
            rep.summary.messages_total,
            rep.summary.skipped_buffers,
            report.display()
        );
    }
    Ok(())
}

fn cmd_monitor(
    input: PathBuf,
    interval_ms: u64,
    windowed: bool,
    view: View,
) -> Result<(), CliError> {
    let (label, source) = open_input(&input)?;
    let mode = if windowed {
        ReportMode::Windowed
    } else {
        ReportMode::Cumulative
    };
    info!(input = %label, interval_ms, ?mode, "starting monitor");

    println!("Packet monitoring on {} beginning: {}", label, now_rfc3339());
    let mut sink = |snapshot: &pacmon_core::StatsSnapshot, summary: &pacmon_core::StreamSummary| {
        println!("\nlast updated: {}", now_rfc3339());
        print!("{}", render::stats_view(snapshot, summary, view));
    };

    let mut monitor = Monitor::new(source)
        .with_interval(Duration::from_millis(interval_ms))
        .with_mode(mode);
    monitor
        .run(&mut sink)
        .context("failed to read message stream")?;

    println!("\nfinal:");
    print!(
        "{}",
        render::stats_view(&monitor.stats().snapshot(), monitor.summary(), view)
    );
    Ok(())
}

fn serialize_report(
    rep: &pacmon_core::Report,
    pretty: bool,
    compact: bool,
) -> Result<String, CliError> {
    if pretty && compact {
        return Err(CliError::new(
            "cannot use --pretty and --compact together",
            Some("choose one output format".to_string()),
        ));
    }
    if pretty {
        serde_json::to_string_pretty(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    } else {
        serde_json::to_string(rep)
            .context("JSON serialization failed")
            .map_err(Into::into)
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| pacmon_core::DEFAULT_GENERATED_AT.to_string())
}

enum InputLabel {
    Stdin,
    File(PathBuf),
}

impl std::fmt::Display for InputLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputLabel::Stdin => write!(f, "-"),
            InputLabel::File(path) => write!(f, "{}", path.display()),
        }
    }
}

type InputSource = StreamSource<Box<dyn Read>>;

fn open_input(input: &PathBuf) -> Result<(InputLabel, InputSource), CliError> {
    if input.as_os_str() == "-" {
        let reader: Box<dyn Read> = Box::new(io::stdin().lock());
        return Ok((InputLabel::Stdin, StreamSource::new(reader)));
    }

    let resolved = resolve_input_path(input)?;
    validate_input_file(&resolved)?;
    let file = File::open(&resolved)
        .with_context(|| format!("Failed to open input: {}", resolved.display()))?;
    let reader: Box<dyn Read> = Box::new(BufReader::new(file));
    Ok((InputLabel::File(resolved), StreamSource::new(reader)))
}

fn same_file(a: &PathBuf, b: &PathBuf) -> bool {
    let a = a
        .parent()
        .map(|parent| {
            if parent.as_os_str().is_empty() {
                fs::canonicalize(".")
            } else {
                fs::canonicalize(parent)
            }
        })
        .and_then(|dir| dir.ok())
        .zip(a.file_name())
        .map(|(dir, name)| dir.join(name));
    match (a, fs::canonicalize(b)) {
        (Some(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn validate_input_file(input: &PathBuf) -> Result<(), CliError> {
    if !input.exists() {
        return Err(CliError::new(
            format!("input file not found: {}", input.display()),
            Some("pass a capture of raw PACMAN messages, or '-' for stdin".to_string()),
        ));
    }
    if !input.is_file() {
        return Err(CliError::new(
            format!("input is not a file: {}", input.display()),
            Some("pass a capture of raw PACMAN messages, or '-' for stdin".to_string()),
        ));
    }
    Ok(())
}

fn resolve_input_path(input: &PathBuf) -> Result<PathBuf, CliError> {
    let pattern = input.to_string_lossy();
    if !is_glob_pattern(&pattern) {
        return Ok(input.clone());
    }

    let mut matches = Vec::new();
    let paths = glob(&pattern).map_err(|err| {
        CliError::new(
            format!("invalid input pattern '{}'", pattern),
            Some(format!("pattern error: {}", err.msg)),
        )
    })?;
    for entry in paths {
        let path = entry.map_err(|err| {
            CliError::new(
                format!("invalid input pattern '{}'", pattern),
                Some(format!("pattern error: {}", err)),
            )
        })?;
        if path.is_file() {
            matches.push(path);
        }
    }

    if matches.is_empty() {
        return Err(CliError::new(
            format!("no files match pattern '{}'", pattern),
            Some("check the path or quote the pattern".to_string()),
        ));
    }
    if matches.len() > 1 {
        let listed = matches
            .iter()
            .take(3)
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let more = if matches.len() > 3 { ", ..." } else { "" };
        return Err(CliError::new(
            format!(
                "multiple files match pattern '{}' ({} matches); matches: {}{}",
                pattern,
                matches.len(),
                listed,
                more
            ),
            Some("pass a single capture file, or run once per file".to_string()),
        ));
    }

    Ok(matches.remove(0))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains('*') || input.contains('?') || input.contains('[')
}
