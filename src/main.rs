use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};

mod diagnostics;
mod log;
mod model;
mod render;
mod streams;

pub type Result<T> = anyhow::Result<T>;

/// Convert Ninja build logs to webtreemap input format.
#[derive(Parser)]
#[command(name = "buildbloat", version)]
#[command(about = "Convert Ninja build logs to webtreemap input format", long_about = None)]
struct Cli {
    /// Diagnostic output level.
    #[arg(
        short = 'l',
        long,
        value_enum,
        ignore_case = true,
        default_value_t = diagnostics::LogLevel::Info
    )]
    log_level: diagnostics::LogLevel,

    /// Path to the build directory; absolute targets are made relative to it.
    #[arg(short = 'b', long)]
    build_dir: Option<PathBuf>,

    /// Build log to read (`.ninja_log`). Defaults to stdin.
    input: Option<PathBuf>,

    /// Report to write. Defaults to stdout.
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    diagnostics::init(cli.log_level)?;
    run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
    let build_dir = resolve_build_dir(cli.build_dir.as_deref())?;
    let input_name = streams::display_name(cli.input.as_deref(), "<stdin>");

    // 1) Open both streams up front so a bad output path fails before reading.
    let input = streams::open_input(cli.input.as_deref())?;
    let mut out = streams::open_output(cli.output.as_deref())?;

    // 2) Parse + aggregate in one pass.
    let mut entries = log::LogEntries::new(input);
    let durations = model::build_durations(entries.by_ref(), build_dir.as_deref())
        .with_context(|| format!("read build log {}", input_name))?;

    let stats = entries.stats();
    tracing::debug!(
        records = stats.records,
        comments = stats.comments,
        malformed = stats.malformed,
        targets = durations.len(),
        "aggregated build log"
    );

    // 3) Write report.
    render::write_du_report(&mut out, &durations)?;
    out.flush().context("flush report")?;

    Ok(())
}

/// An empty `--build-dir` counts as absent; a relative one is resolved
/// against the current directory.
fn resolve_build_dir(dir: Option<&Path>) -> Result<Option<PathBuf>> {
    match dir {
        Some(d) if !d.as_os_str().is_empty() => {
            let abs = std::path::absolute(d)
                .with_context(|| format!("resolve build directory {}", d.display()))?;
            tracing::debug!(build_dir = %abs.display(), "normalizing absolute targets");
            Ok(Some(abs))
        }
        _ => Ok(None),
    }
}
