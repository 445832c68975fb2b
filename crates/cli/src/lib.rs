use anyhow::{Context as AnyhowContext, Result};
use clap::Parser;
use inspector_protocol::{FileSource, MemorySource, TraceSource};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod config;
pub mod pipeline;
pub mod report;

pub use config::{InspectorConfig, OutputFormat};
pub use pipeline::{analyze, AnalysisReport};

#[derive(Parser)]
#[command(name = "template-inspector")]
#[command(about = "Find the longest template instantiation hierarchies in a build trace", long_about = None)]
#[command(version)]
struct Cli {
    /// Trace file in JSON Lines format, or `-` to read stdin
    trace: PathBuf,

    /// Number of hierarchies to report (zero or negative means 5)
    #[arg(allow_negative_numbers = true)]
    count: Option<i64>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

pub fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let output = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let config = InspectorConfig::from_count(cli.count, output);

    let source = open_source(&cli.trace)?;
    let report = analyze(source.as_ref(), &config)?;

    let rendered = match config.output {
        OutputFormat::Text => report::render_text(&report),
        OutputFormat::Json => report::render_json(&report)?,
    };

    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("Failed to write report")?;
    if config.output == OutputFormat::Json {
        writeln!(stdout).context("Failed to write report")?;
    }
    stdout.flush().context("Failed to write report")?;
    Ok(())
}

fn open_source(path: &Path) -> Result<Box<dyn TraceSource>> {
    if path == Path::new("-") {
        let source = MemorySource::from_reader(io::stdin().lock(), "<stdin>")
            .context("Failed to read trace from stdin")?;
        log::debug!("buffered {} record(s) from stdin", source.len());
        return Ok(Box::new(source));
    }

    let source = FileSource::open(path)
        .with_context(|| format!("Failed to open trace {}", path.display()))?;
    Ok(Box::new(source))
}
