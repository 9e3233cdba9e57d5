//! Blindspot CLI - generate the reachable state graph of a rule file.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use blindspot::explorer::{ExplorerConfig, IterationLimit, TracingObserver, DEFAULT_ITERATION_LIMIT};
use blindspot::render::RenderFormat;
use blindspot::source::{self, CudSyntax, SourceFormat};
use clap::Parser;
use tracing::{info, warn, Level};

/// Blindspot - enumerate every state a set of rules can reach.
///
/// Reads a rule file, explores its state space breadth first and prints the
/// resulting graph.
#[derive(Parser, Debug)]
#[command(name = "blindspot", author, version, about, long_about = None)]
struct Cli {
    /// Rule file to explore.
    file: PathBuf,

    /// Rule format: tags or cud. Inferred from the file name when omitted; cud
    /// files are read as YAML, TOML or JSON by extension.
    #[arg(short, long)]
    input: Option<String>,

    /// Output format: mermaid, dot or json.
    #[arg(short, long, default_value = "mermaid")]
    output: String,

    /// Write the rendered graph to a file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Maximum number of states to expand.
    #[arg(long, env = "BLINDSPOT_LIMIT", conflicts_with = "unbounded")]
    limit: Option<usize>,

    /// Explore without an iteration limit. May never terminate.
    #[arg(long)]
    unbounded: bool,

    /// Skip the confirmation prompt for --unbounded.
    #[arg(short, long)]
    yes: bool,

    /// Exit with an error when the iteration limit truncates exploration.
    #[arg(long)]
    strict: bool,

    /// Log verbosity: trace, debug, info, warn or error.
    #[arg(long, default_value = "warn", env = "BLINDSPOT_LOG")]
    log_severity: Level,

    /// Log format: text or json.
    #[arg(long, default_value = "text")]
    log_format: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_severity, &cli.log_format)?;

    let format: RenderFormat = cli.output.parse()?;
    let input = input_format(cli.input.as_deref(), &cli.file)?;
    let limit = resolve_limit(&cli)?;

    let rules = source::load(&cli.file, input)
        .with_context(|| format!("Failed to load rules from {}", cli.file.display()))?;
    info!(
        file = %cli.file.display(),
        rules = rules.rules.len(),
        start = %rules.start.id(),
        "rules_loaded"
    );

    let graph = rules
        .into_explorer(ExplorerConfig { limit }, TracingObserver)?
        .generate()?;

    if graph.is_truncated() {
        warn!(
            %limit,
            nodes = graph.nodes().len(),
            edges = graph.edges().len(),
            "exploration_truncated"
        );
        if cli.strict {
            bail!("exploration stopped after {limit} before reaching every state");
        }
    }

    let text = format.render(&graph)?;
    match &cli.out {
        Some(path) => fs::write(path, text)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn init_logging(level: Level, format: &str) -> Result<()> {
    match format {
        "text" => tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(io::stderr)
            .init(),
        "json" => tracing_subscriber::fmt()
            .json()
            .with_max_level(level)
            .with_target(false)
            .with_writer(io::stderr)
            .init(),
        other => bail!("Unknown log format '{other}'; expected text or json"),
    }
    Ok(())
}

fn input_format(name: Option<&str>, file: &Path) -> Result<Option<SourceFormat>> {
    let Some(name) = name else {
        return Ok(None);
    };
    let format = match name.to_ascii_lowercase().as_str() {
        "tags" | "json" => SourceFormat::Tags,
        "cud" => SourceFormat::Cud(CudSyntax::from_path(file)),
        other => bail!("Unknown input format '{other}'; expected tags or cud"),
    };
    Ok(Some(format))
}

fn resolve_limit(cli: &Cli) -> Result<IterationLimit> {
    choose_limit(cli.limit, cli.unbounded, cli.yes, confirm)
}

/// Pick the iteration limit. Unbounded exploration always needs an explicit
/// flag plus a confirmation; a missing choice falls back to the default bound.
fn choose_limit(
    limit: Option<usize>,
    unbounded: bool,
    yes: bool,
    mut ask: impl FnMut(&str) -> Result<bool>,
) -> Result<IterationLimit> {
    if let Some(max) = limit {
        return Ok(IterationLimit::Bounded(max));
    }

    if unbounded {
        if yes || ask("Explore without an iteration limit? This may never terminate.")? {
            return Ok(IterationLimit::Unbounded);
        }
        bail!("Unbounded exploration was not confirmed; pass --yes or set --limit N");
    }

    if ask("No --limit given. Explore without an iteration limit? This may never terminate.")? {
        return Ok(IterationLimit::Unbounded);
    }
    warn!(
        limit = DEFAULT_ITERATION_LIMIT,
        "no_limit_given_using_default"
    );
    Ok(IterationLimit::default())
}

/// Ask a yes/no question on the terminal. Non-interactive sessions answer no.
fn confirm(question: &str) -> Result<bool> {
    if !io::stdin().is_terminal() {
        return Ok(false);
    }

    let mut stderr = io::stderr().lock();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
