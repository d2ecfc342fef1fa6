//! peek: query VCD waveforms with trigger expressions.
//!
//! Provides `peek list` to show the signals in a dump, `peek trig` to list the
//! ticks at which a trigger expression fires, and `peek show` to print signal
//! values in a window around a trigger occurrence.

#![warn(missing_docs)]

mod list;
mod session;
mod show;
mod trig;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

/// Trace and trigger algebra for HDL simulation output.
#[derive(Parser, Debug)]
#[command(name = "peek", version, about = "Query VCD waveforms with trigger expressions")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Path to a `peek.toml` (default: `./peek.toml` if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the signals recorded in a VCD file.
    List(ListArgs),
    /// List the ticks at which a trigger expression is non-zero.
    Trig(TrigArgs),
    /// Print signal values around a trigger occurrence.
    Show(ShowArgs),
}

/// Arguments for `peek list`.
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// VCD file to read.
    pub vcd: PathBuf,
}

/// Arguments for `peek trig`.
#[derive(Parser, Debug)]
pub struct TrigArgs {
    /// VCD file to read.
    pub vcd: PathBuf,

    /// Trigger expression, or the name of one from `[triggers]`.
    pub trigger: String,

    /// Only consider ticks below this one (default: one past the last change).
    #[arg(long)]
    pub horizon: Option<u64>,

    /// List only the first tick of each run.
    #[arg(long)]
    pub edges: bool,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = ListFormat::Text)]
    pub format: ListFormat,
}

/// Arguments for `peek show`.
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// VCD file to read.
    pub vcd: PathBuf,

    /// Signal to display; repeatable (default: `display.signals`, else all).
    #[arg(short, long = "signal")]
    pub signals: Vec<String>,

    /// Trigger expression or name anchoring the window.
    #[arg(short, long)]
    pub trigger: Option<String>,

    /// Which trigger occurrence to anchor on (0-based).
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Ticks shown before the anchor.
    #[arg(long)]
    pub before: Option<u64>,

    /// Ticks shown after the anchor.
    #[arg(long)]
    pub after: Option<u64>,

    /// First tick shown; overrides the trigger window's start.
    #[arg(long)]
    pub start: Option<u64>,

    /// Last tick shown; overrides the trigger window's stop.
    #[arg(long)]
    pub stop: Option<u64>,

    /// Output format (default: `display.format`).
    #[arg(short, long, value_enum)]
    pub format: Option<ShowFormat>,
}

/// Trigger listing format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// One tick per line.
    Text,
    /// JSON array.
    Json,
}

/// Window display format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ShowFormat {
    /// Plain-text value table.
    Table,
    /// WaveJSON document.
    Wavejson,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Optional path to a config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let global = GlobalArgs {
        quiet: cli.quiet,
        config: cli.config,
    };

    let result = match cli.command {
        Command::List(ref args) => list::run(args, &global),
        Command::Trig(ref args) => trig::run(args, &global),
        Command::Show(ref args) => show::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Sets up `env_logger` on stderr. `PEEK_LOG` overrides the level chosen by
/// the flags, using the usual `env_logger` filter syntax.
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use std::io::Write;

    let mut builder = Builder::new();
    builder.filter_level(log_level(verbose, quiet));
    if let Ok(filters) = std::env::var("PEEK_LOG") {
        builder.parse_filters(&filters);
    }
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

fn log_level(verbose: u8, quiet: bool) -> log::LevelFilter {
    use log::LevelFilter;

    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
