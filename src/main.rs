use clap::{Args, Parser, Subcommand};
use pydepin::commands::{self, GraphArgs, InspectArgs};
use pydepin::core::context::ProjectContext;
use pydepin::core::error::{DepError, print_error};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Highlight file dependencies in a Python project
#[derive(Parser)]
#[command(name = "pydepin")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Debug logging to stderr (PYDEPIN_LOG overrides)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Mark every file as selected, descendant, ancestor, ignored or unrelated
  Inspect {
    /// Path to the project root
    root: PathBuf,
    /// One or more Python files (relative to root)
    #[arg(required = true)]
    files: Vec<String>,
    /// Show only files your selected files import (descendants)
    #[arg(short, long, conflicts_with = "upstream")]
    downstream: bool,
    /// Show only files that import your selected files (ancestors)
    #[arg(short, long)]
    upstream: bool,
    /// Only show selected and related files
    #[arg(short, long)]
    only_highlighted: bool,
    /// Output format: text (default), json, names
    #[arg(long, default_value = "text")]
    format: String,
    #[command(flatten)]
    graph: GraphFlags,
  },

  /// Print the shortest import chain from one file to another
  Why {
    /// Path to the project root
    root: PathBuf,
    /// File that (maybe) depends on TO
    from: String,
    /// File that (maybe) is depended on
    to: String,
    #[command(flatten)]
    graph: GraphFlags,
  },

  /// List groups of files that import each other
  Cycles {
    /// Path to the project root
    root: PathBuf,
    /// Output results in JSON format
    #[arg(long)]
    json: bool,
    #[command(flatten)]
    graph: GraphFlags,
  },

  /// Export the import graph in Graphviz DOT format
  Dot {
    /// Path to the project root
    root: PathBuf,
    #[command(flatten)]
    graph: GraphFlags,
  },
}

#[derive(Args)]
struct GraphFlags {
  /// Include ignored files like __init__.py
  #[arg(long)]
  show_ignored: bool,
  /// Resolver backend: heuristic (default) or semantic
  #[arg(long)]
  resolver: Option<String>,
  /// Worker threads (0 = all cores)
  #[arg(short, long)]
  jobs: Option<usize>,
}

impl From<GraphFlags> for GraphArgs {
  fn from(flags: GraphFlags) -> Self {
    GraphArgs {
      show_ignored: flags.show_ignored,
      resolver: flags.resolver,
      jobs: flags.jobs,
    }
  }
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

/// Logs go to stderr so stdout stays machine-readable.
fn init_tracing(verbose: bool) {
  let filter = EnvFilter::try_from_env("PYDEPIN_LOG")
    .unwrap_or_else(|_| EnvFilter::new(if verbose { "pydepin=debug" } else { "pydepin=warn" }));

  tracing_subscriber::registry()
    .with(filter)
    .with(fmt::layer().compact().with_writer(std::io::stderr))
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let root = match &cli.command {
    Commands::Inspect { root, .. }
    | Commands::Why { root, .. }
    | Commands::Cycles { root, .. }
    | Commands::Dot { root, .. } => root.clone(),
  };

  // Root validation and config loading happen once, before any command runs
  let ctx = match ProjectContext::build(&root) {
    Ok(ctx) => ctx,
    Err(e) => handle_error(e),
  };

  let result = match cli.command {
    Commands::Inspect {
      files,
      downstream,
      upstream,
      only_highlighted,
      format,
      graph,
      ..
    } => commands::run_inspect(
      &ctx,
      InspectArgs {
        files,
        downstream,
        upstream,
        only_highlighted,
        format,
        verbose: cli.verbose,
        graph: graph.into(),
      },
    ),
    Commands::Why { from, to, graph, .. } => commands::run_why(&ctx, &graph.into(), &from, &to),
    Commands::Cycles { json, graph, .. } => commands::run_cycles(&ctx, &graph.into(), json),
    Commands::Dot { graph, .. } => commands::run_dot(&ctx, &graph.into()),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn handle_error(err: DepError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
