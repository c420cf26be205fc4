mod resolver;

use std::io::{self, BufWriter, IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, CommandFactory, Parser};
use clap_complete::{Generator, Shell};
use export_tree_lib::{
    ExportTreeError, IgnoreRules, Palette, RenderOptions, TreeRenderer, resolve_start_dir,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::resolver::{ArgumentResolver, PathResolver, PromptResolver};

#[derive(Parser, Debug)]
#[command(
    name = "export-tree",
    version,
    about = "Print a directory tree annotated with the exports of each JS/TS file"
)]
struct Cli {
    /// Directory to start from (takes precedence over --path)
    #[arg(value_name = "DIR")]
    start: Option<PathBuf>,

    /// Path to start from [default: . or an interactive prompt]
    #[arg(short = 'p', long, value_name = "PATH")]
    path: Option<PathBuf>,

    /// Maximum depth to traverse
    #[arg(short = 'd', long, value_name = "N")]
    depth: Option<usize>,

    /// Regex patterns of entry names to ignore, added to the defaults
    /// (node_modules, .git, .husky, coverage, .next)
    #[arg(
        short = 'i',
        long,
        value_name = "PATTERN",
        num_args = 1..,
        action = ArgAction::Append,
        value_parser = parse_pattern
    )]
    ignore: Vec<String>,

    /// Disable colors (plain text output)
    #[arg(long)]
    plain: bool,

    /// Increase log verbosity (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,

    /// Print shell completions and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

impl Cli {
    /// Picks where the starting path comes from.
    fn path_resolver(&self) -> Box<dyn PathResolver> {
        match self.start.as_ref().or(self.path.as_ref()) {
            Some(path) => Box::new(ArgumentResolver::new(path.clone())),
            None if io::stdin().is_terminal() => Box::new(PromptResolver::default()),
            None => Box::new(ArgumentResolver::new(".")),
        }
    }
}

/// Rejects patterns that are not valid regular expressions.
fn parse_pattern(pattern: &str) -> Result<String, String> {
    IgnoreRules::new([pattern])
        .map(|_| pattern.to_string())
        .map_err(|error| error.to_string())
}

/// Returns whether a stream should get ANSI colors.
fn use_colors(plain: bool, is_tty: bool) -> bool {
    let no_color = std::env::var_os("NO_COLOR").is_some();
    !plain && !no_color && is_tty
}

/// Initialize tracing on stderr.
///
/// `RUST_LOG` wins; otherwise warnings are always shown and each `-v`
/// lowers the threshold one level.
fn init_tracing(verbose: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(filter) => filter,
        Err(_) => match verbose {
            0 => "warn".to_string(),
            1 => "info".to_string(),
            2 => "debug".to_string(),
            _ => "trace".to_string(),
        },
    };

    let filter = EnvFilter::try_new(&filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(verbose >= 2)
        .compact()
        .init();
}

/// Prints shell completions to stdout.
fn print_completions<G: Generator>(generator: G, cmd: &mut clap::Command) {
    clap_complete::generate(generator, cmd, cmd.get_name().to_string(), &mut io::stdout());
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Some(shell) = cli.completions {
        print_completions(shell, &mut Cli::command());
        return ExitCode::SUCCESS;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let palette = Palette::new(use_colors(cli.plain, io::stderr().is_terminal()));
            eprintln!("{}", palette.error(&format!("Error: {error}")));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), ExportTreeError> {
    let requested = cli.path_resolver().resolve()?;
    let start_dir = resolve_start_dir(&requested)?;

    let options = RenderOptions {
        max_depth: cli.depth,
        ignore: IgnoreRules::with_defaults(&cli.ignore)?,
        color: use_colors(cli.plain, io::stdout().is_terminal()),
    };

    info!(
        start = %start_dir.display(),
        depth = ?options.max_depth,
        patterns = options.ignore.len(),
        "rendering tree"
    );

    let stdout_error = |source| ExportTreeError::Io {
        path: PathBuf::from("<stdout>"),
        source,
    };

    let palette = Palette::new(options.color);
    let mut out = BufWriter::new(io::stdout().lock());
    writeln!(
        out,
        "{}",
        palette.header(&format!("Generating tree for: {}", start_dir.display()))
    )
    .map_err(stdout_error)?;

    let mut renderer = TreeRenderer::new(options, out);
    renderer.render(&start_dir)?;
    renderer.into_inner().flush().map_err(stdout_error)
}
