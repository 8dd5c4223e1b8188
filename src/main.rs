use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use cmdtree::format::StyleOptions;

mod cmd;
mod utils;

use cmd::{Format, Shell};

/// cmdtree - demo shell over a hierarchical command tree
///
/// Modes:
///   cmdtree                         interactive shell (reads stdin)
///   cmdtree --script session.txt    run each line of a file, stop at first error
///   cmdtree server start port 9000  run one pre-split command and exit
///
/// Built-ins: help [path...], usage, exit | quit
///
/// Env:
///   CMDTREE_PROMPT   prompt fallback when --prompt is not given
///   RUST_LOG         overrides the -v / -q derived log level
///   NO_COLOR         disable ANSI styling
#[derive(Parser, Debug)]
#[command(
    name = "cmdtree",
    version,
    author,
    about = "cmdtree - demo shell over a hierarchical command tree",
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Interactive prompt
    #[arg(long, env = "CMDTREE_PROMPT", default_value = "> ")]
    prompt: String,

    /// Output format for help / usage
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Execute commands from a file (one per line, '#' comments)
    #[arg(long, value_name = "PATH", conflicts_with = "words")]
    script: Option<PathBuf>,

    /// Command words to execute once
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "WORDS")]
    words: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level)?;

    let (tree, state) = cmd::demo::build().context("failed to build command tree")?;

    let mut style = StyleOptions::detect();
    if !std::io::stdout().is_terminal() {
        style.use_color = false;
    }

    let shell = Shell::new(tree, state)
        .format(cli.format)
        .style(style)
        .prompt(cli.prompt.clone());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Some(path) = &cli.script {
        return shell.run_script(path, &mut out);
    }

    if !cli.words.is_empty() {
        let line = shell_words::join(&cli.words);
        shell.run_line(&line, &mut out)?;
        return Ok(());
    }

    let stdin = std::io::stdin();
    shell.repl(&mut stdin.lock(), &mut out)
}
