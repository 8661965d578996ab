//! Command-line surface: argument parsing and the actions behind it.

use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;
use terminal_launcher::{LaunchError, Launcher};

/// Stands in for arguments (or a URI) that should be read from stdin.
pub const STDIN_SENTINEL: &str = "-";

#[derive(Debug, Parser)]
#[command(
    name = "urilaunch",
    version,
    about = "Turn command lines into launch URIs and open launch URIs in a new terminal"
)]
pub struct Cli {
    /// Encode PROGRAM ARGS... into a launch URI and print it
    #[arg(long, conflicts_with_all = ["from_url", "print", "dry_run", "init_config"])]
    pub to_url: bool,

    /// Open URI in a new terminal window (`-` reads it from stdin)
    #[arg(long, value_name = "URI", conflicts_with = "init_config")]
    pub from_url: Option<String>,

    /// Print the decoded command instead of launching it
    #[arg(long, conflicts_with = "dry_run")]
    pub print: bool,

    /// Show which terminal would be used without opening it
    #[arg(long)]
    pub dry_run: bool,

    /// Write the default config file if missing and print its path
    #[arg(long)]
    pub init_config: bool,

    /// Command line for --to-url, or a launch URI to open. Everything after
    /// the first positional argument is taken verbatim, so options go first.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// What a decoded URI should be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Launch,
    Print,
    DryRun,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    ToUrl(Vec<String>),
    FromUrl { uri: String, mode: OpenMode },
    InitConfig,
}

impl Cli {
    pub fn action(&self) -> Result<Action> {
        if self.init_config {
            if !self.args.is_empty() || self.print || self.dry_run {
                bail!("--init-config takes no other arguments");
            }
            return Ok(Action::InitConfig);
        }

        if self.to_url {
            return Ok(Action::ToUrl(self.args.clone()));
        }

        let mode = if self.print {
            OpenMode::Print
        } else if self.dry_run {
            OpenMode::DryRun
        } else {
            OpenMode::Launch
        };

        let uri = match (&self.from_url, self.args.as_slice()) {
            (Some(uri), []) => uri.clone(),
            (Some(_), _) => bail!("--from-url takes exactly one URI"),
            // A bare URI is how the OS hands over a clicked link.
            (None, [uri]) => uri.clone(),
            (None, []) => bail!("nothing to do: pass --to-url, --from-url or a launch URI"),
            (None, [_, rest @ ..]) if rest.iter().any(|a| is_open_option(a)) => {
                bail!("options must come before the launch URI")
            }
            (None, _) => bail!("expected a single launch URI; use --to-url to encode a command line"),
        };
        Ok(Action::FromUrl { uri, mode })
    }
}

fn is_open_option(arg: &str) -> bool {
    matches!(arg, "--print" | "--dry-run" | "--from-url") || arg.starts_with("--from-url=")
}

/// Perform `action`. The launcher is only built once a decoded command has
/// passed validation, so neither encoding nor a rejected URI probes the host.
pub fn run<R, W, F>(action: Action, stdin: &mut R, stdout: &mut W, launcher: F) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnOnce() -> Launcher,
{
    match action {
        Action::ToUrl(args) => {
            let args = expand_stdin_args(args, stdin)?;
            let uri = uri_codec::encode(&args)?;
            writeln!(stdout, "{uri}")?;
        }
        Action::FromUrl { uri, mode } => {
            let uri = if uri == STDIN_SENTINEL {
                read_stdin_line(stdin)?.trim().to_string()
            } else {
                uri
            };
            let args = uri_codec::decode(&uri)?;
            tracing::debug!(?mode, argc = args.len(), "Decoded launch URI");

            match mode {
                OpenMode::Print => {
                    command_guard::validate(&args)?;
                    writeln!(stdout, "{}", uri_codec::to_quoted_command_string(&args))?;
                }
                OpenMode::DryRun => {
                    command_guard::validate(&args)?;
                    let spec = launcher().plan(&args)?;
                    writeln!(stdout, "{spec}")?;
                }
                OpenMode::Launch => {
                    command_guard::validate(&args)?;
                    let spec = launcher().launch(&args)?;
                    tracing::info!(mechanism = %spec.mechanism, "Opened terminal");
                }
            }
        }
        Action::InitConfig => {
            let Some(path) = settings::ensure_config_file() else {
                bail!(
                    "could not create config file at {}",
                    settings::config_path().display()
                );
            };
            writeln!(stdout, "{}", path.display())?;
        }
    }
    Ok(())
}

/// Replace a trailing `-` with the words of one stdin line. A lone `-`
/// reads the whole command line, program included.
pub fn expand_stdin_args<R: BufRead>(
    mut args: Vec<String>,
    stdin: &mut R,
) -> Result<Vec<String>> {
    if args.last().map(String::as_str) != Some(STDIN_SENTINEL) {
        return Ok(args);
    }
    args.pop();

    let line = read_stdin_line(stdin)?;
    args.extend(line.split_whitespace().map(str::to_string));
    Ok(args)
}

fn read_stdin_line<R: BufRead>(stdin: &mut R) -> Result<String> {
    let mut line = String::new();
    stdin
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line)
}

/// True if `err` came from refusing suspicious input rather than from a
/// broken host or a bad URI.
pub fn is_security_rejection(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause.is::<command_guard::GuardError>()
            || cause
                .downcast_ref::<LaunchError>()
                .is_some_and(LaunchError::is_security_rejection)
    })
}
