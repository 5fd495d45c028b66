pub mod scan;

use std::path::PathBuf;
use std::time::Duration;

use clap::builder::RangedU64ValueParser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::{ArgAction, CommandFactory, Parser};
use vscout_common::config::{Config, DEFAULT_DATABASE};

#[derive(Parser)]
#[command(name = "vscout", version)]
#[command(about = "Discovers virtual hosts by spoofing the Host header.")]
pub struct CommandLine {
    /// Target URL, domain name, or file with one target per line
    pub targets: String,
    /// File with one candidate vhost per line
    pub vhosts: PathBuf,

    /// Accept invalid or self-signed TLS certificates
    #[arg(short = 'k', long)]
    pub insecure: bool,

    /// Per-request timeout in seconds
    #[arg(short, long, default_value = "10", value_parser = parse_seconds)]
    pub timeout: Duration,

    /// Maximum random pause between two vhost probes, in seconds
    #[arg(short, long, default_value = "3", value_parser = parse_seconds)]
    pub jitter: Duration,

    /// Number of targets scanned at the same time
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub concurrency: usize,

    /// SQLite file that receives discovered vhosts
    #[arg(short, long, default_value = DEFAULT_DATABASE)]
    pub database: PathBuf,

    /// Reduce output; repeat for less
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Do not print the banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    /// Parses `argv`. A wrong number of positional arguments prints usage and
    /// exits successfully, like `--help` does.
    pub fn parse_args() -> Self {
        match Self::try_parse() {
            Ok(commands) => commands,
            Err(e) if is_wrong_arity(&e) => {
                let _ = Self::command().print_help();
                std::process::exit(0);
            }
            Err(e) => e.exit(),
        }
    }

    pub fn to_config(&self) -> Config {
        Config {
            insecure: self.insecure,
            timeout: self.timeout,
            jitter: self.jitter,
            concurrency: self.concurrency,
            database: self.database.clone(),
            no_banner: self.no_banner,
            quiet: self.quiet,
        }
    }
}

/// Missing positionals, or a surplus one. Misspelled flags do not count.
fn is_wrong_arity(e: &clap::Error) -> bool {
    match e.kind() {
        ErrorKind::MissingRequiredArgument => true,
        ErrorKind::UnknownArgument => matches!(
            e.get(ContextKind::InvalidArg),
            Some(ContextValue::String(arg)) if !arg.starts_with('-')
        ),
        _ => false,
    }
}

fn parse_seconds(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("'{value}' is not a valid duration"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
