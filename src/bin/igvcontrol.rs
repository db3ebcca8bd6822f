//! A command line front end for driving IGV through its batch port.
//!
//! ```shell
//! cargo run --release --bin=igvcontrol --features=binaries -- check
//! cargo run --release --bin=igvcontrol --features=binaries -- variants variants.vcf
//! cargo run --release --bin=igvcontrol --features=binaries -- visit variants.vcf --index 2
//! ```

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use anyhow::Result;
use anyhow::bail;
use clap::Parser;
use clap::Subcommand;
use clap_verbosity_flag::Verbosity;
use igvcontrol::Client;
use igvcontrol::Variants;
use igvcontrol::client;
use igvcontrol::variants;
use tracing::info;
use tracing::warn;
use tracing_log::AsTrace as _;
use tracing_subscriber::EnvFilter;

////////////////////////////////////////////////////////////////////////////////////////
// Arguments
////////////////////////////////////////////////////////////////////////////////////////

/// Controls a running IGV through its batch port.
#[derive(Parser)]
struct Args {
    /// The host IGV is listening on.
    #[arg(long, default_value = client::DEFAULT_HOST, global = true)]
    host: String,

    /// The port IGV is listening on.
    #[arg(short, long, default_value_t = client::DEFAULT_PORT, global = true)]
    port: u16,

    /// The timeout for `goto` and `load` commands (in milliseconds).
    #[arg(long, default_value_t = 1_000, global = true)]
    timeout_ms: u64,

    /// The timeout for the liveness probe (in milliseconds).
    #[arg(long, default_value_t = 5_000, global = true)]
    probe_timeout_ms: u64,

    /// Terminates every command with a new line.
    #[arg(long, default_value_t = false, global = true)]
    newline: bool,

    /// The subcommand.
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbose: Verbosity,
}

/// The subcommands.
#[derive(Subcommand)]
enum Command {
    /// Checks whether IGV is reachable.
    Check,

    /// Moves IGV to a locus (e.g., `chr1:123456`).
    Goto {
        /// The locus.
        locus: String,
    },

    /// Loads a file into IGV.
    Load {
        /// The path to the file, as seen by IGV.
        path: String,
    },

    /// Prints the detected format and every variant in a file.
    Variants {
        /// The VCF, tab-delimited, or spreadsheet file.
        src: PathBuf,

        /// Keeps VCF chromosome names as written instead of prepending `chr`.
        #[arg(long, default_value_t = false)]
        no_chr_prefix: bool,
    },

    /// Moves IGV to one variant from a file.
    Visit {
        /// The VCF, tab-delimited, or spreadsheet file.
        src: PathBuf,

        /// The (0-based) index of the variant to visit.
        #[arg(short, long, default_value_t = 0)]
        index: usize,

        /// Keeps VCF chromosome names as written instead of prepending `chr`.
        #[arg(long, default_value_t = false)]
        no_chr_prefix: bool,
    },
}

////////////////////////////////////////////////////////////////////////////////////////
// Commands
////////////////////////////////////////////////////////////////////////////////////////

/// Builds the client described by the arguments.
fn client(args: &Args) -> Client {
    client::Builder::default()
        .host(args.host.clone())
        .port(args.port)
        .timeout(Duration::from_millis(args.timeout_ms))
        .probe_timeout(Duration::from_millis(args.probe_timeout_ms))
        .newline(args.newline)
        .build()
}

/// Opens a file of variants.
fn open(src: &Path, no_chr_prefix: bool) -> Result<Variants> {
    let variants = variants::Builder::default()
        .prepend_chr(!no_chr_prefix)
        .try_build_from_path(src)
        .with_context(|| format!("reading variants from {}", src.display()))?;

    info!("{}: {} format", src.display(), variants.format());
    Ok(variants)
}

/// Reports the outcome of a navigation command.
///
/// IGV regularly stalls while it is busy, so a timeout is only a warning.
fn report(what: &str, result: client::Result<bool>) -> Result<()> {
    match result {
        Ok(true) => {
            info!("{what}: OK");
            Ok(())
        }
        Ok(false) => bail!("{what}: IGV declined the command"),
        Err(client::Error::Transport(err)) if err.is_timeout() => {
            warn!("{what}: IGV did not answer in time ({err})");
            Ok(())
        }
        Err(err) => Err(err).with_context(|| what.to_string()),
    }
}

/// Runs the subcommand.
fn run(args: &Args) -> Result<()> {
    let client = client(args);

    match &args.command {
        Command::Check => {
            let alive = client.is_alive().with_context(|| {
                format!(
                    "IGV was not detected on host {}, port {}",
                    client.host(),
                    client.port()
                )
            })?;

            if !alive {
                bail!(
                    "something answered on host {}, port {}, but it is not IGV",
                    client.host(),
                    client.port()
                );
            }

            println!("IGV is running on {}:{}", client.host(), client.port());
        }
        Command::Goto { locus } => report(&format!("goto {locus}"), client.jump_to(locus))?,
        Command::Load { path } => report(&format!("load {path}"), client.load_file(path))?,
        Command::Variants { src, no_chr_prefix } => {
            let variants = open(src, *no_chr_prefix)?;
            println!("# format: {}", variants.format());

            for (i, result) in variants.enumerate() {
                let variant = result.with_context(|| format!("reading variant {}", i + 1))?;
                println!("{}\t{}", variant.chromosome(), variant.position());
            }
        }
        Command::Visit {
            src,
            index,
            no_chr_prefix,
        } => {
            let variant = match open(src, *no_chr_prefix)?.nth(*index) {
                Some(result) => result.with_context(|| format!("reading variant {}", index + 1))?,
                None => bail!("{} has fewer than {} variants", src.display(), index + 1),
            };

            report(&format!("goto {variant}"), client.goto_variant(&variant))?;
            println!("{variant}");
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    match std::env::var("RUST_LOG") {
        Ok(_) => tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .init(),
        Err(_) => tracing_subscriber::fmt()
            .with_max_level(args.verbose.log_level_filter().as_trace())
            .init(),
    };

    run(&args)
}
