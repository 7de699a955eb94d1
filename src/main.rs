//! muffin-build CLI, incremental build for the Muffin language tooling.

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "muffin-build",
    version,
    about = "Incremental build for the Muffin language tooling: grammar, parser, autocomplete, bundle"
)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<muffin_build::cli::Commands>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "muffin_build=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match muffin_build::cli::dispatch(cli.command.unwrap_or_default()) {
        Ok(status) => std::process::exit(status),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
