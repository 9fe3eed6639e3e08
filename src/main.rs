// fontpick - browse, search and install programming fonts
//
// this_file: fontpick/src/main.rs

use clap::Parser;
use env_logger::Env;
use fontpick::cli::{self, Cli};

/// Default log level when RUST_LOG is not set
fn default_log_level(cli: &Cli) -> &'static str {
    if cli.verbose {
        return "debug";
    }

    // Log lines would tear the interactive screen
    let interactive = match &cli.command {
        None => cfg!(feature = "tui"),
        #[cfg(feature = "tui")]
        Some(cli::Commands::Browse) => true,
        Some(_) => false,
    };

    if interactive {
        "off"
    } else {
        "warn"
    }
}

fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(default_log_level(&cli)))
        .format_timestamp(None)
        .init();

    if let Err(e) = cli::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
