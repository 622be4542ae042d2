// ============================================================================
// obfuscator-cli/src/main.rs
// ============================================================================
//
// MAIN ENTRY POINT: obs-obfuscator
//
// Parses the command line, sets up logging and dispatches to the selected
// command. Any error that reaches this point is printed and the process
// exits with status 1.

use clap::Parser;
use obfuscator_cli::error::suggestion_for;
use obfuscator_cli::logging::init_logging;
use obfuscator_cli::{run_monitors, run_scenes, run_watch, terminal, Cli, Commands};
use std::process;

fn main() {
    let cli = Cli::parse();

    match init_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(Some(path)) => log::debug!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }

    let result = match &cli.command {
        Commands::Run(args) => run_watch(args, cli.config.as_deref()),
        Commands::Scenes(args) => run_scenes(args),
        Commands::Monitors => run_monitors(),
    };

    if let Err(e) = result {
        terminal::print_error("Error", &e.to_string(), suggestion_for(&e));
        process::exit(1);
    }
}
