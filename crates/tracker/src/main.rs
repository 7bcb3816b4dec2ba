//! `tracker` -- issue tracker REST API server.
//!
//! Parses CLI arguments with clap and dispatches to command handlers.

mod cli;
mod commands;
mod logging;

use clap::Parser;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Serve(args)) => commands::serve::run(&cli.global, args),
        Some(Commands::Config(args)) => commands::config_cmd::run(&cli.global, args),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
