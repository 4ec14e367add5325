//! Parley Control - terminal front end for the Parley responder
//!
//! Without a subcommand it starts the chat REPL; `ask`, `eval` and `rules`
//! are one-shot helpers.

use std::io;

use anyhow::Result;
use clap::Parser;
use parley_shared::calc;
use parleyctl::cli::{Cli, Commands};
use parleyctl::config::ParleyConfig;
use parleyctl::errors::{EXIT_CONFIG_ERROR, EXIT_EVAL_FAILED, EXIT_IO_ERROR, EXIT_SUCCESS};
use parleyctl::session::{self, Settings};
use parleyctl::{logging, repl};
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let config = match ParleyConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            logging::init("warn");
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_CONFIG_ERROR);
        }
    };

    let settings = Settings::resolve(&cli, config);
    logging::init(&settings.log_level);
    info!(version = env!("CARGO_PKG_VERSION"), mode = %settings.mode, "parleyctl starting");

    let code = match run(cli.command, &settings) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "fatal");
            eprintln!("Error: {:#}", e);
            EXIT_CONFIG_ERROR
        }
    };
    std::process::exit(code);
}

fn run(command: Option<Commands>, settings: &Settings) -> Result<i32> {
    match command {
        Some(Commands::Eval { expression }) => {
            let expression = expression.join(" ");
            match calc::evaluate(&expression) {
                Ok(value) => {
                    println!("{}", value);
                    Ok(EXIT_SUCCESS)
                }
                Err(e) => {
                    eprintln!("{}", e);
                    Ok(EXIT_EVAL_FAILED)
                }
            }
        }
        Some(Commands::Rules) => {
            let responder = session::build_responder(settings)?;
            print!("{}", responder.rules().to_toml_string()?);
            Ok(EXIT_SUCCESS)
        }
        Some(Commands::Ask { text }) => {
            let mut responder = session::build_responder(settings)?;
            let reply = responder.respond(&text.join(" "), settings.mode);
            println!("{}", reply.text);
            Ok(EXIT_SUCCESS)
        }
        None => {
            let mut responder = session::build_responder(settings)?;
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let interactive = console::user_attended();
            match repl::run(
                &mut responder,
                settings.mode,
                stdin.lock(),
                &mut stdout,
                interactive,
            ) {
                Ok(_) => Ok(EXIT_SUCCESS),
                Err(e) => {
                    error!(error = %e, "terminal I/O failed");
                    eprintln!("Error: {}", e);
                    Ok(EXIT_IO_ERROR)
                }
            }
        }
    }
}
