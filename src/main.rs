//! nagios-api CLI - HTTP front end for the Nagios external command file.

use clap::Parser;
use nagios_api::cli::{Cli, Commands, ConfigCommands};
use nagios_api::commands::{self, CommandResult};
use nagios_api::config::{ResolvedSettings, resolve_config};
use nagios_api::{logging, server};
use std::process;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    let result = resolve_config(&cli.overrides())
        .and_then(|settings| run_command(cli.command, &settings, human));

    if let Err(e) = result {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn run_command(
    command: Option<Commands>,
    settings: &ResolvedSettings,
    human: bool,
) -> Result<(), nagios_api::Error> {
    match command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(settings),
        Commands::Commands => {
            output(&commands::list_commands(), human);
            Ok(())
        }
        Commands::Send { name, data } => {
            let result = runtime()?.block_on(commands::send(settings, &name, data.as_deref()))?;
            output(&result, human);
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                output(&commands::show_config(settings), human);
                Ok(())
            }
        },
    }
}

fn output<T: CommandResult>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

fn runtime() -> Result<tokio::runtime::Runtime, nagios_api::Error> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| nagios_api::Error::Other(format!("Failed to create runtime: {}", e)))
}

/// Run the HTTP server until Ctrl+C.
fn run_server(settings: &ResolvedSettings) -> Result<(), nagios_api::Error> {
    logging::init(settings.log_format(), settings.log_filter())?;

    runtime()?.block_on(server::serve(settings))
}
