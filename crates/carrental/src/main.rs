//! `carrent` - CLI for carrental
//!
//! This binary runs the interactive rental shell and a few read-only
//! commands over the stored records.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;

use carrental::cli::{Cli, Command, ConfigCommand, ListCommand, OutputFormat};
use carrental::report::{listing_json, status_json, write_listing};
use carrental::{init_logging, shell, Config, Store};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let mut config =
        Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir {
        config.storage.data_dir = Some(dir);
    }

    // Execute the command
    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => handle_shell(&config),
        Command::Status(status_cmd) => handle_status(&config, status_cmd.json),
        Command::List(list_cmd) => handle_list(&config, &list_cmd),
        Command::Config(config_cmd) => handle_config(&config, config_cmd),
    }
}

fn load_store(config: &Config) -> anyhow::Result<Store> {
    let files = config.data_files();
    Store::load(&files)
        .with_context(|| format!("failed to load records from {}", files.dir.display()))
}

fn handle_shell(config: &Config) -> anyhow::Result<()> {
    let stdin = io::stdin();
    shell::run_session(config, stdin.lock(), io::stdout().lock())
        .with_context(|| format!("shell session failed ({})", config.data_dir().display()))
}

fn handle_status(config: &Config, json: bool) -> anyhow::Result<()> {
    let stats = load_store(config)?.stats();
    if json {
        println!("{}", status_json(&stats)?);
    } else {
        println!("{stats}");
    }
    Ok(())
}

fn handle_list(config: &Config, cmd: &ListCommand) -> anyhow::Result<()> {
    let store = load_store(config)?;
    match cmd.format {
        OutputFormat::Plain => write_listing(&store, cmd.kind.into(), &mut io::stdout().lock())?,
        OutputFormat::Json => println!("{}", listing_json(&store, cmd.kind.into())?),
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                let files = config.data_files();
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", files.dir.display());
                println!("  Cars file:          {}", config.storage.cars_file);
                println!("  Customers file:     {}", config.storage.customers_file);
                println!("  Rentals file:       {}", config.storage.rentals_file);
                println!("  Payments file:      {}", config.storage.payments_file);
                println!();
                println!("[Shell]");
                println!(
                    "  Processing steps:   {}",
                    config.shell.extra_processing_steps
                );
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
