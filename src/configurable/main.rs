use clap::Parser;
use configurable::json;
use configurable::{ConfigValue, Configuration, Result, TracingSink};
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod args;
use args::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Show { file } => handle_show(&file),
        Commands::Get { file, name } => handle_get(&file, &name),
        Commands::Set { file, name, value } => handle_set(&file, &name, &value),
        Commands::Unset { file, name } => handle_unset(&file, &name),
    }
}

fn handle_show(file: &Path) -> Result<()> {
    let config = Configuration::read(file, &TracingSink)?;
    println!("{}", config.to_json_string()?);
    Ok(())
}

fn handle_get(file: &Path, name: &str) -> Result<()> {
    let config = Configuration::read(file, &TracingSink)?;
    let value = config.get(name).unwrap_or_default();
    println!("{}", value);
    Ok(())
}

fn handle_set(file: &Path, name: &str, raw: &str) -> Result<()> {
    let config = Configuration::read(file, &TracingSink)?;
    config.set(name, parse_value(raw));
    tracing::debug!("{}", config);
    config.try_write(file)
}

fn handle_unset(file: &Path, name: &str) -> Result<()> {
    let config = Configuration::read(file, &TracingSink)?;
    if config.remove(name).is_none() {
        tracing::info!("Property '{}' was not set", name);
    }
    config.try_write(file)
}

/// Filter used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "warn"
    }
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_value(raw: &str) -> ConfigValue {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => json::from_json(&value),
        Err(_) => ConfigValue::from(raw),
    }
}
