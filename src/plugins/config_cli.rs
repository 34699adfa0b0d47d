use crate::core::config::Config;
use crate::core::error::GooError;
use crate::core::output;
use crate::core::store::Store;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[clap(name = "config", about = "Manage the CLI configuration")]
pub struct ConfigCli {
    #[clap(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Create the config file with default values.
    Init,
    /// Show the current configuration.
    Show,
}

/// Write a default config, with the API key when one is given.
pub fn init_config(store: &Store, api_key: Option<String>) -> Result<Config, GooError> {
    let cfg = Config {
        google_api_key: api_key.filter(|k| !k.trim().is_empty()).map(|k| k.trim().to_string()),
        ..Config::default()
    };
    Config::init(store, &cfg)?;
    Ok(cfg)
}

fn display_config(cfg: &Config) {
    output::key_value("Key Name", &cfg.keyname);
    output::key_value("Realm Path", &cfg.realm_path);
    output::key_value("Chain ID", &cfg.chain_id);
    output::key_value("Remote", &cfg.remote);
    output::key_value("Gas Fee", &cfg.gas_fee);
    output::key_value("Gas Wanted", cfg.gas_wanted);
    output::key_value("Google API Key", cfg.masked_api_key());
}

pub fn run_config_cli(store: &Store, cli: ConfigCli) -> Result<(), GooError> {
    match cli.command {
        ConfigCommand::Init => {
            let path = store.config_path();
            if path.exists() {
                return Err(GooError::ConfigError(format!(
                    "config file already exists at {}",
                    path.display()
                )));
            }
            println!();
            println!("AI-Powered Proposal Configuration (Optional)");
            println!();
            println!("goo can use Google Gemini to research and propose values.");
            println!("This needs a free Google API key.");
            println!();
            let key = output::prompt("Enter Google API Key (leave empty to skip): ")?;
            let cfg = init_config(store, Some(key))?;
            if cfg.google_api_key.is_some() {
                output::success("Google API key configured");
            } else {
                output::info(&format!("Skipped - you can add it later in {}", path.display()));
            }

            println!();
            output::success(&format!("Config file created at {}", path.display()));
            output::section("Configuration");
            display_config(&cfg);
            println!();
            if cfg.google_api_key.is_none() {
                println!("To enable AI-powered proposals:");
                println!("  1. Get a free API key: https://makersuite.google.com/app/apikey");
                println!("  2. Add to {}:", path.display());
                println!("     google_api_key = \"your-api-key-here\"");
                println!("  3. Use: goo propose value <id> --search");
            }
        }
        ConfigCommand::Show => {
            let cfg = Config::load(store);
            output::section("Current Configuration");
            display_config(&cfg);
            println!();
            output::info(&format!("Config file: {}", store.config_path().display()));
        }
    }
    Ok(())
}
