//! Binary entrypoint for the Quest Chronicles text RPG.
//!
//! Commands:
//! - `play` - main menu: create or load a character and play
//! - `new <name> <class>` - create and save a character without playing
//! - `list` - list saved characters
//! - `delete <name>` - delete a saved character
//! - `init` - write a starter `chronicles.toml` and the default content files
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{info, warn};
use std::path::Path;

mod config;
mod display;
mod game;

use config::{GameConfig, DEFAULT_CONFIG_FILE};
use content_core::Catalog;
use game::Game;
use hero_core::{Character, CharacterClass};
use save_core::{CharacterStore, JsonFileStore};

#[derive(Parser)]
#[command(name = "chronicles")]
#[command(about = "Quest Chronicles - a text role-playing game")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively
    Play,
    /// Create a new character
    New {
        name: String,
        /// Warrior, Mage, Rogue or Cleric
        class: String,
    },
    /// List saved characters
    List,
    /// Delete a saved character
    Delete { name: String },
    /// Write a default configuration and content files
    Init,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = Path::new(&cli.config);
    let config = GameConfig::load_or_default(config_path)?;
    init_logging(&config, cli.verbose);

    match cli.command {
        Commands::Play => {
            let catalog = load_catalog(&config);
            let mut store = JsonFileStore::new(&config.saves_dir)?;
            info!("Starting Quest Chronicles v{}", env!("CARGO_PKG_VERSION"));
            let stdin = std::io::stdin();
            let mut game = Game::new(
                stdin.lock(),
                std::io::stdout(),
                rand::thread_rng(),
                &mut store,
                catalog,
            )
            .with_autosave(config.autosave);
            game.run()?;
        }
        Commands::New { name, class } => {
            let class: CharacterClass = class.parse()?;
            let character = Character::new(name, class)?;
            let mut store = JsonFileStore::new(&config.saves_dir)?;
            if store.exists(&character.name)? {
                anyhow::bail!("A character named '{}' already exists", character.name);
            }
            store.save(&character)?;
            println!("Created {} the {}", character.name, character.class);
        }
        Commands::List => {
            let store = JsonFileStore::new(&config.saves_dir)?;
            let names = store.list()?;
            if names.is_empty() {
                println!("No saved characters found.");
            }
            for name in names {
                match store.load(&name) {
                    Ok(c) => println!("{} - level {} {}", c.name, c.level, c.class),
                    Err(e) => println!("{} - unreadable ({})", name, e),
                }
            }
        }
        Commands::Delete { name } => {
            let mut store = JsonFileStore::new(&config.saves_dir)?;
            store.delete(&name)?;
            println!("Deleted {}", name);
        }
        Commands::Init => {
            if config_path.exists() {
                println!("Config already exists at {}", config_path.display());
            } else {
                config.write(config_path)?;
                println!("Wrote {}", config_path.display());
            }
            content_core::write_default_content(&config.content_dir).with_context(|| {
                format!("writing default content to {}", config.content_dir.display())
            })?;
            println!("Content files are in {}", config.content_dir.display());
        }
    }

    Ok(())
}

/// Load content from the configured files, falling back to the built-in set
fn load_catalog(config: &GameConfig) -> Catalog {
    match Catalog::load(&config.quests_path(), &config.items_path()) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("{}; using built-in content (run `chronicles init` to write it out)", e);
            Catalog::builtin()
        }
    }
}

fn init_logging(config: &GameConfig, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the config level
    let level = match verbosity {
        0 => config.log_filter().unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(level);
    builder.format_timestamp(None);
    builder.init();
}
