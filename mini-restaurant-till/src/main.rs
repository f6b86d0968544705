use std::io::{self, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};
use mini_restaurant_store::Store;
use mini_restaurant_till::{shell, Shell};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Mini restaurant till")]
struct Cli {
    /// SQLite database file. Defaults to DATABASE_URL, then mini_rest.db
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Clone, Copy)]
enum Commands {
    /// Run the interactive till (default)
    Till,
    /// Create the tables and seed the menu, then exit
    Init,
    /// Print the menu and exit
    Menu,
}

pub fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let store = match cli.database {
        Some(database_url) => Store::new(database_url),
        None => Store::from_env(),
    };
    store
        .initialize()
        .with_context(|| format!("Failed to initialize {}", store.database_url()))?;

    match cli.command.unwrap_or(Commands::Till) {
        Commands::Init => println!("Initialized {}", store.database_url()),
        Commands::Menu => {
            let menu = store.list_menu()?;
            let mut out = io::stdout().lock();
            shell::write_menu(&mut out, &menu)?;
            out.flush()?;
        }
        Commands::Till => {
            let menu = store.list_menu()?;
            Shell::new(&store, menu, io::stdin().lock(), io::stdout().lock()).run()?;
        }
    }
    Ok(())
}
