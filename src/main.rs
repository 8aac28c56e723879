use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use tierlist_maker_lib::codec::{self, TierlistRecord};
use tierlist_maker_lib::commands;
use tierlist_maker_lib::repository::{JsonFileStore, SqliteTierlistStore, TierlistStore};
use tierlist_maker_lib::{AppConfig, AppState};

#[derive(Parser, Debug)]
#[command(name = "tierlist", about = "Inspect and convert tierlist databases")]
struct Cli {
    /// TOML config file
    #[arg(long, env = "TIERLIST_CONFIG")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the tiers and pool stored in a database
    Show { db: PathBuf },
    /// Write a database's tierlist to a JSON file
    Export { db: PathBuf, json: PathBuf },
    /// Replace a database's contents with a JSON tierlist
    Import { json: PathBuf, db: PathBuf },
}

fn init_logging(config: &AppConfig) -> Result<()> {
    match &config.log_dir {
        Some(dir) => rolling_logger::init_logger(dir.clone(), "tierlist"),
        None => rolling_logger::init_stderr(),
    }
    .map_err(anyhow::Error::msg)
    .context("failed to init logging")
}

async fn open_sqlite(config: &AppConfig, db: &Path) -> Result<SqliteTierlistStore> {
    let thumb_dir = config
        .thumb_dir
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("tierlist-thumbs"));
    SqliteTierlistStore::open(db, thumb_dir)
        .await
        .with_context(|| format!("failed to open {}", db.display()))
}

async fn show(config: &AppConfig, db: &Path) -> Result<()> {
    let store = open_sqlite(config, db).await?;
    let state = AppState::with_title(Box::new(store), config.default_title.clone());
    let view = commands::load_tierlist(&state)
        .await
        .map_err(anyhow::Error::msg)?;

    println!("{}", view.title);
    for tier in &view.tiers {
        let names: Vec<&str> = tier.items.iter().map(|it| it.name.as_str()).collect();
        println!("  [{}] {}: {}", tier.key, tier.title, names.join(", "));
    }
    let pool: Vec<&str> = view.pool.items.iter().map(|it| it.name.as_str()).collect();
    println!("  pool: {}", pool.join(", "));
    Ok(())
}

/// Load from one store, validate by decoding, save to the other
async fn convert(from: &dyn TierlistStore, to: &dyn TierlistStore) -> Result<TierlistRecord> {
    let record = from
        .load()
        .await
        .with_context(|| format!("failed to load {}", from.describe()))?;
    let tierlist = codec::deserialize(record).context("stored tierlist is malformed")?;
    let record = codec::serialize(&tierlist);
    to.save(&record)
        .await
        .with_context(|| format!("failed to save {}", to.describe()))?;
    Ok(record)
}

async fn run(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Show { db } => show(config, &db).await?,
        Command::Export { db, json } => {
            let from = open_sqlite(config, &db).await?;
            let record = convert(&from, &JsonFileStore::new(&json)).await?;
            let msg = format!(
                "exported {} items in {} tiers to {}",
                record.items.len(),
                record.tiers.len(),
                json.display()
            );
            let _ = rolling_logger::info(&msg);
            println!("{}", msg);
        }
        Command::Import { json, db } => {
            let to = open_sqlite(config, &db).await?;
            let record = convert(&JsonFileStore::new(&json), &to).await?;
            let msg = format!(
                "imported {} items in {} tiers into {}",
                record.items.len(),
                record.tiers.len(),
                db.display()
            );
            let _ = rolling_logger::info(&msg);
            println!("{}", msg);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;
    init_logging(&config)?;

    let outcome = run(cli.command, &config).await;
    if let Err(e) = &outcome {
        let _ = rolling_logger::error(&format!("{:#}", e));
    }
    outcome
}
