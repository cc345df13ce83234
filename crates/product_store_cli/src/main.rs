//! Command-line front end for the product store.
//!
//! # Responsibility
//! - Read connection properties, open the database and own the connection.
//! - Run one record operation and print the resulting table contents.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use product_store_core::config::DEFAULT_CONFIG_FILE;
use product_store_core::{
    default_log_level, init_logging, open_db, seed_sample_data, ConnectionConfig, ProductCode,
    ProductCodeRepository, SqliteProductCodeRepository,
};
use rusqlite::Connection;
use std::path::PathBuf;

const DEMO_DESCRIPTION: &str = "tttttt";

#[derive(Debug, Parser)]
#[command(name = "product_store", version, about = "Inspect and edit product codes")]
struct Cli {
    /// TOML file with `url`, `user` and `password`.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// off|error|warn|info|debug|trace
    #[arg(long)]
    log_level: Option<String>,

    /// Directory for rolling log files; stderr when omitted.
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Insert the sample product codes before running the command.
    #[arg(long)]
    seed: bool,

    /// Print records as JSON instead of text lines.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every product code.
    List,
    /// Change the description of an existing product code.
    SetDescription { code: String, description: String },
    /// Insert a product code, or update it when the code already exists.
    Save {
        code: String,
        discount_code: char,
        description: String,
    },
    /// Rewrite the first record's description, save it, and print all records.
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref()).map_err(anyhow::Error::msg)?;

    let config = ConnectionConfig::load(&cli.config)
        .with_context(|| format!("loading connection properties from {}", cli.config.display()))?;
    let url = config.database_url()?;
    let conn = open_db(&url).context("opening product database")?;

    if cli.seed {
        let inserted = seed_sample_data(&conn).context("seeding sample product codes")?;
        info!("event=seed module=cli status=ok inserted={inserted}");
    }

    run(&conn, cli.command.unwrap_or(Command::Demo))?;
    print_all(&conn, cli.json)
}

fn run(conn: &Connection, command: Command) -> Result<()> {
    let repo = SqliteProductCodeRepository::new(conn);
    match command {
        Command::List => {}
        Command::SetDescription { code, description } => {
            let Some(mut record) = repo.find(&code)? else {
                bail!("product code `{code}` does not exist");
            };
            record.set_description(description);
            let outcome = repo.save(&record)?;
            info!("event=set_description module=cli status=ok outcome={outcome:?}");
        }
        Command::Save {
            code,
            discount_code,
            description,
        } => {
            let outcome = repo.save(&ProductCode::new(code, discount_code, description))?;
            info!("event=save module=cli status=ok outcome={outcome:?}");
        }
        Command::Demo => {
            let mut records = ProductCode::all(conn)?;
            let Some(first) = records.first_mut() else {
                bail!("PRODUCT_CODE is empty; run with --seed to add sample rows");
            };
            first.set_description(DEMO_DESCRIPTION);
            first.save(conn)?;
        }
    }
    Ok(())
}

fn print_all(conn: &Connection, json: bool) -> Result<()> {
    let records = ProductCode::all(conn)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{record}");
        }
    }
    Ok(())
}
