use std::io::Read;
use std::path::PathBuf;

use catalog_core::{Catalog, Response};
use catalog_sqlite::{Migration, SqliteStore, StoreConfig};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "catalog")]
#[command(about = "Product catalog backed by SQLite", version)]
struct Cli {
    /// Path to a YAML store config (database, prefix).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Database file path, overriding the config.
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Table prefix, overriding the config.
    #[arg(long, global = true)]
    prefix: Option<String>,
    /// Log at debug level (otherwise RUST_LOG, default warn).
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print every product as a JSON array.
    List,
    /// Create a product from a JSON object.
    Create(InputArgs),
    /// Update fields of a stored product; the JSON object must carry `id`.
    Update(InputArgs),
    /// Delete products by id from a JSON array of integers.
    Delete(InputArgs),
    /// Table migration and seeding operations.
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// JSON input; read from stdin when omitted.
    #[arg(long)]
    json: Option<String>,
}

#[derive(Debug, Args)]
struct MigrateArgs {
    #[command(subcommand)]
    operation: MigrateOperation,
}

#[derive(Debug, Subcommand)]
enum MigrateOperation {
    /// Create the products table.
    Up,
    /// Insert products from a JSON array file.
    Seed(SeedArgs),
    /// Show table status and product counts.
    Status,
}

#[derive(Debug, Args)]
struct SeedArgs {
    /// JSON file holding an array of products.
    #[arg(long)]
    source: PathBuf,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = resolve_config(&cli).and_then(|config| match cli.command {
        Command::List => run_catalog(&config, |catalog| catalog.handle_list()),
        Command::Create(args) => {
            let input = read_input(args)?;
            run_catalog(&config, |catalog| catalog.handle_create(&input))
        }
        Command::Update(args) => {
            let input = read_input(args)?;
            run_catalog(&config, |catalog| catalog.handle_update(&input))
        }
        Command::Delete(args) => {
            let input = read_input(args)?;
            run_catalog(&config, |catalog| catalog.handle_delete(&input))
        }
        Command::Migrate(args) => run_migrate(&config, args),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<StoreConfig, String> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)
            .map_err(|e| format!("Failed to load config '{}': {e}", path.display()))?,
        None => StoreConfig::default(),
    };
    if let Some(db) = &cli.db {
        config.database = db.clone();
    }
    if let Some(prefix) = &cli.prefix {
        config.prefix = prefix.clone();
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Reads `--json` or stdin. Text that is not JSON becomes `null`, which the
/// catalog rejects with its input-shape message.
fn read_input(args: InputArgs) -> Result<Value, String> {
    let raw = match args.json {
        Some(json) => json,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {e}"))?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw).unwrap_or_else(|err| {
        debug!(%err, "input is not valid JSON");
        Value::Null
    }))
}

fn run_catalog(
    config: &StoreConfig,
    handle: impl FnOnce(&Catalog<SqliteStore<'_>>) -> Response,
) -> Result<(), String> {
    let conn = config
        .open()
        .map_err(|e| format!("Failed to open database '{}': {e}", config.database.display()))?;
    let store = SqliteStore::new(&conn, &config.prefix).map_err(|e| e.to_string())?;
    let response = handle(&Catalog::new(store));

    if let Some(body) = &response.body {
        let rendered = serde_json::to_string_pretty(body)
            .map_err(|e| format!("Failed to render response: {e}"))?;
        println!("{rendered}");
    }
    if response.is_success() {
        Ok(())
    } else {
        Err(format!("request failed with status {}", response.status))
    }
}

fn open_migration(config: &StoreConfig) -> Result<Migration, String> {
    let conn = config
        .open()
        .map_err(|e| format!("Failed to open database '{}': {e}", config.database.display()))?;
    Migration::new(conn, &config.prefix).map_err(|e| format!("Failed to initialize migration: {e}"))
}

fn run_migrate(config: &StoreConfig, args: MigrateArgs) -> Result<(), String> {
    let mut migration = open_migration(config)?;
    match args.operation {
        MigrateOperation::Up => {
            migration
                .up()
                .map_err(|e| format!("Migration up failed: {e}"))?;
            println!(
                "Migration up complete. Tables created with prefix '{}' in '{}'.",
                config.prefix,
                config.database.display()
            );
        }
        MigrateOperation::Seed(args) => {
            let report = migration
                .seed(&args.source)
                .map_err(|e| format!("Seed failed: {e}"))?;
            println!("Seed complete:");
            println!("  Products inserted: {}", report.inserted);
            println!("  Products rejected: {}", report.rejected);
        }
        MigrateOperation::Status => {
            let status = migration
                .status()
                .map_err(|e| format!("Failed to get migration status: {e}"))?;
            println!("Migration Status:");
            println!(
                "  Tables exist: {}",
                if status.tables_exist { "yes" } else { "no" }
            );
            println!("  Product count: {}", status.product_count);
            for (category, count) in &status.category_counts {
                println!("  {category} count: {count}");
            }
        }
    }
    Ok(())
}
