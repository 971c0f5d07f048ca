use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use inventory_backend::domain::commands::inventory::{
    AddProductCommand, RemoveProductCommand, SearchProductsQuery, UpdateProductCommand,
};
use inventory_backend::{Backend, InventoryConfig, ProductRecord, StoreError, SyncStatus};

#[derive(Parser, Debug)]
#[command(name = "inventory", version, about = "Product inventory kept in a CSV file")]
struct Cli {
    #[arg(short, long, value_name = "FILE", help = "Configuration file path")]
    config: Option<PathBuf>,

    #[arg(short = 'f', long, value_name = "FILE", help = "Inventory file to open")]
    data_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Print products as JSON instead of a table")]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add a new product
    Add {
        id: String,
        name: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
        #[arg(allow_negative_numbers = true)]
        price: f64,
    },
    /// Change some fields of a product
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_negative_numbers = true)]
        quantity: Option<i64>,
        #[arg(long, allow_negative_numbers = true)]
        price: Option<f64>,
    },
    /// Remove a product
    Remove { id: String },
    /// Show one product
    Get { id: String },
    /// Show every product, sorted by id
    List,
    /// Find products whose name contains the text, ignoring case
    Search { text: String },
    /// Show the data file, read-only flag and load diagnostics
    Status,
    /// Write the inventory to a JSON snapshot
    Export { path: PathBuf },
    /// Add the products of a JSON snapshot
    Import { path: PathBuf },
}

/// How a command that did not fail ended
enum Outcome {
    Done,
    /// The change is in memory only and is lost when the process exits
    Unsynced,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match InventoryConfig::load(cli.config.as_deref()) {
        Ok(config) => config.with_data_file(cli.data_file.clone()),
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    init_logging(&config.log_level);
    debug!("Using config {:?}", config);

    let mut backend = Backend::new(&config);
    for diagnostic in backend.diagnostics() {
        eprintln!("warning: {}", diagnostic);
    }

    match run(cli.command, cli.json, &mut backend) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::Unsynced) => ExitCode::from(2),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Commands, json: bool, backend: &mut Backend) -> Result<Outcome> {
    let service = &mut backend.inventory_service;

    match command {
        Commands::Add {
            id,
            name,
            quantity,
            price,
        } => {
            let result = service.add_product(AddProductCommand {
                id,
                name,
                quantity,
                unit_price: price,
            })?;
            println!("Added {}", result.product);
            Ok(report_sync(&result.sync))
        }
        Commands::Update {
            id,
            name,
            quantity,
            price,
        } => {
            let outcome = service.update_product(UpdateProductCommand {
                id,
                name,
                quantity,
                unit_price: price,
            })?;
            for rejected in &outcome.rejected {
                eprintln!("warning: {} was not changed: {}", rejected.field, rejected.reason);
            }
            println!("Updated {}", outcome.record);
            Ok(report_sync(&outcome.sync))
        }
        Commands::Remove { id } => {
            let outcome = service.remove_product(RemoveProductCommand { id })?;
            println!("Removed {}", outcome.removed);
            Ok(report_sync(&outcome.sync))
        }
        Commands::Get { id } => {
            let product = service
                .get_product(&id)
                .ok_or_else(|| StoreError::NotFound { id: id.clone() })?;
            print_products(&[product], json)?;
            Ok(Outcome::Done)
        }
        Commands::List => {
            print_products(&service.list_products(), json)?;
            Ok(Outcome::Done)
        }
        Commands::Search { text } => {
            let found = service.search_products(&SearchProductsQuery { text });
            print_products(&found, json)?;
            Ok(Outcome::Done)
        }
        Commands::Status => {
            let status = service.status();
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                println!("File:      {}", status.data_file);
                println!("Products:  {}", status.record_count);
                println!("Read-only: {}", if status.read_only { "yes" } else { "no" });
                println!("Diagnostics: {}", status.diagnostics.len());
                for diagnostic in &status.diagnostics {
                    println!("  {}", diagnostic);
                }
            }
            Ok(Outcome::Done)
        }
        Commands::Export { path } => {
            let count = backend
                .export_service
                .export_json(backend.inventory_service.storage(), &path)?;
            info!("Export finished");
            println!("Exported {} products to {}", count, path.display());
            Ok(Outcome::Done)
        }
        Commands::Import { path } => {
            let report = backend
                .export_service
                .import_json(backend.inventory_service.storage_mut(), &path)?;
            for skipped in &report.skipped {
                eprintln!("warning: skipped {}: {}", skipped.id, skipped.reason);
            }
            println!("Imported {} products", report.imported.len());
            if report.unsynced {
                eprintln!("warning: imported products could not be saved to the inventory file");
                Ok(Outcome::Unsynced)
            } else {
                Ok(Outcome::Done)
            }
        }
    }
}

fn report_sync(sync: &SyncStatus) -> Outcome {
    match sync.warning() {
        None => Outcome::Done,
        Some(e) => {
            eprintln!("warning: {}; the change was not saved", e);
            Outcome::Unsynced
        }
    }
}

fn print_products(products: &[&ProductRecord], json: bool) -> Result<()> {
    if json {
        let products: Vec<shared::Product> = products.iter().map(|p| shared::Product::from(*p)).collect();
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!("No products.");
        return Ok(());
    }

    println!("{:<10} {:<30} {:>10} {:>10}", "ID", "Name", "Quantity", "Price");
    println!("{}", "-".repeat(63));
    for product in products {
        println!(
            "{:<10} {:<30} {:>10} {:>10.2}",
            product.id(),
            product.name(),
            product.quantity(),
            product.unit_price()
        );
    }
    Ok(())
}
