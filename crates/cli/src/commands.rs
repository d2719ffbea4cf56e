use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Subcommand;

use stockroute_core::{LocationId, ProductId, SupplierId};
use stockroute_infra::FileStore;
use stockroute_inventory::{Network, ProductEdit};

use crate::render;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Create the standard four-location network
    Init {
        /// Overwrite an existing network
        #[arg(long)]
        force: bool,
    },

    /// Show every location and its stock
    Locations,

    /// Submit a delivery file (JSON array of products) as one batch
    Deliver { file: PathBuf },

    /// Submit a single new product as a batch, with the next free id
    Receive {
        #[arg(long)]
        supplier: SupplierId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        volume: f64,
        #[arg(long)]
        price: f64,
        #[arg(long, allow_hyphen_values = true)]
        days: i32,
    },

    /// Move stock out of Sorting locations into Cold/General
    Redistribute {
        /// Only this Sorting location
        #[arg(long)]
        location: Option<LocationId>,
    },

    /// Move expired stock to the Disposal location
    Expire {
        /// Only this location
        #[arg(long)]
        location: Option<LocationId>,
    },

    /// Report misplaced stock without changing anything
    Analyze,

    /// Total value per location and for the network
    Value,

    /// Move named products between two locations, ignoring category rules
    Move {
        from: LocationId,
        to: LocationId,
        #[arg(required = true)]
        products: Vec<ProductId>,
    },

    /// Rename or reprice a product
    EditProduct {
        id: ProductId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
    },

    /// Remove a product from the system
    DeleteProduct { id: ProductId },

    /// Change a location's address
    EditAddress { id: LocationId, address: String },

    /// Write a location snapshot to a file
    Export { file: PathBuf },

    /// Audit log operations
    #[command(subcommand)]
    Audit(AuditCommand),
}

#[derive(Debug, Clone, Subcommand)]
pub enum AuditCommand {
    /// Print the audit log
    Show,
    /// Write the audit log to a JSON file
    Export { file: PathBuf },
    /// Delete every audit entry
    Clear,
}

/// Run one command against the network saved in `store`.
pub fn run(command: Command, store: &FileStore) -> Result<String> {
    if let Command::Init { force } = command {
        return init(store, force);
    }

    let mut network = match store.load().context("loading saved network")? {
        Some(network) => network,
        None => {
            tracing::info!(dir = %store.dir().display(), "no saved network, starting from defaults");
            Network::with_default_locations()?
        }
    };

    // Failed operations may still have left audit entries worth keeping.
    let audit_before = network.audit().len();
    let result = execute(command, &mut network, store);
    let changed = match &result {
        Ok((_, changed)) => *changed,
        Err(_) => network.audit().len() != audit_before,
    };
    if changed {
        store.save(&network).context("saving network")?;
    }
    result.map(|(output, _)| output)
}

fn init(store: &FileStore, force: bool) -> Result<String> {
    if !force && store.locations_path().exists() {
        bail!(
            "a network already exists in {} (use --force to replace it)",
            store.dir().display()
        );
    }
    let network = Network::with_default_locations()?;
    store.save(&network).context("saving network")?;
    Ok(render::locations(network.locations()))
}

fn execute(command: Command, network: &mut Network, store: &FileStore) -> Result<(String, bool)> {
    let result = match command {
        Command::Init { .. } => bail!("init cannot run against a loaded network"),
        Command::Locations => (render::locations(network.locations()), false),
        Command::Deliver { file } => {
            let import = store
                .read_delivery(&file)
                .with_context(|| format!("reading delivery {}", file.display()))?;
            let mut out = String::new();
            for skipped in &import.skipped {
                network.record_skipped_delivery(skipped.index, skipped.name.as_deref(), &skipped.reason);
                out.push_str(&format!(
                    "skipped record {} ({}): {}\n",
                    skipped.index,
                    skipped.name.as_deref().unwrap_or("unnamed"),
                    skipped.reason
                ));
            }
            // `run` still saves the skip entries when this bails.
            if import.products.is_empty() {
                bail!("no valid products in {}", file.display());
            }
            let outcome = network.submit_batch(import.products)?;
            out.push_str(&render::allocation(&outcome));
            (out, true)
        }
        Command::Receive {
            supplier,
            name,
            volume,
            price,
            days,
        } => {
            let product = network.new_product(supplier, name, volume, price, days)?;
            let id = product.id();
            let outcome = network.submit_batch(vec![product])?;
            (format!("product {id}: {}", render::allocation(&outcome)), true)
        }
        Command::Redistribute { location } => {
            let report = network.run_redistribution(location)?;
            (render::redistribution(&report), true)
        }
        Command::Expire { location } => {
            let report = network.run_expiry_sweep(location)?;
            (render::expiry(&report), true)
        }
        Command::Analyze => (network.analyze().to_string(), false),
        Command::Value => (render::valuation(&network.valuation()), false),
        Command::Move { from, to, products } => {
            let report = network.manual_move(from, to, &products)?;
            (render::manual_move(&report), true)
        }
        Command::EditProduct { id, name, price } => {
            network.edit_product(id, &ProductEdit { name, price })?;
            (format!("product {id} updated\n"), true)
        }
        Command::DeleteProduct { id } => {
            let removed = network.delete_product(id)?;
            (format!("deleted product {id} ({})\n", removed.name()), true)
        }
        Command::EditAddress { id, address } => {
            network.edit_location_address(id, address)?;
            (format!("location {id} updated\n"), true)
        }
        Command::Export { file } => {
            store.export_locations(network, &file)?;
            (format!("locations written to {}\n", file.display()), false)
        }
        Command::Audit(AuditCommand::Show) => (render::audit(network.audit()), false),
        Command::Audit(AuditCommand::Export { file }) => {
            store.export_audit(network, &file)?;
            (format!("audit log written to {}\n", file.display()), false)
        }
        Command::Audit(AuditCommand::Clear) => {
            network.clear_audit();
            ("audit log cleared\n".to_string(), true)
        }
    };
    Ok(result)
}
