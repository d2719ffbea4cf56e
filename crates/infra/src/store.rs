//! Directory-backed persistence of the network between operator sessions.
//!
//! Layout: `locations.json` (array of [`LocationSnapshot`]) and `audit.json`
//! (array of rendered audit entries, in insertion order).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use stockroute_inventory::{AuditLog, Network};

use crate::delivery::{import_delivery, DeliveryImport};
use crate::error::{InterchangeError, InterchangeResult};
use crate::snapshot::{export_locations, restore_locations, LocationSnapshot};

const LOCATIONS_FILE: &str = "locations.json";
const AUDIT_FILE: &str = "audit.json";

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn locations_path(&self) -> PathBuf {
        self.dir.join(LOCATIONS_FILE)
    }

    pub fn audit_path(&self) -> PathBuf {
        self.dir.join(AUDIT_FILE)
    }

    /// Load the saved network, or `None` if nothing has been saved yet.
    pub fn load(&self) -> InterchangeResult<Option<Network>> {
        let locations_path = self.locations_path();
        if !locations_path.exists() {
            return Ok(None);
        }

        let snapshots: Vec<LocationSnapshot> = read_json(&locations_path)?;
        let locations = restore_locations(snapshots)?;

        let audit_path = self.audit_path();
        let audit = if audit_path.exists() {
            let lines: Vec<String> = read_json(&audit_path)?;
            AuditLog::from_rendered(lines)
        } else {
            AuditLog::new()
        };

        let network = Network::from_parts(locations, audit)?;
        tracing::debug!(dir = %self.dir.display(), locations = network.locations().len(), "network loaded");
        Ok(Some(network))
    }

    pub fn save(&self, network: &Network) -> InterchangeResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| InterchangeError::io(&self.dir, e))?;
        self.export_locations(network, &self.locations_path())?;
        self.export_audit(network, &self.audit_path())?;
        tracing::debug!(dir = %self.dir.display(), "network saved");
        Ok(())
    }

    /// Write a location snapshot to `path`.
    pub fn export_locations(&self, network: &Network, path: &Path) -> InterchangeResult<()> {
        write_json(path, &export_locations(network.locations()))
    }

    /// Write the audit log to `path`.
    pub fn export_audit(&self, network: &Network, path: &Path) -> InterchangeResult<()> {
        write_json(path, &network.audit().export())
    }

    pub fn read_delivery(&self, path: &Path) -> InterchangeResult<DeliveryImport> {
        let json = fs::read_to_string(path).map_err(|e| InterchangeError::io(path, e))?;
        import_delivery(&json)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> InterchangeResult<T> {
    let json = fs::read_to_string(path).map_err(|e| InterchangeError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| InterchangeError::json(path.display().to_string(), e))
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> InterchangeResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| InterchangeError::json(path.display().to_string(), e))?;
    fs::write(path, json).map_err(|e| InterchangeError::io(path, e))
}
