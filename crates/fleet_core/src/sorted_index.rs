//! Ordered vehicle index: a sorted array of vehicle handles with binary
//! search lookup and inclusive range scans.
//!
//! Ids compare as strings. Inserts locate their slot in O(log n) and shift
//! the tail in O(n); there is no node splitting or rebalancing.

use std::slice;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{FleetError, FleetResult, RecordKind};
use crate::records::{VehicleId, VehicleRecord};

/// What to do when an inserted id is already indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with [`FleetError::DuplicateKey`], like the vehicle directory.
    #[default]
    Reject,
    /// Store the duplicate ahead of the existing equal ids and log a warning.
    AcceptWithWarning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub duplicate_policy: DuplicatePolicy,
}

/// Handle to an indexed vehicle with the columns listings need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedVehicle {
    pub id: VehicleId,
    pub registration: String,
    pub model: String,
}

impl From<&VehicleRecord> for IndexedVehicle {
    fn from(vehicle: &VehicleRecord) -> Self {
        Self {
            id: vehicle.id().clone(),
            registration: vehicle.registration.clone(),
            model: vehicle.model.clone(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SortedVehicleIndex {
    entries: Vec<IndexedVehicle>,
    duplicate_policy: DuplicatePolicy,
}

impl SortedVehicleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: IndexConfig) -> Self {
        Self {
            entries: Vec::new(),
            duplicate_policy: config.duplicate_policy,
        }
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First position whose id is not less than `id`.
    fn lower_bound(&self, id: &str) -> usize {
        self.entries.partition_point(|entry| entry.id.as_str() < id)
    }

    /// Index a vehicle and return the position it landed at.
    pub fn insert(&mut self, vehicle: &VehicleRecord) -> FleetResult<usize> {
        let id = vehicle.id().as_str();
        let position = self.lower_bound(id);
        let exists = self
            .entries
            .get(position)
            .is_some_and(|entry| entry.id.as_str() == id);
        if exists {
            match self.duplicate_policy {
                DuplicatePolicy::Reject => {
                    return Err(FleetError::duplicate(RecordKind::Vehicle, id));
                }
                DuplicatePolicy::AcceptWithWarning => {
                    warn!(vehicle = id, position, "duplicate id accepted into sorted index");
                }
            }
        }
        self.entries.insert(position, IndexedVehicle::from(vehicle));
        debug!(vehicle = id, position, "vehicle indexed");
        Ok(position)
    }

    /// Binary search by id.
    pub fn search(&self, id: &str) -> FleetResult<&IndexedVehicle> {
        self.entries
            .binary_search_by(|entry| entry.id.as_str().cmp(id))
            .map(|position| &self.entries[position])
            .map_err(|_| FleetError::not_found(RecordKind::Vehicle, id))
    }

    /// Remove the first entry with this id.
    pub fn remove(&mut self, id: &str) -> FleetResult<IndexedVehicle> {
        let position = self.lower_bound(id);
        match self.entries.get(position) {
            Some(entry) if entry.id.as_str() == id => Ok(self.entries.remove(position)),
            _ => Err(FleetError::not_found(RecordKind::Vehicle, id)),
        }
    }

    /// All entries with `low <= id <= high`, in order. An inverted or empty
    /// range yields nothing. The iterator is cheap to clone and can be
    /// replayed.
    pub fn range(&self, low: &str, high: &str) -> slice::Iter<'_, IndexedVehicle> {
        if low > high {
            return self.entries[..0].iter();
        }
        let start = self.lower_bound(low);
        let end = self.entries.partition_point(|entry| entry.id.as_str() <= high);
        self.entries[start..end].iter()
    }

    /// In-order traversal.
    pub fn iter(&self) -> slice::Iter<'_, IndexedVehicle> {
        self.entries.iter()
    }
}
