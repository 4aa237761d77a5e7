//! Hashed directory with separate chaining.
//!
//! Records are owned by the directory and addressed by their string key.
//! Keys are hashed with a base-31 polynomial over their bytes and reduced
//! modulo the bucket count; each bucket is a growable chain of records.
//!
//! When an insert would push the load factor above
//! [`DirectoryConfig::max_load_factor`], the bucket array doubles and every
//! record is rehashed. An optional hard `capacity` reproduces a fixed-size
//! table: inserts beyond it fail with [`FleetError::DirectoryFull`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FleetError, FleetResult, RecordKind};
use crate::records::{DriverRecord, VehicleRecord};

/// Anything stored in a [`HashDirectory`].
pub trait Keyed {
    /// Record kind reported in duplicate/not-found errors.
    const KIND: RecordKind;

    fn key(&self) -> &str;
}

impl Keyed for VehicleRecord {
    const KIND: RecordKind = RecordKind::Vehicle;

    fn key(&self) -> &str {
        self.id().as_str()
    }
}

impl Keyed for DriverRecord {
    const KIND: RecordKind = RecordKind::Driver;

    fn key(&self) -> &str {
        self.id().as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Bucket count before any growth.
    pub initial_buckets: usize,
    /// Records per bucket that triggers doubling.
    pub max_load_factor: f64,
    /// Hard limit on stored records; `None` grows without bound.
    pub capacity: Option<usize>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            initial_buckets: 100,
            max_load_factor: 0.75,
            capacity: None,
        }
    }
}

impl DirectoryConfig {
    pub fn with_initial_buckets(mut self, buckets: usize) -> Self {
        self.initial_buckets = buckets;
        self
    }

    pub fn with_max_load_factor(mut self, load_factor: f64) -> Self {
        self.max_load_factor = load_factor;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }
}

/// Bucket diagnostics. Informational only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectoryStats {
    pub len: usize,
    pub bucket_count: usize,
    pub used_buckets: usize,
    pub max_chain_length: usize,
    pub load_factor: f64,
}

#[derive(Debug, Clone)]
pub struct HashDirectory<T> {
    buckets: Vec<Vec<T>>,
    len: usize,
    config: DirectoryConfig,
}

pub type VehicleDirectory = HashDirectory<VehicleRecord>;
pub type DriverDirectory = HashDirectory<DriverRecord>;

/// Base-31 polynomial string hash.
fn polynomial_hash(key: &str) -> u64 {
    key.bytes()
        .fold(0u64, |hash, byte| hash.wrapping_mul(31).wrapping_add(u64::from(byte)))
}

impl<T: Keyed> Default for HashDirectory<T> {
    fn default() -> Self {
        Self::with_config(DirectoryConfig::default())
    }
}

impl<T: Keyed> HashDirectory<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero buckets or a non-positive load factor fall back to the defaults.
    pub fn with_config(mut config: DirectoryConfig) -> Self {
        let defaults = DirectoryConfig::default();
        if config.initial_buckets == 0 {
            config.initial_buckets = defaults.initial_buckets;
        }
        if config.max_load_factor.is_nan() || config.max_load_factor <= 0.0 {
            config.max_load_factor = defaults.max_load_factor;
        }
        Self {
            buckets: (0..config.initial_buckets).map(|_| Vec::new()).collect(),
            len: 0,
            config,
        }
    }

    pub fn config(&self) -> &DirectoryConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn bucket_of(&self, key: &str) -> usize {
        (polynomial_hash(key) % self.buckets.len() as u64) as usize
    }

    /// Store a record. Fails without touching the directory if the key is
    /// already present or the configured capacity is reached.
    pub fn insert(&mut self, record: T) -> FleetResult<()> {
        let key = record.key();
        if self.contains(key) {
            return Err(FleetError::duplicate(T::KIND, key));
        }
        if let Some(capacity) = self.config.capacity {
            if self.len >= capacity {
                return Err(FleetError::DirectoryFull { capacity });
            }
        }

        let projected = (self.len + 1) as f64 / self.buckets.len() as f64;
        if projected > self.config.max_load_factor {
            self.grow();
        }

        let index = self.bucket_of(record.key());
        debug!(key = record.key(), bucket = index, "directory insert");
        self.buckets[index].push(record);
        self.len += 1;
        Ok(())
    }

    pub fn search(&self, key: &str) -> FleetResult<&T> {
        self.buckets[self.bucket_of(key)]
            .iter()
            .find(|record| record.key() == key)
            .ok_or_else(|| FleetError::not_found(T::KIND, key))
    }

    /// Mutable access for in-place counter updates. The key itself must not
    /// change; [`Keyed`] implementors keep it private.
    pub fn get_mut(&mut self, key: &str) -> FleetResult<&mut T> {
        let index = self.bucket_of(key);
        self.buckets[index]
            .iter_mut()
            .find(|record| record.key() == key)
            .ok_or_else(|| FleetError::not_found(T::KIND, key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.search(key).is_ok()
    }

    /// Remove a record and hand ownership back to the caller.
    pub fn delete(&mut self, key: &str) -> FleetResult<T> {
        let index = self.bucket_of(key);
        let chain = &mut self.buckets[index];
        let position = chain
            .iter()
            .position(|record| record.key() == key)
            .ok_or_else(|| FleetError::not_found(T::KIND, key))?;
        let record = chain.swap_remove(position);
        self.len -= 1;
        debug!(key, bucket = index, "directory delete");
        Ok(record)
    }

    /// All records, bucket by bucket. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.buckets.iter().flatten()
    }

    pub fn stats(&self) -> DirectoryStats {
        let used_buckets = self.buckets.iter().filter(|chain| !chain.is_empty()).count();
        let max_chain_length = self.buckets.iter().map(Vec::len).max().unwrap_or(0);
        DirectoryStats {
            len: self.len,
            bucket_count: self.buckets.len(),
            used_buckets,
            max_chain_length,
            load_factor: self.len as f64 / self.buckets.len() as f64,
        }
    }

    fn grow(&mut self) {
        let new_count = self.buckets.len() * 2;
        let old = std::mem::replace(
            &mut self.buckets,
            (0..new_count).map(|_| Vec::new()).collect(),
        );
        for record in old.into_iter().flatten() {
            let index = self.bucket_of(record.key());
            self.buckets[index].push(record);
        }
        debug!(buckets = new_count, len = self.len, "directory rehashed");
    }
}
