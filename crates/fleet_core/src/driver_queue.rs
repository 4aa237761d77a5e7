//! First-in-first-out dispatch queue for drivers.
//!
//! The queue stores [`QueuedDriver`] handles, not driver records: the
//! canonical [`DriverRecord`] stays with the caller and is looked up by id
//! once a driver is dequeued.

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{FleetError, FleetResult};
use crate::records::{DriverId, DriverRecord};

/// Handle to a waiting driver, captured when the driver was enqueued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedDriver {
    pub id: DriverId,
    pub name: String,
    pub experience_years: u32,
}

impl From<&DriverRecord> for QueuedDriver {
    fn from(driver: &DriverRecord) -> Self {
        Self {
            id: driver.id().clone(),
            name: driver.name.clone(),
            experience_years: driver.experience_years,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueStats {
    pub waiting: usize,
    pub next: Option<DriverId>,
}

/// Strict FIFO: the next driver out is always the one that has waited
/// longest. There is no reordering and no access past the head.
#[derive(Debug, Default, Clone)]
pub struct DriverAssignmentQueue {
    waiting: VecDeque<QueuedDriver>,
}

impl DriverAssignmentQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, driver: &DriverRecord) {
        self.push(QueuedDriver::from(driver));
    }

    pub fn push(&mut self, driver: QueuedDriver) {
        debug!(driver = %driver.id, position = self.waiting.len() + 1, "driver enqueued");
        self.waiting.push_back(driver);
    }

    pub fn dequeue(&mut self) -> FleetResult<QueuedDriver> {
        let driver = self.waiting.pop_front().ok_or(FleetError::EmptyQueue)?;
        debug!(driver = %driver.id, remaining = self.waiting.len(), "driver dequeued");
        Ok(driver)
    }

    pub fn peek(&self) -> FleetResult<&QueuedDriver> {
        self.waiting.front().ok_or(FleetError::EmptyQueue)
    }

    pub fn len(&self) -> usize {
        self.waiting.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Waiting drivers from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = &QueuedDriver> + '_ {
        self.waiting.iter()
    }

    pub fn stats(&self) -> QueueStats {
        QueueStats {
            waiting: self.waiting.len(),
            next: self.waiting.front().map(|driver| driver.id.clone()),
        }
    }
}
