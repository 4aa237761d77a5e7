//! Maintenance scheduling: a binary min-heap of vehicles keyed by
//! maintenance priority (lower score = more urgent).
//!
//! The priority is read from the vehicle when it is inserted and stored in
//! its [`MaintenanceTicket`]. Later changes to the vehicle's odometer or
//! service clock are not seen by the heap until the caller either inserts
//! the vehicle again or calls [`MaintenanceScheduler::reprioritize`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FleetError, FleetResult, RecordKind};
use crate::records::{VehicleId, VehicleRecord};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Maximum queued tickets. `None` grows the heap on demand.
    pub capacity: Option<usize>,
}

impl SchedulerConfig {
    /// Fixed-size heap matching a 100-slot array.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
        }
    }
}

/// Snapshot of a vehicle taken when it entered the heap.
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceTicket {
    pub vehicle_id: VehicleId,
    pub model: String,
    pub kilometers: f64,
    pub days_since_service: u32,
    pub priority: u32,
    pub needs_maintenance: bool,
}

impl From<&VehicleRecord> for MaintenanceTicket {
    fn from(vehicle: &VehicleRecord) -> Self {
        Self {
            vehicle_id: vehicle.id().clone(),
            model: vehicle.model.clone(),
            kilometers: vehicle.kilometers(),
            days_since_service: vehicle.days_since_service(),
            priority: vehicle.maintenance_priority(),
            needs_maintenance: vehicle.needs_maintenance(),
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct MaintenanceScheduler {
    heap: Vec<MaintenanceTicket>,
    capacity: Option<usize>,
}

fn parent(i: usize) -> usize {
    (i - 1) / 2
}

fn left_child(i: usize) -> usize {
    2 * i + 1
}

impl MaintenanceScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchedulerConfig) -> Self {
        Self {
            heap: Vec::with_capacity(config.capacity.unwrap_or(0)),
            capacity: config.capacity,
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Queue a vehicle for service. The same vehicle may be queued more than
    /// once; each insert is a separate ticket.
    pub fn insert(&mut self, vehicle: &VehicleRecord) -> FleetResult<()> {
        if let Some(capacity) = self.capacity {
            if self.heap.len() >= capacity {
                return Err(FleetError::HeapFull { capacity });
            }
        }
        let ticket = MaintenanceTicket::from(vehicle);
        debug!(
            vehicle = %ticket.vehicle_id,
            priority = ticket.priority,
            "maintenance ticket queued"
        );
        self.heap.push(ticket);
        self.sift_up(self.heap.len() - 1);
        Ok(())
    }

    /// Remove and return the most urgent ticket.
    pub fn extract_min(&mut self) -> FleetResult<MaintenanceTicket> {
        if self.heap.is_empty() {
            return Err(FleetError::EmptyHeap);
        }
        let ticket = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        debug!(
            vehicle = %ticket.vehicle_id,
            priority = ticket.priority,
            "maintenance ticket scheduled"
        );
        Ok(ticket)
    }

    pub fn peek_min(&self) -> FleetResult<&MaintenanceTicket> {
        self.heap.first().ok_or(FleetError::EmptyHeap)
    }

    /// Re-read the counters of an already queued vehicle and move each of
    /// its tickets to where the fresh priority belongs. Returns the number
    /// of tickets refreshed.
    pub fn reprioritize(&mut self, vehicle: &VehicleRecord) -> FleetResult<usize> {
        let positions: Vec<usize> = self
            .heap
            .iter()
            .enumerate()
            .filter(|(_, ticket)| &ticket.vehicle_id == vehicle.id())
            .map(|(i, _)| i)
            .collect();
        if positions.is_empty() {
            return Err(FleetError::not_found(RecordKind::Vehicle, vehicle.id().as_str()));
        }

        for &i in &positions {
            self.heap[i] = MaintenanceTicket::from(vehicle);
        }
        // Rebuilding is O(n), same as the scan above, and handles several
        // tickets moving at once.
        for i in (0..self.heap.len() / 2).rev() {
            self.sift_down(i);
        }
        debug!(
            vehicle = %vehicle.id(),
            tickets = positions.len(),
            "maintenance tickets reprioritized"
        );
        Ok(positions.len())
    }

    /// Tickets in heap array order (level order, not sorted).
    pub fn iter(&self) -> impl Iterator<Item = &MaintenanceTicket> + '_ {
        self.heap.iter()
    }

    /// The `n` most urgent tickets, most urgent first, without removing them.
    pub fn top(&self, n: usize) -> Vec<&MaintenanceTicket> {
        let mut ranked: Vec<&MaintenanceTicket> = self.heap.iter().collect();
        ranked.sort_by_key(|ticket| ticket.priority);
        ranked.truncate(n);
        ranked
    }

    /// Tickets whose vehicle was past a service threshold when queued.
    pub fn urgent_count(&self) -> usize {
        self.heap.iter().filter(|ticket| ticket.needs_maintenance).count()
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 && self.heap[parent(index)].priority > self.heap[index].priority {
            self.heap.swap(index, parent(index));
            index = parent(index);
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = left_child(index);
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < len && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                return;
            }
            self.heap.swap(index, smallest);
            index = smallest;
        }
    }

    #[cfg(test)]
    fn is_valid_heap(&self) -> bool {
        (1..self.heap.len()).all(|i| self.heap[parent(i)].priority <= self.heap[i].priority)
    }
}
