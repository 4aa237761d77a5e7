//! The fleet aggregate: one instance of every engine plus the glue that
//! keeps their handles consistent with the canonical records.

use fleet_core::directory::{DriverDirectory, VehicleDirectory};
use fleet_core::driver_queue::{DriverAssignmentQueue, QueuedDriver};
use fleet_core::error::{FleetError, FleetResult, RecordKind};
use fleet_core::maintenance::{MaintenanceScheduler, MaintenanceTicket};
use fleet_core::records::{DriverRecord, VehicleRecord, VehicleStatus};
use fleet_core::road_network::{LocationId, RoadNetwork, Route};
use fleet_core::sorted_index::SortedVehicleIndex;
use fleet_core::FleetConfig;
use tracing::{info, warn};

use crate::accounts::AccountRegistry;
use crate::config::AppConfig;
use crate::manifest::FleetManifest;

#[derive(Debug, Clone)]
pub struct Fleet {
    pub vehicles: VehicleDirectory,
    pub drivers: DriverDirectory,
    pub queue: DriverAssignmentQueue,
    pub scheduler: MaintenanceScheduler,
    pub network: RoadNetwork,
    pub index: SortedVehicleIndex,
    pub accounts: AccountRegistry,
}

impl Fleet {
    /// Empty engines built from `config`.
    pub fn new(config: &AppConfig) -> FleetResult<Self> {
        let FleetConfig {
            directory,
            scheduler,
            index,
            network,
        } = config.engines;
        Ok(Self {
            vehicles: VehicleDirectory::with_config(directory),
            drivers: DriverDirectory::with_config(directory),
            queue: DriverAssignmentQueue::new(),
            scheduler: MaintenanceScheduler::with_config(scheduler),
            network: RoadNetwork::with_config(network),
            index: SortedVehicleIndex::with_config(index),
            accounts: AccountRegistry::new(&config.accounts)?,
        })
    }

    /// Engines seeded from a manifest. Available drivers are queued in
    /// manifest order; the maintenance heap starts empty.
    pub fn from_manifest(manifest: &FleetManifest, config: &AppConfig) -> FleetResult<Self> {
        let mut fleet = Self::new(config)?;
        for entry in &manifest.vehicles {
            fleet.add_vehicle(entry.to_record())?;
        }
        for entry in &manifest.drivers {
            fleet.add_driver(entry.to_record())?;
        }
        for name in &manifest.locations {
            fleet.network.add_location(name.as_str());
        }
        for road in &manifest.roads {
            let from = fleet.resolve_location(&road.from)?;
            let to = fleet.resolve_location(&road.to)?;
            fleet.network.add_road(from, to, road.km)?;
        }
        info!(
            vehicles = fleet.vehicles.len(),
            drivers = fleet.drivers.len(),
            locations = fleet.network.num_locations(),
            roads = fleet.network.num_roads(),
            "fleet loaded"
        );
        Ok(fleet)
    }

    /// Register a vehicle in the directory and the sorted index.
    pub fn add_vehicle(&mut self, vehicle: VehicleRecord) -> FleetResult<()> {
        let id = vehicle.id().clone();
        self.vehicles.insert(vehicle)?;
        let indexed = self
            .vehicles
            .search(id.as_str())
            .and_then(|vehicle| self.index.insert(vehicle));
        if let Err(err) = indexed {
            self.vehicles.delete(id.as_str())?;
            return Err(err);
        }
        Ok(())
    }

    /// Drop a vehicle from the directory and the index, releasing its driver.
    /// Tickets already in the maintenance heap are left to drain.
    pub fn remove_vehicle(&mut self, id: &str) -> FleetResult<VehicleRecord> {
        let vehicle = self.vehicles.delete(id)?;
        if let Err(err) = self.index.remove(id) {
            warn!(vehicle = id, %err, "vehicle missing from sorted index");
        }
        if let Some(driver_id) = &vehicle.assigned_driver {
            if let Ok(driver) = self.drivers.get_mut(driver_id.as_str()) {
                driver.release();
                requeue(&mut self.queue, driver);
            }
        }
        Ok(vehicle)
    }

    /// Register a driver; available drivers join the dispatch queue.
    pub fn add_driver(&mut self, driver: DriverRecord) -> FleetResult<()> {
        let available = driver.is_available().then(|| QueuedDriver::from(&driver));
        self.drivers.insert(driver)?;
        if let Some(handle) = available {
            self.queue.push(handle);
        }
        Ok(())
    }

    /// Put a known driver back in line. Only available drivers who are not
    /// already waiting may join.
    pub fn enqueue_driver(&mut self, id: &str) -> FleetResult<&QueuedDriver> {
        let driver = self.drivers.search(id)?;
        if !driver.is_available() {
            return Err(FleetError::unavailable(
                RecordKind::Driver,
                id,
                driver.status.to_string(),
            ));
        }
        if is_waiting(&self.queue, driver) {
            return Err(FleetError::unavailable(RecordKind::Driver, id, "already waiting"));
        }
        requeue(&mut self.queue, driver);
        self.queue
            .iter()
            .last()
            .ok_or(FleetError::EmptyQueue)
    }

    /// Assign the longest-waiting driver to `vehicle_id`. The vehicle must be
    /// available and unassigned; it is checked before the queue is touched.
    /// Handles whose driver has since gone off the roster or on duty are
    /// dropped.
    pub fn dispatch(&mut self, vehicle_id: &str) -> FleetResult<QueuedDriver> {
        let vehicle = self.vehicles.search(vehicle_id)?;
        if let Some(driver_id) = &vehicle.assigned_driver {
            return Err(FleetError::unavailable(
                RecordKind::Vehicle,
                vehicle_id,
                format!("driven by {driver_id}"),
            ));
        }
        if vehicle.status != VehicleStatus::Available {
            return Err(FleetError::unavailable(
                RecordKind::Vehicle,
                vehicle_id,
                vehicle.status.to_string(),
            ));
        }
        let vehicle_key = vehicle.id().clone();

        let next = loop {
            let next = self.queue.dequeue()?;
            match self.drivers.get_mut(next.id.as_str()) {
                Ok(driver) if driver.is_available() => {
                    driver.assign_vehicle(vehicle_key);
                    break next;
                }
                Ok(driver) => {
                    warn!(driver = %next.id, status = %driver.status, "skipping stale queue entry")
                }
                Err(_) => warn!(driver = %next.id, "skipping unregistered driver"),
            }
        };

        let vehicle = self.vehicles.get_mut(vehicle_id)?;
        vehicle.assigned_driver = Some(next.id.clone());
        vehicle.status = VehicleStatus::InUse;
        info!(driver = %next.id, vehicle = vehicle_id, "driver dispatched");
        Ok(next)
    }

    /// End a driver's shift. The driver becomes available and rejoins the
    /// back of the queue unless already waiting; their vehicle is freed.
    pub fn release_driver(&mut self, id: &str) -> FleetResult<()> {
        let driver = self.drivers.get_mut(id)?;
        let vehicle_id = driver.assigned_vehicle.take();
        driver.release();
        requeue(&mut self.queue, driver);

        if let Some(vehicle_id) = vehicle_id {
            if let Ok(vehicle) = self.vehicles.get_mut(vehicle_id.as_str()) {
                vehicle.assigned_driver = None;
                if vehicle.status == VehicleStatus::InUse {
                    vehicle.status = VehicleStatus::Available;
                }
            }
        }
        Ok(())
    }

    /// Queue a directory vehicle for maintenance and return its priority.
    pub fn queue_maintenance(&mut self, id: &str) -> FleetResult<u32> {
        let vehicle = self.vehicles.search(id)?;
        self.scheduler.insert(vehicle)?;
        Ok(vehicle.maintenance_priority())
    }

    /// Queue several vehicles at once. Every id and the remaining heap room
    /// are checked first, so a failure queues nothing.
    pub fn queue_maintenance_all<S: AsRef<str>>(
        &mut self,
        ids: &[S],
    ) -> FleetResult<Vec<(String, u32)>> {
        for id in ids {
            self.vehicles.search(id.as_ref())?;
        }
        if let Some(capacity) = self.scheduler.capacity() {
            if self.scheduler.len() + ids.len() > capacity {
                return Err(FleetError::HeapFull { capacity });
            }
        }
        ids.iter()
            .map(|id| {
                let id = id.as_ref();
                self.queue_maintenance(id).map(|priority| (id.to_owned(), priority))
            })
            .collect()
    }

    /// Send the most urgent vehicle to the workshop.
    pub fn schedule_next_maintenance(&mut self) -> FleetResult<MaintenanceTicket> {
        let ticket = self.scheduler.extract_min()?;
        match self.vehicles.get_mut(ticket.vehicle_id.as_str()) {
            Ok(vehicle) => vehicle.status = VehicleStatus::Maintenance,
            Err(_) => {
                warn!(vehicle = %ticket.vehicle_id, "scheduled vehicle is no longer registered")
            }
        }
        Ok(ticket)
    }

    /// Add driven distance and refresh any queued maintenance tickets.
    pub fn record_trip(&mut self, id: &str, kilometers: f64) -> FleetResult<&VehicleRecord> {
        self.vehicles.get_mut(id)?.record_trip(kilometers);
        self.refresh_maintenance(id)?;
        self.vehicles.search(id)
    }

    /// Reset the service clock and return the vehicle to service.
    pub fn service_vehicle(&mut self, id: &str) -> FleetResult<&VehicleRecord> {
        let vehicle = self.vehicles.get_mut(id)?;
        vehicle.record_service();
        if vehicle.status == VehicleStatus::Maintenance {
            vehicle.status = VehicleStatus::Available;
        }
        self.refresh_maintenance(id)?;
        self.vehicles.search(id)
    }

    /// Re-read a vehicle's counters into its queued tickets, if any.
    /// Returns how many tickets were refreshed.
    pub fn refresh_maintenance(&mut self, id: &str) -> FleetResult<usize> {
        let vehicle = self.vehicles.search(id)?;
        match self.scheduler.reprioritize(vehicle) {
            Ok(refreshed) => Ok(refreshed),
            Err(FleetError::NotFound { .. }) => Ok(0),
            Err(err) => Err(err),
        }
    }

    /// Re-index a directory vehicle.
    pub fn index_vehicle(&mut self, id: &str) -> FleetResult<usize> {
        let vehicle = self.vehicles.search(id)?;
        self.index.insert(vehicle)
    }

    /// A location by exact name, or by numeric id.
    pub fn resolve_location(&self, name: &str) -> FleetResult<LocationId> {
        if let Some(id) = self.network.find_location(name) {
            return Ok(id);
        }
        match name.parse::<LocationId>() {
            Ok(id) => self.network.location(id).map(|location| location.id),
            Err(_) => Err(FleetError::not_found(RecordKind::Location, name)),
        }
    }

    pub fn route(&self, from: &str, to: &str) -> FleetResult<Route> {
        let from = self.resolve_location(from)?;
        let to = self.resolve_location(to)?;
        self.network.shortest_path(from, to)
    }
}

fn is_waiting(queue: &DriverAssignmentQueue, driver: &DriverRecord) -> bool {
    queue.iter().any(|waiting| &waiting.id == driver.id())
}

fn requeue(queue: &mut DriverAssignmentQueue, driver: &DriverRecord) {
    if !is_waiting(queue, driver) {
        queue.enqueue(driver);
    }
}
