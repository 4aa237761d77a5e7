//! In-memory fleet registry engines.
//!
//! Five independent containers, each owning its own state:
//!
//! - [`directory`]: hashed vehicle directory with separate chaining
//! - [`driver_queue`]: FIFO driver dispatch queue
//! - [`maintenance`]: min-heap of vehicles ordered by maintenance priority
//! - [`road_network`]: weighted undirected graph with Dijkstra shortest paths
//! - [`sorted_index`]: sorted vehicle index with binary search and range scans
//!
//! The directory owns vehicle records. The queue, heap and sorted index hold
//! lightweight handles keyed by id; keeping them consistent with the
//! directory is the caller's job. Engines never print: they return
//! [`FleetResult`] values and emit `tracing` events.

pub mod config;
pub mod directory;
pub mod driver_queue;
pub mod error;
pub mod maintenance;
pub mod records;
pub mod road_network;
pub mod sorted_index;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;

pub use config::FleetConfig;
pub use directory::{DriverDirectory, HashDirectory, Keyed, VehicleDirectory};
pub use driver_queue::{DriverAssignmentQueue, QueuedDriver};
pub use error::{ConfigError, FleetError, FleetResult, RecordKind};
pub use maintenance::{MaintenanceScheduler, MaintenanceTicket};
pub use records::{DriverId, DriverRecord, DriverStatus, VehicleId, VehicleRecord, VehicleStatus};
pub use road_network::{LocationId, RoadNetwork, Route};
pub use sorted_index::{IndexedVehicle, SortedVehicleIndex};
