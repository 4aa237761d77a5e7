//! Test helpers: the reference road network and sample fleet records
//! shared by unit tests, integration tests and benchmarks.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::records::{DriverRecord, VehicleRecord};
use crate::road_network::{LocationId, NetworkConfig, RoadNetwork};

pub const WAREHOUSE: LocationId = 0;
pub const CITY_CENTER: LocationId = 1;
pub const SERVICE_STATION: LocationId = 2;
pub const HIGHWAY_JUNCTION: LocationId = 3;
pub const DELIVERY_HUB: LocationId = 4;
pub const INDUSTRIAL_AREA: LocationId = 5;

pub const REFERENCE_LOCATIONS: [&str; 6] = [
    "Warehouse",
    "CityCenter",
    "ServiceStation",
    "HighwayJunction",
    "DeliveryHub",
    "IndustrialArea",
];

pub const REFERENCE_ROADS: [(LocationId, LocationId, u32); 8] = [
    (WAREHOUSE, CITY_CENTER, 15),
    (WAREHOUSE, SERVICE_STATION, 8),
    (CITY_CENTER, HIGHWAY_JUNCTION, 12),
    (SERVICE_STATION, HIGHWAY_JUNCTION, 10),
    (HIGHWAY_JUNCTION, DELIVERY_HUB, 18),
    (CITY_CENTER, DELIVERY_HUB, 25),
    (SERVICE_STATION, INDUSTRIAL_AREA, 14),
    (DELIVERY_HUB, INDUSTRIAL_AREA, 20),
];

/// The six-depot city map with ids matching the constants above.
pub fn reference_network(config: NetworkConfig) -> RoadNetwork {
    let mut network = RoadNetwork::with_config(config);
    for name in REFERENCE_LOCATIONS {
        network.add_location(name);
    }
    for (a, b, km) in REFERENCE_ROADS {
        network
            .add_road(a, b, km)
            .expect("reference roads use valid location ids");
    }
    network
}

pub fn vehicle(id: &str, kilometers: f64, days_since_service: u32) -> VehicleRecord {
    VehicleRecord::new(id, format!("REG-{id}"), "Tata Ace", "Truck", 2020)
        .with_usage(kilometers, days_since_service)
}

pub fn driver(id: &str, name: &str) -> DriverRecord {
    DriverRecord::new(id, name, format!("DL-{id}"), "+91-9876543210", 5)
}

/// The ids inserted out of order in the sorted index walkthrough.
pub const SHUFFLED_INDEX_IDS: [&str; 6] = ["V205", "V203", "V208", "V201", "V207", "V202"];

/// `count` vehicles with distinct ids `V00000..` in shuffled order and
/// random usage counters, reproducible for a given seed.
pub fn random_vehicles(seed: u64, count: usize) -> Vec<VehicleRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut ids: Vec<usize> = (0..count).collect();
    for i in (1..ids.len()).rev() {
        let j = rng.gen_range(0..=i);
        ids.swap(i, j);
    }
    ids.into_iter()
        .map(|i| {
            let km = rng.gen_range(0.0..60_000.0);
            let days = rng.gen_range(0..365);
            vehicle(&format!("V{i:05}"), km, days)
        })
        .collect()
}

/// Random connected-or-not network with `locations` vertices and `roads`
/// undirected edges of 1..=50 km.
pub fn random_network(
    seed: u64,
    locations: usize,
    roads: usize,
    config: NetworkConfig,
) -> RoadNetwork {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut network = RoadNetwork::with_config(config);
    for i in 0..locations {
        network.add_location(format!("L{i}"));
    }
    if locations == 0 {
        return network;
    }
    for _ in 0..roads {
        let a = rng.gen_range(0..locations);
        let b = rng.gen_range(0..locations);
        let km = rng.gen_range(1..=50);
        network
            .add_road(a, b, km)
            .expect("random endpoints are in range");
    }
    network
}
