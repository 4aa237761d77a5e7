//! Seed data for a fleet: vehicles, drivers and the road map.
//!
//! Roads refer to locations by name so a manifest can be written by hand.

use std::path::Path;

use fleet_core::config::read_json;
use fleet_core::error::ConfigError;
use fleet_core::records::{DriverRecord, VehicleRecord, VehicleStatus};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleEntry {
    pub id: String,
    pub registration: String,
    pub model: String,
    pub vehicle_type: String,
    pub year: u16,
    #[serde(default)]
    pub kilometers: f64,
    #[serde(default)]
    pub days_since_service: u32,
    #[serde(default)]
    pub status: VehicleStatus,
}

impl VehicleEntry {
    fn new(id: &str, registration: &str, model: &str, vehicle_type: &str, year: u16) -> Self {
        Self {
            id: id.into(),
            registration: registration.into(),
            model: model.into(),
            vehicle_type: vehicle_type.into(),
            year,
            kilometers: 0.0,
            days_since_service: 0,
            status: VehicleStatus::Available,
        }
    }

    fn usage(mut self, kilometers: f64, days_since_service: u32) -> Self {
        self.kilometers = kilometers;
        self.days_since_service = days_since_service;
        self
    }

    pub fn to_record(&self) -> VehicleRecord {
        let mut record = VehicleRecord::new(
            self.id.as_str(),
            self.registration.as_str(),
            self.model.as_str(),
            self.vehicle_type.as_str(),
            self.year,
        )
        .with_usage(self.kilometers, self.days_since_service);
        record.status = self.status;
        record
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverEntry {
    pub id: String,
    pub name: String,
    pub license: String,
    pub phone: String,
    pub experience_years: u32,
}

impl DriverEntry {
    fn new(id: &str, name: &str, license: &str, phone: &str, experience_years: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            license: license.into(),
            phone: phone.into(),
            experience_years,
        }
    }

    pub fn to_record(&self) -> DriverRecord {
        DriverRecord::new(
            self.id.as_str(),
            self.name.as_str(),
            self.license.as_str(),
            self.phone.as_str(),
            self.experience_years,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadEntry {
    pub from: String,
    pub to: String,
    pub km: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetManifest {
    pub vehicles: Vec<VehicleEntry>,
    /// Drivers are queued for dispatch in this order.
    pub drivers: Vec<DriverEntry>,
    pub locations: Vec<String>,
    pub roads: Vec<RoadEntry>,
}

impl FleetManifest {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        read_json(path)
    }

    /// The sample fleet used by `fleet demo` and as the default seed.
    #[rustfmt::skip]
    pub fn demo() -> Self {
        let vehicles = vec![
            VehicleEntry::new("V001", "MH-12-AB-1234", "Tata Ace", "Truck", 2020).usage(12_000.0, 95),
            VehicleEntry::new("V002", "DL-01-CD-5678", "Mahindra Bolero", "Van", 2019).usage(8_500.0, 45),
            VehicleEntry::new("V003", "KA-03-EF-9012", "Maruti Eeco", "Car", 2021).usage(15_000.0, 120),
            VehicleEntry::new("V004", "TN-09-GH-3456", "Ashok Leyland", "Truck", 2018).usage(25_000.0, 150),
            VehicleEntry::new("V101", "MH-01-XY-1111", "Tata Super Ace", "Truck", 2017).usage(28_000.0, 180),
            VehicleEntry::new("V102", "DL-02-AB-2222", "Maruti Suzuki", "Car", 2020).usage(9_500.0, 60),
            VehicleEntry::new("V103", "KA-05-CD-3333", "Mahindra Pickup", "Truck", 2016).usage(35_000.0, 200),
            VehicleEntry::new("V104", "TN-07-EF-4444", "Hyundai i10", "Car", 2021).usage(6_000.0, 40),
            VehicleEntry::new("V105", "UP-09-GH-5555", "Tata Ace", "Truck", 2018).usage(18_000.0, 150),
            VehicleEntry::new("V106", "RJ-11-IJ-6666", "Force Traveller", "Van", 2019).usage(22_000.0, 170),
            VehicleEntry::new("V205", "RJ-14-XY-7890", "Eicher Truck", "Truck", 2019).usage(15_000.0, 0),
            VehicleEntry::new("V203", "GJ-01-AB-1234", "Tata Winger", "Van", 2020).usage(9_000.0, 0),
            VehicleEntry::new("V208", "MH-14-CD-5678", "Mahindra Scorpio", "SUV", 2021).usage(7_500.0, 0),
            VehicleEntry::new("V201", "DL-08-EF-9012", "Maruti Omni", "Van", 2018).usage(20_000.0, 0),
            VehicleEntry::new("V207", "KA-05-GH-3456", "Ashok Leyland", "Truck", 2019).usage(18_000.0, 0),
            VehicleEntry::new("V202", "TN-09-IJ-7890", "Force Traveller", "Van", 2020).usage(12_000.0, 0),
        ];
        let drivers = vec![
            DriverEntry::new("D001", "Rajesh Kumar", "DL-1234567890", "+91-9876543210", 5),
            DriverEntry::new("D002", "Amit Sharma", "DL-2345678901", "+91-9876543211", 8),
            DriverEntry::new("D003", "Priya Singh", "DL-3456789012", "+91-9876543212", 3),
            DriverEntry::new("D004", "Vikram Patel", "DL-4567890123", "+91-9876543213", 10),
            DriverEntry::new("D005", "Sunita Verma", "DL-5678901234", "+91-9876543214", 6),
        ];
        let locations = [
            "Warehouse",
            "CityCenter",
            "ServiceStation",
            "HighwayJunction",
            "DeliveryHub",
            "IndustrialArea",
        ]
        .map(String::from)
        .to_vec();
        let roads = [
            ("Warehouse", "CityCenter", 15),
            ("Warehouse", "ServiceStation", 8),
            ("CityCenter", "HighwayJunction", 12),
            ("ServiceStation", "HighwayJunction", 10),
            ("HighwayJunction", "DeliveryHub", 18),
            ("CityCenter", "DeliveryHub", 25),
            ("ServiceStation", "IndustrialArea", 14),
            ("DeliveryHub", "IndustrialArea", 20),
        ]
        .into_iter()
        .map(|(from, to, km)| RoadEntry {
            from: from.into(),
            to: to.into(),
            km,
        })
        .collect();

        Self {
            vehicles,
            drivers,
            locations,
            roads,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn demo_manifest_is_consistent() {
        let manifest = FleetManifest::demo();
        assert_eq!(manifest.vehicles.len(), 16);
        assert_eq!(manifest.drivers.len(), 5);
        for road in &manifest.roads {
            assert!(manifest.locations.contains(&road.from), "{}", road.from);
            assert!(manifest.locations.contains(&road.to), "{}", road.to);
        }
    }

    #[test]
    fn vehicle_entry_builds_record_with_usage() {
        let entry = &FleetManifest::demo().vehicles[0];
        let record = entry.to_record();
        assert_eq!(record.id().as_str(), "V001");
        assert_eq!(record.kilometers(), 12_000.0);
        assert_eq!(record.days_since_service(), 95);
        assert!(record.needs_maintenance());
    }

    #[test]
    fn minimal_json_manifest_loads() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(
            file,
            r#"{{
                "vehicles": [
                    {{ "id": "V9", "registration": "R", "model": "M", "vehicle_type": "Car", "year": 2022 }}
                ],
                "locations": ["A", "B"],
                "roads": [{{ "from": "A", "to": "B", "km": 4 }}]
            }}"#
        )
        .expect("write");

        let manifest = FleetManifest::load(file.path()).expect("load");
        assert_eq!(manifest.vehicles[0].kilometers, 0.0);
        assert_eq!(manifest.vehicles[0].status, VehicleStatus::Available);
        assert!(manifest.drivers.is_empty());
        assert_eq!(manifest.roads[0].km, 4);
    }
}
