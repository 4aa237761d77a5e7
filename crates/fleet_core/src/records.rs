//! Entity records: vehicles and drivers, plus the typed ids that other
//! structures use to refer to them without owning them.

use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Kilometres that add one step of maintenance priority.
pub const KM_PER_PRIORITY_STEP: f64 = 5_000.0;
/// Days without service that add one step of maintenance priority.
pub const DAYS_PER_PRIORITY_STEP: u32 = 30;
/// A vehicle past this odometer reading is due for service.
pub const SERVICE_KM_THRESHOLD: f64 = 10_000.0;
/// A vehicle unserviced for longer than this is due for service.
pub const SERVICE_DAYS_THRESHOLD: u32 = 90;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Vehicle identifier. Ordering is plain string comparison, so `V10`
    /// sorts before `V9`.
    VehicleId
);

string_id!(
    /// Driver identifier.
    DriverId
);

/// Returned when a status name does not match any known state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status `{0}`")]
pub struct ParseStatusError(pub String);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VehicleStatus {
    #[default]
    Available,
    InUse,
    Maintenance,
    Retired,
}

impl VehicleStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::InUse => "IN_USE",
            VehicleStatus::Maintenance => "MAINTENANCE",
            VehicleStatus::Retired => "RETIRED",
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(VehicleStatus::Available),
            "IN_USE" => Ok(VehicleStatus::InUse),
            "MAINTENANCE" => Ok(VehicleStatus::Maintenance),
            "RETIRED" => Ok(VehicleStatus::Retired),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    #[default]
    Available,
    OnDuty,
    OnLeave,
    Inactive,
}

impl DriverStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            DriverStatus::Available => "AVAILABLE",
            DriverStatus::OnDuty => "ON_DUTY",
            DriverStatus::OnLeave => "ON_LEAVE",
            DriverStatus::Inactive => "INACTIVE",
        }
    }
}

impl fmt::Display for DriverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(DriverStatus::Available),
            "ON_DUTY" => Ok(DriverStatus::OnDuty),
            "ON_LEAVE" => Ok(DriverStatus::OnLeave),
            "INACTIVE" => Ok(DriverStatus::Inactive),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// A fleet vehicle.
///
/// The id is fixed at construction. Odometer and service counters are kept
/// non-negative by their setters; everything else is plain data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    id: VehicleId,
    pub registration: String,
    pub model: String,
    pub vehicle_type: String,
    pub year: u16,
    kilometers: f64,
    days_since_service: u32,
    pub status: VehicleStatus,
    pub assigned_driver: Option<DriverId>,
}

impl VehicleRecord {
    /// A freshly registered vehicle: zero kilometres, just serviced, available.
    pub fn new(
        id: impl Into<VehicleId>,
        registration: impl Into<String>,
        model: impl Into<String>,
        vehicle_type: impl Into<String>,
        year: u16,
    ) -> Self {
        Self {
            id: id.into(),
            registration: registration.into(),
            model: model.into(),
            vehicle_type: vehicle_type.into(),
            year,
            kilometers: 0.0,
            days_since_service: 0,
            status: VehicleStatus::Available,
            assigned_driver: None,
        }
    }

    /// Builder-style odometer/service counters, used when seeding records.
    pub fn with_usage(mut self, kilometers: f64, days_since_service: u32) -> Self {
        self.set_kilometers(kilometers);
        self.days_since_service = days_since_service;
        self
    }

    pub fn id(&self) -> &VehicleId {
        &self.id
    }

    pub fn kilometers(&self) -> f64 {
        self.kilometers
    }

    pub fn days_since_service(&self) -> u32 {
        self.days_since_service
    }

    /// Negative or non-finite readings are clamped to zero.
    pub fn set_kilometers(&mut self, kilometers: f64) {
        self.kilometers = if kilometers.is_finite() && kilometers > 0.0 {
            kilometers
        } else {
            0.0
        };
    }

    pub fn set_days_since_service(&mut self, days: u32) {
        self.days_since_service = days;
    }

    /// Add driven distance to the odometer.
    pub fn record_trip(&mut self, kilometers: f64) {
        self.set_kilometers(self.kilometers + kilometers.max(0.0));
    }

    pub fn advance_days(&mut self, days: u32) {
        self.days_since_service = self.days_since_service.saturating_add(days);
    }

    /// Reset the service clock. The odometer is cumulative and stays as is.
    pub fn record_service(&mut self) {
        self.days_since_service = 0;
    }

    /// `floor(km / 5000) + floor(days / 30)`; lower means more urgent.
    pub fn maintenance_priority(&self) -> u32 {
        let km_steps = (self.kilometers / KM_PER_PRIORITY_STEP).floor() as u32;
        km_steps.saturating_add(self.days_since_service / DAYS_PER_PRIORITY_STEP)
    }

    pub fn needs_maintenance(&self) -> bool {
        self.kilometers > SERVICE_KM_THRESHOLD || self.days_since_service > SERVICE_DAYS_THRESHOLD
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriverRecord {
    id: DriverId,
    pub name: String,
    pub license: String,
    pub phone: String,
    pub experience_years: u32,
    pub status: DriverStatus,
    pub assigned_vehicle: Option<VehicleId>,
}

impl DriverRecord {
    pub fn new(
        id: impl Into<DriverId>,
        name: impl Into<String>,
        license: impl Into<String>,
        phone: impl Into<String>,
        experience_years: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            license: license.into(),
            phone: phone.into(),
            experience_years,
            status: DriverStatus::Available,
            assigned_vehicle: None,
        }
    }

    pub fn id(&self) -> &DriverId {
        &self.id
    }

    pub fn is_available(&self) -> bool {
        self.status == DriverStatus::Available
    }

    /// Put the driver on duty with the given vehicle.
    pub fn assign_vehicle(&mut self, vehicle: VehicleId) {
        self.status = DriverStatus::OnDuty;
        self.assigned_vehicle = Some(vehicle);
    }

    /// Back to available with no vehicle.
    pub fn release(&mut self) {
        self.status = DriverStatus::Available;
        self.assigned_vehicle = None;
    }
}
