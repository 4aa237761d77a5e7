//! Console formatting. Every function returns the text to print; nothing
//! here writes to stdout directly.

use fleet_core::directory::DirectoryStats;
use fleet_core::driver_queue::{DriverAssignmentQueue, QueuedDriver};
use fleet_core::maintenance::{MaintenanceScheduler, MaintenanceTicket};
use fleet_core::records::{DriverRecord, VehicleRecord};
use fleet_core::road_network::{RoadNetwork, Route};
use fleet_core::sorted_index::IndexedVehicle;

use crate::accounts::UserAccount;

pub fn vehicle_details(vehicle: &VehicleRecord) -> String {
    let driver = vehicle
        .assigned_driver
        .as_ref()
        .map_or("-", |driver| driver.as_str());
    [
        format!("Vehicle {}", vehicle.id()),
        format!("  registration : {}", vehicle.registration),
        format!("  model        : {} ({}, {})", vehicle.model, vehicle.vehicle_type, vehicle.year),
        format!("  kilometers   : {:.0}", vehicle.kilometers()),
        format!("  last service : {} days ago", vehicle.days_since_service()),
        format!("  status       : {}", vehicle.status),
        format!("  driver       : {driver}"),
        format!(
            "  priority     : {}{}",
            vehicle.maintenance_priority(),
            if vehicle.needs_maintenance() { " (service due)" } else { "" }
        ),
    ]
    .join("\n")
}

/// One row per vehicle, sorted by id.
pub fn vehicle_table<'a>(vehicles: impl IntoIterator<Item = &'a VehicleRecord>) -> String {
    let mut rows: Vec<&VehicleRecord> = vehicles.into_iter().collect();
    rows.sort_by(|a, b| a.id().cmp(b.id()));

    let mut lines = vec![format!(
        "{:<6} {:<15} {:<18} {:<6} {:>9} {:>5} {:<12} {:>4}",
        "ID", "REGISTRATION", "MODEL", "TYPE", "KM", "DAYS", "STATUS", "PRIO"
    )];
    lines.extend(rows.iter().map(|v| {
        format!(
            "{:<6} {:<15} {:<18} {:<6} {:>9.0} {:>5} {:<12} {:>4}",
            v.id().as_str(),
            v.registration,
            v.model,
            v.vehicle_type,
            v.kilometers(),
            v.days_since_service(),
            v.status.as_str(),
            v.maintenance_priority()
        )
    }));
    lines.push(format!("{} vehicle(s)", rows.len()));
    lines.join("\n")
}

pub fn directory_stats(stats: &DirectoryStats) -> String {
    [
        format!("records          : {}", stats.len),
        format!("buckets          : {}", stats.bucket_count),
        format!("used buckets     : {}", stats.used_buckets),
        format!("longest chain    : {}", stats.max_chain_length),
        format!("load factor      : {:.2}", stats.load_factor),
    ]
    .join("\n")
}

pub fn driver_details(driver: &DriverRecord) -> String {
    let vehicle = driver
        .assigned_vehicle
        .as_ref()
        .map_or("-", |vehicle| vehicle.as_str());
    format!(
        "{} {} ({} yrs) licence {} phone {} status {} vehicle {}",
        driver.id(),
        driver.name,
        driver.experience_years,
        driver.license,
        driver.phone,
        driver.status,
        vehicle
    )
}

pub fn queued_driver(driver: &QueuedDriver) -> String {
    format!("{} {} ({} yrs)", driver.id, driver.name, driver.experience_years)
}

pub fn queue_listing(queue: &DriverAssignmentQueue) -> String {
    if queue.is_empty() {
        return "No drivers waiting.".to_string();
    }
    let mut lines: Vec<String> = queue
        .iter()
        .enumerate()
        .map(|(position, driver)| format!("{:>3}. {}", position + 1, queued_driver(driver)))
        .collect();
    lines.push(format!("{} driver(s) waiting", queue.len()));
    lines.join("\n")
}

pub fn ticket(ticket: &MaintenanceTicket) -> String {
    format!(
        "{} {} priority {} ({:.0} km, {} days){}",
        ticket.vehicle_id,
        ticket.model,
        ticket.priority,
        ticket.kilometers,
        ticket.days_since_service,
        if ticket.needs_maintenance { " URGENT" } else { "" }
    )
}

pub fn ticket_list<'a>(tickets: impl IntoIterator<Item = &'a MaintenanceTicket>) -> String {
    let lines: Vec<String> = tickets
        .into_iter()
        .enumerate()
        .map(|(rank, t)| format!("{:>3}. {}", rank + 1, ticket(t)))
        .collect();
    if lines.is_empty() {
        "No vehicles queued for maintenance.".to_string()
    } else {
        lines.join("\n")
    }
}

pub fn scheduler_summary(scheduler: &MaintenanceScheduler) -> String {
    let capacity = scheduler
        .capacity()
        .map_or_else(|| "unbounded".to_string(), |c| c.to_string());
    format!(
        "{} queued, {} past service thresholds, capacity {}",
        scheduler.len(),
        scheduler.urgent_count(),
        capacity
    )
}

pub fn network_listing(network: &RoadNetwork) -> String {
    let mut lines = vec![format!(
        "{} location(s), {} road(s)",
        network.num_locations(),
        network.num_roads()
    )];
    for location in network.locations() {
        let roads: Vec<String> = network
            .neighbors(location.id)
            .unwrap_or_default()
            .iter()
            .map(|edge| {
                let name = network
                    .location(edge.to)
                    .map_or("?", |to| to.name.as_str());
                format!("{name} ({} km)", edge.km)
            })
            .collect();
        lines.push(format!("[{}] {} -> {}", location.id, location.name, roads.join(", ")));
    }
    lines.join("\n")
}

pub fn route(network: &RoadNetwork, route: &Route) -> String {
    let name = |id| network.location(id).map_or("?", |location| location.name.as_str());
    let stops: Vec<&str> = route.stops.iter().map(|&id| name(id)).collect();
    let mut lines = vec![
        format!("Shortest distance: {} km", route.distance_km),
        format!("Path: {}", stops.join(" -> ")),
    ];
    lines.extend(
        route
            .legs
            .iter()
            .map(|leg| format!("  {} -> {}: {} km", name(leg.from), name(leg.to), leg.km)),
    );
    lines.join("\n")
}

pub fn indexed_vehicle(entry: &IndexedVehicle) -> String {
    format!("{} {} ({})", entry.id, entry.model, entry.registration)
}

pub fn index_listing<'a>(entries: impl IntoIterator<Item = &'a IndexedVehicle>) -> String {
    let lines: Vec<String> = entries.into_iter().map(indexed_vehicle).collect();
    if lines.is_empty() {
        "No matching vehicles.".to_string()
    } else {
        lines.join("\n")
    }
}

pub fn account(account: &UserAccount) -> String {
    format!(
        "{} {} <{}> {} {}",
        account.user_id, account.name, account.email, account.role, account.status
    )
}

#[cfg(test)]
mod tests {
    use fleet_core::road_network::NetworkConfig;
    use fleet_core::test_helpers::{reference_network, DELIVERY_HUB, WAREHOUSE};

    use super::*;

    #[test]
    fn route_names_every_stop_and_leg() {
        let network = reference_network(NetworkConfig::default());
        let shortest = network.shortest_path(WAREHOUSE, DELIVERY_HUB).expect("route");
        let text = route(&network, &shortest);
        assert!(text.contains("Shortest distance: 36 km"));
        assert!(text.contains("Warehouse -> ServiceStation -> HighwayJunction -> DeliveryHub"));
        assert_eq!(text.lines().count(), 2 + 3);
    }

    #[test]
    fn vehicle_table_sorts_rows() {
        let a = VehicleRecord::new("V2", "R2", "M", "Car", 2020);
        let b = VehicleRecord::new("V1", "R1", "M", "Car", 2020);
        let text = vehicle_table([&a, &b]);
        let ids: Vec<&str> = text
            .lines()
            .skip(1)
            .take(2)
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(ids, vec!["V1", "V2"]);
        assert!(text.ends_with("2 vehicle(s)"));
    }

    #[test]
    fn empty_listings_say_so() {
        assert_eq!(queue_listing(&DriverAssignmentQueue::new()), "No drivers waiting.");
        assert_eq!(
            ticket_list(std::iter::empty()),
            "No vehicles queued for maintenance."
        );
    }

    #[test]
    fn urgent_vehicle_is_flagged() {
        let vehicle =
            VehicleRecord::new("V001", "MH-12", "Tata Ace", "Truck", 2020).with_usage(12_000.0, 95);
        assert!(vehicle_details(&vehicle).contains("priority     : 5 (service due)"));
    }
}
