mod support;

use fleet_core::error::FleetError;
use fleet_core::maintenance::{MaintenanceScheduler, SchedulerConfig};
use fleet_core::test_helpers::random_vehicles;
use support::is_non_decreasing;

#[test]
fn extraction_order_is_non_decreasing() {
    for seed in 0..10 {
        let vehicles = random_vehicles(seed, 300);
        let mut scheduler = MaintenanceScheduler::new();
        for v in &vehicles {
            scheduler.insert(v).expect("unbounded insert");
        }

        let mut priorities = Vec::with_capacity(vehicles.len());
        let mut expected_len = scheduler.len();
        while !scheduler.is_empty() {
            let ticket = scheduler.extract_min().expect("non-empty");
            expected_len -= 1;
            assert_eq!(scheduler.len(), expected_len);
            priorities.push(ticket.priority);
        }
        assert!(is_non_decreasing(&priorities), "seed {seed}: {priorities:?}");

        let mut sorted: Vec<u32> = vehicles.iter().map(|v| v.maintenance_priority()).collect();
        sorted.sort_unstable();
        assert_eq!(priorities, sorted);
    }
}

#[test]
fn interleaved_inserts_and_extracts_stay_ordered() {
    let vehicles = random_vehicles(99, 120);
    let mut scheduler = MaintenanceScheduler::new();
    for (i, v) in vehicles.iter().enumerate() {
        scheduler.insert(v).expect("insert");
        if i % 3 == 2 {
            let head = scheduler.peek_min().expect("non-empty").priority;
            let ticket = scheduler.extract_min().expect("non-empty");
            assert_eq!(ticket.priority, head);
            assert!(scheduler.iter().all(|t| t.priority >= ticket.priority));
        }
    }
    assert_eq!(scheduler.len(), vehicles.len() - vehicles.len() / 3);
}

#[test]
fn bounded_scheduler_keeps_source_limit() {
    let mut scheduler = MaintenanceScheduler::with_config(SchedulerConfig::bounded(100));
    let vehicles = random_vehicles(5, 101);
    for v in &vehicles[..100] {
        scheduler.insert(v).expect("within capacity");
    }
    assert_eq!(
        scheduler.insert(&vehicles[100]),
        Err(FleetError::HeapFull { capacity: 100 })
    );
    scheduler.extract_min().expect("non-empty");
    scheduler.insert(&vehicles[100]).expect("room again");
}
