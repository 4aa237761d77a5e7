//! Performance benchmarks for fleet_core using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fleet_core::directory::VehicleDirectory;
use fleet_core::maintenance::MaintenanceScheduler;
use fleet_core::road_network::{FrontierKind, NetworkConfig};
use fleet_core::sorted_index::SortedVehicleIndex;
use fleet_core::test_helpers::{random_network, random_vehicles};

fn bench_directory(c: &mut Criterion) {
    let mut group = c.benchmark_group("directory");
    for size in [100, 1_000, 10_000] {
        let vehicles = random_vehicles(42, size);
        group.bench_with_input(BenchmarkId::new("insert", size), &vehicles, |b, vehicles| {
            b.iter(|| {
                let mut directory = VehicleDirectory::new();
                for v in vehicles {
                    directory.insert(v.clone()).expect("unique ids");
                }
                black_box(directory.len())
            });
        });

        let mut directory = VehicleDirectory::new();
        for v in &vehicles {
            directory.insert(v.clone()).expect("unique ids");
        }
        group.bench_with_input(BenchmarkId::new("search", size), &vehicles, |b, vehicles| {
            b.iter(|| {
                for v in vehicles {
                    black_box(directory.search(v.id().as_str()).is_ok());
                }
            });
        });
    }
    group.finish();
}

fn bench_scheduler(c: &mut Criterion) {
    let mut group = c.benchmark_group("maintenance_scheduler");
    for size in [100, 1_000, 10_000] {
        let vehicles = random_vehicles(7, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &vehicles, |b, vehicles| {
            b.iter(|| {
                let mut scheduler = MaintenanceScheduler::new();
                for v in vehicles {
                    scheduler.insert(v).expect("unbounded");
                }
                while let Ok(ticket) = scheduler.extract_min() {
                    black_box(ticket);
                }
            });
        });
    }
    group.finish();
}

fn bench_shortest_paths(c: &mut Criterion) {
    let scenarios = vec![("small", 50, 150), ("medium", 500, 2_000), ("large", 2_000, 10_000)];

    let mut group = c.benchmark_group("shortest_paths");
    for (name, locations, roads) in scenarios {
        for frontier in [FrontierKind::BinaryHeap, FrontierKind::LinearScan] {
            let network = random_network(3, locations, roads, NetworkConfig { frontier });
            group.bench_function(BenchmarkId::new(format!("{frontier:?}"), name), |b| {
                b.iter(|| black_box(network.shortest_paths(0).expect("valid source")));
            });
        }
    }
    group.finish();
}

fn bench_sorted_index(c: &mut Criterion) {
    let vehicles = random_vehicles(11, 5_000);
    let mut index = SortedVehicleIndex::new();
    for v in &vehicles {
        index.insert(v).expect("unique ids");
    }

    let mut group = c.benchmark_group("sorted_index");
    group.bench_function("insert_5000", |b| {
        b.iter(|| {
            let mut index = SortedVehicleIndex::new();
            for v in &vehicles {
                index.insert(v).expect("unique ids");
            }
            black_box(index.len())
        });
    });
    group.bench_function("range_100", |b| {
        b.iter(|| black_box(index.range("V01000", "V01099").count()));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_directory,
    bench_scheduler,
    bench_shortest_paths,
    bench_sorted_index
);
criterion_main!(benches);
