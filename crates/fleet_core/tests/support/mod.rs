#![allow(dead_code)]

use fleet_core::road_network::{LocationId, RoadNetwork};
use pathfinding::prelude::dijkstra;

/// Shortest distance computed by the `pathfinding` crate, used as an
/// independent reference for the network's own Dijkstra.
pub fn oracle_distance(network: &RoadNetwork, from: LocationId, to: LocationId) -> Option<u64> {
    dijkstra(
        &from,
        |&vertex| {
            network
                .neighbors(vertex)
                .expect("oracle only visits valid vertices")
                .iter()
                .map(|edge| (edge.to, u64::from(edge.km)))
                .collect::<Vec<_>>()
        },
        |&vertex| vertex == to,
    )
    .map(|(_, cost)| cost)
}

pub fn is_non_decreasing<T: PartialOrd>(values: &[T]) -> bool {
    values.windows(2).all(|pair| pair[0] <= pair[1])
}
