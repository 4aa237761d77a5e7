//! Road network: an undirected weighted graph over named locations, with
//! single-source shortest paths (Dijkstra).
//!
//! Locations get dense ids `0..num_locations()` in insertion order. Every
//! road is stored twice, once in each endpoint's adjacency list. Distances
//! are whole kilometres.
//!
//! Two frontier strategies are available and visit vertices in exactly the
//! same order: the unvisited vertex with the smallest tentative distance,
//! lowest id on ties.
//!
//! - [`FrontierKind::LinearScan`]: O(V) scan per step, O(V²) overall.
//! - [`FrontierKind::BinaryHeap`]: lazy-deletion heap ordered by
//!   `(distance, id)`, O((V + E) log V).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{FleetError, FleetResult};

pub type LocationId = usize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrontierKind {
    #[default]
    BinaryHeap,
    LinearScan,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub frontier: FrontierKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub id: LocationId,
    pub name: String,
}

/// One direction of a road as seen from its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadEdge {
    pub to: LocationId,
    pub km: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteLeg {
    pub from: LocationId,
    pub to: LocationId,
    pub km: u32,
}

/// A shortest route. `stops` starts at the source and ends at the
/// destination; a route to the source itself has one stop and no legs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub distance_km: u64,
    pub stops: Vec<LocationId>,
    pub legs: Vec<RouteLeg>,
}

/// Result of one Dijkstra run: distances and parent edges for every vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPathTree {
    source: LocationId,
    distances: Vec<Option<u64>>,
    parents: Vec<Option<RouteLeg>>,
}

impl ShortestPathTree {
    pub fn source(&self) -> LocationId {
        self.source
    }

    /// `None` when the vertex is unreachable or out of range.
    pub fn distance_to(&self, destination: LocationId) -> Option<u64> {
        self.distances.get(destination).copied().flatten()
    }

    /// Walk parent edges back from `destination`, then reverse.
    pub fn route_to(&self, destination: LocationId) -> Option<Route> {
        let distance_km = self.distance_to(destination)?;
        let mut legs = Vec::new();
        let mut current = destination;
        while let Some(leg) = self.parents[current] {
            legs.push(leg);
            current = leg.from;
        }
        legs.reverse();

        let mut stops = Vec::with_capacity(legs.len() + 1);
        stops.push(self.source);
        stops.extend(legs.iter().map(|leg| leg.to));
        Some(Route {
            distance_km,
            stops,
            legs,
        })
    }
}

enum Frontier {
    LinearScan,
    Heap(BinaryHeap<Reverse<(u64, LocationId)>>),
}

impl Frontier {
    fn new(kind: FrontierKind) -> Self {
        match kind {
            FrontierKind::LinearScan => Frontier::LinearScan,
            FrontierKind::BinaryHeap => Frontier::Heap(BinaryHeap::new()),
        }
    }

    fn push(&mut self, vertex: LocationId, distance: u64) {
        if let Frontier::Heap(heap) = self {
            heap.push(Reverse((distance, vertex)));
        }
    }

    fn pop(&mut self, distances: &[Option<u64>], visited: &[bool]) -> Option<LocationId> {
        match self {
            Frontier::LinearScan => {
                let mut best: Option<(u64, LocationId)> = None;
                for (vertex, distance) in distances.iter().enumerate() {
                    if visited[vertex] {
                        continue;
                    }
                    if let Some(d) = *distance {
                        if best.map_or(true, |(best_d, _)| d < best_d) {
                            best = Some((d, vertex));
                        }
                    }
                }
                best.map(|(_, vertex)| vertex)
            }
            Frontier::Heap(heap) => {
                while let Some(Reverse((distance, vertex))) = heap.pop() {
                    // Skip entries superseded by a later relaxation.
                    if !visited[vertex] && distances[vertex] == Some(distance) {
                        return Some(vertex);
                    }
                }
                None
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    locations: Vec<Location>,
    adjacency: Vec<Vec<RoadEdge>>,
    num_roads: usize,
    config: NetworkConfig,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NetworkConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn frontier(&self) -> FrontierKind {
        self.config.frontier
    }

    pub fn set_frontier(&mut self, frontier: FrontierKind) {
        self.config.frontier = frontier;
    }

    /// Add a location and return its id (the previous location count).
    pub fn add_location(&mut self, name: impl Into<String>) -> LocationId {
        let id = self.locations.len();
        let name = name.into();
        debug!(id, name = %name, "location added");
        self.locations.push(Location { id, name });
        self.adjacency.push(Vec::new());
        id
    }

    /// Add an undirected road. Both endpoints are validated before anything
    /// is stored, so a failed call leaves the network unchanged.
    pub fn add_road(&mut self, a: LocationId, b: LocationId, km: u32) -> FleetResult<()> {
        self.check_vertex(a)?;
        self.check_vertex(b)?;
        self.adjacency[a].push(RoadEdge { to: b, km });
        self.adjacency[b].push(RoadEdge { to: a, km });
        self.num_roads += 1;
        debug!(
            from = %self.locations[a].name,
            to = %self.locations[b].name,
            km,
            "road added"
        );
        Ok(())
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    pub fn num_roads(&self) -> usize {
        self.num_roads
    }

    pub fn location(&self, id: LocationId) -> FleetResult<&Location> {
        self.check_vertex(id)?;
        Ok(&self.locations[id])
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    /// First location with this exact name.
    pub fn find_location(&self, name: &str) -> Option<LocationId> {
        self.locations
            .iter()
            .find(|location| location.name == name)
            .map(|location| location.id)
    }

    /// Roads leaving `id`, in insertion order.
    pub fn neighbors(&self, id: LocationId) -> FleetResult<&[RoadEdge]> {
        self.check_vertex(id)?;
        Ok(&self.adjacency[id])
    }

    /// Dijkstra from `source` over the whole network.
    pub fn shortest_paths(&self, source: LocationId) -> FleetResult<ShortestPathTree> {
        self.check_vertex(source)?;
        let n = self.locations.len();
        let mut distances: Vec<Option<u64>> = vec![None; n];
        let mut parents: Vec<Option<RouteLeg>> = vec![None; n];
        let mut visited = vec![false; n];

        let mut frontier = Frontier::new(self.config.frontier);
        distances[source] = Some(0);
        frontier.push(source, 0);

        while let Some(u) = frontier.pop(&distances, &visited) {
            visited[u] = true;
            let Some(du) = distances[u] else { break };
            trace!(vertex = u, distance = du, "settled");

            for edge in &self.adjacency[u] {
                let v = edge.to;
                if visited[v] {
                    continue;
                }
                let candidate = du + u64::from(edge.km);
                if distances[v].map_or(true, |dv| candidate < dv) {
                    distances[v] = Some(candidate);
                    parents[v] = Some(RouteLeg {
                        from: u,
                        to: v,
                        km: edge.km,
                    });
                    frontier.push(v, candidate);
                    trace!(vertex = v, distance = candidate, via = u, "relaxed");
                }
            }
        }

        Ok(ShortestPathTree {
            source,
            distances,
            parents,
        })
    }

    /// Shortest route between two locations, or [`FleetError::NoRoute`].
    pub fn shortest_path(&self, source: LocationId, destination: LocationId) -> FleetResult<Route> {
        self.check_vertex(destination)?;
        let tree = self.shortest_paths(source)?;
        tree.route_to(destination).ok_or_else(|| FleetError::NoRoute {
            from: self.locations[source].name.clone(),
            to: self.locations[destination].name.clone(),
        })
    }

    fn check_vertex(&self, id: LocationId) -> FleetResult<()> {
        if id < self.locations.len() {
            Ok(())
        } else {
            Err(FleetError::InvalidVertex {
                id,
                num_vertices: self.locations.len(),
            })
        }
    }
}
