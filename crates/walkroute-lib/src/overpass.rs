//! Walk-network download from an Overpass API endpoint.

use std::collections::HashMap;
use std::env;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo::{Coordinate, EARTH_RADIUS_M};
use crate::graph::{Node, NodeId, RawEdge};
use crate::provider::{GraphProvider, NetworkData};

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
const OVERPASS_URL_ENV: &str = "WALKROUTE_OVERPASS_URL";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Highway values that pedestrians cannot use.
const EXCLUDED_HIGHWAYS: &str = "abandoned|bus_guideway|construction|corridor|cycleway|elevator|\
escalator|motor|motorway|motorway_link|planned|platform|proposed|raceway|trunk|trunk_link";

/// Fetches walkable ways inside the bounding box of a region.
///
/// Each consecutive pair of way nodes becomes two directed edges weighted by
/// their haversine length in metres.
#[derive(Debug, Clone)]
pub struct OverpassProvider {
    endpoint: String,
    timeout: Duration,
}

impl Default for OverpassProvider {
    fn default() -> Self {
        Self::from_env()
    }
}

impl OverpassProvider {
    /// Use `WALKROUTE_OVERPASS_URL` when set, otherwise the public endpoint.
    pub fn from_env() -> Self {
        let endpoint = env::var(OVERPASS_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_string());
        Self::with_endpoint(endpoint)
    }

    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    // Built per fetch: the blocking client must not be created on an async
    // runtime thread, and fetches already run on blocking threads.
    fn build_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(user_agent())
            .build()
            .map_err(|err| Error::graph_fetch(format!("failed to build HTTP client: {}", err)))
    }
}

impl GraphProvider for OverpassProvider {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> Result<NetworkData> {
        center.validate()?;
        let query = build_query(&BoundingBox::around(center, radius_m), self.timeout);
        debug!(endpoint = %self.endpoint, %query, "querying overpass");

        let client = self.build_client()?;
        let response = client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain; charset=utf-8")
            .body(query)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| Error::graph_fetch(format!("overpass request failed: {}", err)))?;

        let body: OverpassResponse = response
            .json()
            .map_err(|err| Error::graph_fetch(format!("invalid overpass response: {}", err)))?;

        let data = into_network(body);
        info!(
            nodes = data.nodes.len(),
            edges = data.edges.len(),
            radius_m,
            "fetched walk network"
        );
        Ok(data)
    }
}

fn user_agent() -> String {
    format!("walkroute-lib/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Box extending `radius_m` from `center` in each cardinal direction.
    pub(crate) fn around(center: Coordinate, radius_m: f64) -> Self {
        let lat_delta = (radius_m / EARTH_RADIUS_M).to_degrees();
        let cos_lat = center.lat.to_radians().cos().max(1e-6);
        let lng_delta = lat_delta / cos_lat;
        Self {
            south: (center.lat - lat_delta).max(-90.0),
            west: (center.lng - lng_delta).max(-180.0),
            north: (center.lat + lat_delta).min(90.0),
            east: (center.lng + lng_delta).min(180.0),
        }
    }
}

pub(crate) fn build_query(bbox: &BoundingBox, timeout: Duration) -> String {
    format!(
        "[out:json][timeout:{timeout}];\
way[\"highway\"][\"highway\"!~\"^({excluded})$\"][\"foot\"!~\"^no$\"][\"access\"!~\"^private$\"]\
({south:.7},{west:.7},{north:.7},{east:.7});\
(._;>;);out body;",
        timeout = timeout.as_secs(),
        excluded = EXCLUDED_HIGHWAYS,
        south = bbox.south,
        west = bbox.west,
        north = bbox.north,
        east = bbox.east,
    )
}

#[derive(Debug, Deserialize)]
pub(crate) struct OverpassResponse {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Element {
    Node {
        id: NodeId,
        lat: f64,
        lon: f64,
    },
    Way {
        #[serde(default)]
        nodes: Vec<NodeId>,
    },
    #[serde(other)]
    Other,
}

pub(crate) fn into_network(response: OverpassResponse) -> NetworkData {
    let mut nodes = Vec::new();
    let mut positions: HashMap<NodeId, Coordinate> = HashMap::new();
    let mut ways = Vec::new();

    for element in response.elements {
        match element {
            Element::Node { id, lat, lon } => {
                let node = Node::new(id, lat, lon);
                positions.insert(id, Coordinate::new(lat, lon));
                nodes.push(node);
            }
            Element::Way { nodes: way_nodes } => ways.push(way_nodes),
            Element::Other => {}
        }
    }

    let mut edges = Vec::new();
    for way in &ways {
        for pair in way.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a == b {
                continue;
            }
            let weight = match (positions.get(&a), positions.get(&b)) {
                (Some(pa), Some(pb)) => Some(pa.haversine_distance(pb)),
                _ => None,
            };
            edges.push(RawEdge { from: a, to: b, weight });
            edges.push(RawEdge { from: b, to: a, weight });
        }
    }

    NetworkData::new(nodes, edges)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounding_box_spans_radius() {
        let bbox = BoundingBox::around(Coordinate::new(0.0, 10.0), 1000.0);
        let north = Coordinate::new(bbox.north, 10.0);
        let metres = Coordinate::new(0.0, 10.0).haversine_distance(&north);
        assert!((metres - 1000.0).abs() < 1.0, "got {metres}");
        assert!(bbox.west < 10.0 && bbox.east > 10.0);
    }

    #[test]
    fn query_targets_walkable_ways() {
        let bbox = BoundingBox {
            south: 41.0,
            west: 29.0,
            north: 41.1,
            east: 29.1,
        };
        let query = build_query(&bbox, Duration::from_secs(25));
        assert!(query.starts_with("[out:json][timeout:25];"));
        assert!(query.contains("(41.0000000,29.0000000,41.1000000,29.1000000)"));
        assert!(query.contains("motorway"));
        assert!(query.ends_with("out body;"));
    }

    #[test]
    fn ways_become_bidirectional_edges() {
        let body = r#"{
            "elements": [
                {"type": "node", "id": 1, "lat": 41.0, "lon": 29.0},
                {"type": "node", "id": 2, "lat": 41.001, "lon": 29.0},
                {"type": "node", "id": 3, "lat": 41.002, "lon": 29.0},
                {"type": "way", "id": 10, "nodes": [1, 2, 3], "tags": {"highway": "footway"}},
                {"type": "relation", "id": 99}
            ]
        }"#;
        let response: OverpassResponse = serde_json::from_str(body).unwrap();
        let data = into_network(response);

        assert_eq!(data.nodes.len(), 3);
        assert_eq!(data.edges.len(), 4);
        assert_eq!((data.edges[0].from, data.edges[0].to), (1, 2));
        assert_eq!((data.edges[1].from, data.edges[1].to), (2, 1));
        let weight = data.edges[0].weight.unwrap();
        assert!((weight - 111.2).abs() < 0.5, "got {weight}");
    }

    #[test]
    fn unknown_way_nodes_fall_back_to_default_weight() {
        let body = r#"{"elements": [{"type": "way", "id": 1, "nodes": [5, 6]}]}"#;
        let data = into_network(serde_json::from_str(body).unwrap());
        assert_eq!(data.edges[0].weight, None);
    }

    #[test]
    fn unreachable_endpoint_is_a_fetch_error() {
        let provider = OverpassProvider::with_endpoint("http://127.0.0.1:9/interpreter")
            .with_timeout(Duration::from_secs(2));
        let error = provider
            .fetch(Coordinate::new(41.0, 29.0), 500.0)
            .unwrap_err();
        assert_eq!(error.kind(), "graph_fetch_error");
    }
}
