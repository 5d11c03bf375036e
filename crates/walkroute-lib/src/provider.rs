//! Collaborator interfaces for graph acquisition and node resolution, plus
//! the in-memory and file-backed graph providers.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::geo::Coordinate;
use crate::graph::{Node, NodeId, RawEdge};

/// Node table and directed edge list covering a region.
///
/// JSON form: `{"nodes":[{"id":1,"lat":41.0,"lng":29.0}],"edges":[{"from":1,"to":2,"weight":12.5}]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<RawEdge>,
}

impl NetworkData {
    pub fn new(nodes: Vec<Node>, edges: Vec<RawEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load network data from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::GraphFileNotFound {
                path: path.to_path_buf(),
            });
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// Source of street-network data around a point.
///
/// Implementations block; failures are surfaced once and never retried.
pub trait GraphProvider: Send + Sync {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> Result<NetworkData>;
}

/// Maps a coordinate to the nearest graph node.
pub trait NodeResolver {
    fn nearest_node(&self, coordinate: Coordinate) -> Result<NodeId>;
}

/// Serves the same in-memory network for every request.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    data: NetworkData,
}

impl StaticProvider {
    pub fn new(data: NetworkData) -> Self {
        Self { data }
    }
}

impl GraphProvider for StaticProvider {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> Result<NetworkData> {
        debug!(
            lat = center.lat,
            lng = center.lng,
            radius_m,
            nodes = self.data.nodes.len(),
            "serving static network"
        );
        Ok(self.data.clone())
    }
}

/// Reads the network from a JSON file on every fetch.
///
/// The region is ignored; the file is expected to already cover the area
/// being routed.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl GraphProvider for FileProvider {
    fn fetch(&self, center: Coordinate, radius_m: f64) -> Result<NetworkData> {
        let data = NetworkData::from_path(&self.path)?;
        info!(
            path = %self.path.display(),
            lat = center.lat,
            lng = center.lng,
            radius_m,
            nodes = data.nodes.len(),
            edges = data.edges.len(),
            "loaded network from file"
        );
        Ok(data)
    }
}
