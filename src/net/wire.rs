use rkyv::{from_bytes, to_bytes, AlignedVec, Archive, Deserialize, Serialize};

use super::error::Error;
use crate::graph::Graph;

/// One self-contained task for a worker. Exactly one unit travels over
/// each connection, and exactly one [`WorkResult`] comes back on it.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[archive(check_bytes)]
pub enum WorkUnit {
    /// Enumerate every simple path from `start` to `end` inside `subgraph`.
    PathSearch {
        subgraph: Graph,
        start: String,
        end: String,
    },
    /// Dot product of two equal-length vectors.
    DotProduct { a: Vec<f64>, b: Vec<f64> },
}

/// A worker's answer, returned over the connection that carried the unit.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
#[archive(check_bytes)]
pub enum WorkResult {
    Paths(Vec<Vec<String>>),
    Scalar(f64),
}

impl WorkUnit {
    pub fn encode(&self) -> Result<AlignedVec, Error> {
        to_bytes::<_, 1024>(self).map_err(|_| Error::CouldNotEncodeMessage)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        from_bytes(bytes).map_err(|_| Error::CouldNotDecodeMessage)
    }
}

impl WorkResult {
    pub fn encode(&self) -> Result<AlignedVec, Error> {
        to_bytes::<_, 1024>(self).map_err(|_| Error::CouldNotEncodeMessage)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, Error> {
        from_bytes(bytes).map_err(|_| Error::CouldNotDecodeMessage)
    }
}
