use std::{
    net::SocketAddr,
    time::{Duration, Instant},
};

use futures::{stream, StreamExt};
use tokio::net::TcpStream;
use tracing::{debug, debug_span, warn, Instrument};

use crate::{
    graph::Graph,
    matrix::Matrix,
    net::{
        error::Error,
        frame::FramedStream,
        wire::{WorkResult, WorkUnit},
    },
};

/// Fans independent work units out across a fixed pool of worker
/// endpoints and folds completed results back into one answer.
///
/// Units are assigned round-robin by index, one connection per unit, with
/// at most one round-trip in flight per endpoint. Completion order is
/// whatever the network delivers; nothing downstream depends on it. A unit
/// that fails in transit contributes nothing: results degrade to a
/// partial set rather than aborting the dispatch, and nothing is retried.
pub struct Dispatcher {
    endpoints: Vec<SocketAddr>,
}

impl Dispatcher {
    pub fn new(endpoints: Vec<SocketAddr>) -> Self {
        Self { endpoints }
    }

    pub fn endpoints(&self) -> &[SocketAddr] {
        &self.endpoints
    }

    /// Finds every simple path from `start` to `end` in `graph` by
    /// splitting the search on the first hop: each neighbor of `start`
    /// becomes one unit carrying the subgraph reachable from it with
    /// `start` carved out.
    ///
    /// `start == end` short-circuits to the single-node path without
    /// touching the network. The returned duration spans unit creation to
    /// the last completion.
    pub async fn find_paths(
        &self,
        graph: &Graph,
        start: &str,
        end: &str,
    ) -> (Vec<Vec<String>>, Duration) {
        if start == end {
            return (vec![vec![start.to_owned()]], Duration::ZERO);
        }
        let started = Instant::now();
        if self.endpoints.is_empty() {
            warn!("no worker endpoints configured");
            return (Vec::new(), started.elapsed());
        }

        let units: Vec<(SocketAddr, WorkUnit)> = graph
            .neighbors(start)
            .iter()
            .enumerate()
            .map(|(i, hop)| {
                let unit = WorkUnit::PathSearch {
                    subgraph: graph.partition(start, hop),
                    start: hop.clone(),
                    end: end.to_owned(),
                };
                (self.endpoints[i % self.endpoints.len()], unit)
            })
            .collect();
        debug!(units = units.len(), "fanning out path search");

        let mut paths = Vec::new();
        let mut completions = stream::iter(units)
            .map(|(endpoint, unit)| Self::round_trip(endpoint, unit))
            .buffer_unordered(self.endpoints.len());
        while let Some(result) = completions.next().await {
            let Some(WorkResult::Paths(found)) = result else {
                continue;
            };
            for tail in found {
                let mut path = Vec::with_capacity(tail.len() + 1);
                path.push(start.to_owned());
                path.extend(tail);
                paths.push(path);
            }
        }

        let elapsed = started.elapsed();
        debug!(paths = paths.len(), ?elapsed, "path search complete");
        (paths, elapsed)
    }

    /// Multiplies `a` by `b`, one dot-product unit per output cell.
    ///
    /// Each completed scalar lands in the cell its unit was created for,
    /// keyed by task identity. Completion order is non-deterministic but
    /// output position is not. Cells whose unit fails stay `0.0`.
    ///
    /// # Panics
    /// Panics if `a.cols() != b.rows()`.
    pub async fn multiply(&self, a: &Matrix, b: &Matrix) -> (Matrix, Duration) {
        assert_eq!(
            a.cols(),
            b.rows(),
            "cannot multiply a {}x{} matrix by a {}x{} matrix",
            a.rows(),
            a.cols(),
            b.rows(),
            b.cols()
        );
        let started = Instant::now();
        let mut out = Matrix::zeros(a.rows(), b.cols());
        if self.endpoints.is_empty() {
            warn!("no worker endpoints configured");
            return (out, started.elapsed());
        }

        let cells = (0..a.rows()).flat_map(|i| (0..b.cols()).map(move |j| (i, j)));
        let units: Vec<((usize, usize), SocketAddr, WorkUnit)> = cells
            .enumerate()
            .map(|(task, (i, j))| {
                let unit = WorkUnit::DotProduct {
                    a: a.row(i),
                    b: b.column(j),
                };
                ((i, j), self.endpoints[task % self.endpoints.len()], unit)
            })
            .collect();
        debug!(units = units.len(), "fanning out dot products");

        let mut completions = stream::iter(units)
            .map(|(cell, endpoint, unit)| async move {
                (cell, Self::round_trip(endpoint, unit).await)
            })
            .buffer_unordered(self.endpoints.len());
        while let Some(((i, j), result)) = completions.next().await {
            match result {
                Some(WorkResult::Scalar(value)) => out.set(i, j, value),
                _ => warn!(row = i, col = j, "cell lost, leaving it at zero"),
            }
        }

        (out, started.elapsed())
    }

    /// One full unit lifecycle: connect, send, await the reply, close.
    /// Every failure mode collapses to `None`: the unit produced no
    /// result.
    async fn round_trip(endpoint: SocketAddr, unit: WorkUnit) -> Option<WorkResult> {
        let span = debug_span!("unit", %endpoint);
        async move {
            match Self::exchange(endpoint, unit).await {
                Ok(result) => result,
                Err(e) => {
                    warn!("work unit lost: {e}");
                    None
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn exchange(
        endpoint: SocketAddr,
        unit: WorkUnit,
    ) -> Result<Option<WorkResult>, Error> {
        let stream = TcpStream::connect(endpoint).await?;
        let mut framed = FramedStream::new(stream);
        framed.send(&unit.encode()?).await?;
        let Some(bytes) = framed.recv().await? else {
            debug!("worker closed without a result");
            return Ok(None);
        };
        match WorkResult::decode(&bytes) {
            Ok(result) => Ok(Some(result)),
            Err(_) => {
                warn!("discarding undecodable result");
                Ok(None)
            }
        }
    }
}
