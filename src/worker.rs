use std::{io, net::SocketAddr};

use tokio::net::{TcpListener, TcpSocket, TcpStream};
use tracing::{debug, debug_span, error, info, warn, Instrument};

use crate::{
    matrix,
    net::{
        error::Error,
        frame::FramedStream,
        wire::{WorkResult, WorkUnit},
    },
};

/// A worker process: accept one connection, service the single unit it
/// carries, reply on the same connection, close, listen again.
///
/// Strictly sequential: the listen backlog is one deep, so a client that
/// connects while a unit is in flight waits in the kernel's queue until
/// the current cycle closes. There is no shared state between requests and
/// therefore nothing to lock.
pub struct Worker {
    listener: TcpListener,
}

impl Worker {
    /// Binds the listening socket. A failure here is the one startup error
    /// that should end the process.
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = match addr {
            SocketAddr::V4(_) => TcpSocket::new_v4()?,
            SocketAddr::V6(_) => TcpSocket::new_v6()?,
        };
        socket.set_reuseaddr(true)?;
        socket.bind(addr)?;
        let listener = socket.listen(1)?;
        info!(local_addr = %listener.local_addr()?, "worker listening");
        Ok(Self { listener })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Serves units until the process is killed. A failure inside one
    /// request is logged and ends only that connection; the loop itself
    /// returns only if the listener breaks.
    pub async fn serve(&self) -> Result<(), Error> {
        loop {
            debug!("waiting for connection");
            let (stream, peer) = self.listener.accept().await?;
            let span = debug_span!("conn", %peer);
            async {
                debug!("connection accepted");
                match Self::service(stream).await {
                    Ok(()) => debug!("connection closed"),
                    Err(e) => error!("request failed: {e}"),
                }
            }
            .instrument(span)
            .await;
        }
    }

    async fn service(stream: TcpStream) -> Result<(), Error> {
        let mut framed = FramedStream::new(stream);
        let Some(bytes) = framed.recv().await? else {
            debug!("peer closed without sending a unit");
            return Ok(());
        };
        let unit = match WorkUnit::decode(&bytes) {
            Ok(unit) => unit,
            Err(_) => {
                warn!("discarding undecodable unit");
                return Ok(());
            }
        };

        match unit {
            WorkUnit::PathSearch {
                subgraph,
                start,
                end,
            } => {
                debug!(nodes = subgraph.len(), "enumerating simple paths");
                let paths = subgraph.simple_paths(&start, &end);
                debug!(paths = paths.len(), "search finished");
                framed.send(&WorkResult::Paths(paths).encode()?).await?;
            }
            WorkUnit::DotProduct { a, b } => match matrix::dot(&a, &b) {
                Some(value) => {
                    debug!(len = a.len(), "dot product computed");
                    framed.send(&WorkResult::Scalar(value).encode()?).await?;
                }
                // compute failure: close without a response, the client
                // sees it as a unit that produced nothing
                None => warn!(
                    left = a.len(),
                    right = b.len(),
                    "vector lengths differ, dropping unit"
                ),
            },
        }
        Ok(())
    }
}
