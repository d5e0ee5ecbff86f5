use byteorder::{BigEndian, ByteOrder};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::error::Error;

/// Length-prefixed message framing over a stream socket.
///
/// Every message is a 4-byte big-endian payload length followed by exactly
/// that many payload bytes. The framing is symmetric: both directions of
/// every connection in the cluster use it, and it is agnostic to what the
/// bytes encode.
pub struct FramedStream<S> {
    stream: S,
}

impl<S: AsyncRead + AsyncWrite + Unpin> FramedStream<S> {
    pub fn new(stream: S) -> Self {
        Self { stream }
    }

    /// Writes one message, prefix and payload in a single buffer.
    pub async fn send(&mut self, payload: &[u8]) -> Result<(), Error> {
        let mut buf = Vec::with_capacity(4 + payload.len());
        buf.extend_from_slice(&(payload.len() as u32).to_be_bytes());
        buf.extend_from_slice(payload);
        self.stream.write_all(&buf).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Reads one message. Returns `None` when the peer closes before a
    /// complete message has arrived: a payload cut short mid-transfer is
    /// treated the same as no message at all, never surfaced as a partial
    /// buffer or an error.
    pub async fn recv(&mut self) -> Result<Option<Vec<u8>>, Error> {
        let mut len_buf = [0u8; 4];
        if !self.read_full(&mut len_buf).await? {
            return Ok(None);
        }
        let len = BigEndian::read_u32(&len_buf) as usize;

        let mut payload = vec![0u8; len];
        if !self.read_full(&mut payload).await? {
            return Ok(None);
        }
        Ok(Some(payload))
    }

    /// Fills `buf`, looping on short reads. `false` means the peer closed
    /// before the buffer filled.
    async fn read_full(&mut self, buf: &mut [u8]) -> Result<bool, Error> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.stream.read(&mut buf[filled..]).await? {
                0 => return Ok(false),
                n => filled += n,
            }
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{duplex, AsyncWriteExt};

    #[tokio::test]
    async fn round_trip() {
        let (a, b) = duplex(64);
        let mut tx = FramedStream::new(a);
        let mut rx = FramedStream::new(b);

        tx.send(b"hello workers").await.unwrap();
        assert_eq!(rx.recv().await.unwrap().as_deref(), Some(&b"hello workers"[..]));
    }

    #[tokio::test]
    async fn messages_arrive_in_order() {
        let (a, b) = duplex(64);
        let mut tx = FramedStream::new(a);
        let mut rx = FramedStream::new(b);

        tx.send(b"first").await.unwrap();
        tx.send(b"").await.unwrap();
        tx.send(b"third").await.unwrap();
        assert_eq!(rx.recv().await.unwrap().as_deref(), Some(&b"first"[..]));
        assert_eq!(rx.recv().await.unwrap().as_deref(), Some(&b""[..]));
        assert_eq!(rx.recv().await.unwrap().as_deref(), Some(&b"third"[..]));
    }

    #[tokio::test]
    async fn clean_close_is_no_message() {
        let (a, b) = duplex(64);
        drop(a);
        let mut rx = FramedStream::new(b);
        assert!(rx.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn partial_prefix_is_no_message() {
        let (mut a, b) = duplex(64);
        a.write_all(&[0, 0]).await.unwrap();
        drop(a);
        let mut rx = FramedStream::new(b);
        assert!(rx.recv().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn truncated_payload_is_no_message() {
        let (mut a, b) = duplex(64);
        // prefix claims ten bytes, only four arrive
        a.write_all(&10u32.to_be_bytes()).await.unwrap();
        a.write_all(b"oops").await.unwrap();
        drop(a);
        let mut rx = FramedStream::new(b);
        assert!(rx.recv().await.unwrap().is_none());
    }
}
