use chrono::{DateTime, Utc};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::UdpSocket;

use super::error::ListenerError;

/// One received line.
#[derive(Debug, Clone)]
pub struct Datagram {
    pub text: String,
    pub source: SocketAddr,
    pub received_at: DateTime<Utc>,
}

pub struct UdpTransport {
    socket: UdpSocket,
    local: SocketAddr,
    buf: Vec<u8>,
}

impl UdpTransport {
    pub async fn bind(addr: &str, max_datagram_bytes: usize) -> Result<Self, ListenerError> {
        let bind_err = |source| ListenerError::Bind {
            addr: addr.to_string(),
            source,
        };
        let socket = UdpSocket::bind(addr).await.map_err(bind_err)?;
        let local = socket.local_addr().map_err(bind_err)?;
        Ok(Self {
            socket,
            local,
            buf: vec![0; max_datagram_bytes],
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    /// Waits up to `poll` for a datagram. `Ok(None)` means the poll elapsed,
    /// which is not an error.
    pub async fn recv(&mut self, poll: Duration) -> Result<Option<Datagram>, ListenerError> {
        match tokio::time::timeout(poll, self.socket.recv_from(&mut self.buf)).await {
            Err(_elapsed) => Ok(None),
            Ok(Err(source)) => Err(ListenerError::Receive {
                local: self.local,
                source,
            }),
            Ok(Ok((len, source))) => Ok(Some(Datagram {
                text: decode_text(&self.buf[..len]),
                source,
                received_at: Utc::now(),
            })),
        }
    }
}

/// Keeps the valid UTF-8 runs and drops invalid bytes.
pub fn decode_text(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn receives_datagram() {
        let mut transport = UdpTransport::bind("127.0.0.1:0", 2048).await.unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender
            .send_to(b"SAT,FAOS,ISS,10.0,42", transport.local_addr())
            .await
            .unwrap();

        let datagram = transport
            .recv(Duration::from_secs(5))
            .await
            .unwrap()
            .expect("datagram");
        assert_eq!(datagram.text, "SAT,FAOS,ISS,10.0,42");
        assert_eq!(datagram.source, sender.local_addr().unwrap());
    }

    #[tokio::test]
    async fn poll_timeout_is_none() {
        let mut transport = UdpTransport::bind("127.0.0.1:0", 2048).await.unwrap();
        let got = transport.recv(Duration::from_millis(20)).await.unwrap();
        assert!(got.is_none());
    }

    #[tokio::test]
    async fn invalid_utf8_is_dropped() {
        let mut transport = UdpTransport::bind("127.0.0.1:0", 2048).await.unwrap();
        let sender = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        sender
            .send_to(b"SAT,QUIT\xff", transport.local_addr())
            .await
            .unwrap();
        let datagram = transport.recv(Duration::from_secs(5)).await.unwrap().unwrap();
        assert_eq!(datagram.text, "SAT,QUIT");
    }

    #[test]
    fn decode_text_drops_invalid_bytes() {
        assert_eq!(decode_text(b"SAT,FAOS,ISS,10.0,4\xfe5"), "SAT,FAOS,ISS,10.0,45");
        assert_eq!(decode_text(b"\xc3SAT,QUIT\xff\xff"), "SAT,QUIT");
        assert_eq!(decode_text("AO-7 \u{e9}".as_bytes()), "AO-7 \u{e9}");
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let first = UdpTransport::bind("127.0.0.1:0", 2048).await.unwrap();
        let addr = first.local_addr().to_string();
        let err = UdpTransport::bind(&addr, 2048).await.err().expect("bind error");
        assert!(matches!(err, ListenerError::Bind { .. }));
    }
}
