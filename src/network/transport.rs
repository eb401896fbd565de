//! Transport
//!
//! One request/response exchange per call. Every call opens its own
//! connection and closes it before returning, on success or failure.

use std::io::{Read, Write};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use openssl::ssl::SslConnector;

use super::tls::build_connector;
use crate::config::{Config, Protocol};
use crate::error::{ProbeError, Result};

/// Largest reply accepted; a reply must arrive in a single read
pub const RECV_BUFFER_SIZE: usize = 4096;

/// Sends a frame and returns the raw reply
pub trait RoundTrip {
    fn roundtrip(&self, frame: &[u8]) -> Result<Vec<u8>>;
}

/// Socket transport to the appliance
pub struct Transport {
    host: String,
    port: u16,
    protocol: Protocol,
    connector: Option<SslConnector>,
    connect_timeout: Option<Duration>,
    io_timeout: Option<Duration>,
}

impl Transport {
    /// Create a transport for `config`
    ///
    /// For TLS this reads the credentials, so missing or unreadable files
    /// fail here rather than in the first exchange.
    pub fn new(config: &Config) -> Result<Self> {
        let connector = match config.protocol {
            Protocol::Tls => {
                let tls = config.tls.as_ref().ok_or_else(|| {
                    ProbeError::Config("tls selected but no certificate and key given".to_string())
                })?;
                Some(build_connector(tls)?)
            }
            Protocol::Tcp | Protocol::Udp => None,
        };

        Ok(Self {
            host: config.host.clone(),
            port: config.port,
            protocol: config.protocol,
            connector,
            connect_timeout: config.connect_timeout,
            io_timeout: config.io_timeout,
        })
    }

    fn resolve(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                ProbeError::Transport(format!("{}:{} did not resolve", self.host, self.port))
            })
    }

    fn connect_tcp(&self) -> Result<TcpStream> {
        let addr = self.resolve()?;
        let stream = match self.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
            None => TcpStream::connect(addr),
        }
        .map_err(|e| ProbeError::Transport(format!("connect to {} failed: {}", addr, e)))?;

        stream.set_nodelay(true)?;
        stream.set_read_timeout(self.io_timeout)?;
        stream.set_write_timeout(self.io_timeout)?;
        Ok(stream)
    }

    fn roundtrip_tcp(&self, frame: &[u8]) -> Result<Vec<u8>> {
        let mut stream = self.connect_tcp()?;
        exchange(&mut stream, frame)
    }

    fn roundtrip_tls(&self, connector: &SslConnector, frame: &[u8]) -> Result<Vec<u8>> {
        let tcp = self.connect_tcp()?;
        // Appliances are addressed by IP and rarely carry it in their certificate.
        let mut stream = connector
            .configure()?
            .verify_hostname(false)
            .connect(&self.host, tcp)
            .map_err(|e| ProbeError::Tls(format!("handshake failed: {}", e)))?;

        if let Some(cipher) = stream.ssl().current_cipher() {
            tracing::debug!("Negotiated {} {}", stream.ssl().version_str(), cipher.name());
        }

        let result = exchange(&mut stream, frame);
        if let Err(e) = stream.shutdown() {
            tracing::debug!("TLS shutdown failed: {}", e);
        }
        result
    }

    fn roundtrip_udp(&self, frame: &[u8]) -> Result<Vec<u8>> {
        let addr = self.resolve()?;
        let local: SocketAddr = if addr.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(local)?;
        socket.set_read_timeout(self.io_timeout)?;
        socket.send_to(frame, addr)?;

        let mut buf = vec![0u8; RECV_BUFFER_SIZE];
        let (len, peer) = socket.recv_from(&mut buf)?;
        tracing::trace!("Received {} bytes from {}", len, peer);
        buf.truncate(len);
        Ok(buf)
    }
}

impl RoundTrip for Transport {
    fn roundtrip(&self, frame: &[u8]) -> Result<Vec<u8>> {
        match (self.protocol, &self.connector) {
            (Protocol::Tcp, _) => self.roundtrip_tcp(frame),
            (Protocol::Udp, _) => self.roundtrip_udp(frame),
            (Protocol::Tls, Some(connector)) => self.roundtrip_tls(connector, frame),
            (Protocol::Tls, None) => Err(ProbeError::Config(
                "tls transport has no connector".to_string(),
            )),
        }
    }
}

/// Write the whole frame, then read once
fn exchange<S: Read + Write>(stream: &mut S, frame: &[u8]) -> Result<Vec<u8>> {
    stream.write_all(frame)?;
    stream.flush()?;

    let mut buf = vec![0u8; RECV_BUFFER_SIZE];
    let len = stream.read(&mut buf)?;
    if len == 0 {
        return Err(ProbeError::Transport(
            "connection closed before a reply was received".to_string(),
        ));
    }
    buf.truncate(len);
    Ok(buf)
}
