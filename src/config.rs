//! Configuration for hsmprobe
//!
//! Everything a run needs, passed by value into the client and harness.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ProbeError, Result};
use crate::protocol::{CommandSpec, Preset, RsaKeyLength};

/// Default plaintext host port
pub const DEFAULT_PORT: u16 = 1500;

/// TLS listens this far above the plaintext port by convention
pub const TLS_PORT_OFFSET: u16 = 1000;

/// Header used when none is given
pub const DEFAULT_HEADER: &str = "HEAD";

/// Main configuration for a probe run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Target
    // -------------------------------------------------------------------------
    /// Appliance address or host name
    pub host: String,

    /// Host command port
    pub port: u16,

    /// Transport used for every exchange
    pub protocol: Protocol,

    /// TLS client credentials, required when `protocol` is TLS
    pub tls: Option<TlsConfig>,

    // -------------------------------------------------------------------------
    // Command
    // -------------------------------------------------------------------------
    /// Header prepended to every command and echoed in every reply
    pub header: String,

    /// Full command text, header included
    pub command: CommandSpec,

    /// Run the structured decoders on replies
    pub decode: bool,

    // -------------------------------------------------------------------------
    // Run
    // -------------------------------------------------------------------------
    pub iterations: Iterations,

    /// Connect timeout, `None` blocks indefinitely
    pub connect_timeout: Option<Duration>,

    /// Read/write timeout, `None` blocks indefinitely
    pub io_timeout: Option<Duration>,
}

/// Transport selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Tcp,
    Udp,
    Tls,
}

impl FromStr for Protocol {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "tcp" => Ok(Protocol::Tcp),
            "udp" => Ok(Protocol::Udp),
            "tls" => Ok(Protocol::Tls),
            other => Err(ProbeError::UnknownProtocol(other.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::Tls => "tls",
        };
        f.write_str(name)
    }
}

/// How many request/response cycles to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Iterations {
    Count(u64),

    /// Until interrupted
    Forever,
}

/// TLS client credentials
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// PEM client certificate
    pub cert_path: PathBuf,

    /// PEM PKCS#8 private key
    pub key_path: PathBuf,

    /// PEM CA certificate the appliance certificate must chain to.
    /// Without it the appliance certificate is not verified.
    pub ca_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            protocol: Protocol::Tcp,
            tls: None,
            header: DEFAULT_HEADER.to_string(),
            command: Preset::GenerateRsa(RsaKeyLength::Bits2048).spec(DEFAULT_HEADER),
            decode: false,
            iterations: Iterations::Count(1000),
            connect_timeout: None,
            io_timeout: None,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    pub fn header_len(&self) -> usize {
        self.header.len()
    }

    /// Checks that must pass before any network activity
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() {
            return Err(ProbeError::Config("host must not be empty".to_string()));
        }
        if self.command.as_str().len() < self.header.len() + 2 {
            return Err(ProbeError::Config(format!(
                "command '{}' is shorter than the header plus a verb",
                self.command.as_str()
            )));
        }
        if let Iterations::Count(0) = self.iterations {
            return Err(ProbeError::Config("iteration count must be at least 1".to_string()));
        }

        if self.protocol == Protocol::Tls {
            let tls = self.tls.as_ref().ok_or_else(|| {
                ProbeError::Config("tls selected but no certificate and key given".to_string())
            })?;
            let mut files = vec![("certificate", &tls.cert_path), ("private key", &tls.key_path)];
            if let Some(ca) = &tls.ca_path {
                files.push(("CA certificate", ca));
            }
            for (what, path) in files {
                if !path.is_file() {
                    return Err(ProbeError::Config(format!(
                        "{} file {} does not exist",
                        what,
                        path.display()
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.config.port = port;
        self
    }

    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.config.protocol = protocol;
        self
    }

    pub fn tls(mut self, tls: TlsConfig) -> Self {
        self.config.tls = Some(tls);
        self
    }

    /// Set the header. Does not touch an already configured command.
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.config.header = header.into();
        self
    }

    /// Set the full command text, header included
    pub fn command(mut self, command: CommandSpec) -> Self {
        self.config.command = command;
        self
    }

    /// Use a preset, prefixed with the configured header
    pub fn preset(mut self, preset: &Preset) -> Self {
        self.config.command = preset.spec(&self.config.header);
        self
    }

    pub fn decode(mut self, decode: bool) -> Self {
        self.config.decode = decode;
        self
    }

    pub fn iterations(mut self, iterations: Iterations) -> Self {
        self.config.iterations = iterations;
        self
    }

    pub fn connect_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    pub fn io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.io_timeout = timeout;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
