//! hsmprobe Binary
//!
//! Stresses an appliance with repeated host commands and prints each
//! exchange.

use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::time::Duration;

use clap::{ArgGroup, Parser};
use hsmprobe::config::{DEFAULT_HEADER, DEFAULT_PORT, TLS_PORT_OFFSET};
use hsmprobe::protocol::{CommandSpec, Preset, RsaKeyLength};
use hsmprobe::{Client, Config, Harness, Iterations, ProbeError, Protocol, TlsConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// hsmprobe
#[derive(Parser, Debug)]
#[command(name = "hsmprobe")]
#[command(about = "Stress and diagnose an HSM through its host command interface")]
#[command(version)]
#[command(group(ArgGroup::new("mode").args([
    "key", "nc", "no", "j2", "j4", "j8", "jk", "randgen", "echo", "hash", "a0", "command",
])))]
struct Args {
    /// IP address or host name of the appliance
    host: String,

    /// Host command port [default: 1500, 2500 with --proto tls]
    #[arg(short, long)]
    port: Option<u16>,

    /// RSA key length to generate (the default mode)
    #[arg(long, value_parser = ["2048", "4096"])]
    key: Option<String>,

    /// Perform diagnostics (NC)
    #[arg(long)]
    nc: bool,

    /// HSM status (NO)
    #[arg(long)]
    no: bool,

    /// HSM loading (J2)
    #[arg(long)]
    j2: bool,

    /// Host command volumes (J4)
    #[arg(long)]
    j4: bool,

    /// Health check accumulated counts (J8)
    #[arg(long)]
    j8: bool,

    /// Instantaneous health check status (JK)
    #[arg(long)]
    jk: bool,

    /// Generate an 8 byte random value (N0)
    #[arg(long)]
    randgen: bool,

    /// Echo the given text (B2)
    #[arg(long, value_name = "TEXT")]
    echo: Option<String>,

    /// SHA-256 hash of the given text (GM)
    #[arg(long, value_name = "TEXT")]
    hash: Option<String>,

    /// Generate a key under the LMK (A0)
    #[arg(long)]
    a0: bool,

    /// Command following the header; <hex> runs are sent as raw bytes
    #[arg(long, value_name = "SPEC")]
    command: Option<String>,

    /// Header prepended to the command
    #[arg(long, default_value = DEFAULT_HEADER)]
    header: String,

    /// Run until interrupted
    #[arg(long)]
    forever: bool,

    /// Number of iterations
    #[arg(long, default_value = "1000")]
    times: u64,

    /// Transport
    #[arg(long, default_value = "tcp", value_parser = ["tcp", "udp", "tls"])]
    proto: String,

    /// PEM client certificate (tls)
    #[arg(long)]
    crtfile: Option<PathBuf>,

    /// PEM PKCS#8 client private key (tls)
    #[arg(long)]
    keyfile: Option<PathBuf>,

    /// PEM CA certificate of the appliance (tls)
    #[arg(long)]
    cafile: Option<PathBuf>,

    /// Decode reply payloads
    #[arg(long)]
    decode: bool,

    /// Connect and read timeout in milliseconds, 0 waits forever
    #[arg(long, default_value = "0")]
    timeout_ms: u64,
}

impl Args {
    fn preset(&self) -> Option<Preset> {
        let preset = if self.nc {
            Preset::Diagnostics
        } else if self.no {
            Preset::Status
        } else if self.j2 {
            Preset::Loading
        } else if self.j4 {
            Preset::CommandVolumes
        } else if self.j8 {
            Preset::HealthCounts
        } else if self.jk {
            Preset::HealthStatus
        } else if self.randgen {
            Preset::Random
        } else if let Some(data) = &self.echo {
            Preset::Echo(data.clone())
        } else if let Some(data) = &self.hash {
            Preset::Hash(data.clone())
        } else if self.a0 {
            Preset::GenerateKey
        } else if self.command.is_some() {
            return None;
        } else if self.key.as_deref() == Some("4096") {
            Preset::GenerateRsa(RsaKeyLength::Bits4096)
        } else {
            Preset::GenerateRsa(RsaKeyLength::Bits2048)
        };
        Some(preset)
    }

    fn into_config(self) -> Result<Config, ProbeError> {
        let protocol: Protocol = self.proto.parse()?;
        let port = self.port.unwrap_or(match protocol {
            Protocol::Tls => DEFAULT_PORT + TLS_PORT_OFFSET,
            Protocol::Tcp | Protocol::Udp => DEFAULT_PORT,
        });
        let iterations = if self.forever {
            Iterations::Forever
        } else {
            Iterations::Count(self.times)
        };
        let timeout = (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms));

        let mut builder = Config::builder()
            .host(&self.host)
            .port(port)
            .protocol(protocol)
            .header(&self.header)
            .decode(self.decode)
            .iterations(iterations)
            .connect_timeout(timeout)
            .io_timeout(timeout);

        builder = match self.preset() {
            Some(preset) => builder.preset(&preset),
            None => {
                let spec = self.command.as_deref().unwrap_or_default();
                builder.command(CommandSpec::escaped_after(&self.header, spec))
            }
        };

        if protocol == Protocol::Tls {
            match (self.crtfile, self.keyfile) {
                (Some(cert_path), Some(key_path)) => {
                    builder = builder.tls(TlsConfig {
                        cert_path,
                        key_path,
                        ca_path: self.cafile,
                    });
                }
                _ => {
                    return Err(ProbeError::Config(
                        "--proto tls needs both --crtfile and --keyfile".to_string(),
                    ))
                }
            }
        }

        let config = builder.build();
        config.validate()?;
        Ok(config)
    }
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hsmprobe=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let args = Args::parse();

    tracing::info!("hsmprobe v{}", hsmprobe::VERSION);

    let config = match args.into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(2);
        }
    };

    tracing::info!(
        "Target {}:{} over {}, command {}",
        config.host,
        config.port,
        config.protocol,
        config.command.as_str()
    );

    let client = match Client::connect(&config) {
        Ok(client) => client,
        Err(e) => {
            tracing::error!("Failed to prepare command: {}", e);
            std::process::exit(2);
        }
    };

    let harness = Harness::new(config.iterations);

    // First Ctrl+C stops after the current iteration, the second exits.
    let stop = harness.stop_handle();
    if let Err(e) = ctrlc::set_handler(move || {
        if stop.swap(true, Ordering::Relaxed) {
            std::process::exit(130);
        }
        tracing::info!("Received Ctrl+C, stopping after the current iteration");
    }) {
        tracing::warn!("Could not install Ctrl+C handler: {}", e);
    }

    let summary = harness.run(|iteration| {
        let result = client.exchange();
        match &result {
            Ok(exchange) => print!("{}", exchange),
            Err(e) => println!("Iteration failed: {}", e),
        }
        println!("Iteration: {}", iteration);
        println!();
        result
    });

    println!("{}", summary);
    if summary.failed > 0 && summary.failed == summary.iterations {
        std::process::exit(1);
    }
}
