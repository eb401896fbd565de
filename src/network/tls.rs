//! TLS client setup
//!
//! Builds one connector per run from the configured credential files.
//!
//! ## Negotiation
//! - TLS 1.2 or later
//! - TLS 1.2: forward-secret ECDHE/DHE suites with AES-GCM or AES-CBC only
//! - TLS 1.3: the AES-GCM suites
//!
//! Private keys are accepted in PKCS#8 or traditional PKCS#1 PEM.

use std::fs;
use std::path::Path;

use openssl::pkey::PKey;
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode, SslVersion};
use openssl::x509::store::X509StoreBuilder;
use openssl::x509::X509;

use crate::config::TlsConfig;
use crate::error::{ProbeError, Result};

/// TLS 1.2 suites offered to the appliance
const CIPHER_LIST: &str = "ECDHE+AESGCM:DHE+AESGCM:ECDHE+AES:DHE+AES:\
                           !aNULL:!eNULL:!EXPORT:!DES:!RC4:!3DES:!MD5:!PSK";

/// TLS 1.3 suites offered to the appliance
const TLS13_CIPHERSUITES: &str = "TLS_AES_256_GCM_SHA384:TLS_AES_128_GCM_SHA256";

fn read_pem(what: &str, path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| {
        ProbeError::Config(format!("cannot read {} {}: {}", what, path.display(), e))
    })
}

/// Build a connector presenting the client certificate in `tls`
pub fn build_connector(tls: &TlsConfig) -> Result<SslConnector> {
    let cert = X509::from_pem(&read_pem("certificate", &tls.cert_path)?)?;
    let key = PKey::private_key_from_pem(&read_pem("private key", &tls.key_path)?)?;

    let mut builder = SslConnector::builder(SslMethod::tls_client())?;
    builder.set_min_proto_version(Some(SslVersion::TLS1_2))?;
    builder.set_cipher_list(CIPHER_LIST)?;
    builder.set_ciphersuites(TLS13_CIPHERSUITES)?;
    builder.set_certificate(&cert)?;
    builder.set_private_key(&key)?;
    builder.check_private_key()?;

    match &tls.ca_path {
        Some(ca_path) => {
            let ca = X509::from_pem(&read_pem("CA certificate", ca_path)?)?;
            let mut store = X509StoreBuilder::new()?;
            store.add_cert(ca)?;
            builder.set_cert_store(store.build());
        }
        None => {
            tracing::warn!("No CA certificate given, the appliance certificate will not be verified");
            builder.set_verify(SslVerifyMode::NONE);
        }
    }

    Ok(builder.build())
}
