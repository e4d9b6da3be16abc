//! TLS configuration for the price API client.
//!
//! By default the client trusts the bundled webpki root set. When a CA file
//! is configured, the root store contains only the certificates from that
//! PEM file, pinning the API's chain to it.

use std::path::Path;

use rustls::{ClientConfig, RootCertStore};

use crate::Result;

/// Builds a [`ClientConfig`] trusting either the webpki roots or, when
/// `ca_pem` is given, only the certificates in that file.
///
/// # Errors
///
/// Returns [`TokenChartError::Tls`](crate::TokenChartError::Tls) if the file
/// cannot be read, is not valid PEM, or holds no usable certificate.
pub fn build_tls_config(ca_pem: Option<&Path>) -> Result<ClientConfig> {
    let root_store = match ca_pem {
        Some(path) => pinned_roots(path)?,
        None => RootCertStore {
            roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
        },
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    Ok(config)
}

/// Loads a root store holding only the certificates found in `path`.
fn pinned_roots(path: &Path) -> Result<RootCertStore> {
    let pem = std::fs::read(path).map_err(|e| {
        crate::TokenChartError::Tls(format!("failed to read {}: {e}", path.display()))
    })?;

    let certs: Vec<_> = rustls_pemfile::certs(&mut pem.as_slice())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| crate::TokenChartError::Tls(format!("failed to parse CA PEM: {e}")))?;

    let mut root_store = RootCertStore::empty();
    let (added, _ignored) = root_store.add_parsable_certificates(certs);
    if added == 0 {
        return Err(crate::TokenChartError::Tls(format!(
            "no usable certificate in {}",
            path.display()
        )));
    }

    Ok(root_store)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_config_uses_webpki_roots() {
        assert!(build_tls_config(None).is_ok());
    }

    #[test]
    fn missing_ca_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = build_tls_config(Some(&dir.path().join("absent.pem"))).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn ca_file_without_certificates_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not a certificate").unwrap();

        let err = build_tls_config(Some(file.path())).unwrap_err();
        assert!(matches!(err, crate::TokenChartError::Tls(_)));
    }
}
