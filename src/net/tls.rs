//! TLS certificate and key loading for the proxied listener.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

/// Load the rustls config from PEM files. Missing files are reported up
/// front with their paths instead of surfacing as opaque parse errors.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> std::io::Result<RustlsConfig> {
    if !cert_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("certificate file not found: {}", cert_path.display()),
        ));
    }
    if !key_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("private key file not found: {}", key_path.display()),
        ));
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}
