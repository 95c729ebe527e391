//! Error types for certificate generation.
//!
//! Every stage of the pipeline maps its OpenSSL failure onto exactly one
//! variant, so callers can tell which stage aborted a generation attempt.

use thiserror::Error;

/// Errors produced while issuing a self-signed certificate.
#[derive(Error, Debug)]
pub enum CertError {
    /// RSA key pair generation or key encoding failed
    #[error("Key generation error: {0}")]
    KeyGeneration(String),

    /// Random serial number could not be drawn
    #[error("Serial number generation error: {0}")]
    SerialGeneration(String),

    /// Building or signing the certificate failed
    #[error("Signing error: {0}")]
    Signing(String),

    /// Signed output did not parse back as a certificate
    #[error("Parse error: {0}")]
    Parse(String),
}

/// A specialized Result type for certificate generation.
pub type Result<T> = std::result::Result<T, CertError>;
