//! Instant Cert - On-demand Self-Signed Certificates
//!
//! Issues a throwaway self-signed TLS certificate and its private key for every
//! request, and returns both as one PEM text blob.
//!
//! # Overview
//!
//! ```text
//! generate_key_pair (RSA-2048)
//!   └── build_template (subject, 128-bit serial, 1 hour validity, CA flags)
//!       └── self_sign (SHA-256 with RSA, DER re-parse, PEM)
//!           └── compose_bundle (certificate PEM + RSA PRIVATE KEY PEM)
//! ```
//!
//! Every certificate:
//! - is self-signed, with identical subject and issuer
//! - has `O=Trust {user}, LLC.`, `ST=IL`, `L=Chicago`, `C=US`, `CN={domain}`
//! - is a CA (`keyCertSign`, `digitalSignature`) usable for `serverAuth` and `clientAuth`
//! - lists `127.0.0.1` as its only subject alternative name
//! - is valid for exactly one hour from creation
//!
//! No key or certificate outlives the call that created it.
//!
//! # Example
//!
//! ```no_run
//! use instant_cert::generate_certificate;
//!
//! let bundle = generate_certificate("alice", "example.com")?;
//! assert!(bundle.text.starts_with("-----BEGIN CERTIFICATE-----"));
//! println!("{}", serde_json::to_string(&bundle)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Serving
//!
//! [`webserver`] exposes the same operation over HTTP: `GET /?text=...&user_name=...`
//! or a form-encoded `POST /` answers with `{"text": "..."}`. The domain is taken
//! from `<http://domain|...>` markup in `text` (see [`request`]).

pub mod bundle;
pub mod configs;
pub mod error;
pub mod issuer;
pub mod keygen;
pub mod request;
pub mod signer;
pub mod template;
pub mod webserver;

pub use bundle::CertBundle;
pub use error::{CertError, Result};
pub use issuer::generate_certificate;
