//! Certificate Template Module
//!
//! Builds the unsigned descriptor of a self-signed root certificate: subject
//! identity, a fresh random serial number, a one hour validity window and the
//! CA usage flags.
//!
//! # Template Properties
//! - **Serial Number**: uniformly random over `[0, 2^128)`
//! - **Subject**: `O=Trust {user}, LLC.`, `ST=IL`, `L=Chicago`, `C=US`, `CN={domain}`
//! - **Signature Algorithm**: SHA-256 with RSA
//! - **Validity**: `not_before` = now, `not_after` = `not_before` + 1 hour
//! - **Basic Constraints**: CA=true
//! - **Key Usage**: keyCertSign, digitalSignature
//! - **Extended Key Usage**: serverAuth, clientAuth
//! - **Subject Alternative Name**: IP `127.0.0.1`
//!
//! Neither `user` nor `domain` is validated or escaped here.
//!
//! # Example
//! ```rust,no_run
//! # use instant_cert::template::build_template;
//! # fn example() -> instant_cert::error::Result<()> {
//! let template = build_template("alice", "example.com")?;
//! assert_eq!(template.subject.organization, "Trust alice, LLC.");
//! # Ok(())
//! # }
//! ```

use crate::error::{CertError, Result};
use openssl::bn::{BigNum, MsbOption};
use openssl::hash::MessageDigest;
use std::net::{IpAddr, Ipv4Addr};
use std::time::{SystemTime, UNIX_EPOCH};

const SERIAL_NUMBER_BITS: i32 = 128;
/// Length of every certificate's validity window, in seconds
pub const VALIDITY_SECS: i64 = 60 * 60;

const SUBJECT_PROVINCE: &str = "IL";
const SUBJECT_LOCALITY: &str = "Chicago";
const SUBJECT_COUNTRY: &str = "US";

/// Distinguished name fields of the subject (and, being self-signed, the issuer)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectName {
    pub organization: String,
    pub province: String,
    pub locality: String,
    pub country: String,
    pub common_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Sha256WithRsa,
}

impl SignatureAlgorithm {
    pub(crate) fn digest(self) -> MessageDigest {
        match self {
            SignatureAlgorithm::Sha256WithRsa => MessageDigest::sha256(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyUsageFlag {
    CertSign,
    DigitalSignature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedKeyUsageFlag {
    ServerAuth,
    ClientAuth,
}

/// Unsigned certificate descriptor
#[derive(Debug)]
pub struct CertificateTemplate {
    pub serial_number: BigNum,
    pub subject: SubjectName,
    pub signature_algorithm: SignatureAlgorithm,
    /// Seconds since the Unix epoch
    pub not_before: i64,
    /// Seconds since the Unix epoch
    pub not_after: i64,
    pub basic_constraints_valid: bool,
    pub is_ca: bool,
    pub key_usage: Vec<KeyUsageFlag>,
    pub extended_key_usage: Vec<ExtendedKeyUsageFlag>,
    pub ip_addresses: Vec<IpAddr>,
}

/// Builder for the self-signed root certificate template
///
/// Only the two caller-supplied identity strings are settable; everything
/// else is fixed.
pub struct RootTemplateBuilder {
    user: String,
    domain: String,
}

impl RootTemplateBuilder {
    pub fn new() -> Self {
        Self {
            user: String::new(),
            domain: String::new(),
        }
    }

    /// Set the user embedded in the organization (O) as `Trust {user}, LLC.`
    pub fn user(mut self, user: &str) -> Self {
        self.user = user.to_string();
        self
    }

    /// Set the domain used verbatim as the common name (CN)
    pub fn domain(mut self, domain: &str) -> Self {
        self.domain = domain.to_string();
        self
    }

    /// Draw a serial number, stamp the validity window and assemble the template
    ///
    /// # Errors
    /// Returns [`CertError::SerialGeneration`] if the random serial cannot be drawn.
    pub fn build(self) -> Result<CertificateTemplate> {
        let serial_number = random_serial_number()?;

        let not_before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64;
        let not_after = not_before + VALIDITY_SECS;

        Ok(CertificateTemplate {
            serial_number,
            subject: SubjectName {
                organization: format!("Trust {}, LLC.", self.user),
                province: SUBJECT_PROVINCE.to_string(),
                locality: SUBJECT_LOCALITY.to_string(),
                country: SUBJECT_COUNTRY.to_string(),
                common_name: self.domain,
            },
            signature_algorithm: SignatureAlgorithm::Sha256WithRsa,
            not_before,
            not_after,
            basic_constraints_valid: true,
            is_ca: true,
            key_usage: vec![KeyUsageFlag::CertSign, KeyUsageFlag::DigitalSignature],
            extended_key_usage: vec![
                ExtendedKeyUsageFlag::ServerAuth,
                ExtendedKeyUsageFlag::ClientAuth,
            ],
            ip_addresses: vec![IpAddr::V4(Ipv4Addr::LOCALHOST)],
        })
    }
}

impl Default for RootTemplateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the root certificate template for `user` and `domain`
pub fn build_template(user: &str, domain: &str) -> Result<CertificateTemplate> {
    RootTemplateBuilder::new().user(user).domain(domain).build()
}

fn random_serial_number() -> Result<BigNum> {
    let mut serial = BigNum::new()
        .map_err(|e| CertError::SerialGeneration(format!("Failed to allocate serial: {}", e)))?;
    // MAYBE_ZERO keeps the top bit free so the draw is uniform over [0, 2^128)
    serial
        .rand(SERIAL_NUMBER_BITS, MsbOption::MAYBE_ZERO, false)
        .map_err(|e| CertError::SerialGeneration(format!("Failed to generate serial number: {}", e)))?;
    Ok(serial)
}
