//! RSA Key Pair Generation Module
//!
//! Produces the fresh RSA-2048 key pair that each certificate request signs
//! itself with. Keys come from OpenSSL's process-wide CSPRNG, which is safe to
//! use from many threads at once.
//!
//! The PKCS#1 PEM encoding of the private key is produced here, while the key
//! is created, so that later stages only ever handle already-encoded text.

use crate::error::{CertError, Result};
use openssl::pkey::{PKey, Private};
use openssl::rsa::Rsa;
use std::fmt;

/// Modulus size of every generated key, in bits
pub const RSA_KEY_SIZE: u32 = 2048;

/// An RSA private/public key pair owned by a single generation request
///
/// The key pair is never persisted and never shared between requests. Its
/// `Debug` output does not contain key material.
pub struct KeyPair {
    private_key: PKey<Private>,
    private_key_pem: String,
}

impl KeyPair {
    /// The private key, which also carries the public half
    pub fn private_key(&self) -> &PKey<Private> {
        &self.private_key
    }

    /// The private key as a PKCS#1 `RSA PRIVATE KEY` PEM block
    pub fn private_key_pem(&self) -> &str {
        &self.private_key_pem
    }

    /// Modulus size in bits
    pub fn bits(&self) -> u32 {
        self.private_key.bits()
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("bits", &self.bits())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Generate a fresh RSA-2048 key pair
///
/// Each call is statistically independent of every other call.
///
/// # Errors
/// Returns [`CertError::KeyGeneration`] if the random source fails or the
/// key cannot be constructed or encoded.
pub fn generate_key_pair() -> Result<KeyPair> {
    let rsa = Rsa::generate(RSA_KEY_SIZE)
        .map_err(|e| CertError::KeyGeneration(format!("Failed to generate RSA keypair: {}", e)))?;

    // PEM_write_RSAPrivateKey emits the traditional PKCS#1 form
    let pem = rsa
        .private_key_to_pem()
        .map_err(|e| CertError::KeyGeneration(format!("Failed to encode private key: {}", e)))?;
    let private_key_pem = String::from_utf8(pem)
        .map_err(|e| CertError::KeyGeneration(format!("Private key PEM is not UTF-8: {}", e)))?;

    let private_key = PKey::from_rsa(rsa)
        .map_err(|e| CertError::KeyGeneration(format!("Failed to create private key: {}", e)))?;

    Ok(KeyPair {
        private_key,
        private_key_pem,
    })
}
