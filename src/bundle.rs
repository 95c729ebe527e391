//! Certificate bundle returned to callers.

use crate::keygen::KeyPair;
use serde::{Deserialize, Serialize};

/// Certificate PEM immediately followed by the PKCS#1 private key PEM
///
/// Serializes as `{"text": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertBundle {
    pub text: String,
}

/// Append the private key PEM to `certificate_pem`
///
/// No separator is added; each PEM block already ends with a newline.
pub fn compose_bundle(certificate_pem: String, key_pair: &KeyPair) -> CertBundle {
    let mut text = certificate_pem;
    text.push_str(key_pair.private_key_pem());
    CertBundle { text }
}
