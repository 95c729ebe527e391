//! Certificate Issuing Pipeline
//!
//! Runs the four generation stages in order and hands back a [`CertBundle`]:
//!
//! ```text
//! generate_key_pair → build_template → self_sign → compose_bundle
//! ```
//!
//! Any stage failing aborts the attempt with that stage's
//! [`CertError`](crate::error::CertError). There
//! is no retry and no partial bundle. Nothing is cached between calls, so two
//! calls with the same arguments always yield different keys and serials.

use crate::bundle::{compose_bundle, CertBundle};
use crate::error::Result;
use crate::keygen::generate_key_pair;
use crate::signer::self_sign;
use crate::template::build_template;
use log::debug;

/// Issue a fresh self-signed root certificate for `domain`, owned by `user`
///
/// Synchronous and CPU bound (RSA key generation dominates). Async callers
/// should run it on a blocking thread.
pub fn generate_certificate(user: &str, domain: &str) -> Result<CertBundle> {
    let key_pair = generate_key_pair()?;
    debug!("Generated {}-bit RSA key pair", key_pair.bits());

    let template = build_template(user, domain)?;
    debug!(
        "Built certificate template for CN={} serial={}",
        template.subject.common_name, template.serial_number
    );

    let certificate_pem = self_sign(&template, &key_pair)?;
    debug!("Self-signed certificate for CN={}", template.subject.common_name);

    Ok(compose_bundle(certificate_pem, &key_pair))
}
