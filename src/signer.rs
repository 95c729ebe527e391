//! Self-Signing Module
//!
//! Turns a [`CertificateTemplate`] into an X.509v3 certificate signed by the
//! template's own key pair, so issuer and subject are identical.
//!
//! ```text
//! CertificateTemplate + KeyPair
//!   └── sign (SHA-256 with RSA) → DER
//!       └── re-parse DER → PEM ("CERTIFICATE")
//! ```
//!
//! The re-parse is a structural check on our own output. It is not a trust
//! decision and should never fail for a template produced by
//! [`crate::template::build_template`].

use crate::error::{CertError, Result};
use crate::keygen::KeyPair;
use crate::template::{CertificateTemplate, ExtendedKeyUsageFlag, KeyUsageFlag, SubjectName};
use openssl::asn1::{Asn1Time, Asn1Type};
use openssl::error::ErrorStack;
use openssl::nid::Nid;
use openssl::x509::extension::{
    BasicConstraints, ExtendedKeyUsage, KeyUsage, SubjectAlternativeName, SubjectKeyIdentifier,
};
use openssl::x509::{X509Name, X509};

const X509_VERSION_3: i32 = 2; // X509 version 3 is represented by 2

fn signing_err(context: &'static str) -> impl Fn(ErrorStack) -> CertError {
    move |e| CertError::Signing(format!("{}: {}", context, e))
}

/// Sign `template` with `key_pair` and return the certificate as PEM
///
/// # Errors
/// - [`CertError::Signing`] if any certificate field is rejected by the
///   encoder or the signature cannot be produced
/// - [`CertError::Parse`] if the signed DER does not parse back
pub fn self_sign(template: &CertificateTemplate, key_pair: &KeyPair) -> Result<String> {
    let der = sign_der(template, key_pair)?;
    encode_certificate_pem(&der)
}

/// Sign `template` with `key_pair`, returning the DER-encoded certificate
pub fn sign_der(template: &CertificateTemplate, key_pair: &KeyPair) -> Result<Vec<u8>> {
    let private_key = key_pair.private_key();

    let mut builder = X509::builder().map_err(signing_err("Failed to create X509 builder"))?;
    builder
        .set_version(X509_VERSION_3)
        .map_err(signing_err("Failed to set version"))?;

    let serial = template
        .serial_number
        .to_asn1_integer()
        .map_err(signing_err("Failed to encode serial number"))?;
    builder
        .set_serial_number(&serial)
        .map_err(signing_err("Failed to set serial number"))?;

    // Self-signed: the same name is both subject and issuer
    let name = build_name(&template.subject)?;
    builder
        .set_subject_name(&name)
        .map_err(signing_err("Failed to set subject"))?;
    builder
        .set_issuer_name(&name)
        .map_err(signing_err("Failed to set issuer"))?;

    let not_before =
        Asn1Time::from_unix(template.not_before).map_err(signing_err("Failed to create not_before"))?;
    builder
        .set_not_before(&not_before)
        .map_err(signing_err("Failed to set not_before"))?;
    let not_after =
        Asn1Time::from_unix(template.not_after).map_err(signing_err("Failed to create not_after"))?;
    builder
        .set_not_after(&not_after)
        .map_err(signing_err("Failed to set not_after"))?;

    builder
        .set_pubkey(private_key)
        .map_err(signing_err("Failed to set public key"))?;

    if template.basic_constraints_valid {
        let mut bc = BasicConstraints::new();
        bc.critical();
        if template.is_ca {
            bc.ca();
        }
        let extension = bc
            .build()
            .map_err(signing_err("Failed to build BasicConstraints"))?;
        builder
            .append_extension(extension)
            .map_err(signing_err("Failed to add BasicConstraints"))?;
    }

    if !template.key_usage.is_empty() {
        let mut ku = KeyUsage::new();
        ku.critical();
        for flag in &template.key_usage {
            match flag {
                KeyUsageFlag::CertSign => {
                    ku.key_cert_sign();
                }
                KeyUsageFlag::DigitalSignature => {
                    ku.digital_signature();
                }
            }
        }
        let extension = ku.build().map_err(signing_err("Failed to build KeyUsage"))?;
        builder
            .append_extension(extension)
            .map_err(signing_err("Failed to add KeyUsage"))?;
    }

    if !template.extended_key_usage.is_empty() {
        let mut eku = ExtendedKeyUsage::new();
        for flag in &template.extended_key_usage {
            match flag {
                ExtendedKeyUsageFlag::ServerAuth => {
                    eku.server_auth();
                }
                ExtendedKeyUsageFlag::ClientAuth => {
                    eku.client_auth();
                }
            }
        }
        let extension = eku
            .build()
            .map_err(signing_err("Failed to build ExtendedKeyUsage"))?;
        builder
            .append_extension(extension)
            .map_err(signing_err("Failed to add ExtendedKeyUsage"))?;
    }

    if !template.ip_addresses.is_empty() {
        let mut san = SubjectAlternativeName::new();
        for ip in &template.ip_addresses {
            san.ip(&ip.to_string());
        }
        let extension = san
            .build(&builder.x509v3_context(None, None))
            .map_err(signing_err("Failed to build SubjectAlternativeName"))?;
        builder
            .append_extension(extension)
            .map_err(signing_err("Failed to add SubjectAlternativeName"))?;
    }

    if template.is_ca {
        let extension = SubjectKeyIdentifier::new()
            .build(&builder.x509v3_context(None, None))
            .map_err(signing_err("Failed to build SubjectKeyIdentifier"))?;
        builder
            .append_extension(extension)
            .map_err(signing_err("Failed to add SubjectKeyIdentifier"))?;
    }

    builder
        .sign(private_key, template.signature_algorithm.digest())
        .map_err(signing_err("Failed to sign certificate"))?;

    builder
        .build()
        .to_der()
        .map_err(signing_err("Failed to encode certificate"))
}

/// Re-parse `der` as a certificate and encode it as a `CERTIFICATE` PEM block
pub fn encode_certificate_pem(der: &[u8]) -> Result<String> {
    let certificate = X509::from_der(der)
        .map_err(|e| CertError::Parse(format!("Signed certificate does not parse: {}", e)))?;
    let pem = certificate
        .to_pem()
        .map_err(|e| CertError::Parse(format!("Failed to encode certificate PEM: {}", e)))?;
    String::from_utf8(pem)
        .map_err(|e| CertError::Parse(format!("Certificate PEM is not UTF-8: {}", e)))
}

// Typed entries bypass OpenSSL's X.520 size table, so CN and O take any length
fn build_name(subject: &SubjectName) -> Result<X509Name> {
    let mut name_builder =
        X509Name::builder().map_err(signing_err("Failed to create name builder"))?;
    name_builder
        .append_entry_by_nid_with_type(
            Nid::COUNTRYNAME,
            &subject.country,
            Asn1Type::PRINTABLESTRING,
        )
        .map_err(signing_err("Failed to set country"))?;
    name_builder
        .append_entry_by_nid_with_type(
            Nid::ORGANIZATIONNAME,
            &subject.organization,
            Asn1Type::UTF8STRING,
        )
        .map_err(signing_err("Failed to set organization"))?;
    name_builder
        .append_entry_by_nid_with_type(Nid::LOCALITYNAME, &subject.locality, Asn1Type::UTF8STRING)
        .map_err(signing_err("Failed to set locality"))?;
    name_builder
        .append_entry_by_nid_with_type(
            Nid::STATEORPROVINCENAME,
            &subject.province,
            Asn1Type::UTF8STRING,
        )
        .map_err(signing_err("Failed to set state/province"))?;
    name_builder
        .append_entry_by_nid_with_type(Nid::COMMONNAME, &subject.common_name, Asn1Type::UTF8STRING)
        .map_err(signing_err("Failed to set CN"))?;
    Ok(name_builder.build())
}
