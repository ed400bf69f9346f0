//! Compilation of extension configuration strings into X.509 extensions.
//!
//! Spec builders describe extensions as `(name, value)` string pairs in the
//! conventional OpenSSL syntax, e.g. `("keyUsage", "critical, digitalSignature,
//! keyCertSign")`. This module is the only place those strings are
//! interpreted: each pair is compiled into a DER-encoded
//! [`x509_cert::ext::Extension`] against the subject/issuer context of the
//! certificate being signed.

use const_oid::AssociatedOid;
use der::Encode;
use der::asn1::OctetString;
use der::flagset::FlagSet;
use sha1::{Digest, Sha1};
use x509_cert::certificate::CertificateInner;
use x509_cert::ext::Extension;
use x509_cert::ext::pkix::name::GeneralName;
use x509_cert::ext::pkix::{
    AuthorityKeyIdentifier, BasicConstraints, ExtendedKeyUsage, KeyUsage, KeyUsages,
    SubjectKeyIdentifier,
};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::SubjectPublicKeyInfoOwned;

use crate::Result;
use crate::error::CertsmithError;

/// The certificate context an extension expression is resolved against.
///
/// `subjectKeyIdentifier = hash` hashes the subject's public key;
/// `authorityKeyIdentifier = keyid, issuer` references the issuer certificate,
/// or the subject itself when the certificate is self-signed (`issuer` is
/// `None`).
pub struct ExtensionContext<'a> {
    pub subject_spki: &'a SubjectPublicKeyInfoOwned,
    pub subject_name: &'a Name,
    pub subject_serial: &'a SerialNumber,
    pub issuer: Option<&'a CertificateInner>,
}

/// RFC 5280 method-1 key identifier: SHA-1 over the public key bits.
fn key_identifier(spki: &SubjectPublicKeyInfoOwned) -> Vec<u8> {
    Sha1::digest(spki.subject_public_key.raw_bytes()).to_vec()
}

/// Compile one `(field, value)` pair into an encoded extension.
///
/// A leading `critical` token marks the extension critical. Unknown extension
/// names and unknown value tokens are invalid-input faults; DER encoding
/// failures surface as provider faults.
pub fn compile_extension(field: &str, value: &str, ctx: &ExtensionContext<'_>) -> Result<Extension> {
    let mut tokens: Vec<&str> = value.split(',').map(str::trim).collect();
    let critical = tokens.first() == Some(&"critical");
    if critical {
        tokens.remove(0);
    }

    let (extn_id, der_value) = match field {
        "basicConstraints" => (BasicConstraints::OID, basic_constraints(&tokens)?),
        "keyUsage" => (KeyUsage::OID, key_usage(&tokens)?),
        "extendedKeyUsage" => (ExtendedKeyUsage::OID, extended_key_usage(&tokens)?),
        "subjectKeyIdentifier" => (SubjectKeyIdentifier::OID, subject_key_id(&tokens, ctx)?),
        "authorityKeyIdentifier" => (
            AuthorityKeyIdentifier::OID,
            authority_key_id(&tokens, ctx)?,
        ),
        other => {
            return Err(CertsmithError::invalid(format!(
                "unsupported extension: {other}"
            )));
        }
    };

    Ok(Extension {
        extn_id,
        critical,
        extn_value: OctetString::new(der_value)
            .map_err(|e| CertsmithError::provider("wrap extension value", e))?,
    })
}

fn basic_constraints(tokens: &[&str]) -> Result<Vec<u8>> {
    let ca = match tokens {
        ["CA:TRUE"] => true,
        ["CA:FALSE"] => false,
        _ => {
            return Err(CertsmithError::invalid(format!(
                "basicConstraints expects CA:TRUE or CA:FALSE, got {tokens:?}"
            )));
        }
    };
    BasicConstraints {
        ca,
        path_len_constraint: None,
    }
    .to_der()
    .map_err(|e| CertsmithError::provider("encode basicConstraints", e))
}

fn key_usage(tokens: &[&str]) -> Result<Vec<u8>> {
    let mut flags: FlagSet<KeyUsages> = FlagSet::empty();
    for token in tokens {
        flags |= match *token {
            "digitalSignature" => KeyUsages::DigitalSignature,
            "nonRepudiation" => KeyUsages::NonRepudiation,
            "keyEncipherment" => KeyUsages::KeyEncipherment,
            "dataEncipherment" => KeyUsages::DataEncipherment,
            "keyAgreement" => KeyUsages::KeyAgreement,
            "keyCertSign" => KeyUsages::KeyCertSign,
            "cRLSign" => KeyUsages::CRLSign,
            "encipherOnly" => KeyUsages::EncipherOnly,
            "decipherOnly" => KeyUsages::DecipherOnly,
            other => {
                return Err(CertsmithError::invalid(format!(
                    "unknown keyUsage bit: {other}"
                )));
            }
        };
    }
    if flags.is_empty() {
        return Err(CertsmithError::invalid("keyUsage requires at least one bit"));
    }
    KeyUsage(flags)
        .to_der()
        .map_err(|e| CertsmithError::provider("encode keyUsage", e))
}

fn extended_key_usage(tokens: &[&str]) -> Result<Vec<u8>> {
    let mut purposes = Vec::with_capacity(tokens.len());
    for token in tokens {
        purposes.push(match *token {
            "serverAuth" => const_oid::db::rfc5912::ID_KP_SERVER_AUTH,
            "clientAuth" => const_oid::db::rfc5912::ID_KP_CLIENT_AUTH,
            "codeSigning" => const_oid::db::rfc5912::ID_KP_CODE_SIGNING,
            "emailProtection" => const_oid::db::rfc5912::ID_KP_EMAIL_PROTECTION,
            "timeStamping" => const_oid::db::rfc5912::ID_KP_TIME_STAMPING,
            "OCSPSigning" => const_oid::db::rfc5912::ID_KP_OCSP_SIGNING,
            other => {
                return Err(CertsmithError::invalid(format!(
                    "unknown extendedKeyUsage purpose: {other}"
                )));
            }
        });
    }
    if purposes.is_empty() {
        return Err(CertsmithError::invalid(
            "extendedKeyUsage requires at least one purpose",
        ));
    }
    ExtendedKeyUsage(purposes)
        .to_der()
        .map_err(|e| CertsmithError::provider("encode extendedKeyUsage", e))
}

fn subject_key_id(tokens: &[&str], ctx: &ExtensionContext<'_>) -> Result<Vec<u8>> {
    if tokens != ["hash"] {
        return Err(CertsmithError::invalid(format!(
            "subjectKeyIdentifier expects hash, got {tokens:?}"
        )));
    }
    let id = OctetString::new(key_identifier(ctx.subject_spki))
        .map_err(|e| CertsmithError::provider("encode subjectKeyIdentifier", e))?;
    SubjectKeyIdentifier(id)
        .to_der()
        .map_err(|e| CertsmithError::provider("encode subjectKeyIdentifier", e))
}

fn authority_key_id(tokens: &[&str], ctx: &ExtensionContext<'_>) -> Result<Vec<u8>> {
    let mut want_keyid = false;
    let mut want_issuer = false;
    for token in tokens {
        match *token {
            "keyid" | "keyid:always" => want_keyid = true,
            "issuer" | "issuer:always" => want_issuer = true,
            other => {
                return Err(CertsmithError::invalid(format!(
                    "unknown authorityKeyIdentifier option: {other}"
                )));
            }
        }
    }
    if !want_keyid && !want_issuer {
        return Err(CertsmithError::invalid(
            "authorityKeyIdentifier requires keyid and/or issuer",
        ));
    }

    // Self-signed certificates resolve "the issuer" to the subject itself.
    let (spki, name, serial) = match ctx.issuer {
        Some(cert) => (
            &cert.tbs_certificate.subject_public_key_info,
            &cert.tbs_certificate.subject,
            cert.tbs_certificate.serial_number.clone(),
        ),
        None => (ctx.subject_spki, ctx.subject_name, ctx.subject_serial.clone()),
    };

    let key_id = if want_keyid {
        Some(
            OctetString::new(key_identifier(spki))
                .map_err(|e| CertsmithError::provider("encode authorityKeyIdentifier", e))?,
        )
    } else {
        None
    };

    AuthorityKeyIdentifier {
        key_identifier: key_id,
        authority_cert_issuer: want_issuer.then(|| vec![GeneralName::DirectoryName(name.clone())]),
        authority_cert_serial_number: want_issuer.then_some(serial),
    }
    .to_der()
    .map_err(|e| CertsmithError::provider("encode authorityKeyIdentifier", e))
}
