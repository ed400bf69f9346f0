//! Single-certificate signing.
//!
//! [`sign_certificate`] turns one [`CertSpec`] into a signed certificate plus
//! a fresh key pair, either self-signed (no issuer) or signed by the issuer's
//! private key. This is the provider-facing half of chain construction; the
//! ordering logic lives in [`crate::chain`].

use std::str::FromStr;

use der::Encode;
use der::asn1::{BitString, UtcTime};
use time::{Duration, OffsetDateTime};
use x509_cert::Version;
use x509_cert::certificate::{CertificateInner, TbsCertificateInner};
use x509_cert::name::Name;
use x509_cert::serial_number::SerialNumber;
use x509_cert::spki::AlgorithmIdentifierOwned;
use x509_cert::time::{Time, Validity};

use crate::Result;
use crate::cert::extensions::{ExtensionContext, compile_extension};
use crate::cert::spec::CertSpec;
use crate::cert::{CertAndKey, Certificate};
use crate::error::CertsmithError;
use crate::key::KeyPair;

/// All certificates are signed with ECDSA over SHA-256.
fn ecdsa_with_sha256() -> AlgorithmIdentifierOwned {
    AlgorithmIdentifierOwned {
        oid: const_oid::db::rfc5912::ECDSA_WITH_SHA_256,
        parameters: None,
    }
}

/// Escape one attribute value for an RFC 4514 name string.
fn escape_rfc4514(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, c) in value.char_indices() {
        let leading = i == 0;
        let trailing = i + c.len_utf8() == value.len();
        match c {
            '"' | '+' | ',' | ';' | '<' | '>' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            '#' | ' ' if leading => {
                out.push('\\');
                out.push(c);
            }
            ' ' if trailing => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

fn attribute_key(field: &str) -> Result<&'static str> {
    Ok(match field {
        "countryName" | "C" => "C",
        "stateOrProvinceName" | "ST" => "ST",
        "localityName" | "L" => "L",
        "organizationName" | "O" => "O",
        "organizationalUnitName" | "OU" => "OU",
        "commonName" | "CN" => "CN",
        other => {
            return Err(CertsmithError::invalid(format!(
                "unsupported subject field: {other}"
            )));
        }
    })
}

/// Build an X.509 name from ordered `(field, value)` pairs.
///
/// Pairs are given in encoding order (least specific first); RFC 4514 strings
/// list attributes most specific first, so the pairs are reversed before
/// parsing.
pub(crate) fn name_from_fields(fields: &[(String, String)]) -> Result<Name> {
    if fields.is_empty() {
        return Err(CertsmithError::invalid("subject requires at least one field"));
    }
    let rfc4514 = fields
        .iter()
        .rev()
        .map(|(field, value)| Ok(format!("{}={}", attribute_key(field)?, escape_rfc4514(value))))
        .collect::<Result<Vec<_>>>()?
        .join(",");
    Name::from_str(&rfc4514)
        .map_err(|e| CertsmithError::invalid(format!("malformed subject name {rfc4514:?}: {e}")))
}

/// Encode a serial number as a positive DER integer.
fn serial_number(value: u64) -> Result<SerialNumber> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len() - 1);
    let mut trimmed = Vec::with_capacity(9);
    // keep the integer positive
    if bytes[start] & 0x80 != 0 {
        trimmed.push(0);
    }
    trimmed.extend_from_slice(&bytes[start..]);
    SerialNumber::new(&trimmed).map_err(|e| CertsmithError::provider("encode serial number", e))
}

fn validity(offset_not_before: i64, offset_not_after: i64) -> Result<Validity> {
    let now = OffsetDateTime::now_utc().replace_nanosecond(0).map_err(|e| {
        CertsmithError::provider("truncate validity timestamp", e)
    })?;
    let utc_time = |offset: i64| -> Result<Time> {
        let at = now + Duration::seconds(offset);
        UtcTime::from_system_time(at.into())
            .map(Time::UtcTime)
            .map_err(|e| CertsmithError::provider("encode validity timestamp", e))
    };
    Ok(Validity {
        not_before: utc_time(offset_not_before)?,
        not_after: utc_time(offset_not_after)?,
    })
}

/// Sign one certificate described by `spec`.
///
/// With `issuer` absent the certificate is self-signed: issuer name equals
/// subject name and the fresh subject key signs its own certificate. With an
/// issuer, the issuer's subject becomes this certificate's issuer name and
/// the issuer's private key signs it. Any provider failure aborts the whole
/// operation; no partial result is returned.
pub fn sign_certificate(spec: &CertSpec, issuer: Option<&CertAndKey>) -> Result<CertAndKey> {
    let subject_key = KeyPair::generate();
    let subject_spki = subject_key.subject_public_key_info()?;
    let subject = name_from_fields(&spec.subject_name)?;
    let issuer_name = match issuer {
        Some(ca) => ca.cert.subject().clone(),
        None => subject.clone(),
    };
    let serial = serial_number(spec.serial_number)?;

    let ctx = ExtensionContext {
        subject_spki: &subject_spki,
        subject_name: &subject,
        subject_serial: &serial,
        issuer: issuer.map(|ca| &ca.cert.inner),
    };
    let extensions = spec
        .extensions
        .iter()
        .map(|(field, value)| compile_extension(field, value, &ctx))
        .collect::<Result<Vec<_>>>()?;

    let tbs_certificate = TbsCertificateInner {
        version: Version::V3,
        serial_number: serial,
        signature: ecdsa_with_sha256(),
        issuer: issuer_name,
        validity: validity(spec.offset_not_before, spec.offset_not_after)?,
        subject,
        subject_public_key_info: subject_spki,
        issuer_unique_id: None,
        subject_unique_id: None,
        extensions: Some(extensions),
    };

    let tbs_der = tbs_certificate
        .to_der()
        .map_err(|e| CertsmithError::provider("encode TBS certificate", e))?;
    let signing_key = match issuer {
        Some(ca) => &ca.key,
        None => &subject_key,
    };
    let signature = BitString::from_bytes(&signing_key.sign_data(&tbs_der))
        .map_err(|e| CertsmithError::provider("encode certificate signature", e))?;

    Ok(CertAndKey {
        cert: Certificate {
            inner: CertificateInner {
                tbs_certificate,
                signature_algorithm: ecdsa_with_sha256(),
                signature,
            },
        },
        key: subject_key,
    })
}
