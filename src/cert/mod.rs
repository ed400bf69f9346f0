//! Certificate representations.
//!
//! Signed certificates exist in two equivalent forms: the native in-memory
//! [`CertAndKey`] used while building a chain (where the issuer's parsed
//! certificate and private key are needed to sign the next level), and the
//! transportable [`CertAndKeyPem`] pair of PEM strings handed to the test
//! harness.

pub mod extensions;
pub mod spec;

use std::fmt;

use der::{Decode, DecodePem, Encode, EncodePem};
use time::OffsetDateTime;
use x509_cert::certificate::CertificateInner;
use x509_cert::name::Name;

use crate::Result;
use crate::error::CertsmithError;
use crate::key::KeyPair;

fn validity_time(time: &x509_cert::time::Time) -> OffsetDateTime {
    match time {
        x509_cert::time::Time::UtcTime(ut) => OffsetDateTime::from(ut.to_system_time()),
        x509_cert::time::Time::GeneralTime(gt) => OffsetDateTime::from(gt.to_system_time()),
    }
}

/// An X.509 certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    pub inner: CertificateInner,
}

impl Certificate {
    /// Encodes the certificate into DER format.
    pub fn to_der(&self) -> Result<Vec<u8>> {
        self.inner
            .to_der()
            .map_err(|e| CertsmithError::provider("encode certificate DER", e))
    }

    /// Encodes the certificate into PEM format.
    pub fn to_pem(&self) -> Result<String> {
        self.inner
            .to_pem(pkcs8::LineEnding::LF)
            .map_err(|e| CertsmithError::provider("encode certificate PEM", e))
    }

    /// Decodes a certificate from DER bytes.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let inner = CertificateInner::from_der(der)
            .map_err(|e| CertsmithError::provider("decode certificate DER", e))?;
        Ok(Certificate { inner })
    }

    /// Decodes a certificate from PEM text.
    pub fn from_pem(pem: &str) -> Result<Self> {
        let inner = CertificateInner::from_pem(pem.as_bytes())
            .map_err(|e| CertsmithError::provider("decode certificate PEM", e))?;
        Ok(Certificate { inner })
    }

    pub fn subject(&self) -> &Name {
        &self.inner.tbs_certificate.subject
    }

    pub fn issuer(&self) -> &Name {
        &self.inner.tbs_certificate.issuer
    }
}

impl fmt::Display for Certificate {
    /// Human-readable dump for diagnostics.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tbs = &self.inner.tbs_certificate;
        writeln!(f, "Certificate:")?;
        writeln!(f, "  Version: {:?}", tbs.version)?;
        write!(f, "  Serial: ")?;
        for byte in tbs.serial_number.as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        writeln!(f)?;
        writeln!(f, "  Issuer: {}", tbs.issuer)?;
        writeln!(f, "  Not Before: {}", validity_time(&tbs.validity.not_before))?;
        writeln!(f, "  Not After: {}", validity_time(&tbs.validity.not_after))?;
        writeln!(f, "  Subject: {}", tbs.subject)?;
        writeln!(
            f,
            "  Public Key Algorithm: {}",
            tbs.subject_public_key_info.algorithm.oid
        )?;
        writeln!(f, "  Signature Algorithm: {}", self.inner.signature_algorithm.oid)?;
        if let Some(extensions) = &tbs.extensions {
            writeln!(f, "  Extensions:")?;
            for ext in extensions {
                writeln!(
                    f,
                    "    {}{}",
                    ext.extn_id,
                    if ext.critical { " (critical)" } else { "" }
                )?;
            }
        }
        Ok(())
    }
}

/// A signed certificate together with its private key, in native form.
#[derive(Debug, Clone)]
pub struct CertAndKey {
    pub cert: Certificate,
    pub key: KeyPair,
}

impl CertAndKey {
    /// Serializes both halves to PEM.
    pub fn to_pem(&self) -> Result<CertAndKeyPem> {
        Ok(CertAndKeyPem {
            cert_pem: self.cert.to_pem()?,
            key_pem: self.key.to_pkcs8_pem()?,
        })
    }
}

/// A signed certificate together with its private key, PEM-encoded.
///
/// Invariant: certificate and key are either both present or both absent. The
/// all-empty value is meaningful (it stands for "no issuer", i.e. self-sign);
/// a half-populated value is a caller error and is rejected on use.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CertAndKeyPem {
    pub cert_pem: String,
    pub key_pem: String,
}

impl CertAndKeyPem {
    /// Builds an encoded pair, rejecting partial state.
    pub fn new(cert_pem: String, key_pem: String) -> Result<Self> {
        let pair = CertAndKeyPem { cert_pem, key_pem };
        if !pair.is_empty() && !pair.is_valid() {
            return Err(CertsmithError::invalid(
                "certificate and key must be both present or both absent",
            ));
        }
        Ok(pair)
    }

    /// Both halves absent: the "self-signed placeholder" state.
    pub fn is_empty(&self) -> bool {
        self.cert_pem.is_empty() && self.key_pem.is_empty()
    }

    /// Both halves present.
    pub fn is_valid(&self) -> bool {
        !self.cert_pem.is_empty() && !self.key_pem.is_empty()
    }

    /// Parses the encoded pair back into native form, e.g. to use an
    /// externally supplied root authority as an issuer.
    pub fn to_native(&self) -> Result<CertAndKey> {
        if !self.is_valid() {
            return Err(CertsmithError::invalid(
                "cannot decode a partial or empty certificate/key pair",
            ));
        }
        Ok(CertAndKey {
            cert: Certificate::from_pem(&self.cert_pem)?,
            key: KeyPair::from_pkcs8_pem(&self.key_pem)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_pem_pair_is_rejected() {
        let err = CertAndKeyPem::new("cert only".to_string(), String::new()).unwrap_err();
        assert!(matches!(err, CertsmithError::InvalidInput(_)));

        let partial = CertAndKeyPem {
            cert_pem: String::new(),
            key_pem: "key only".to_string(),
        };
        assert!(!partial.is_empty());
        assert!(!partial.is_valid());
        assert!(matches!(
            partial.to_native().unwrap_err(),
            CertsmithError::InvalidInput(_)
        ));
    }

    #[test]
    fn empty_pair_is_the_self_signed_placeholder() {
        let empty = CertAndKeyPem::default();
        assert!(empty.is_empty());
        assert!(!empty.is_valid());
        assert!(empty.to_native().is_err());
    }
}
