//! Elliptic-curve key pairs for certificate generation.
//!
//! Every certificate in a chain gets a fresh P-256 key pair; keys are never
//! shared between chain levels. Keys can be exported as PKCS#8 PEM (for the
//! encoded certificate-and-key form) or as raw DER bytes for callers that
//! need the lowest-level encoding.

use std::fmt;

use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature, SigningKey, VerifyingKey};
use p256::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use x509_cert::spki::{EncodePublicKey, SubjectPublicKeyInfoOwned};

use crate::error::CertsmithError;
use crate::Result;

/// A P-256 (prime256v1) key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

/// Raw DER export of a key pair: PKCS#8 private key plus SPKI public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPairDer {
    pub private_key_der: Vec<u8>,
    pub public_key_der: Vec<u8>,
}

impl KeyPair {
    /// Generate a fresh P-256 key pair from the OS random source.
    pub fn generate() -> Self {
        let mut rng = rand_core::OsRng;
        let signing_key = SigningKey::random(&mut rng);
        let verifying_key = *signing_key.verifying_key();
        KeyPair {
            signing_key,
            verifying_key,
        }
    }

    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// The subject-public-key-info to embed in a certificate for this key.
    pub fn subject_public_key_info(&self) -> Result<SubjectPublicKeyInfoOwned> {
        SubjectPublicKeyInfoOwned::from_key(self.verifying_key)
            .map_err(|e| CertsmithError::provider("encode subject public key info", e))
    }

    /// Sign `data` with ECDSA/SHA-256, returning the DER-encoded signature.
    pub(crate) fn sign_data(&self, data: &[u8]) -> Vec<u8> {
        let signature: Signature = self.signing_key.sign(data);
        signature.to_der().as_bytes().to_vec()
    }

    /// Export both halves as raw DER bytes.
    pub fn to_der(&self) -> Result<KeyPairDer> {
        let private_key_der = self
            .signing_key
            .to_pkcs8_der()
            .map_err(|e| CertsmithError::provider("encode private key DER", e))?
            .as_bytes()
            .to_vec();
        let public_key_der = self
            .verifying_key
            .to_public_key_der()
            .map_err(|e| CertsmithError::provider("encode public key DER", e))?
            .as_bytes()
            .to_vec();
        Ok(KeyPairDer {
            private_key_der,
            public_key_der,
        })
    }

    /// Export the private key as PKCS#8 PEM.
    pub fn to_pkcs8_pem(&self) -> Result<String> {
        self.signing_key
            .to_pkcs8_pem(pkcs8::LineEnding::LF)
            .map(|pem| pem.to_string())
            .map_err(|e| CertsmithError::provider("encode private key PEM", e))
    }

    /// Import a private key from PKCS#8 PEM.
    pub fn from_pkcs8_pem(pem: &str) -> Result<Self> {
        let signing_key = SigningKey::from_pkcs8_pem(pem)
            .map_err(|e| CertsmithError::provider("decode private key PEM", e))?;
        let verifying_key = *signing_key.verifying_key();
        Ok(KeyPair {
            signing_key,
            verifying_key,
        })
    }
}

impl fmt::Display for KeyPair {
    /// Human-readable rendering for diagnostics; never prints private material.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-256 key pair, public key: ")?;
        for byte in self.verifying_key.to_encoded_point(true).as_bytes() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
