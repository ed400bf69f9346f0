//! Declarative certificate specifications, parameterized by chain role.
//!
//! A [`CertSpec`] describes one certificate before any key material exists:
//! serial number, validity offsets, ordered subject fields, and ordered
//! extension expressions. Extension values use the conventional OpenSSL-style
//! configuration strings (`"critical, CA:TRUE"`, `"keyid, issuer"`, ...) and
//! stay opaque until the signer compiles them.

use rand::Rng;

/// Which logical endpoint a chain certifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Server,
    Client,
}

/// The role a certificate plays within a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertKind {
    /// Server end-entity leaf.
    Server,
    /// Client end-entity leaf.
    Client,
    /// Intermediate CA on the server side, `index` levels above the leaf.
    ServerIntermediateCa { index: usize },
    /// Intermediate CA on the client side, `index` levels above the leaf.
    ClientIntermediateCa { index: usize },
    ServerRootCa,
    ClientRootCa,
}

impl CertKind {
    pub fn is_ca(&self) -> bool {
        !matches!(self, CertKind::Server | CertKind::Client)
    }

    pub fn is_root_ca(&self) -> bool {
        matches!(self, CertKind::ServerRootCa | CertKind::ClientRootCa)
    }

    pub fn side(&self) -> Side {
        match self {
            CertKind::Server
            | CertKind::ServerIntermediateCa { .. }
            | CertKind::ServerRootCa => Side::Server,
            CertKind::Client
            | CertKind::ClientIntermediateCa { .. }
            | CertKind::ClientRootCa => Side::Client,
        }
    }

    /// Role-derived common name, e.g. `"<prefix> Server Intermediate 2"`.
    pub fn common_name(&self, prefix: &str) -> String {
        match self {
            CertKind::Server => format!("{prefix} Server"),
            CertKind::Client => format!("{prefix} Client"),
            CertKind::ServerIntermediateCa { index } => {
                format!("{prefix} Server Intermediate {index}")
            }
            CertKind::ClientIntermediateCa { index } => {
                format!("{prefix} Client Intermediate {index}")
            }
            CertKind::ServerRootCa => format!("{prefix} Server Root CA"),
            CertKind::ClientRootCa => format!("{prefix} Client Root CA"),
        }
    }
}

/// Default validity window: one year from now.
pub const DEFAULT_VALIDITY_SECS: i64 = 60 * 60 * 24 * 365;

/// Common-name prefix used by the role table.
const COMMON_NAME_PREFIX: &str = "Certsmith Testing Services";

/// Declarative description of one certificate to be produced.
///
/// Specs carry no identity: they are built fresh per chain and discarded after
/// signing. Subject fields and extensions are ordered pairs; the order is
/// preserved in the encoded certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertSpec {
    /// Serial number, unique within a chain with high probability only.
    pub serial_number: u64,
    /// Start of validity, seconds relative to now (may be negative).
    pub offset_not_before: i64,
    /// End of validity, seconds relative to now.
    pub offset_not_after: i64,
    /// Ordered `(field, value)` subject name pairs, e.g. `("commonName", ...)`.
    pub subject_name: Vec<(String, String)>,
    /// Ordered `(extension, value)` pairs in OpenSSL configuration syntax.
    pub extensions: Vec<(String, String)>,
}

impl CertSpec {
    /// Build the spec for one certificate of the given role.
    ///
    /// The RNG is injected so tests can reproduce serial numbers; serials are
    /// drawn from `[1, 10^10)` and uniqueness across chains is probabilistic.
    pub fn make(kind: CertKind, rng: &mut impl Rng) -> Self {
        let mut subject_name = Vec::new();
        subject_name.push(("countryName".to_string(), "DE".to_string()));
        subject_name.push(("localityName".to_string(), "Berlin".to_string()));
        subject_name.push(("organizationName".to_string(), "Certsmith".to_string()));
        subject_name.push((
            "commonName".to_string(),
            kind.common_name(COMMON_NAME_PREFIX),
        ));

        let mut extensions: Vec<(String, String)> = Vec::new();
        if kind.is_ca() {
            extensions.push((
                "basicConstraints".to_string(),
                "critical, CA:TRUE".to_string(),
            ));
            extensions.push((
                "keyUsage".to_string(),
                "critical, digitalSignature, keyCertSign, cRLSign".to_string(),
            ));
        } else {
            extensions.push((
                "basicConstraints".to_string(),
                "critical, CA:FALSE".to_string(),
            ));
            extensions.push((
                "keyUsage".to_string(),
                "critical, digitalSignature, keyEncipherment".to_string(),
            ));
            extensions.push((
                "extendedKeyUsage".to_string(),
                "serverAuth, clientAuth".to_string(),
            ));
        }
        extensions.push(("subjectKeyIdentifier".to_string(), "hash".to_string()));
        if !kind.is_root_ca() {
            extensions.push((
                "authorityKeyIdentifier".to_string(),
                "keyid, issuer".to_string(),
            ));
        }

        CertSpec {
            serial_number: rng.random_range(1..10_000_000_000u64),
            offset_not_before: 0,
            offset_not_after: DEFAULT_VALIDITY_SECS,
            subject_name,
            extensions,
        }
    }
}
