//! # Certsmith - Synthetic X.509 Certificate Chains for TLS Testing
//!
//! Certsmith generates test-fixture certificate material: key pairs, single
//! certificates, and multi-level certificate chains (root CA → intermediate
//! CAs → leaf), built entirely on RustCrypto crates. It is test
//! infrastructure, not a certificate authority: chains are constructed
//! programmatically and deterministically from declarative specs, with no
//! issuance workflow, revocation, or trust-store handling.
//!
//! ## Quick Start
//!
//! Generate a three-level server chain and hand the PEM material to a TLS
//! test endpoint:
//!
//! ```rust,no_run
//! use certsmith::cert::spec::Side;
//! use certsmith::chain::{concat_cert_chain, generate_cert_chain};
//!
//! # fn main() -> Result<(), certsmith::error::CertsmithError> {
//! // Leaf first, root last: chain[0] is the end-entity certificate.
//! let chain = generate_cert_chain(3, Side::Server)?;
//! let leaf = &chain[0];
//! println!("server cert:\n{}", leaf.cert_pem);
//! println!("server key:\n{}", leaf.key_pem);
//!
//! // CA bundle for the peer's trust configuration.
//! let ca_bundle = concat_cert_chain(&chain[1..]);
//! println!("ca bundle:\n{ca_bundle}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Explicit Specs and External Root Authorities
//!
//! Chains can also be built from explicit specs, optionally grafted onto an
//! externally supplied root instead of a generated one:
//!
//! ```rust,no_run
//! use certsmith::cert::spec::Side;
//! use certsmith::chain::{make_cert_chain, make_cert_chain_spec};
//! use rand::SeedableRng;
//!
//! # fn main() -> Result<(), certsmith::error::CertsmithError> {
//! // Injected RNG makes serial numbers reproducible in tests.
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//!
//! let specs = make_cert_chain_spec(2, Side::Client, &mut rng);
//! let chain = make_cert_chain(&specs, None)?;
//! assert_eq!(chain.len(), 2);
//!
//! // Reuse the generated root to sign a second, independent leaf.
//! let root = chain.last().cloned().unwrap_or_default();
//! let leaf_specs = make_cert_chain_spec(1, Side::Client, &mut rng);
//! let grafted = make_cert_chain(&leaf_specs, Some(&root))?;
//! assert_eq!(grafted.len(), 2); // supplied root plus one signed leaf
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`error::CertsmithError`], which separates
//! invalid input (caller programming errors, e.g. an empty spec list) from
//! provider faults (failures reported by the underlying crypto stack, tagged
//! with the failing operation). A failure at any step aborts the whole chain
//! build; no partial chain is ever returned.
//!
//! ## Module Organization
//!
//! - [`cert`]: certificate representations, role-driven specs, extension
//!   compilation
//! - [`chain`]: chain ordering, spec-chain generation, PEM concatenation
//! - [`signer`]: single-certificate signing (self-signed and issuer-signed)
//! - [`key`]: P-256 key pairs and DER/PEM export
//! - [`error`]: error taxonomy

pub mod cert;
pub mod chain;
pub mod error;
pub mod key;
pub mod signer;

pub type Result<T> = std::result::Result<T, error::CertsmithError>;
