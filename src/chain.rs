//! Certificate chain construction.
//!
//! Chains are specified leaf-first (index 0 is the end-entity, the last index
//! the root) but signing must run root-first: the root has to exist before
//! anything it issues can be signed. The builder therefore walks the specs in
//! reverse, carrying the current issuer as an accumulator, and emits the
//! result back in leaf-first order.

use rand::Rng;

use crate::Result;
use crate::cert::spec::{CertKind, CertSpec, Side};
use crate::cert::CertAndKeyPem;
use crate::error::CertsmithError;
use crate::signer::sign_certificate;

/// An ordered certificate chain, leaf-first, root-last.
///
/// Every non-root entry is signed by the private key of the entry after it;
/// the last entry is either self-signed or a copy of an externally supplied
/// root authority.
pub type CertChain = Vec<CertAndKeyPem>;

/// Build a fully linked chain from explicit specs.
///
/// Without a `root_authority` the last spec is signed as a self-signed root
/// and the chain has exactly `specs.len()` entries. With one, the supplied
/// root is used as-is to sign the last spec and is copied into the final slot,
/// giving `specs.len() + 1` entries. An empty or half-populated
/// `root_authority` counts as absent.
///
/// An empty `specs` slice is an invalid-input fault; use
/// [`generate_cert_chain`] for the intentional zero-length case.
pub fn make_cert_chain(
    specs: &[CertSpec],
    root_authority: Option<&CertAndKeyPem>,
) -> Result<CertChain> {
    let root_authority = root_authority.filter(|root| !root.is_empty());
    match root_authority {
        None => {
            let Some((root_spec, rest)) = specs.split_last() else {
                return Err(CertsmithError::invalid(
                    "chain requires at least one spec when no root authority is given",
                ));
            };
            let mut issuer = sign_certificate(root_spec, None)?;
            let mut chain = Vec::with_capacity(specs.len());
            chain.push(issuer.to_pem()?);
            for spec in rest.iter().rev() {
                let signed = sign_certificate(spec, Some(&issuer))?;
                chain.push(signed.to_pem()?);
                issuer = signed;
            }
            chain.reverse();
            Ok(chain)
        }
        Some(root) => {
            if specs.is_empty() {
                return Err(CertsmithError::invalid(
                    "chain requires at least one spec",
                ));
            }
            let mut issuer = root.to_native()?;
            let mut chain = Vec::with_capacity(specs.len() + 1);
            // deep copy: the output never aliases the caller's root
            chain.push(root.clone());
            for spec in specs.iter().rev() {
                let signed = sign_certificate(spec, Some(&issuer))?;
                chain.push(signed.to_pem()?);
                issuer = signed;
            }
            chain.reverse();
            Ok(chain)
        }
    }
}

/// Generate a plausible spec sequence for a chain of `length` certificates:
/// index 0 is the leaf, the last index the root, everything between an indexed
/// intermediate CA. Length 0 yields an empty sequence.
pub fn make_cert_chain_spec(length: usize, side: Side, rng: &mut impl Rng) -> Vec<CertSpec> {
    let mut specs = Vec::with_capacity(length);
    for i in 0..length {
        let kind = if i == 0 {
            match side {
                Side::Server => CertKind::Server,
                Side::Client => CertKind::Client,
            }
        } else if i == length - 1 {
            match side {
                Side::Server => CertKind::ServerRootCa,
                Side::Client => CertKind::ClientRootCa,
            }
        } else {
            match side {
                Side::Server => CertKind::ServerIntermediateCa { index: i },
                Side::Client => CertKind::ClientIntermediateCa { index: i },
            }
        };
        specs.push(CertSpec::make(kind, rng));
    }
    specs
}

/// One-call test-chain generation: spec the chain, then build it with a
/// generated self-signed root. `length == 0` intentionally returns an empty
/// chain, unlike the explicit-specs path.
pub fn generate_cert_chain(length: usize, side: Side) -> Result<CertChain> {
    if length == 0 {
        return Ok(Vec::new());
    }
    let mut rng = rand::rng();
    let specs = make_cert_chain_spec(length, side, &mut rng);
    make_cert_chain(&specs, None)
}

/// Concatenate the certificate encodings of a chain, in chain order, into a
/// single blob (e.g. a trust bundle). Keys are not included. An empty chain
/// yields an empty blob.
pub fn concat_cert_chain(chain: &[CertAndKeyPem]) -> String {
    chain.iter().map(|entry| entry.cert_pem.as_str()).collect()
}
