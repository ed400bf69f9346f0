mod util;

use certsmith::cert::spec::{CertKind, CertSpec, Side};
use certsmith::cert::CertAndKeyPem;
use certsmith::chain::{concat_cert_chain, generate_cert_chain, make_cert_chain, make_cert_chain_spec};
use certsmith::error::CertsmithError;

use util::{assert_chain_links, assert_signed_by, common_name, has_extension, is_ca, parse_cert};

/// Three-level server chain: leaf, one intermediate, self-signed root.
#[test]
fn three_level_server_chain() {
    let chain = generate_cert_chain(3, Side::Server).unwrap();
    assert_eq!(chain.len(), 3);
    assert_chain_links(&chain);

    let leaf = parse_cert(&chain[0].cert_pem);
    let intermediate = parse_cert(&chain[1].cert_pem);
    let root = parse_cert(&chain[2].cert_pem);

    assert!(!is_ca(&leaf));
    assert!(has_extension(
        &leaf,
        const_oid::ObjectIdentifier::new_unwrap("2.5.29.37") // extendedKeyUsage
    ));
    assert!(is_ca(&intermediate));
    assert!(is_ca(&root));
    assert_eq!(root.tbs_certificate.issuer, root.tbs_certificate.subject);

    assert!(common_name(&leaf).ends_with("Server"));
    assert!(common_name(&intermediate).ends_with("Server Intermediate 1"));
    assert!(common_name(&root).ends_with("Server Root CA"));
    assert_eq!(
        leaf.tbs_certificate.issuer,
        intermediate.tbs_certificate.subject
    );
}

/// Degenerate one-entry chain: a self-signed client leaf flagged CA:FALSE.
#[test]
fn single_client_leaf_chain() {
    let chain = generate_cert_chain(1, Side::Client).unwrap();
    assert_eq!(chain.len(), 1);

    let leaf = parse_cert(&chain[0].cert_pem);
    assert_eq!(leaf.tbs_certificate.issuer, leaf.tbs_certificate.subject);
    assert_signed_by(&leaf, &leaf);
    assert!(!is_ca(&leaf));
    assert!(common_name(&leaf).ends_with("Client"));
}

/// A supplied root authority is grafted, not regenerated: the output has one
/// extra entry, byte-identical to the supplied root.
#[test]
fn supplied_root_authority_is_grafted() {
    let mut rng = rand::rng();
    let root_spec = CertSpec::make(CertKind::ServerRootCa, &mut rng);
    let root_chain = make_cert_chain(&[root_spec], None).unwrap();
    let root = root_chain[0].clone();

    let leaf_spec = CertSpec::make(CertKind::Server, &mut rng);
    let chain = make_cert_chain(std::slice::from_ref(&leaf_spec), Some(&root)).unwrap();

    assert_eq!(chain.len(), 2);
    assert_eq!(chain[1], root);
    assert_signed_by(&parse_cert(&chain[0].cert_pem), &parse_cert(&root.cert_pem));
}

/// Every adjacent pair of a longer chain links by name and by signature.
#[test]
fn five_level_chain_links_at_every_level() {
    let chain = generate_cert_chain(5, Side::Client).unwrap();
    assert_eq!(chain.len(), 5);
    assert_chain_links(&chain);

    // levels between leaf and root are indexed intermediates
    for (i, entry) in chain.iter().enumerate().take(4).skip(1) {
        let cert = parse_cert(&entry.cert_pem);
        assert!(is_ca(&cert));
        assert!(common_name(&cert).ends_with(&format!("Client Intermediate {i}")));
    }
}

/// Encoded and native forms round-trip with identical fields.
#[test]
fn pem_round_trip_is_lossless() {
    let chain = generate_cert_chain(2, Side::Server).unwrap();
    let entry = &chain[0];

    let native = entry.to_native().unwrap();
    let re_encoded = native.to_pem().unwrap();
    assert_eq!(&re_encoded, entry);

    let original = parse_cert(&entry.cert_pem);
    let decoded = parse_cert(&re_encoded.cert_pem);
    assert_eq!(original.tbs_certificate.subject, decoded.tbs_certificate.subject);
    assert_eq!(original.tbs_certificate.issuer, decoded.tbs_certificate.issuer);
    assert_eq!(
        original.tbs_certificate.serial_number,
        decoded.tbs_certificate.serial_number
    );
    assert_eq!(original.tbs_certificate.validity, decoded.tbs_certificate.validity);
    assert_eq!(
        original.tbs_certificate.subject_public_key_info,
        decoded.tbs_certificate.subject_public_key_info
    );
}

/// The concatenated bundle is the ordered byte concatenation of the
/// certificate encodings, with no key material.
#[test]
fn concatenated_bundle_holds_every_certificate() {
    assert_eq!(concat_cert_chain(&[]), "");

    let chain = generate_cert_chain(3, Side::Server).unwrap();
    let blob = concat_cert_chain(&chain);

    let expected: usize = chain.iter().map(|e| e.cert_pem.len()).sum();
    assert_eq!(blob.len(), expected);

    let parsed = pem::parse_many(&blob).unwrap();
    assert_eq!(parsed.len(), 3);
    assert!(parsed.iter().all(|p| p.tag() == "CERTIFICATE"));
}

/// Zero specs with no root is a caller error; the length-based convenience
/// path legitimately produces an empty chain.
#[test]
fn zero_specs_fault_versus_zero_length_convenience() {
    let err = make_cert_chain(&[], None).unwrap_err();
    assert!(matches!(err, CertsmithError::InvalidInput(_)));

    let chain = generate_cert_chain(0, Side::Client).unwrap();
    assert!(chain.is_empty());
}

/// A half-populated root authority is rejected, not silently self-signed.
#[test]
fn partial_root_authority_is_invalid_input() {
    let mut rng = rand::rng();
    let specs = make_cert_chain_spec(1, Side::Server, &mut rng);
    let good = make_cert_chain(&specs, None).unwrap();

    let partial = CertAndKeyPem {
        cert_pem: good[0].cert_pem.clone(),
        key_pem: String::new(),
    };
    let err = make_cert_chain(&specs, Some(&partial)).unwrap_err();
    assert!(matches!(err, CertsmithError::InvalidInput(_)));
}

/// Each chain level owns a distinct key pair.
#[test]
fn chain_levels_use_fresh_keys() {
    let chain = generate_cert_chain(3, Side::Server).unwrap();
    let spki: Vec<_> = chain
        .iter()
        .map(|e| parse_cert(&e.cert_pem).tbs_certificate.subject_public_key_info)
        .collect();
    assert_ne!(spki[0], spki[1]);
    assert_ne!(spki[1], spki[2]);
    assert_ne!(spki[0], spki[2]);
}
