use const_oid::AssociatedOid;
use der::{Decode, DecodePem, Encode};
use p256::ecdsa::signature::Verifier;
use p256::ecdsa::{Signature, VerifyingKey};
use x509_cert::certificate::CertificateInner;
use x509_cert::ext::pkix::BasicConstraints;

use certsmith::cert::CertAndKeyPem;

pub fn parse_cert(pem: &str) -> CertificateInner {
    CertificateInner::from_pem(pem.as_bytes()).expect("valid certificate PEM")
}

/// Checks the issuer/subject name link and verifies `cert`'s signature
/// against `signer`'s public key with pure-Rust ECDSA.
pub fn assert_signed_by(cert: &CertificateInner, signer: &CertificateInner) {
    assert_eq!(cert.tbs_certificate.issuer, signer.tbs_certificate.subject);
    let spki = &signer.tbs_certificate.subject_public_key_info;
    let key = VerifyingKey::from_sec1_bytes(spki.subject_public_key.raw_bytes())
        .expect("P-256 public key");
    let tbs_der = cert.tbs_certificate.to_der().expect("TBS encodes");
    let signature = Signature::from_der(cert.signature.as_bytes().expect("signature bits"))
        .expect("DER signature");
    key.verify(&tbs_der, &signature).expect("signature verifies");
}

/// Verifies every link of a leaf-first chain, including the self-signed root.
pub fn assert_chain_links(chain: &[CertAndKeyPem]) {
    let certs: Vec<CertificateInner> = chain.iter().map(|e| parse_cert(&e.cert_pem)).collect();
    for pair in certs.windows(2) {
        assert_signed_by(&pair[0], &pair[1]);
    }
    if let Some(root) = certs.last() {
        assert_signed_by(root, root);
    }
}

pub fn is_ca(cert: &CertificateInner) -> bool {
    cert.tbs_certificate
        .extensions
        .as_ref()
        .expect("extensions present")
        .iter()
        .find(|ext| ext.extn_id == BasicConstraints::OID)
        .map(|ext| {
            BasicConstraints::from_der(ext.extn_value.as_bytes())
                .expect("valid basicConstraints")
                .ca
        })
        .expect("basicConstraints present")
}

pub fn has_extension(cert: &CertificateInner, oid: const_oid::ObjectIdentifier) -> bool {
    cert.tbs_certificate
        .extensions
        .as_ref()
        .expect("extensions present")
        .iter()
        .any(|ext| ext.extn_id == oid)
}

pub fn common_name(cert: &CertificateInner) -> String {
    for rdn in cert.tbs_certificate.subject.0.iter() {
        for attr in rdn.0.iter() {
            if attr.oid == const_oid::db::rfc4519::CN {
                if let Ok(s) = attr.value.decode_as::<der::asn1::Utf8StringRef>() {
                    return s.to_string();
                }
                if let Ok(s) = attr.value.decode_as::<der::asn1::PrintableStringRef>() {
                    return s.to_string();
                }
            }
        }
    }
    panic!("no common name in subject");
}
