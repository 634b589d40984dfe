//! End-to-end leaf round-trip: build a synthetic certificate with
//! `DNSNames = ["a.example", "*.b.example"]` and `CN = "c.example"`, wrap it
//! in a `MerkleTreeLeaf`, base64-encode it the way `ct/v1/get-entries`
//! would, and check the decoder emits the sanitized hostnames in
//! SANs-then-CN order.

use base64::Engine;
use openssl::hash::MessageDigest;
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use openssl::x509::extension::SubjectAlternativeName;
use openssl::x509::X509NameBuilder;
use openssl::x509::X509;

use ctlog_crawler::leaf::decode_leaf;

fn build_test_certificate() -> Vec<u8> {
    let rsa = Rsa::generate(2048).unwrap();
    let pkey = PKey::from_rsa(rsa).unwrap();

    let mut name_builder = X509NameBuilder::new().unwrap();
    name_builder.append_entry_by_text("CN", "c.example").unwrap();
    let name = name_builder.build();

    let mut builder = X509::builder().unwrap();
    builder.set_version(2).unwrap();
    builder.set_subject_name(&name).unwrap();
    builder.set_issuer_name(&name).unwrap();
    builder.set_pubkey(&pkey).unwrap();

    let not_before = openssl::asn1::Asn1Time::days_from_now(0).unwrap();
    let not_after = openssl::asn1::Asn1Time::days_from_now(365).unwrap();
    builder.set_not_before(&not_before).unwrap();
    builder.set_not_after(&not_after).unwrap();

    let san = SubjectAlternativeName::new()
        .dns("a.example")
        .dns("*.b.example")
        .build(&builder.x509v3_context(None, None))
        .unwrap();
    builder.append_extension(san).unwrap();

    builder.sign(&pkey, MessageDigest::sha256()).unwrap();
    let cert: X509 = builder.build();
    cert.to_der().unwrap()
}

fn u24(n: usize) -> [u8; 3] {
    [((n >> 16) & 0xff) as u8, ((n >> 8) & 0xff) as u8, (n & 0xff) as u8]
}

fn wrap_as_leaf_input(der: &[u8]) -> String {
    let mut buf = Vec::new();
    buf.push(0u8); // version = v1
    buf.push(0u8); // leaf_type = timestamped_entry
    buf.extend_from_slice(&1_700_000_000_000u64.to_be_bytes());
    buf.extend_from_slice(&0u16.to_be_bytes()); // entry_type = x509_entry
    buf.extend_from_slice(&u24(der.len()));
    buf.extend_from_slice(der);
    buf.extend_from_slice(&0u16.to_be_bytes()); // empty CtExtensions
    base64::engine::general_purpose::STANDARD.encode(buf)
}

#[test]
fn decodes_sans_then_cn_in_order() {
    let der = build_test_certificate();
    let leaf_input = wrap_as_leaf_input(&der);

    let hostnames = decode_leaf(&leaf_input).unwrap();

    assert_eq!(
        hostnames,
        vec!["a.example".to_string(), "b.example".to_string(), "c.example".to_string()]
    );
}
