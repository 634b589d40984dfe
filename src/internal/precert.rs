//! Wraps a bare pre-certificate TBSCertificate in a syntactically valid
//! (but unsigned and unverified) X.509 `Certificate` so that `openssl`'s
//! DER parser can read the `Subject` and SAN extension out of it.
//!
//! A CT pre-cert leaf only carries the poisoned TBSCertificate, not the
//! `signatureAlgorithm`/`signatureValue` fields that complete an ASN.1
//! `Certificate ::= SEQUENCE { tbsCertificate, signatureAlgorithm,
//! signatureValue }`. Since this crawler never validates signatures, a
//! placeholder signature of the right shape is enough to make the
//! structure parseable.

/// OID 1.2.840.113549.1.1.11, sha256WithRSAEncryption, DER-encoded
/// `AlgorithmIdentifier { algorithm, parameters: NULL }`.
const SHA256_WITH_RSA: &[u8] = &[
    0x30, 0x0d, 0x06, 0x09, 0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b, 0x05, 0x00,
];

fn der_length(len: usize) -> Vec<u8> {
    if len < 0x80 {
        vec![len as u8]
    } else {
        let bytes = len.to_be_bytes();
        let significant: Vec<u8> = bytes
            .iter()
            .copied()
            .skip_while(|b| *b == 0)
            .collect();
        let mut out = vec![0x80 | significant.len() as u8];
        out.extend_from_slice(&significant);
        out
    }
}

fn der_tlv(tag: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend(der_length(body.len()));
    out.extend_from_slice(body);
    out
}

/// Wrap a raw TBSCertificate DER blob into a complete `Certificate` DER
/// blob with a placeholder signature.
pub fn wrap_tbs_as_certificate(tbs_der: &[u8]) -> Vec<u8> {
    let placeholder_signature = der_tlv(0x03, &[0x00, 0x00]); // BIT STRING, 1 zero byte
    let mut body = Vec::with_capacity(tbs_der.len() + SHA256_WITH_RSA.len() + placeholder_signature.len());
    body.extend_from_slice(tbs_der);
    body.extend_from_slice(SHA256_WITH_RSA);
    body.extend_from_slice(&placeholder_signature);
    der_tlv(0x30, &body)
}
