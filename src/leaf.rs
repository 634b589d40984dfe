//! C2 — Leaf decoder.
//!
//! Base64-decodes a `leaf_input`, parses it as a `MerkleTreeLeaf`, extracts
//! the embedded certificate (or pre-certificate), and pulls candidate
//! hostnames out of its `Subject.CommonName` and SAN `DNSNames`.
//!
//! Contract: never panics, never blocks on I/O, fully deterministic given
//! the input bytes.

use base64::Engine;
use openssl::nid::Nid;
use openssl::x509::X509;

use crate::error::{Error, Result};
use crate::internal::merkle::{self, TimestampedEntry};
use crate::internal::precert::wrap_tbs_as_certificate;
use crate::sanitize::{self, Hostname};

/// Decode one `leaf_input` and return the accepted, sanitized hostnames it
/// carries, in SANs-then-CN order, preserving duplicates — the writer is
/// responsible for deduplication.
pub fn decode_leaf(leaf_input_b64: &str) -> Result<Vec<Hostname>> {
    let raw = base64::engine::general_purpose::STANDARD
        .decode(leaf_input_b64)
        .map_err(|e| Error::DecodeError(format!("bad base64: {}", e)))?;

    let leaf = merkle::parse(&raw)?;

    let cert_der = match leaf.entry {
        TimestampedEntry::X509Entry { der } => der,
        TimestampedEntry::PrecertEntry { tbs_certificate, .. } => {
            wrap_tbs_as_certificate(&tbs_certificate)
        }
    };

    let cert = X509::from_der(&cert_der)
        .map_err(|e| Error::DecodeError(format!("bad certificate: {}", e)))?;

    Ok(extract_hostnames(&cert))
}

/// Pull SAN `DNSNames` then `Subject.CommonName` out of a parsed
/// certificate and sanitize each candidate.
fn extract_hostnames(cert: &X509) -> Vec<Hostname> {
    let mut out = Vec::new();

    if let Some(sans) = cert.subject_alt_names() {
        for name in sans.iter() {
            if let Some(dns) = name.dnsname() {
                if let Some(clean) = sanitize::clean(dns) {
                    out.push(clean);
                }
            }
        }
    }

    if let Some(cn_entry) = cert.subject_name().entries_by_nid(Nid::COMMONNAME).next() {
        if let Ok(cn) = cn_entry.data().as_utf8() {
            if let Some(clean) = sanitize::clean(cn.as_ref()) {
                out.push(clean);
            }
        }
    }

    out
}
