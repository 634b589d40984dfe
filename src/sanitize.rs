//! C1 — Hostname sanitizer.
//!
//! Pure, deterministic cleanup of candidate DNS names pulled out of CT
//! leaves: strip junk affixes CT leaves are known to carry, collapse
//! doubled dots, and reject anything that isn't a usable hostname.

/// A cleaned, validated hostname: non-empty, lowercase, no whitespace, no
/// colon, and with a computable effective-TLD-plus-one.
pub type Hostname = String;

const LEADING_PREFIXES: &[&str] = &[
    "*.", "[", "cn=", "san=", "dns=", "dns name=", "name=", "=", "-", "?", ".",
];

const TRAILING_SUFFIXES: &[&str] = &[".", "]", "?", "#", "\\", "\""];

/// Run the sanitizer over one candidate name. Returns `None` if the name is
/// rejected.
pub fn clean(name: &str) -> Option<Hostname> {
    let mut s = name.to_lowercase();

    for prefix in LEADING_PREFIXES {
        if let Some(stripped) = s.strip_prefix(prefix) {
            s = stripped.to_string();
        }
    }

    for suffix in TRAILING_SUFFIXES {
        if let Some(stripped) = s.strip_suffix(suffix) {
            s = stripped.to_string();
        }
    }

    loop {
        let collapsed = s.replace("..", ".");
        if collapsed == s {
            break;
        }
        s = collapsed;
    }

    let s = s.trim().to_string();

    if s.is_empty() || s.contains(' ') || s.contains(':') {
        return None;
    }

    // eTLD+1 must be computable via the Public Suffix List.
    psl::domain_str(&s)?;

    Some(s)
}
