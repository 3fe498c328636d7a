//! Random secrets and derived identifiers for new users.

use rand::{distr::Alphanumeric, Rng};

/// Random `[A-Za-z0-9]` string of `len` characters.
pub fn random_alphanumeric(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Lowercased family name without whitespace followed by the lowercased
/// first letter of the first name: ("Van Hocht", "Joren") -> "vanhochtj".
pub fn username_base(name: &str, firstname: &str) -> String {
    let mut base: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if let Some(first) = firstname.trim().chars().next() {
        base.extend(first.to_lowercase());
    }
    base
}

/// Candidate for a given attempt: the base first, then base1, base2, ...
pub fn username_candidate(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{base}{attempt}")
    }
}
