//! Backend identifier normalization
//!
//! Backends fold identifier case and cap identifier length (63 bytes for
//! PostgreSQL). Normalization is deterministic: lowercase, non-alphanumeric
//! replaced with `_`, a `_` prefix when the name would start with a digit,
//! and truncation with a crc32 suffix of the *original* name when the
//! normalized form would collide with one already allocated.

use std::collections::HashSet;

/// Backend identifier length cap (PostgreSQL NAMEDATALEN - 1)
pub const MAX_IDENTIFIER_LEN: usize = 63;

/// Hex digits of the collision suffix, plus its `_` separator
const SUFFIX_LEN: usize = 9;

/// Normalize a modeling name into a backend identifier, without collision
/// handling.
pub fn normalize(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else {
            out.push('_');
        }
    }
    if out.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    if out.is_empty() {
        out.push('_');
    }
    out.truncate(MAX_IDENTIFIER_LEN);
    out
}

/// Deterministic collision suffix derived from the original name.
fn suffix(original: &str) -> String {
    format!("_{:08x}", crc32fast::hash(original.as_bytes()))
}

/// Allocates unique identifiers within one namespace (tables in a model,
/// columns in a table).
#[derive(Debug, Default)]
pub struct IdentAllocator {
    used: HashSet<String>,
}

impl IdentAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize `name` and resolve collisions against previously allocated
    /// identifiers. The same input sequence always yields the same output
    /// sequence.
    pub fn allocate(&mut self, name: &str) -> String {
        let normalized = normalize(name);
        if self.used.insert(normalized.clone()) {
            return normalized;
        }
        let mut base = normalized;
        base.truncate(MAX_IDENTIFIER_LEN - SUFFIX_LEN);
        let candidate = format!("{}{}", base, suffix(name));
        self.used.insert(candidate.clone());
        candidate
    }
}
