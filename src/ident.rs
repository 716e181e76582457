use regex::Regex;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_128;

/// Width of a pbxproj object identifier in hex characters.
pub const TOKEN_WIDTH: usize = 24;

/// Bounded retry budget for unique minting.
pub const MAX_MINT_ATTEMPTS: usize = 1000;

#[derive(Error, Debug)]
pub enum IdentError {
    #[error("failed to mint a unique identifier after {attempts} attempts")]
    Exhausted { attempts: usize },
}

static MINT_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Mint a 24-character uppercase-hex token from a seed.
///
/// Wall-clock nanos and a process-local counter are folded into the hash so
/// that repeated calls with the same seed still diverge. Collision freedom is
/// not guaranteed algorithmically; callers that need uniqueness must check
/// via [`mint_unique`].
pub fn mint(seed: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let counter = MINT_COUNTER.fetch_add(1, Ordering::Relaxed);
    let material = format!("{seed}_{nanos}_{counter}");
    let digest = xxh3_128(material.as_bytes());
    let hex = format!("{digest:032X}");
    hex[..TOKEN_WIDTH].to_string()
}

/// Mint a token guaranteed absent from `existing`.
///
/// Retries with the attempt counter folded into the seed rather than failing
/// on first collision. The caller owns `existing`; the freshly minted token
/// is inserted into it so that identifiers minted later in the same run
/// cannot collide either.
pub fn mint_unique(seed: &str, existing: &mut HashSet<String>) -> Result<String, IdentError> {
    for attempt in 0..MAX_MINT_ATTEMPTS {
        let token = mint(&format!("{seed}_{attempt}"));
        if !existing.contains(&token) {
            existing.insert(token.clone());
            return Ok(token);
        }
    }
    Err(IdentError::Exhausted {
        attempts: MAX_MINT_ATTEMPTS,
    })
}

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b[A-F0-9]{24}\b").expect("token regex is valid"))
}

/// Collect every 24-hex token present in the document.
///
/// This is the population that freshly minted identifiers are checked
/// against. Over-approximation is fine: any hex-looking run of the right
/// width counts, whether or not it is an object id.
pub fn token_population(document: &str) -> HashSet<String> {
    token_regex()
        .find_iter(document)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn minted_token_shape() {
        let token = mint("seed");
        assert_eq!(token.len(), TOKEN_WIDTH);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn same_seed_diverges() {
        let a = mint("seed");
        let b = mint("seed");
        assert_ne!(a, b);
    }

    #[test]
    fn mint_unique_avoids_existing() {
        let mut existing = HashSet::new();
        // Pre-populate with tokens minted from the same seed-space
        for i in 0..50 {
            existing.insert(mint(&format!("clash_{i}")));
        }
        let token = mint_unique("clash", &mut existing).unwrap();
        assert_eq!(token.len(), TOKEN_WIDTH);
        // mint_unique records its own result
        assert!(existing.contains(&token));
    }

    #[test]
    fn sequential_mints_pairwise_distinct() {
        let mut existing = HashSet::new();
        let mut minted = Vec::new();
        for i in 0..64 {
            minted.push(mint_unique(&format!("file_{i}"), &mut existing).unwrap());
        }
        let unique: HashSet<_> = minted.iter().collect();
        assert_eq!(unique.len(), minted.len());
    }

    #[test]
    fn token_population_scan() {
        let doc = "\t\tA1B2C3D4E5F6A7B8C9D0E1F2 /* Foo.swift */ = {isa = PBXFileReference; };\n\
                   \t\tnot-a-token short A1B2 lowercase a1b2c3d4e5f6a7b8c9d0e1f2\n";
        let population = token_population(doc);
        assert_eq!(population.len(), 1);
        assert!(population.contains("A1B2C3D4E5F6A7B8C9D0E1F2"));
    }

    proptest! {
        #[test]
        fn mint_shape_holds_for_arbitrary_seeds(seed in ".*") {
            let token = mint(&seed);
            prop_assert_eq!(token.len(), TOKEN_WIDTH);
            prop_assert!(token.chars().all(|c| matches!(c, '0'..='9' | 'A'..='F')));
        }
    }
}
