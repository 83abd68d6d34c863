// crates/backplane-core/src/core/identity.rs
// ============================================================================
// Module: Backplane Identity Generator
// Description: Cryptographically random identifier and token generation.
// Purpose: Produce unguessable application codes and API keys from fixed alphabets.
// Dependencies: rand, thiserror
// ============================================================================

//! ## Overview
//! The identity generator draws every character uniformly and independently
//! from a fixed alphabet using the OS CSPRNG. Uniformity is guaranteed by
//! rejection sampling over 32-bit draws; a naive `random % N` would bias low
//! alphabet positions and is deliberately not implemented. Entropy failures
//! propagate to the caller instead of degrading to an empty string.
//!
//! Security posture: outputs are bearer credentials; callers must treat them
//! as secrets from the moment of generation.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::RngCore;
use rand::rngs::OsRng;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Alphabet for application codes and generated storage keys (62 alphanumerics).
pub const ID_ALPHABET: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Alphabet for API keys (62 alphanumerics plus fixed punctuation).
pub const TOKEN_ALPHABET: &str =
    "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz!@#$%^*()_-=+?.,";

/// Random-character count used for application codes and generated keys.
///
/// 32 characters over a 62-symbol alphabet gives roughly 190 bits of entropy.
pub const ID_LENGTH: usize = 32;

/// Character count of generated API keys.
pub const AUTH_TOKEN_LENGTH: usize = 2048;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Identity generation errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Error messages never include generated material.
#[derive(Debug, Error)]
pub enum RandomSourceError {
    /// The OS secure-randomness source is exhausted or unavailable.
    #[error("secure randomness unavailable: {0}")]
    Unavailable(String),
    /// The requested alphabet is empty.
    #[error("alphabet must not be empty")]
    EmptyAlphabet,
}

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates a random string of exactly `length` characters from `alphabet`.
///
/// Each character is drawn uniformly and independently.
///
/// # Errors
///
/// Returns [`RandomSourceError`] when `alphabet` is empty or the OS entropy
/// source fails.
pub fn generate_random_string(
    length: usize,
    alphabet: &str,
) -> Result<String, RandomSourceError> {
    let symbols: Vec<char> = alphabet.chars().collect();
    if symbols.is_empty() {
        return Err(RandomSourceError::EmptyAlphabet);
    }
    let mut out = String::with_capacity(length);
    for _ in 0..length {
        let index = uniform_index(symbols.len())?;
        out.push(symbols[index]);
    }
    Ok(out)
}

/// Generates an application-code style identifier: `prefix + "_" + random`.
///
/// # Errors
///
/// Returns [`RandomSourceError`] when the OS entropy source fails.
pub fn generate_id(prefix: &str, length: usize) -> Result<String, RandomSourceError> {
    let token = generate_random_string(length, ID_ALPHABET)?;
    Ok(format!("{prefix}_{token}"))
}

/// Generates a long-lived API key of [`AUTH_TOKEN_LENGTH`] characters.
///
/// # Errors
///
/// Returns [`RandomSourceError`] when the OS entropy source fails.
pub fn generate_auth_token() -> Result<String, RandomSourceError> {
    generate_random_string(AUTH_TOKEN_LENGTH, TOKEN_ALPHABET)
}

/// Picks one item uniformly from a non-empty slice.
///
/// # Errors
///
/// Returns [`RandomSourceError`] when `items` is empty or entropy fails.
pub fn choose<'a>(items: &'a [&'a str]) -> Result<&'a str, RandomSourceError> {
    if items.is_empty() {
        return Err(RandomSourceError::EmptyAlphabet);
    }
    let index = uniform_index(items.len())?;
    Ok(items[index])
}

/// Draws a uniform index in `[0, bound)` via rejection sampling.
///
/// Draws outside the largest multiple of `bound` below 2^32 are rejected and
/// redrawn, so no residue class is favored.
fn uniform_index(bound: usize) -> Result<usize, RandomSourceError> {
    let bound_u64 = u64::try_from(bound)
        .map_err(|_| RandomSourceError::Unavailable("sample bound out of range".to_string()))?;
    if bound_u64 == 0 {
        return Err(RandomSourceError::EmptyAlphabet);
    }
    let limit = (1_u64 << 32) / bound_u64 * bound_u64;
    loop {
        let mut buf = [0_u8; 4];
        OsRng
            .try_fill_bytes(&mut buf)
            .map_err(|err| RandomSourceError::Unavailable(err.to_string()))?;
        let draw = u64::from(u32::from_le_bytes(buf));
        if draw < limit {
            return usize::try_from(draw % bound_u64).map_err(|_| {
                RandomSourceError::Unavailable("sample index out of range".to_string())
            });
        }
    }
}
