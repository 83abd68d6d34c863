// crates/backplane-core/tests/identity.rs
// ============================================================================
// Module: Identity Generator Tests
// Description: Length, alphabet, and uniqueness properties of generation.
// Purpose: Validate uniform sampling contracts without a fixed seed.
// ============================================================================

//! Property and unit tests for the identity generator.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::HashSet;

use backplane_core::AUTH_TOKEN_LENGTH;
use backplane_core::ID_ALPHABET;
use backplane_core::ID_LENGTH;
use backplane_core::RandomSourceError;
use backplane_core::TOKEN_ALPHABET;
use backplane_core::generate_auth_token;
use backplane_core::generate_id;
use backplane_core::generate_random_string;
use proptest::prelude::*;

#[test]
fn random_string_has_exact_length() {
    for length in [0_usize, 1, 7, 32, 256] {
        let out = generate_random_string(length, ID_ALPHABET).expect("generate");
        assert_eq!(out.chars().count(), length);
    }
}

#[test]
fn random_string_draws_only_from_alphabet() {
    let allowed: HashSet<char> = TOKEN_ALPHABET.chars().collect();
    let out = generate_random_string(4_096, TOKEN_ALPHABET).expect("generate");
    for symbol in out.chars() {
        assert!(allowed.contains(&symbol), "character {symbol:?} outside alphabet");
    }
}

#[test]
fn empty_alphabet_is_rejected() {
    let result = generate_random_string(8, "");
    assert!(matches!(result, Err(RandomSourceError::EmptyAlphabet)));
}

#[test]
fn generated_id_carries_prefix_and_length() {
    let id = generate_id("app", ID_LENGTH).expect("generate");
    let (prefix, random) = id.split_once('_').expect("separator");
    assert_eq!(prefix, "app");
    assert_eq!(random.len(), ID_LENGTH);
    assert!(random.chars().all(|symbol| ID_ALPHABET.contains(symbol)));
}

#[test]
fn auth_token_length_is_fixed() {
    let token = generate_auth_token().expect("generate");
    assert_eq!(token.len(), AUTH_TOKEN_LENGTH);
}

#[test]
fn generated_ids_do_not_collide() {
    // 190 bits of entropy per code; any collision in a small sample is a bug.
    let mut seen = HashSet::new();
    for _ in 0..1_000 {
        let id = generate_id("app", ID_LENGTH).expect("generate");
        assert!(seen.insert(id), "duplicate application code generated");
    }
}

#[test]
fn every_alphabet_position_is_reachable() {
    // With 4096 draws over 62 symbols, a missing symbol indicates biased
    // sampling rather than bad luck (miss probability below 1e-28 per symbol).
    let out = generate_random_string(4_096, ID_ALPHABET).expect("generate");
    let seen: HashSet<char> = out.chars().collect();
    for symbol in ID_ALPHABET.chars() {
        assert!(seen.contains(&symbol), "symbol {symbol:?} never drawn");
    }
}

proptest! {
    #[test]
    fn arbitrary_lengths_and_alphabets_hold_the_contract(
        length in 0_usize .. 128,
        alphabet in "[0-9A-Za-z!@#$%^*()_=+?.,-]{1,40}",
    ) {
        let out = generate_random_string(length, &alphabet).expect("generate");
        prop_assert_eq!(out.chars().count(), length);
        for symbol in out.chars() {
            prop_assert!(alphabet.contains(symbol));
        }
    }
}
