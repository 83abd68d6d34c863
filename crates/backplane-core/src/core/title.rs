// crates/backplane-core/src/core/title.rs
// ============================================================================
// Module: Backplane Title Generator
// Description: Human-friendly three-word titles for new applications.
// Purpose: Label issued credentials without an external name service.
// Dependencies: crate::core::identity
// ============================================================================

//! ## Overview
//! Registration assigns each application a readable placeholder title in the
//! `adverb adjective noun` style. Titles are labels only; uniqueness and
//! secrecy are provided by the application code and API key, never by the
//! title.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::identity::RandomSourceError;
use crate::core::identity::choose;

// ============================================================================
// SECTION: Word Lists
// ============================================================================

/// Adverbs for the first title word.
const ADVERBS: &[&str] = &[
    "boldly", "briskly", "calmly", "daily", "deeply", "dimly", "early", "fondly", "gently",
    "gladly", "keenly", "lightly", "loudly", "neatly", "oddly", "openly", "plainly", "quietly",
    "rarely", "sharply", "slowly", "softly", "swiftly", "warmly",
];

/// Adjectives for the second title word.
const ADJECTIVES: &[&str] = &[
    "amber", "brave", "bright", "broad", "clever", "cool", "eager", "fair", "fleet", "golden",
    "grand", "hardy", "keen", "late", "lucid", "mellow", "noble", "pale", "quick", "rapid",
    "solid", "steady", "sturdy", "vivid",
];

/// Nouns for the final title word.
const NOUNS: &[&str] = &[
    "badger", "bison", "crane", "dolphin", "falcon", "gannet", "heron", "ibis", "jackal",
    "kestrel", "lemur", "marmot", "newt", "osprey", "otter", "pelican", "plover", "quail",
    "raven", "seal", "swift", "tern", "walrus", "wren",
];

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates a three-word space-separated title.
///
/// # Errors
///
/// Returns [`RandomSourceError`] when the OS entropy source fails.
pub fn generate_title() -> Result<String, RandomSourceError> {
    let adverb = choose(ADVERBS)?;
    let adjective = choose(ADJECTIVES)?;
    let noun = choose(NOUNS)?;
    Ok(format!("{adverb} {adjective} {noun}"))
}
