// crates/backplane-core/src/core/mod.rs
// ============================================================================
// Module: Backplane Core Types
// Description: Identifier, identity, credential, and value submodules.
// Purpose: Group the pure data types used across the gateway.
// Dependencies: serde, rand
// ============================================================================

//! ## Overview
//! Pure data types with no storage or transport concerns. Everything in this
//! module is deterministic apart from [`identity`], which consumes OS entropy.

pub mod credentials;
pub mod identifiers;
pub mod identity;
pub mod title;
pub mod value;
