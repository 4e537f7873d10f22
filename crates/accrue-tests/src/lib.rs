//! Scenario and adversarial test suite for Accrue.
//!
//! Integration tests under `tests/` drive the Merkle engine and the
//! distribution ledger together, from a claimant's and an attacker's
//! perspective.

pub mod helpers;
