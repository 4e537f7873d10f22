//! Mutable distribution state.

use std::collections::HashMap;

use accrue_core::types::{AccountId, Hash256};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Published root, per-beneficiary claimed totals, authority and aggregate
/// payout of one deployment.
///
/// Invariants upheld by [`DistributionLedger`](crate::ledger::DistributionLedger):
/// - a beneficiary's claimed total never decreases
/// - `total_claimed` is the sum of every settled payout
/// - `current_root` changes only through authority-gated publication
#[derive(
    Serialize, Deserialize, Clone, Debug, PartialEq, Eq,
    bincode::Encode, bincode::Decode,
)]
pub struct DistributionState {
    current_root: Option<Hash256>,
    claimed_totals: HashMap<AccountId, u64>,
    authority: AccountId,
    total_claimed: u64,
}

impl DistributionState {
    /// Fresh state: no root, nothing claimed, `authority` in charge.
    pub fn new(authority: AccountId) -> Self {
        Self {
            current_root: None,
            claimed_totals: HashMap::new(),
            authority,
            total_claimed: 0,
        }
    }

    pub fn current_root(&self) -> Option<Hash256> {
        self.current_root
    }

    pub fn authority(&self) -> AccountId {
        self.authority
    }

    pub fn total_claimed(&self) -> u64 {
        self.total_claimed
    }

    /// Cumulative amount already paid to `beneficiary`; zero if never claimed.
    pub fn claimed_total(&self, beneficiary: &AccountId) -> u64 {
        self.claimed_totals.get(beneficiary).copied().unwrap_or(0)
    }

    /// Number of beneficiaries that have claimed at least once.
    pub fn claimant_count(&self) -> usize {
        self.claimed_totals.len()
    }

    /// Binary snapshot for persistence by the host.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LedgerError> {
        bincode::encode_to_vec(self, bincode::config::standard())
            .map_err(|e| LedgerError::Snapshot(e.to_string()))
    }

    /// Restore a snapshot written by [`to_bytes`](Self::to_bytes). Trailing
    /// bytes are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LedgerError> {
        let (state, read): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())
                .map_err(|e| LedgerError::Snapshot(e.to_string()))?;
        if read != bytes.len() {
            return Err(LedgerError::Snapshot(format!(
                "{} trailing bytes",
                bytes.len() - read
            )));
        }
        Ok(state)
    }

    pub(crate) fn set_root(&mut self, root: Hash256) {
        self.current_root = Some(root);
    }

    pub(crate) fn set_authority(&mut self, authority: AccountId) {
        self.authority = authority;
    }

    /// Commit a settled claim. `new_total_claimed` is precomputed by the
    /// caller so that this step cannot fail.
    pub(crate) fn record_claim(
        &mut self,
        beneficiary: AccountId,
        entitled_cumulative: u64,
        new_total_claimed: u64,
    ) {
        self.claimed_totals.insert(beneficiary, entitled_cumulative);
        self.total_claimed = new_total_claimed;
    }
}
