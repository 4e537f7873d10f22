//! Notifications emitted by successful ledger operations.
//!
//! Events are buffered only after an operation has fully committed, so an
//! aborted operation never leaves an event behind.

use accrue_core::types::{AccountId, Hash256};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LedgerEvent {
    /// A new root replaced the previous one.
    RootPublished { root: Hash256 },
    /// Authority moved to `new_authority`; the previous holder lost its rights.
    AuthorityRotated { new_authority: AccountId },
    /// Funds entered the vault.
    Deposited { depositor: AccountId, amount: u64 },
    /// The authority took funds out of the vault.
    Withdrawn { recipient: AccountId, amount: u64 },
    /// A beneficiary was paid the delta of their cumulative entitlement.
    Claimed { beneficiary: AccountId, payout: u64 },
}
