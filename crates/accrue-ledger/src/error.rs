//! Ledger error types.
//!
//! Every error aborts the whole operation with no state change.

use accrue_core::types::AccountId;
use thiserror::Error;

/// Failures reported by the underlying balance ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    /// Source account holds less than the transfer amount.
    #[error("insufficient balance in {account}: have {have}, need {need}")]
    InsufficientBalance {
        account: AccountId,
        have: u64,
        need: u64,
    },

    /// Destination account cannot hold the asset.
    #[error("account not registered for the asset: {0}")]
    NotRegistered(AccountId),

    /// Credit would overflow the destination balance.
    #[error("balance overflow in {0}")]
    BalanceOverflow(AccountId),
}

/// Errors returned by [`DistributionLedger`](crate::ledger::DistributionLedger) operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// `initialize` called by someone other than the fixed deployer.
    #[error("caller is not the deployer")]
    NotDeployer,

    /// Privileged operation called by someone other than the current authority.
    #[error("caller is not the current authority")]
    NotAuthority,

    /// Operation attempted before `initialize`.
    #[error("ledger not initialized")]
    NotInitialized,

    /// `initialize` called twice.
    #[error("ledger already initialized")]
    AlreadyInitialized,

    /// Proof does not reproduce the published root (or no root is published).
    #[error("invalid merkle proof")]
    InvalidProof,

    /// Entitlement does not exceed what was already paid out.
    #[error("nothing to claim: already claimed {claimed}, entitled {entitled}")]
    NothingToClaim { claimed: u64, entitled: u64 },

    /// Beneficiary account cannot currently receive the asset.
    #[error("receiver not eligible: {0}")]
    ReceiverNotEligible(AccountId),

    /// Vault holds less than the requested payout or withdrawal.
    #[error("insufficient vault funds: have {have}, need {need}")]
    InsufficientVaultFunds { have: u64, need: u64 },

    /// Depositor holds less than the deposit amount.
    #[error("insufficient caller funds: have {have}, need {need}")]
    InsufficientCallerFunds { have: u64, need: u64 },

    /// Deposit from, or withdrawal to, the vault account itself.
    #[error("the vault cannot transfer to itself")]
    VaultSelfTransfer,

    /// Aggregate claimed amount would overflow `u64`.
    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    /// Malformed ledger configuration.
    #[error("config: {0}")]
    Config(String),

    /// State snapshot could not be encoded or decoded.
    #[error("snapshot: {0}")]
    Snapshot(String),

    /// Failure reported by the underlying balance ledger.
    #[error(transparent)]
    Asset(#[from] AssetError),
}
