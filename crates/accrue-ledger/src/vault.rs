//! Vault custody.
//!
//! The vault is an account on the [`AssetLedger`] whose outgoing transfers
//! can only be issued through a [`TransferCapability`]. The capability has no
//! public constructor and is never handed out of this crate, so only the
//! distribution ledger can move vault funds.

use accrue_core::constants::VAULT_SEED;
use accrue_core::hashing::HashAlgorithm;
use accrue_core::types::AccountId;

use crate::asset::AssetLedger;
use crate::error::AssetError;

/// Deterministic vault account for a deployment.
///
/// `SHA-256(VAULT_SEED || deployer)`, so a deployer's vault address is known
/// before initialization.
pub fn vault_account_for(deployer: &AccountId) -> AccountId {
    AccountId(HashAlgorithm::Sha256.digest(&[VAULT_SEED, deployer.as_bytes()]).0)
}

/// Unforgeable right to debit the vault account.
#[derive(Debug)]
pub struct TransferCapability {
    vault: AccountId,
}

impl TransferCapability {
    fn new(vault: AccountId) -> Self {
        Self { vault }
    }
}

/// Custodian of the pooled distribution balance.
#[derive(Debug)]
pub struct Vault {
    capability: TransferCapability,
}

impl Vault {
    /// Create the vault account for `deployer` and take its capability.
    pub(crate) fn open<A: AssetLedger>(assets: &mut A, deployer: &AccountId) -> Result<Self, AssetError> {
        let account = vault_account_for(deployer);
        assets.register(&account)?;
        Ok(Self {
            capability: TransferCapability::new(account),
        })
    }

    /// The vault's account on the asset ledger.
    pub fn account(&self) -> AccountId {
        self.capability.vault
    }

    /// Pooled balance available for payouts.
    pub fn balance<A: AssetLedger>(&self, assets: &A) -> Result<u64, AssetError> {
        assets.balance_of(&self.capability.vault)
    }

    /// Move `amount` from `from` into the vault.
    pub(crate) fn deposit<A: AssetLedger>(
        &self,
        assets: &mut A,
        from: &AccountId,
        amount: u64,
    ) -> Result<(), AssetError> {
        assets.transfer(from, &self.capability.vault, amount)
    }

    /// Move `amount` out of the vault to `to`.
    pub(crate) fn pay_out<A: AssetLedger>(
        &self,
        assets: &mut A,
        to: &AccountId,
        amount: u64,
    ) -> Result<(), AssetError> {
        assets.transfer(&self.capability.vault, to, amount)
    }
}
