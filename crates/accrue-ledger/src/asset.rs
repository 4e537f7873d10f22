//! Interface to the underlying balance ledger, plus an in-memory
//! implementation.
//!
//! The distribution ledger never stores balances itself. Deposits, payouts
//! and withdrawals are all transfers on an [`AssetLedger`]; the vault is just
//! another account on it.

use std::collections::{HashMap, HashSet};

use accrue_core::types::AccountId;

use crate::error::AssetError;

/// Balance and transfer primitives of the hosting asset ledger.
///
/// `transfer` must be all-or-nothing: on error neither balance changes.
pub trait AssetLedger {
    /// Current balance of `account`. Unknown accounts hold zero.
    fn balance_of(&self, account: &AccountId) -> Result<u64, AssetError>;

    /// Whether `account` can currently be credited with the asset.
    fn can_receive(&self, account: &AccountId) -> Result<bool, AssetError>;

    /// Make `account` able to hold the asset. Idempotent.
    fn register(&mut self, account: &AccountId) -> Result<(), AssetError>;

    /// Move `amount` from `from` to `to`.
    ///
    /// # Errors
    ///
    /// - [`AssetError::InsufficientBalance`] if `from` holds less than `amount`
    /// - [`AssetError::NotRegistered`] if `to` cannot receive the asset
    /// - [`AssetError::BalanceOverflow`] if crediting `to` would overflow
    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u64) -> Result<(), AssetError>;
}

/// In-memory asset ledger for tests and local simulation.
///
/// Accounts must be registered before they can receive funds, mirroring
/// ledgers where a holder has to opt in to an asset.
#[derive(Debug, Default, Clone)]
pub struct MemoryAssetLedger {
    balances: HashMap<AccountId, u64>,
    registered: HashSet<AccountId>,
}

impl MemoryAssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `account` (if needed) and credit it with newly created funds.
    pub fn mint(&mut self, account: &AccountId, amount: u64) -> Result<(), AssetError> {
        self.registered.insert(*account);
        let balance = self.balances.entry(*account).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or(AssetError::BalanceOverflow(*account))?;
        Ok(())
    }

    /// Revoke `account`'s ability to receive. Existing balance is kept.
    pub fn deregister(&mut self, account: &AccountId) {
        self.registered.remove(account);
    }

    pub fn is_registered(&self, account: &AccountId) -> bool {
        self.registered.contains(account)
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> u128 {
        self.balances.values().map(|&b| b as u128).sum()
    }
}

impl AssetLedger for MemoryAssetLedger {
    fn balance_of(&self, account: &AccountId) -> Result<u64, AssetError> {
        Ok(self.balances.get(account).copied().unwrap_or(0))
    }

    fn can_receive(&self, account: &AccountId) -> Result<bool, AssetError> {
        Ok(self.registered.contains(account))
    }

    fn register(&mut self, account: &AccountId) -> Result<(), AssetError> {
        self.registered.insert(*account);
        Ok(())
    }

    fn transfer(&mut self, from: &AccountId, to: &AccountId, amount: u64) -> Result<(), AssetError> {
        let have = self.balance_of(from)?;
        if have < amount {
            return Err(AssetError::InsufficientBalance {
                account: *from,
                have,
                need: amount,
            });
        }
        if !self.registered.contains(to) {
            return Err(AssetError::NotRegistered(*to));
        }
        if from == to {
            return Ok(());
        }
        let credited = self
            .balance_of(to)?
            .checked_add(amount)
            .ok_or(AssetError::BalanceOverflow(*to))?;

        self.balances.insert(*from, have - amount);
        self.balances.insert(*to, credited);
        Ok(())
    }
}
