//! Cumulative-claim distribution ledger.
//!
//! Lifecycle: `Uninitialized` → `AwaitingRoot` (after `initialize`) →
//! `RootPublished` (after the first `publish_root`). Each published root
//! commits to every beneficiary's *cumulative* entitlement; a claim pays out
//! only the difference between that figure and what the beneficiary has
//! already received, so re-publishing a root can never cause a double payment.
//!
//! Two identities gate privileged calls:
//! - the **deployer** is fixed at construction and may only run `initialize`
//! - the **authority** starts as the deployer, can be rotated, and gates
//!   `publish_root`, `rotate_authority` and `withdraw`. Rotation revokes the
//!   previous holder immediately.
//!
//! Every operation runs all of its checks before its single fallible
//! transfer, and mutates state only after that transfer succeeded. A failed
//! call therefore leaves state, vault and event log untouched. Calls take
//! `&mut self`; the host is expected to serialise them.

use accrue_core::codec::hash_leaf;
use accrue_core::hashing::HashScheme;
use accrue_core::merkle;
use accrue_core::types::{AccountId, Hash256};
use tracing::{debug, info};

use crate::asset::AssetLedger;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::events::LedgerEvent;
use crate::state::DistributionState;
use crate::vault::Vault;

/// Coarse lifecycle phase of a ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LedgerPhase {
    Uninitialized,
    AwaitingRoot,
    RootPublished,
}

/// State and vault created by `initialize`.
#[derive(Debug)]
struct Deployment {
    state: DistributionState,
    vault: Vault,
}

/// The distribution ledger for one deployment.
#[derive(Debug)]
pub struct DistributionLedger<A: AssetLedger> {
    config: LedgerConfig,
    assets: A,
    deployment: Option<Deployment>,
    events: Vec<LedgerEvent>,
}

impl<A: AssetLedger> DistributionLedger<A> {
    /// Create an uninitialized ledger on top of `assets`.
    pub fn new(config: LedgerConfig, assets: A) -> Self {
        Self {
            config,
            assets,
            deployment: None,
            events: Vec::new(),
        }
    }

    // ------------------------------------------------------------------
    // Privileged operations
    // ------------------------------------------------------------------

    /// One-time setup: create the vault and hand authority to the deployer.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotDeployer`] if `caller` is not the configured deployer
    /// - [`LedgerError::AlreadyInitialized`] on a second call
    pub fn initialize(&mut self, caller: &AccountId) -> Result<(), LedgerError> {
        if *caller != self.config.deployer {
            debug!(%caller, "initialize rejected: not deployer");
            return Err(LedgerError::NotDeployer);
        }
        if self.deployment.is_some() {
            return Err(LedgerError::AlreadyInitialized);
        }

        let vault = Vault::open(&mut self.assets, &self.config.deployer)?;
        info!(deployer = %self.config.deployer, vault = %vault.account(), "ledger initialized");
        self.deployment = Some(Deployment {
            state: DistributionState::new(self.config.deployer),
            vault,
        });
        Ok(())
    }

    /// Replace the current root. No well-formedness check is made on it.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotInitialized`] before `initialize`
    /// - [`LedgerError::NotAuthority`] if `caller` is not the current authority
    pub fn publish_root(&mut self, caller: &AccountId, root: Hash256) -> Result<(), LedgerError> {
        let deployment = self.deployment.as_mut().ok_or(LedgerError::NotInitialized)?;
        ensure_authority(&deployment.state, caller)?;

        deployment.state.set_root(root);
        info!(%root, "root published");
        self.events.push(LedgerEvent::RootPublished { root });
        Ok(())
    }

    /// Hand authority to `new_authority`.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotInitialized`] before `initialize`
    /// - [`LedgerError::NotAuthority`] if `caller` is not the current authority
    pub fn rotate_authority(
        &mut self,
        caller: &AccountId,
        new_authority: AccountId,
    ) -> Result<(), LedgerError> {
        let deployment = self.deployment.as_mut().ok_or(LedgerError::NotInitialized)?;
        ensure_authority(&deployment.state, caller)?;

        deployment.state.set_authority(new_authority);
        info!(old = %caller, new = %new_authority, "authority rotated");
        self.events.push(LedgerEvent::AuthorityRotated { new_authority });
        Ok(())
    }

    /// Pay `amount` of vault surplus out to the current authority.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotInitialized`] before `initialize`
    /// - [`LedgerError::NotAuthority`] if `caller` is not the current authority
    /// - [`LedgerError::VaultSelfTransfer`] if the authority is the vault account
    /// - [`LedgerError::InsufficientVaultFunds`] if the vault holds less than `amount`
    pub fn withdraw(&mut self, caller: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let deployment = self.deployment.as_ref().ok_or(LedgerError::NotInitialized)?;
        ensure_authority(&deployment.state, caller)?;
        if *caller == deployment.vault.account() {
            debug!("withdraw rejected: authority is the vault");
            return Err(LedgerError::VaultSelfTransfer);
        }

        let have = deployment.vault.balance(&self.assets)?;
        if have < amount {
            debug!(have, need = amount, "withdraw rejected: vault underfunded");
            return Err(LedgerError::InsufficientVaultFunds { have, need: amount });
        }

        deployment.vault.pay_out(&mut self.assets, caller, amount)?;
        info!(recipient = %caller, amount, "vault withdrawal");
        self.events.push(LedgerEvent::Withdrawn {
            recipient: *caller,
            amount,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Unrestricted operations
    // ------------------------------------------------------------------

    /// Fund the vault from `caller`'s balance.
    ///
    /// # Errors
    ///
    /// - [`LedgerError::NotInitialized`] before `initialize`
    /// - [`LedgerError::VaultSelfTransfer`] if `caller` is the vault account
    /// - [`LedgerError::InsufficientCallerFunds`] if `caller` holds less than `amount`
    pub fn deposit(&mut self, caller: &AccountId, amount: u64) -> Result<(), LedgerError> {
        let deployment = self.deployment.as_ref().ok_or(LedgerError::NotInitialized)?;
        if *caller == deployment.vault.account() {
            debug!("deposit rejected: caller is the vault");
            return Err(LedgerError::VaultSelfTransfer);
        }

        let have = self.assets.balance_of(caller)?;
        if have < amount {
            debug!(%caller, have, need = amount, "deposit rejected: caller underfunded");
            return Err(LedgerError::InsufficientCallerFunds { have, need: amount });
        }

        deployment.vault.deposit(&mut self.assets, caller, amount)?;
        info!(depositor = %caller, amount, "vault deposit");
        self.events.push(LedgerEvent::Deposited {
            depositor: *caller,
            amount,
        });
        Ok(())
    }

    /// Settle a claim for `beneficiary` against the current root and return
    /// the amount paid.
    ///
    /// Anyone may submit; funds always go to `beneficiary`. The payout is
    /// `entitled_cumulative` minus what the beneficiary already received.
    ///
    /// # Errors
    ///
    /// Checked in this order:
    /// - [`LedgerError::NotInitialized`] before `initialize`
    /// - [`LedgerError::InvalidProof`] if the leaf does not prove into the current
    ///   root, or no root has been published
    /// - [`LedgerError::NothingToClaim`] if `entitled_cumulative` does not exceed
    ///   the claimed total
    /// - [`LedgerError::ReceiverNotEligible`] if the beneficiary cannot receive the asset
    ///   or is the vault account itself
    /// - [`LedgerError::InsufficientVaultFunds`] if the vault cannot cover the payout
    pub fn claim(
        &mut self,
        beneficiary: AccountId,
        entitled_cumulative: u64,
        proof: &[Hash256],
    ) -> Result<u64, LedgerError> {
        let deployment = self.deployment.as_mut().ok_or(LedgerError::NotInitialized)?;
        let state = &deployment.state;

        let leaf = hash_leaf(&self.config.scheme, &beneficiary, entitled_cumulative);
        let proven = state
            .current_root()
            .is_some_and(|root| merkle::verify(&self.config.scheme, &leaf, proof, &root));
        if !proven {
            debug!(%beneficiary, entitled_cumulative, "claim rejected: invalid proof");
            return Err(LedgerError::InvalidProof);
        }

        let claimed = state.claimed_total(&beneficiary);
        if entitled_cumulative <= claimed {
            debug!(%beneficiary, claimed, entitled_cumulative, "claim rejected: nothing to claim");
            return Err(LedgerError::NothingToClaim {
                claimed,
                entitled: entitled_cumulative,
            });
        }
        let payout = entitled_cumulative - claimed;

        if beneficiary == deployment.vault.account() || !self.assets.can_receive(&beneficiary)? {
            debug!(%beneficiary, "claim rejected: receiver not eligible");
            return Err(LedgerError::ReceiverNotEligible(beneficiary));
        }

        let have = deployment.vault.balance(&self.assets)?;
        if have < payout {
            debug!(%beneficiary, have, need = payout, "claim rejected: vault underfunded");
            return Err(LedgerError::InsufficientVaultFunds { have, need: payout });
        }

        let new_total_claimed = state
            .total_claimed()
            .checked_add(payout)
            .ok_or(LedgerError::ArithmeticOverflow)?;

        // Last fallible step; nothing has been mutated before it.
        deployment.vault.pay_out(&mut self.assets, &beneficiary, payout)?;

        deployment
            .state
            .record_claim(beneficiary, entitled_cumulative, new_total_claimed);
        info!(%beneficiary, payout, cumulative = entitled_cumulative, "claim settled");
        self.events.push(LedgerEvent::Claimed {
            beneficiary,
            payout,
        });
        Ok(payout)
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn phase(&self) -> LedgerPhase {
        match &self.deployment {
            None => LedgerPhase::Uninitialized,
            Some(d) if d.state.current_root().is_none() => LedgerPhase::AwaitingRoot,
            Some(_) => LedgerPhase::RootPublished,
        }
    }

    pub fn deployer(&self) -> AccountId {
        self.config.deployer
    }

    pub fn scheme(&self) -> HashScheme {
        self.config.scheme
    }

    /// Current root, or `None` before the first publication.
    pub fn current_root(&self) -> Option<Hash256> {
        self.state().and_then(DistributionState::current_root)
    }

    /// Current authority, or `None` before `initialize`.
    pub fn authority(&self) -> Option<AccountId> {
        self.state().map(DistributionState::authority)
    }

    /// Cumulative amount already paid to `beneficiary` (zero if never claimed).
    pub fn claimed_total(&self, beneficiary: &AccountId) -> u64 {
        self.state().map_or(0, |s| s.claimed_total(beneficiary))
    }

    /// Sum of every payout settled so far.
    pub fn total_claimed(&self) -> u64 {
        self.state().map_or(0, DistributionState::total_claimed)
    }

    /// Vault account, or `None` before `initialize`.
    pub fn vault_account(&self) -> Option<AccountId> {
        self.deployment.as_ref().map(|d| d.vault.account())
    }

    /// Pooled balance available for payouts.
    pub fn vault_balance(&self) -> Result<u64, LedgerError> {
        let deployment = self.deployment.as_ref().ok_or(LedgerError::NotInitialized)?;
        Ok(deployment.vault.balance(&self.assets)?)
    }

    /// Snapshot view of the distribution state.
    pub fn state(&self) -> Option<&DistributionState> {
        self.deployment.as_ref().map(|d| &d.state)
    }

    pub fn assets(&self) -> &A {
        &self.assets
    }

    /// Mutable access to the hosting asset ledger, for account setup that
    /// happens outside this component.
    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    /// Events emitted so far, oldest first.
    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Drain the buffered events.
    pub fn take_events(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }
}

fn ensure_authority(state: &DistributionState, caller: &AccountId) -> Result<(), LedgerError> {
    if *caller != state.authority() {
        debug!(%caller, authority = %state.authority(), "rejected: not authority");
        return Err(LedgerError::NotAuthority);
    }
    Ok(())
}
