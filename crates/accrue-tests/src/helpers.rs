//! Shared test helpers for scenario and adversarial tests.

use accrue_core::codec::hash_leaf;
use accrue_core::distribution::{Distribution, Entitlement};
use accrue_core::hashing::HashScheme;
use accrue_core::types::{AccountId, Hash256};
use accrue_ledger::{DistributionLedger, LedgerConfig, MemoryAssetLedger};

pub type TestLedger = DistributionLedger<MemoryAssetLedger>;

pub const DEPLOYER: AccountId = AccountId([0xD0; 32]);
pub const FUNDER: AccountId = AccountId([0xF0; 32]);
pub const ALICE: AccountId = AccountId([0xA1; 32]);
pub const BOB: AccountId = AccountId([0xB0; 32]);
pub const RELAYER: AccountId = AccountId([0x5E; 32]);

/// Balance minted to [`FUNDER`] by [`setup`].
pub const FUNDER_BALANCE: u64 = 1_000_000_000;

/// Account id from a seed byte.
pub fn acct(seed: u8) -> AccountId {
    AccountId([seed; 32])
}

/// Leaf digest under the canonical scheme.
pub fn leaf(beneficiary: &AccountId, amount: u64) -> Hash256 {
    hash_leaf(&HashScheme::CANONICAL, beneficiary, amount)
}

/// Initialized ledger with a funded [`FUNDER`] and registered [`ALICE`],
/// [`BOB`] and [`RELAYER`]. The vault starts empty.
pub fn setup() -> TestLedger {
    let mut assets = MemoryAssetLedger::new();
    assets
        .mint(&FUNDER, FUNDER_BALANCE)
        .expect("mint funder");
    for who in [ALICE, BOB, RELAYER] {
        assets.mint(&who, 0).expect("register account");
    }
    let mut ledger = DistributionLedger::new(LedgerConfig::new(DEPLOYER), assets);
    ledger.initialize(&DEPLOYER).expect("initialize");
    ledger
}

/// [`setup`] followed by a deposit of `amount` into the vault.
pub fn setup_funded(amount: u64) -> TestLedger {
    let mut ledger = setup();
    ledger.deposit(&FUNDER, amount).expect("deposit");
    ledger
}

/// Build a canonical distribution and publish its root.
pub fn publish(ledger: &mut TestLedger, entries: &[(AccountId, u64)]) -> Distribution {
    let entries = entries
        .iter()
        .map(|&(b, a)| Entitlement::new(b, a))
        .collect();
    let dist = Distribution::build(HashScheme::CANONICAL, entries).expect("build distribution");
    let authority = ledger.authority().expect("initialized");
    ledger
        .publish_root(&authority, dist.root())
        .expect("publish root");
    dist
}

/// Balance of `who` on the underlying asset ledger.
pub fn balance(ledger: &TestLedger, who: &AccountId) -> u64 {
    use accrue_ledger::AssetLedger;
    ledger.assets().balance_of(who).expect("balance")
}
