//! # accrue-ledger
//! Cumulative-claim distribution ledger.
//!
//! - [`ledger::DistributionLedger`]: root publication, authority rotation,
//!   vault funding and claim settlement
//! - [`vault::Vault`]: capability-gated custody of the pooled balance
//! - [`asset::AssetLedger`]: interface to the hosting balance ledger, with
//!   [`asset::MemoryAssetLedger`] for tests and simulation
//! - [`config::LedgerConfig`]: deployer identity and hash scheme

pub mod asset;
pub mod config;
pub mod error;
pub mod events;
pub mod ledger;
pub mod state;
pub mod vault;

pub use asset::{AssetLedger, MemoryAssetLedger};
pub use config::LedgerConfig;
pub use error::{AssetError, LedgerError};
pub use events::LedgerEvent;
pub use ledger::{DistributionLedger, LedgerPhase};
pub use state::DistributionState;
pub use vault::{Vault, vault_account_for};
