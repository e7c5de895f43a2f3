//! Coinguard Core - Shared ledger-side types
//!
//! - [`Address`], [`Amount`], [`Coin`], [`Coins`]: value types
//! - [`store`]: ordered key-value store, write overlay, module namespaces
//! - [`keys`]: length-prefixed key encoding shared by the guard modules
//! - [`Context`]: explicit execution context (store handle, header, events)
//! - [`gov`]: governance interface consumed by the sanction module
//! - [`FatalError`]: invariant violations that must halt the block

pub mod address;
pub mod amount;
pub mod coin;
pub mod context;
pub mod error;
pub mod gov;
pub mod keys;
pub mod pagination;
pub mod store;

pub use address::{Address, AddressError};
pub use amount::{Amount, AmountError};
pub use coin::{Coin, CoinError, Coins};
pub use context::{BlockHeader, Context, Event, TypedEvent};
pub use error::FatalError;
pub use gov::{AnyMsg, GovHooks, GovKeeper, MemGov, Proposal, ProposalStatus};
pub use pagination::{paginate, PageRequest, PageResponse};
pub use store::{KvRead, KvStore, MemStore};
