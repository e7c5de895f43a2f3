//! Coinguard Sanction - Governance-maintained address blocklist
//!
//! Sanctioned accounts cannot send. The permanent set changes only when
//! a governance proposal carrying [`MsgSanction`] or [`MsgUnsanction`]
//! passes. While such a proposal is pending with enough deposit, its
//! addresses are sanctioned (or unsanctioned) temporarily:
//!
//! ```text
//! submit / deposit >= threshold ──► temp entry (addr, proposal id)
//!                                        │
//!        passed ──► permanent set updated, temp entries for addr dropped
//!        rejected / failed ──► this proposal's temp entries dropped
//! ```
//!
//! Unsanctionable addresses (module accounts and configured extras) are
//! never blocked.

pub mod error;
pub mod events;
pub mod genesis;
pub mod handler;
pub mod hooks;
pub mod keeper;
pub mod keys;
pub mod msgs;
pub mod query;
pub mod restriction;
pub mod types;

pub use error::{SanctionError, SanctionResult};
pub use events::SanctionEvent;
pub use genesis::{export_genesis, init_genesis, GenesisState};
pub use hooks::SanctionGovHooks;
pub use keeper::SanctionKeeper;
pub use keys::STORE_KEY;
pub use msgs::{
    MsgSanction, MsgUnsanction, MsgUpdateParams, SanctionMsg, MSG_SANCTION_TYPE_URL,
    MSG_UNSANCTION_TYPE_URL, MSG_UPDATE_PARAMS_TYPE_URL,
};
pub use restriction::{SanctionSendRestriction, CODE_SANCTIONED};
pub use types::{Params, TempStatus, TemporaryEntry};
