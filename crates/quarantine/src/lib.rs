//! Coinguard Quarantine - Consent gate for incoming transfers
//!
//! An account that opts in no longer receives transfers directly. The
//! send restriction redirects them to a holding account and records them
//! per (recipient, sender):
//!
//! ```text
//! S --100fish--> T (opted in)
//!        │
//!        ▼
//! holder += 100fish, record[T, S] += 100fish
//!        │
//!   Accept(T, [S]) ──► holder -> T, record deleted
//!   Decline(T, [S]) ─► record.declined = true
//! ```
//!
//! Per-sender auto-responses short-circuit the gate (ACCEPT) or mark new
//! funds declined (DECLINE).

pub mod error;
pub mod events;
pub mod genesis;
pub mod handler;
pub mod invariants;
pub mod keeper;
pub mod keys;
pub mod msgs;
pub mod query;
pub mod restriction;
pub mod types;

pub use error::{QuarantineError, QuarantineResult};
pub use events::QuarantineEvent;
pub use genesis::{export_genesis, init_genesis, GenesisState};
pub use invariants::check_holder_balance;
pub use keeper::QuarantineKeeper;
pub use keys::STORE_KEY;
pub use msgs::{MsgAccept, MsgDecline, MsgOptIn, MsgOptOut, MsgUpdateAutoResponses, QuarantineMsg};
pub use restriction::{HolderLockedCoins, QuarantineSendRestriction, CODE_HOLDER_NOT_RECIPIENT};
pub use types::{AutoResponse, AutoResponseEntry, AutoResponseUpdate, QuarantineRecord, QuarantinedFunds};
