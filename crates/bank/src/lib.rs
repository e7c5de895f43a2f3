//! Coinguard Bank - Accounting component
//!
//! [`BankKeeper`] is the narrow interface the guard modules consume.
//! [`Bank`] is a store-backed implementation that consults the
//! registered restriction chains on every send and mint:
//!
//! ```text
//! send_coins(from, to, amt)
//!     │
//!     ▼
//! send restriction chain ──► Err? abort
//!     │ to'
//!     ▼
//! balance(from) - locked(from) >= amt ? ──► no: InsufficientFunds
//!     │
//!     ▼
//! from -= amt, to' += amt
//! ```

pub mod error;
pub mod keeper;

pub use error::{BankError, BankResult};
pub use keeper::{Bank, BankEvent, BankKeeper, STORE_KEY};
