//! Coinguard App - Guard modules wired into the accounting component
//!
//! ```text
//! Msg ──► GuardApp::deliver ──► atomic overlay
//!                                   │
//!           ┌───────────────────────┼──────────────────────┐
//!           ▼                       ▼                      ▼
//!        bank send          quarantine handler      sanction handler
//!           │
//!    sanction restriction (sender) ─► quarantine restriction (recipient)
//! ```

pub mod app;
pub mod config;
pub mod error;

pub use app::{GenesisState, GuardApp, Msg};
pub use config::GuardConfig;
pub use error::{AppError, AppResult};
