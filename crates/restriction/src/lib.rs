//! Coinguard Restriction - Composable transfer policies
//!
//! The accounting component calls one restriction per flavor; each of
//! those may be a pipeline of many policies:
//!
//! - [`SendRestriction`]: may rewrite the recipient, first error aborts
//! - [`MintRestriction`]: first error aborts
//! - [`LockedCoinsLookup`]: every lookup runs, results are summed

pub mod error;
pub mod pipeline;
pub mod traits;

pub use error::{RestrictionError, RestrictionResult};
pub use pipeline::{
    compose_locked, compose_mint, compose_send, then_locked, then_mint, then_send,
    LockedCoinsPipeline, MintPipeline, SendPipeline,
};
pub use traits::{
    locked_fn, mint_fn, send_fn, LockedCoinsLookup, LockedCoinsLookupRef, MintRestriction,
    MintRestrictionRef, SendRestriction, SendRestrictionRef,
};
