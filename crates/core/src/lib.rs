//! Karma Shop Core - Shared types and storefront logic.
//!
//! This crate provides everything the storefront needs that does not touch
//! the network or a request. It is shared by:
//! - `storefront` - Public-facing web service (axum)
//! - `integration-tests` - End-to-end tests against a spawned storefront
//!
//! # Architecture
//!
//! The core crate contains types, static catalog tables and pure state
//! machines. Persistence goes through the [`storage::KeyValueStore`] trait
//! so the cart and flow controller can be driven from a session, a test
//! harness or an in-memory map.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices and catalog enums
//! - [`catalog`] - Static product, game pass and music tables
//! - [`cart`] - Cart store with derived totals
//! - [`flow`] - Intro / terms / content sequencer
//! - [`music`] - Playlist cursor over the track table
//! - [`notice`] - Transient user notifications
//! - [`storage`] - Key-value persistence seam
//! - [`verification`] - Outcome of external existence checks

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod flow;
pub mod music;
pub mod notice;
pub mod storage;
pub mod types;
pub mod verification;

pub use notice::Notice;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_reexported_at_root() {
        let notice: Notice = notice::Notice::welcome();
        assert_eq!(notice, crate::notice::Notice::welcome());
    }
}
