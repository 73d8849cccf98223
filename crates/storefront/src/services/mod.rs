//! Services the storefront calls out to.
//!
//! - `verification` - existence checks against the game platform

pub mod verification;

pub use verification::{PlatformVerifier, VerificationError};
