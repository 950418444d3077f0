//! # Shared Types Crate
//!
//! Primitives used across the purchase-gate subsystems.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: wallet addresses are parsed and rendered in
//!   exactly one place, so every subsystem agrees on the canonical
//!   lower-case `0x` form.
//! - **Injectable Time**: anything that compares against "now" takes a
//!   [`TimeSource`], never `SystemTime` directly.

pub mod entities;
pub mod errors;
pub mod time;

pub use entities::*;
pub use errors::*;
pub use time::{MockTimeSource, SystemTimeSource, TimeSource};
