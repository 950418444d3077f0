//! # Attack Simulations
//!
//! Each module replays a known attack against the wired gate and asserts it
//! is refused without side effects.

pub mod limit_race;
pub mod malleability;
pub mod replay;
