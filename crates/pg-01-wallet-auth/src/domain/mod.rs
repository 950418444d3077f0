//! # Domain Layer
//!
//! Pure authentication logic with no I/O dependencies.

pub mod entities;
pub mod errors;
pub mod replay;
pub mod session;
pub mod signature;
