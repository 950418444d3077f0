//! Domain layer - pure purchase validation logic, no I/O.

pub mod amount;
pub mod entities;
pub mod errors;
pub mod rules;
pub mod tokens;
pub mod transaction_id;
