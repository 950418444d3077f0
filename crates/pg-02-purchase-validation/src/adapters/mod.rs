//! Adapters layer - in-process implementations of the outbound ports.

pub mod memory_limits;
pub mod static_oracle;

pub use memory_limits::InMemoryDailyLimitStore;
pub use static_oracle::StaticPriceOracle;
