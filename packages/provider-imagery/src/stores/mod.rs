//! Storage implementations for the resolution cache.
//!
//! Available backends:
//! - `MemoryCache` - In-process map (always available)
//! - `PostgresCache` - Writes to `providers.profile_image_url` (requires `postgres` feature)

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::MemoryCache;

#[cfg(feature = "postgres")]
pub use postgres::PostgresCache;
