//! Provider Visual Identity Resolution
//!
//! Gives every provider card in the activity directory a picture, even when
//! the provider never uploaded one.
//!
//! # Pipeline
//!
//! For each [`ProviderDescriptor`] the [`ImageResolver`] tries, in order:
//!
//! 1. the provider's existing (curated or previously resolved) image
//! 2. the resolution cache, for saved providers
//! 3. the `og:image` / `twitter:image` of the provider's website
//! 4. a curated placeholder picked by keyword from name, specialties, and
//!    description
//!
//! Step 4 always succeeds, so `resolve` always returns an image URL. Results
//! for saved providers are written back to the cache in the background.
//! Independently, [`IconAssigner`] derives a stable icon and tile color from
//! the provider identity.
//!
//! # Usage
//!
//! ```rust,ignore
//! use provider_imagery::{ImageResolver, MemoryCache, ProviderDescriptor, ResolverConfig};
//!
//! let resolver = ImageResolver::from_config(ResolverConfig::from_env()?, MemoryCache::new())?;
//!
//! let card = ProviderDescriptor::ephemeral("places/ChIJ42", "Lakeside Soccer Academy")
//!     .with_specialties(["soccer"])
//!     .with_website("https://lakesidesoccer.example");
//!
//! let result = resolver.resolve(&card).await;
//! let icon = resolver.assign_icon(&card);
//! ```
//!
//! # Modules
//!
//! - [`icons`] - Deterministic icon and color assignment
//! - [`placeholder`] - Keyword-driven placeholder images
//! - [`website`] - Bounded website fetch and preview tag scan
//! - [`stores`] - Cache backends (MemoryCache, PostgresCache)
//! - [`resolver`] - The orchestrator
//! - [`testing`] - Mock implementations for testing

pub mod config;
pub mod error;
pub mod icons;
pub mod placeholder;
pub mod resolver;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;
pub mod website;

pub use config::{ImageryTables, ResolverConfig};
pub use error::{CacheError, ConfigError, FetchError};
pub use icons::{identity_hash, ColorClass, Icon, IconAssigner, IconAssignment, IconTable};
pub use placeholder::{CategoryTable, PlaceholderCategorizer, PlaceholderCategory, Synonym};
pub use resolver::ImageResolver;
pub use traits::{cache::ImageCache, preview::PreviewImageSource};
pub use types::{
    descriptor::{DurableId, ProviderDescriptor, ProviderIdentity},
    resolution::{ImageSource, PreviewImage, ResolutionResult},
    search_text::SearchText,
};
pub use website::{scan_preview_image, HttpPreviewExtractor};

pub use stores::MemoryCache;

#[cfg(feature = "postgres")]
pub use stores::PostgresCache;
