//! Seams between the resolver and its collaborators.
//!
//! The resolver is generic over both, so tests substitute the mocks in
//! [`crate::testing`] and deployments pick a storage backend.

pub mod cache;
pub mod preview;
