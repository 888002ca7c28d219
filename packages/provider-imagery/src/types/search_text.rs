//! The one place free text is assembled for keyword matching.

use crate::icons::identity_hash;
use crate::types::descriptor::ProviderDescriptor;

/// Lower-cased text that keyword tables are matched against, plus the
/// identity-derived seed used to pick among equivalent candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchText {
    text: String,
    seed: u32,
}

impl SearchText {
    /// Unseeded text. Candidate selection always picks the first image.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_lowercase(),
            seed: 0,
        }
    }

    /// `display_name + specialties + description`, seeded by the identity.
    pub fn from_descriptor(descriptor: &ProviderDescriptor) -> Self {
        let mut parts: Vec<&str> = Vec::with_capacity(descriptor.specialties.len() + 2);
        parts.push(&descriptor.display_name);
        parts.extend(descriptor.specialties.iter().map(String::as_str));
        if let Some(description) = descriptor.description.as_deref() {
            parts.push(description);
        }

        Self::join(&parts).with_seed(identity_hash(descriptor.identity.as_str()))
    }

    /// `identity + " " + specialties_text`, as matched by the icon table.
    pub fn for_icon(identity: &str, specialties_text: &str) -> Self {
        Self {
            text: format!("{} {}", identity, specialties_text).to_lowercase(),
            seed: identity_hash(identity),
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Substring match. Keywords are expected lower-case.
    pub fn contains(&self, keyword: &str) -> bool {
        !keyword.is_empty() && self.text.contains(keyword)
    }

    fn join(parts: &[&str]) -> Self {
        let joined = parts
            .iter()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Self::new(&joined)
    }
}
