//! Provider descriptors handed to the resolver.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable primary identifier of a saved provider record.
///
/// Only durable ids can key the resolution cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurableId(String);

impl DurableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DurableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DurableId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for DurableId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Who a descriptor refers to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ProviderIdentity {
    /// A persisted provider record
    Durable(DurableId),
    /// An external, not-yet-saved search result reference
    Ephemeral(String),
}

impl ProviderIdentity {
    pub fn as_str(&self) -> &str {
        match self {
            ProviderIdentity::Durable(id) => id.as_str(),
            ProviderIdentity::Ephemeral(reference) => reference,
        }
    }

    pub fn is_durable(&self) -> bool {
        matches!(self, ProviderIdentity::Durable(_))
    }

    pub fn durable_id(&self) -> Option<&DurableId> {
        match self {
            ProviderIdentity::Durable(id) => Some(id),
            ProviderIdentity::Ephemeral(_) => None,
        }
    }
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything the pipeline knows about one provider card.
///
/// # Example
///
/// ```rust
/// use provider_imagery::ProviderDescriptor;
///
/// let descriptor = ProviderDescriptor::durable("7f3c", "Lakeside Soccer Academy")
///     .with_specialties(["soccer"])
///     .with_website("https://lakeside.example");
///
/// assert!(descriptor.identity.is_durable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub identity: ProviderIdentity,

    pub display_name: String,

    #[serde(default)]
    pub specialties: Vec<String>,

    pub description: Option<String>,

    pub website_url: Option<String>,

    /// Curated or previously resolved image
    pub existing_image_url: Option<String>,
}

impl ProviderDescriptor {
    /// Descriptor for a saved provider.
    pub fn durable(id: impl Into<DurableId>, display_name: impl Into<String>) -> Self {
        Self::new(ProviderIdentity::Durable(id.into()), display_name)
    }

    /// Descriptor for an unsaved search result.
    pub fn ephemeral(reference: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(ProviderIdentity::Ephemeral(reference.into()), display_name)
    }

    pub fn new(identity: ProviderIdentity, display_name: impl Into<String>) -> Self {
        Self {
            identity,
            display_name: display_name.into(),
            specialties: Vec::new(),
            description: None,
            website_url: None,
            existing_image_url: None,
        }
    }

    pub fn with_specialties(
        mut self,
        specialties: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.specialties = specialties.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_website(mut self, url: impl Into<String>) -> Self {
        self.website_url = Some(url.into());
        self
    }

    pub fn with_existing_image(mut self, url: impl Into<String>) -> Self {
        self.existing_image_url = Some(url.into());
        self
    }

    /// Existing image, ignoring blank values.
    pub fn existing_image(&self) -> Option<&str> {
        non_blank(self.existing_image_url.as_deref())
    }

    /// Website, ignoring blank values.
    pub fn website(&self) -> Option<&str> {
        non_blank(self.website_url.as_deref())
    }

    pub fn durable_id(&self) -> Option<&DurableId> {
        self.identity.durable_id()
    }

    /// Specialties joined with single spaces.
    pub fn specialties_text(&self) -> String {
        self.specialties.join(" ")
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
