//! Keyword-driven placeholder images.
//!
//! Matching is two-pass over the lower-cased [`SearchText`]:
//!
//! 1. synonyms (`keyword -> category`) in declaration order
//! 2. canonical category names as substrings, in declaration order
//!
//! The first hit wins in each pass; pass 1 always beats pass 2. Text that
//! matches nothing gets the default category. Every category owns at least
//! one image, so a lookup never comes back empty.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::search_text::SearchText;

/// Default location of the curated placeholder set.
pub const DEFAULT_PLACEHOLDER_BASE_URL: &str = "https://cdn.kidsactivities.example/placeholders";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderCategory {
    /// Canonical name, also matched as a substring in pass 2
    pub name: String,
    /// Candidate images; one is picked by the provider's identity hash
    pub images: Vec<String>,
}

impl PlaceholderCategory {
    /// Pick a candidate image. Same seed, same image.
    pub fn image(&self, seed: u32) -> &str {
        &self.images[seed as usize % self.images.len()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub keyword: String,
    pub category: String,
}

/// Validated placeholder tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCategoryTable", into = "RawCategoryTable")]
pub struct CategoryTable {
    categories: Vec<PlaceholderCategory>,
    /// (keyword, index into `categories`)
    synonyms: Vec<(String, usize)>,
    default_index: usize,
}

#[derive(Serialize, Deserialize)]
struct RawCategoryTable {
    categories: Vec<PlaceholderCategory>,
    #[serde(default)]
    synonyms: Vec<Synonym>,
    default_category: String,
}

impl TryFrom<RawCategoryTable> for CategoryTable {
    type Error = ConfigError;

    fn try_from(raw: RawCategoryTable) -> Result<Self, Self::Error> {
        CategoryTable::new(raw.categories, raw.synonyms, &raw.default_category)
    }
}

impl From<CategoryTable> for RawCategoryTable {
    fn from(table: CategoryTable) -> Self {
        let synonyms = table
            .synonyms
            .iter()
            .map(|(keyword, index)| Synonym {
                keyword: keyword.clone(),
                category: table.categories[*index].name.clone(),
            })
            .collect();
        let default_category = table.categories[table.default_index].name.clone();

        Self {
            categories: table.categories,
            synonyms,
            default_category,
        }
    }
}

impl CategoryTable {
    pub fn new(
        categories: Vec<PlaceholderCategory>,
        synonyms: Vec<Synonym>,
        default_category: &str,
    ) -> Result<Self, ConfigError> {
        let mut normalized: Vec<PlaceholderCategory> = Vec::with_capacity(categories.len());
        for category in categories {
            let name = category.name.trim().to_lowercase();
            if name.is_empty() {
                return Err(ConfigError::InvalidTables(
                    "placeholder category names must not be blank".to_string(),
                ));
            }
            if category.images.iter().all(|url| url.trim().is_empty()) {
                return Err(ConfigError::InvalidTables(format!(
                    "placeholder category '{}' has no images",
                    name
                )));
            }
            if normalized.iter().any(|c| c.name == name) {
                return Err(ConfigError::InvalidTables(format!(
                    "duplicate placeholder category '{}'",
                    name
                )));
            }
            let images = category
                .images
                .into_iter()
                .filter(|url| !url.trim().is_empty())
                .collect();
            normalized.push(PlaceholderCategory { name, images });
        }

        let index_of = |name: &str| {
            let name = name.trim().to_lowercase();
            normalized
                .iter()
                .position(|c| c.name == name)
                .ok_or_else(|| {
                    ConfigError::InvalidTables(format!("unknown placeholder category '{}'", name))
                })
        };

        let default_index = index_of(default_category)?;

        let mut resolved = Vec::with_capacity(synonyms.len());
        for synonym in synonyms {
            let keyword = synonym.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                return Err(ConfigError::InvalidTables(
                    "placeholder synonyms must not be blank".to_string(),
                ));
            }
            resolved.push((keyword, index_of(&synonym.category)?));
        }

        Ok(Self {
            categories: normalized,
            synonyms: resolved,
            default_index,
        })
    }

    pub fn categories(&self) -> &[PlaceholderCategory] {
        &self.categories
    }

    pub fn default_category(&self) -> &PlaceholderCategory {
        &self.categories[self.default_index]
    }

    pub fn category(&self, name: &str) -> Option<&PlaceholderCategory> {
        self.categories.iter().find(|c| c.name == name)
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let names = [
            "soccer",
            "basketball",
            "baseball",
            "tennis",
            "swimming",
            "gymnastics",
            "martial arts",
            "dance",
            "music",
            "theater",
            "art",
            "science",
            "coding",
            "chess",
            "cooking",
            "nature",
            "camp",
            "tutoring",
            "sports",
            "general",
        ];

        let categories = names
            .iter()
            .map(|name| {
                let slug = name.replace(' ', "-");
                PlaceholderCategory {
                    name: name.to_string(),
                    images: (1..=2)
                        .map(|n| format!("{}/{}-{}.jpg", DEFAULT_PLACEHOLDER_BASE_URL, slug, n))
                        .collect(),
                }
            })
            .collect::<Vec<_>>();

        // Coding synonyms precede art ones so "minecraft" is not read as "craft".
        let synonyms = [
            ("futbol", "soccer"),
            ("football", "soccer"),
            ("hoops", "basketball"),
            ("softball", "baseball"),
            ("t-ball", "baseball"),
            ("swim", "swimming"),
            ("aquatic", "swimming"),
            ("tumbling", "gymnastics"),
            ("cheer", "gymnastics"),
            ("karate", "martial arts"),
            ("taekwondo", "martial arts"),
            ("judo", "martial arts"),
            ("jiu-jitsu", "martial arts"),
            ("kung fu", "martial arts"),
            ("ballet", "dance"),
            ("hip hop", "dance"),
            ("piano", "music"),
            ("guitar", "music"),
            ("violin", "music"),
            ("drum", "music"),
            ("choir", "music"),
            ("singing", "music"),
            ("theatre", "theater"),
            ("drama", "theater"),
            ("acting", "theater"),
            ("robot", "coding"),
            ("programming", "coding"),
            ("minecraft", "coding"),
            ("stem", "science"),
            ("paint", "art"),
            ("craft", "art"),
            ("pottery", "art"),
            ("drawing", "art"),
            ("baking", "cooking"),
            ("chef", "cooking"),
            ("hiking", "nature"),
            ("outdoor", "nature"),
            ("garden", "nature"),
            ("tutor", "tutoring"),
            ("math", "tutoring"),
            ("reading", "tutoring"),
            ("homework", "tutoring"),
            ("athletic", "sports"),
        ];

        let synonyms = synonyms
            .iter()
            .map(|(keyword, category)| {
                let index = names
                    .iter()
                    .position(|n| n == category)
                    .unwrap_or(names.len() - 1);
                (keyword.to_string(), index)
            })
            .collect();

        Self {
            categories,
            synonyms,
            default_index: names.len() - 1,
        }
    }
}

/// Maps free text to a curated placeholder image. Pure, never fails.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderCategorizer {
    table: CategoryTable,
}

impl PlaceholderCategorizer {
    pub fn new(table: CategoryTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Image URL for the text, candidate picked by the text's seed.
    pub fn categorize(&self, text: &SearchText) -> &str {
        self.category_for(text).image(text.seed())
    }

    /// Seedless form; always the category's first image.
    pub fn categorize_str(&self, text: &str) -> &str {
        self.categorize(&SearchText::new(text))
    }

    pub fn category_for(&self, text: &SearchText) -> &PlaceholderCategory {
        let by_synonym = self
            .table
            .synonyms
            .iter()
            .find(|(keyword, _)| text.contains(keyword))
            .map(|(_, index)| &self.table.categories[*index]);

        by_synonym
            .or_else(|| {
                self.table
                    .categories
                    .iter()
                    .find(|category| text.contains(&category.name))
            })
            .unwrap_or_else(|| self.table.default_category())
    }
}
