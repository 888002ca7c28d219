//! Deterministic icon and color assignment.
//!
//! Provider cards without a photo render an icon on a colored tile. Both are
//! derived from the provider identity alone, so the same provider looks the
//! same on every page load and on every machine:
//!
//! - the icon comes from the first keyword in [`IconTable::keywords`] found in
//!   `identity + " " + specialties`, or from the fallback set by hash
//! - the color always comes from the palette by hash
//!
//! The two moduli differ, so providers sharing a fallback icon still spread
//! across colors.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigError;
use crate::types::search_text::SearchText;

/// 32-bit multiply-by-31 hash over UTF-16 code units, made non-negative.
///
/// Matches `String.hashCode` / the classic JS `(h << 5) - h + c` fold, so
/// values are stable across platforms and restarts. Empty input hashes to 0.
/// `i32::MIN` maps to `2^31` rather than overflowing.
pub fn identity_hash(identity: &str) -> u32 {
    identity
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
        .unsigned_abs()
}

/// Icon tags understood by the card renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    Soccer,
    Basketball,
    Baseball,
    Tennis,
    Swimming,
    Gymnastics,
    MartialArts,
    Dance,
    Music,
    Theater,
    Art,
    Science,
    Coding,
    Chess,
    Cooking,
    Nature,
    Camp,
    Yoga,
    Reading,
    Tutoring,
    Language,
    Star,
    Sparkles,
    Heart,
    Sun,
    Rocket,
    Puzzle,
}

impl Icon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Icon::Soccer => "soccer",
            Icon::Basketball => "basketball",
            Icon::Baseball => "baseball",
            Icon::Tennis => "tennis",
            Icon::Swimming => "swimming",
            Icon::Gymnastics => "gymnastics",
            Icon::MartialArts => "martial_arts",
            Icon::Dance => "dance",
            Icon::Music => "music",
            Icon::Theater => "theater",
            Icon::Art => "art",
            Icon::Science => "science",
            Icon::Coding => "coding",
            Icon::Chess => "chess",
            Icon::Cooking => "cooking",
            Icon::Nature => "nature",
            Icon::Camp => "camp",
            Icon::Yoga => "yoga",
            Icon::Reading => "reading",
            Icon::Tutoring => "tutoring",
            Icon::Language => "language",
            Icon::Star => "star",
            Icon::Sparkles => "sparkles",
            Icon::Heart => "heart",
            Icon::Sun => "sun",
            Icon::Rocket => "rocket",
            Icon::Puzzle => "puzzle",
        }
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tile background tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Blue,
    Green,
    Purple,
    Orange,
    Pink,
    Teal,
    Amber,
    Indigo,
    Rose,
}

impl ColorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorClass::Blue => "blue",
            ColorClass::Green => "green",
            ColorClass::Purple => "purple",
            ColorClass::Orange => "orange",
            ColorClass::Pink => "pink",
            ColorClass::Teal => "teal",
            ColorClass::Amber => "amber",
            ColorClass::Indigo => "indigo",
            ColorClass::Rose => "rose",
        }
    }
}

impl fmt::Display for ColorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`IconAssigner::assign`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconAssignment {
    pub icon: Icon,
    pub color_class: ColorClass,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconKeyword {
    pub keyword: String,
    pub icon: Icon,
}

/// Ordered keyword table plus hash-indexed fallbacks.
///
/// Construct through [`IconTable::new`] or deserialization; both reject empty
/// fallback sets and palettes and lower-case every keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIconTable", into = "RawIconTable")]
pub struct IconTable {
    keywords: Vec<IconKeyword>,
    fallback_icons: Vec<Icon>,
    palette: Vec<ColorClass>,
}

#[derive(Serialize, Deserialize)]
struct RawIconTable {
    keywords: Vec<IconKeyword>,
    fallback_icons: Vec<Icon>,
    palette: Vec<ColorClass>,
}

impl TryFrom<RawIconTable> for IconTable {
    type Error = ConfigError;

    fn try_from(raw: RawIconTable) -> Result<Self, Self::Error> {
        IconTable::new(raw.keywords, raw.fallback_icons, raw.palette)
    }
}

impl From<IconTable> for RawIconTable {
    fn from(table: IconTable) -> Self {
        Self {
            keywords: table.keywords,
            fallback_icons: table.fallback_icons,
            palette: table.palette,
        }
    }
}

impl IconTable {
    pub fn new(
        keywords: Vec<IconKeyword>,
        fallback_icons: Vec<Icon>,
        palette: Vec<ColorClass>,
    ) -> Result<Self, ConfigError> {
        if fallback_icons.is_empty() {
            return Err(ConfigError::InvalidTables(
                "icon table needs at least one fallback icon".to_string(),
            ));
        }
        if palette.is_empty() {
            return Err(ConfigError::InvalidTables(
                "icon table needs at least one palette color".to_string(),
            ));
        }

        let mut normalized = Vec::with_capacity(keywords.len());
        for entry in keywords {
            let keyword = entry.keyword.trim().to_lowercase();
            if keyword.is_empty() {
                return Err(ConfigError::InvalidTables(
                    "icon keywords must not be blank".to_string(),
                ));
            }
            normalized.push(IconKeyword {
                keyword,
                icon: entry.icon,
            });
        }

        Ok(Self {
            keywords: normalized,
            fallback_icons,
            palette,
        })
    }

    pub fn keywords(&self) -> &[IconKeyword] {
        &self.keywords
    }

    pub fn fallback_icons(&self) -> &[Icon] {
        &self.fallback_icons
    }

    pub fn palette(&self) -> &[ColorClass] {
        &self.palette
    }
}

impl Default for IconTable {
    fn default() -> Self {
        use Icon::*;

        // Longer, more specific keywords go first: "martial" must beat "art".
        let keywords = [
            ("martial", MartialArts),
            ("karate", MartialArts),
            ("taekwondo", MartialArts),
            ("judo", MartialArts),
            ("jiu-jitsu", MartialArts),
            ("basketball", Basketball),
            ("soccer", Soccer),
            ("futbol", Soccer),
            ("baseball", Baseball),
            ("softball", Baseball),
            ("t-ball", Baseball),
            ("tennis", Tennis),
            ("swim", Swimming),
            ("aquatic", Swimming),
            ("gymnast", Gymnastics),
            ("tumbling", Gymnastics),
            ("ballet", Dance),
            ("dance", Dance),
            ("piano", Music),
            ("guitar", Music),
            ("violin", Music),
            ("music", Music),
            ("theater", Theater),
            ("theatre", Theater),
            ("drama", Theater),
            ("robot", Coding),
            ("coding", Coding),
            ("programming", Coding),
            ("science", Science),
            ("stem", Science),
            ("chess", Chess),
            ("cooking", Cooking),
            ("baking", Cooking),
            ("yoga", Yoga),
            ("nature", Nature),
            ("outdoor", Nature),
            ("camp", Camp),
            ("reading", Reading),
            ("library", Reading),
            ("tutor", Tutoring),
            ("math", Tutoring),
            ("spanish", Language),
            ("language", Language),
            ("paint", Art),
            ("craft", Art),
            ("art", Art),
        ]
        .into_iter()
        .map(|(keyword, icon)| IconKeyword {
            keyword: keyword.to_string(),
            icon,
        })
        .collect();

        Self {
            keywords,
            fallback_icons: vec![Star, Sparkles, Heart, Sun, Rocket, Puzzle],
            palette: vec![
                ColorClass::Blue,
                ColorClass::Green,
                ColorClass::Purple,
                ColorClass::Orange,
                ColorClass::Pink,
                ColorClass::Teal,
                ColorClass::Amber,
            ],
        }
    }
}

/// Pure mapping from identity (+ specialties) to an [`IconAssignment`].
#[derive(Debug, Clone, Default)]
pub struct IconAssigner {
    table: IconTable,
}

impl IconAssigner {
    pub fn new(table: IconTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &IconTable {
        &self.table
    }

    pub fn assign(&self, identity: &str, specialties_text: &str) -> IconAssignment {
        self.assign_text(&SearchText::for_icon(identity, specialties_text))
    }

    /// Assign from pre-assembled text; the text's seed is the identity hash.
    pub fn assign_text(&self, text: &SearchText) -> IconAssignment {
        let hash = text.seed() as usize;

        let icon = self
            .table
            .keywords
            .iter()
            .find(|entry| text.contains(&entry.keyword))
            .map(|entry| entry.icon)
            .unwrap_or(self.table.fallback_icons[hash % self.table.fallback_icons.len()]);

        let color_class = self.table.palette[hash % self.table.palette.len()];

        IconAssignment { icon, color_class }
    }
}
