//! Geographic categories and data provenance.
//!
//! Both enums offer compile-time safety for lookups that the upstream
//! datasets express as free-form strings.
//!
//! # Examples
//! ```
//! use marea_core::{Category, DataSource};
//!
//! assert_eq!(Category::Coastal.as_str(), "coastal");
//! assert_eq!(DataSource::AiEnriched.to_string(), "aiEnriched");
//! assert!(DataSource::Official.outranks(DataSource::Heuristic));
//! ```

use serde::{Deserialize, Serialize};

/// Broad tourism profile of a municipality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Mediterranean seaside municipality.
    Coastal,
    /// Pyrenean or pre-Pyrenean municipality.
    Mountain,
    /// Large urban municipality.
    City,
    /// Everything else; the fallback when nothing classifies.
    Interior,
}

impl Category {
    /// Every category in declaration order.
    pub const ALL: [Self; 4] = [Self::Coastal, Self::Mountain, Self::City, Self::Interior];

    /// Return the category as a lowercase `&str`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Coastal => "coastal",
            Self::Mountain => "mountain",
            Self::City => "city",
            Self::Interior => "interior",
        }
    }

    /// Position of the category inside [`Category::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Coastal => 0,
            Self::Mountain => 1,
            Self::City => 2,
            Self::Interior => 3,
        }
    }

    /// Map common spellings onto a canonical category.
    ///
    /// Accepts the canonical names plus the English, Catalan and Spanish
    /// variants found in enrichment payloads (`"costa"`, `"montaña"`,
    /// `"urbano"`, `"playa"`, ...). Matching ignores case and surrounding
    /// whitespace.
    ///
    /// # Examples
    /// ```
    /// use marea_core::Category;
    ///
    /// assert_eq!(Category::normalise(" Montanya "), Some(Category::Mountain));
    /// assert_eq!(Category::normalise("playa"), Some(Category::Coastal));
    /// assert_eq!(Category::normalise("suburb"), None);
    /// ```
    #[must_use]
    pub fn normalise(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "coastal" | "coast" | "costa" | "playa" | "platja" | "beach" => Some(Self::Coastal),
            "mountain" | "montaña" | "montana" | "montanya" | "muntanya" => Some(Self::Mountain),
            "city" | "ciudad" | "ciutat" | "urbano" | "urban" => Some(Self::City),
            "interior" | "rural" => Some(Self::Interior),
            _ => None,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "coastal" => Ok(Self::Coastal),
            "mountain" => Ok(Self::Mountain),
            "city" => Ok(Self::City),
            "interior" => Ok(Self::Interior),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

/// Provenance of the static facts behind a record.
///
/// Precedence is `Official > AiEnriched > Heuristic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DataSource {
    /// Official statistics.
    Official,
    /// Values estimated by an AI enrichment agent.
    #[serde(alias = "ai_enriched")]
    AiEnriched,
    /// Values derived from geographic heuristics only.
    #[default]
    Heuristic,
}

impl DataSource {
    /// Every source from most to least authoritative.
    pub const BY_PRECEDENCE: [Self; 3] = [Self::Official, Self::AiEnriched, Self::Heuristic];

    /// Numeric rank; higher wins.
    #[must_use]
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Official => 2,
            Self::AiEnriched => 1,
            Self::Heuristic => 0,
        }
    }

    /// Report whether `self` is strictly more authoritative than `other`.
    #[must_use]
    pub const fn outranks(self, other: Self) -> bool {
        self.precedence() > other.precedence()
    }

    /// Return the source in its serialised camelCase form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Official => "official",
            Self::AiEnriched => "aiEnriched",
            Self::Heuristic => "heuristic",
        }
    }
}

impl std::fmt::Display for DataSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Category::Mountain.to_string(), Category::Mountain.as_str());
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = Category::from_str("suburb").expect_err("unknown category");
        assert!(err.contains("unknown category"));
    }

    #[rstest]
    #[case("COSTA", Category::Coastal)]
    #[case("montaña", Category::Mountain)]
    #[case("urbano", Category::City)]
    #[case("Interior", Category::Interior)]
    fn normalise_maps_variants(#[case] raw: &str, #[case] expected: Category) {
        assert_eq!(Category::normalise(raw), Some(expected));
    }

    #[test]
    fn index_matches_all_order() {
        for (position, category) in Category::ALL.iter().enumerate() {
            assert_eq!(category.index(), position);
        }
    }

    #[test]
    fn official_outranks_everything() {
        assert!(DataSource::Official.outranks(DataSource::AiEnriched));
        assert!(DataSource::AiEnriched.outranks(DataSource::Heuristic));
        assert!(!DataSource::Heuristic.outranks(DataSource::Heuristic));
    }

    #[test]
    fn serialises_camel_case() {
        let json = serde_json::to_string(&DataSource::AiEnriched).expect("serialise source");
        assert_eq!(json, "\"aiEnriched\"");
        let category = serde_json::to_string(&Category::City).expect("serialise category");
        assert_eq!(category, "\"city\"");
    }
}
