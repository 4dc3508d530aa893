//! Product category tags.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0} (expected one of menstrual, food, safety, wellness)")]
pub struct CategoryError(pub String);

/// The fixed set of catalog categories.
///
/// Serialized as the lowercase tag (`"menstrual"`, `"food"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Menstrual,
    Food,
    Safety,
    Wellness,
}

impl Category {
    /// Every category, in storefront display order.
    pub const ALL: [Self; 4] = [Self::Menstrual, Self::Safety, Self::Wellness, Self::Food];

    /// Wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Menstrual => "menstrual",
            Self::Food => "food",
            Self::Safety => "safety",
            Self::Wellness => "wellness",
        }
    }

    /// Human-readable name shown in category filters.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Menstrual => "Menstrual Care",
            Self::Food => "Health Foods",
            Self::Safety => "Safety",
            Self::Wellness => "Wellness",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "menstrual" => Ok(Self::Menstrual),
            "food" => Ok(Self::Food),
            "safety" => Ok(Self::Safety),
            "wellness" => Ok(Self::Wellness),
            _ => Err(CategoryError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Safety".parse::<Category>().unwrap(), Category::Safety);
        assert_eq!(" food ".parse::<Category>().unwrap(), Category::Food);
        assert!("all".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_tag() {
        let json = serde_json::to_string(&Category::Wellness).unwrap();
        assert_eq!(json, "\"wellness\"");
        let parsed: Category = serde_json::from_str("\"menstrual\"").unwrap();
        assert_eq!(parsed, Category::Menstrual);
    }
}
