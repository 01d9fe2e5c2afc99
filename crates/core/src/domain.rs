use std::borrow::Borrow;
use std::fmt;

use geo::MultiPolygon;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Maximum number of characters in a region description or timeline entry.
pub const DESCRIPTION_CHAR_CAP: usize = 200;

/// Internal (English) name of a prefecture, e.g. `"Miyagi Ken"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(String);

impl RegionKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RegionKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RegionKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// One prefecture polygon from the boundary dataset. Never mutated after load.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionFeature {
    pub key: RegionKey,
    pub display_name: String,
    pub code: Option<u32>,
    /// Rings of `[longitude, latitude]` pairs, one polygon per island group.
    pub geometry: MultiPolygon<f64>,
}

/// Editable commentary shown in the detail panel for a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAnnotation {
    pub display_name: String,
    pub description: String,
    pub preview_image: String,
}

impl RegionAnnotation {
    /// The entry every region starts with until someone edits it.
    pub fn placeholder(display_name: &str, index: usize) -> Self {
        Self {
            display_name: display_name.to_string(),
            description: placeholder_description(display_name),
            preview_image: format!("https://picsum.photos/800?random={index}"),
        }
    }
}

pub fn placeholder_description(display_name: &str) -> String {
    format!("{display_name}の気象概況がここに表示されます。（{DESCRIPTION_CHAR_CAP}文字以内）")
}

/// Length is counted in characters, not bytes: descriptions are mostly Japanese.
pub fn validate_description(text: &str) -> Result<(), ValidationError> {
    let len = text.chars().count();
    if len > DESCRIPTION_CHAR_CAP {
        return Err(ValidationError::DescriptionTooLong {
            len,
            cap: DESCRIPTION_CHAR_CAP,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_mentions_the_region_and_the_cap() {
        let annotation = RegionAnnotation::placeholder("宮城県", 3);
        assert_eq!(
            annotation.description,
            "宮城県の気象概況がここに表示されます。（200文字以内）"
        );
        assert_eq!(annotation.preview_image, "https://picsum.photos/800?random=3");
        assert_eq!(annotation.display_name, "宮城県");
    }

    #[test]
    fn description_cap_counts_characters() {
        let at_cap = "あ".repeat(DESCRIPTION_CHAR_CAP);
        assert!(validate_description(&at_cap).is_ok());

        let over_cap = "あ".repeat(DESCRIPTION_CHAR_CAP + 1);
        assert_eq!(
            validate_description(&over_cap),
            Err(ValidationError::DescriptionTooLong {
                len: DESCRIPTION_CHAR_CAP + 1,
                cap: DESCRIPTION_CHAR_CAP,
            })
        );
    }

    #[test]
    fn region_key_borrows_as_str() {
        let mut map = std::collections::BTreeMap::new();
        map.insert(RegionKey::from("Tokyo To"), 1);
        assert_eq!(map.get("Tokyo To"), Some(&1));
    }
}
