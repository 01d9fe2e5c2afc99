use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{validate_description, RegionAnnotation, RegionFeature, RegionKey};
use crate::error::MapError;

/// Per-region commentary, one entry for every loaded region.
///
/// Entries are only ever replaced through [`AnnotationTable::update_description`]
/// and [`AnnotationTable::update_image`]; nothing removes them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnnotationTable {
    entries: BTreeMap<RegionKey, RegionAnnotation>,
}

impl AnnotationTable {
    pub fn from_features(features: &[RegionFeature]) -> Self {
        let entries = features
            .iter()
            .enumerate()
            .map(|(index, feature)| {
                (
                    feature.key.clone(),
                    RegionAnnotation::placeholder(&feature.display_name, index),
                )
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&RegionAnnotation> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RegionKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RegionKey, &RegionAnnotation)> {
        self.entries.iter()
    }

    pub fn update_description(&mut self, key: &str, description: &str) -> Result<(), MapError> {
        validate_description(description)?;
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| MapError::LookupMiss(key.to_string()))?;
        entry.description = description.to_string();
        Ok(())
    }

    pub fn update_image(&mut self, key: &str, image: &str) -> Result<(), MapError> {
        let entry = self
            .entries
            .get_mut(key)
            .ok_or_else(|| MapError::LookupMiss(key.to_string()))?;
        entry.preview_image = image.to_string();
        Ok(())
    }

    /// Drop entries whose key fails `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&RegionKey) -> bool) {
        self.entries.retain(|key, _| keep(key));
    }

    /// Take edited entries from `other` for keys this table already knows.
    ///
    /// Returns how many entries were replaced; unknown keys are ignored.
    pub fn merge_known(&mut self, other: Self) -> usize {
        let mut merged = 0;
        for (key, annotation) in other.entries {
            if let Some(entry) = self.entries.get_mut(&key) {
                *entry = annotation;
                merged += 1;
            }
        }
        merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DESCRIPTION_CHAR_CAP;
    use crate::error::ValidationError;
    use crate::geometry::tests::square_feature;

    fn table() -> AnnotationTable {
        AnnotationTable::from_features(&[
            square_feature("A", "甲", 130.0, 31.0, 1.0),
            square_feature("B", "乙", 135.0, 34.0, 1.0),
            square_feature("C", "丙", 140.0, 38.0, 1.0),
        ])
    }

    #[test]
    fn every_feature_gets_a_placeholder() {
        let table = table();
        let keys: Vec<&str> = table.keys().map(RegionKey::as_str).collect();
        assert_eq!(keys, vec!["A", "B", "C"]);
        assert_eq!(
            table.get("B").map(|entry| entry.description.as_str()),
            Some("乙の気象概況がここに表示されます。（200文字以内）")
        );
    }

    #[test]
    fn update_touches_only_one_entry() -> Result<(), MapError> {
        let mut table = table();
        let before = table.clone();
        table.update_description("B", "hello")?;

        assert_eq!(table.get("B").map(|e| e.description.as_str()), Some("hello"));
        assert_eq!(table.get("A"), before.get("A"));
        assert_eq!(table.get("C"), before.get("C"));
        Ok(())
    }

    #[test]
    fn overlong_description_leaves_entry_alone() {
        let mut table = table();
        let before = table.clone();
        let result = table.update_description("A", &"x".repeat(DESCRIPTION_CHAR_CAP + 1));
        assert_eq!(
            result,
            Err(MapError::ValidationFailure(
                ValidationError::DescriptionTooLong {
                    len: DESCRIPTION_CHAR_CAP + 1,
                    cap: DESCRIPTION_CHAR_CAP,
                }
            ))
        );
        assert_eq!(table, before);
    }

    #[test]
    fn unknown_key_is_a_lookup_miss() {
        let mut table = table();
        assert_eq!(
            table.update_image("Z", "file:///tmp/z.png"),
            Err(MapError::LookupMiss("Z".to_string()))
        );
        assert!(table.get("Z").is_none());
    }

    #[test]
    fn merge_ignores_unknown_regions() -> Result<(), MapError> {
        let mut edited = table();
        edited.update_description("C", "snow")?;
        let mut extra = AnnotationTable::from_features(&[square_feature("Z", "Z", 0.0, 0.0, 1.0)]);
        extra.update_description("Z", "ignored")?;

        let mut table = table();
        assert_eq!(table.merge_known(edited), 3);
        assert_eq!(table.merge_known(extra), 0);
        assert_eq!(table.get("C").map(|e| e.description.as_str()), Some("snow"));
        assert!(!table.contains("Z"));
        Ok(())
    }

    #[test]
    fn serializes_as_a_plain_map() -> Result<(), serde_json::Error> {
        let table = table();
        let json = serde_json::to_value(&table)?;
        assert_eq!(json["A"]["display_name"], "甲");
        let back: AnnotationTable = serde_json::from_value(json)?;
        assert_eq!(back, table);
        Ok(())
    }
}
