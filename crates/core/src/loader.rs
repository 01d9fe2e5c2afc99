use geo::{Coord, LineString, MultiPolygon, Polygon};
use geojson::{Feature, GeoJson, PolygonType, Value};
use tracing::{debug, warn};

use crate::annotations::AnnotationTable;
use crate::domain::{RegionFeature, RegionKey};
use crate::error::MapError;

/// Where the prefecture boundaries come from unless configured otherwise.
pub const DEFAULT_GEOJSON_SOURCE: &str =
    "https://raw.githubusercontent.com/dataofjapan/land/master/japan.geojson";

const KEY_PROPERTY: &str = "nam";
const DISPLAY_NAME_PROPERTY: &str = "nam_ja";
const CODE_PROPERTY: &str = "id";

/// Result of the one and only geography load of a session.
#[derive(Debug, Clone)]
pub enum LoadOutcome {
    Loaded {
        features: Vec<RegionFeature>,
        annotations: AnnotationTable,
    },
    Failed(MapError),
}

impl LoadOutcome {
    /// Build the outcome from a fetched body, or from the fetch error.
    pub fn from_body(body: Result<String, MapError>) -> Self {
        match body.and_then(|text| parse_feature_collection(&text)) {
            Ok(features) => {
                let annotations = AnnotationTable::from_features(&features);
                Self::Loaded {
                    features,
                    annotations,
                }
            }
            Err(error) => {
                warn!(%error, "geography load failed, showing an empty map");
                Self::Failed(error)
            }
        }
    }

    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded { .. })
    }
}

/// Parse a GeoJSON FeatureCollection of prefecture polygons.
///
/// Features without both names or without polygonal geometry are skipped.
pub fn parse_feature_collection(text: &str) -> Result<Vec<RegionFeature>, MapError> {
    let geojson = text
        .parse::<GeoJson>()
        .map_err(|error| MapError::LoadFailure(format!("malformed GeoJSON: {error}")))?;

    let GeoJson::FeatureCollection(collection) = geojson else {
        return Err(MapError::LoadFailure(
            "expected a FeatureCollection".to_string(),
        ));
    };

    let total = collection.features.len();
    let features: Vec<RegionFeature> = collection
        .features
        .iter()
        .enumerate()
        .filter_map(|(index, feature)| {
            let region = region_from_feature(feature);
            if region.is_none() {
                warn!(index, "skipping feature without names or polygon geometry");
            }
            region
        })
        .collect();

    debug!(loaded = features.len(), total, "parsed prefecture features");
    Ok(features)
}

fn region_from_feature(feature: &Feature) -> Option<RegionFeature> {
    let key = string_property(feature, KEY_PROPERTY)?;
    let display_name = string_property(feature, DISPLAY_NAME_PROPERTY)?;
    let code = feature
        .property(CODE_PROPERTY)
        .and_then(serde_json::Value::as_u64)
        .and_then(|code| u32::try_from(code).ok());

    let geometry = match &feature.geometry.as_ref()?.value {
        Value::Polygon(rings) => MultiPolygon::new(vec![polygon_from_rings(rings)?]),
        Value::MultiPolygon(parts) => MultiPolygon::new(
            parts
                .iter()
                .map(polygon_from_rings)
                .collect::<Option<Vec<_>>>()?,
        ),
        _ => return None,
    };

    Some(RegionFeature {
        key: RegionKey::new(key),
        display_name,
        code,
        geometry,
    })
}

fn string_property(feature: &Feature, name: &str) -> Option<String> {
    feature
        .property(name)
        .and_then(serde_json::Value::as_str)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn polygon_from_rings(rings: &PolygonType) -> Option<Polygon<f64>> {
    let mut rings = rings.iter().map(|ring| {
        LineString::from(
            ring.iter()
                .filter(|position| position.len() >= 2)
                .map(|position| Coord {
                    x: position[0],
                    y: position[1],
                })
                .collect::<Vec<_>>(),
        )
    });
    let exterior = rings.next()?;
    Some(Polygon::new(exterior, rings.collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_REGIONS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "nam": "Aomori Ken", "nam_ja": "青森県", "id": 2 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[140.0, 40.5], [141.5, 40.5], [141.5, 41.5], [140.0, 41.5], [140.0, 40.5]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "nam": "Okinawa Ken", "nam_ja": "沖縄県", "id": 47 },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[127.6, 26.1], [128.0, 26.1], [128.0, 26.8], [127.6, 26.8], [127.6, 26.1]]],
                        [[[124.0, 24.3], [124.3, 24.3], [124.3, 24.5], [124.0, 24.5], [124.0, 24.3]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": { "nam": "Tokyo To", "nam_ja": "東京都" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[139.0, 35.5], [139.9, 35.5], [139.9, 35.9], [139.0, 35.9], [139.0, 35.5]]]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() -> Result<(), MapError> {
        let features = parse_feature_collection(THREE_REGIONS)?;
        assert_eq!(features.len(), 3);
        assert_eq!(features[0].key.as_str(), "Aomori Ken");
        assert_eq!(features[0].display_name, "青森県");
        assert_eq!(features[0].code, Some(2));
        assert_eq!(features[1].geometry.0.len(), 2);
        assert_eq!(features[2].code, None);
        Ok(())
    }

    #[test]
    fn loaded_outcome_annotates_every_region() {
        let outcome = LoadOutcome::from_body(Ok(THREE_REGIONS.to_string()));
        let LoadOutcome::Loaded {
            features,
            annotations,
        } = outcome
        else {
            panic!("expected a loaded outcome");
        };
        assert_eq!(annotations.len(), features.len());
        for feature in &features {
            assert!(annotations.contains(feature.key.as_str()));
        }
    }

    #[test]
    fn features_without_names_or_polygons_are_skipped() -> Result<(), MapError> {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": { "nam": "Nameless" },
                  "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } },
                { "type": "Feature", "properties": { "nam": "Point", "nam_ja": "点" },
                  "geometry": { "type": "Point", "coordinates": [0, 0] } },
                { "type": "Feature", "properties": { "nam": "Empty", "nam_ja": "空" }, "geometry": null }
            ]
        }"#;
        assert!(parse_feature_collection(text)?.is_empty());
        Ok(())
    }

    #[test]
    fn malformed_payload_is_a_load_failure() {
        let outcome = LoadOutcome::from_body(Ok("{ not json".to_string()));
        assert!(matches!(
            outcome,
            LoadOutcome::Failed(MapError::LoadFailure(_))
        ));
    }

    #[test]
    fn non_collection_is_a_load_failure() {
        let text = r#"{ "type": "Point", "coordinates": [137.0, 35.0] }"#;
        assert_eq!(
            parse_feature_collection(text).map(|features| features.len()),
            Err(MapError::LoadFailure("expected a FeatureCollection".to_string()))
        );
    }

    #[test]
    fn fetch_error_passes_through() {
        let outcome = LoadOutcome::from_body(Err(MapError::LoadFailure("offline".to_string())));
        assert!(!outcome.is_loaded());
    }
}
