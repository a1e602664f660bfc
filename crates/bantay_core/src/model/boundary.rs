//! Named map boundaries for the choropleth rollup.
//!
//! # Responsibility
//! - Parse a GeoJSON FeatureCollection into named boundary entries.
//! - Keep geometry opaque: core joins by name and never inspects shapes.
//!
//! # Invariants
//! - Every boundary carries a non-empty feature name.
//! - Parsing rejects malformed input instead of masking it.

use serde::Deserialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One named map feature, e.g. a province outline.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    /// Feature name used for the case-insensitive rollup join.
    pub name: String,
    /// Raw GeoJSON geometry, passed through to the renderer untouched.
    pub geometry: Value,
}

/// Errors from boundary dataset parsing.
#[derive(Debug)]
pub enum BoundaryError {
    /// Input is not valid JSON or not the expected envelope shape.
    Json(serde_json::Error),
    /// Top-level `type` is not `FeatureCollection`.
    NotAFeatureCollection(String),
    /// A feature has no usable `properties.name` string.
    MissingFeatureName { index: usize },
}

impl Display for BoundaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "{err}"),
            Self::NotAFeatureCollection(kind) => {
                write!(f, "expected a FeatureCollection, got `{kind}`")
            }
            Self::MissingFeatureName { index } => {
                write!(f, "feature {index} has no `properties.name` string")
            }
        }
    }
}

impl Error for BoundaryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::NotAFeatureCollection(_) => None,
            Self::MissingFeatureName { .. } => None,
        }
    }
}

impl From<serde_json::Error> for BoundaryError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(rename = "type")]
    kind: String,
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Value,
    #[serde(default)]
    geometry: Value,
}

/// Parses a GeoJSON FeatureCollection into named boundaries, in file order.
pub fn parse_boundaries(geojson: &str) -> Result<Vec<Boundary>, BoundaryError> {
    let collection: FeatureCollection = serde_json::from_str(geojson)?;
    if collection.kind != "FeatureCollection" {
        return Err(BoundaryError::NotAFeatureCollection(collection.kind));
    }

    let mut boundaries = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let Some(name) = feature
            .properties
            .get("name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
        else {
            return Err(BoundaryError::MissingFeatureName { index });
        };

        boundaries.push(Boundary {
            name: name.to_string(),
            geometry: feature.geometry,
        });
    }

    Ok(boundaries)
}

#[cfg(test)]
mod tests {
    use super::{parse_boundaries, BoundaryError};

    #[test]
    fn parses_named_features_in_file_order() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "Ilocos" },
                    "geometry": { "type": "Polygon", "coordinates": [] }
                },
                {
                    "type": "Feature",
                    "properties": { "name": "Bicol" },
                    "geometry": { "type": "Polygon", "coordinates": [] }
                }
            ]
        }"#;

        let boundaries = parse_boundaries(geojson).unwrap();
        assert_eq!(boundaries.len(), 2);
        assert_eq!(boundaries[0].name, "Ilocos");
        assert_eq!(boundaries[1].name, "Bicol");
    }

    #[test]
    fn rejects_non_feature_collection_envelope() {
        let geojson = r#"{ "type": "Feature", "features": [] }"#;
        let err = parse_boundaries(geojson).unwrap_err();
        assert!(matches!(err, BoundaryError::NotAFeatureCollection(kind) if kind == "Feature"));
    }

    #[test]
    fn rejects_feature_without_name() {
        let geojson = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "properties": {}, "geometry": null }
            ]
        }"#;
        let err = parse_boundaries(geojson).unwrap_err();
        assert!(matches!(err, BoundaryError::MissingFeatureName { index: 0 }));
    }
}
