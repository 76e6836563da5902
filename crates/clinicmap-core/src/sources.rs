//! Conversion of the two input documents into [`Location`] and [`Region`] records.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::types::{Location, Region};
use crate::SourceError;

/// ZCTA code property in the 2010-vintage Census boundary attributes.
pub const ZCTA_CODE_PROPERTY: &str = "ZCTA5CE10";
/// Internal point latitude property.
pub const ZCTA_LAT_PROPERTY: &str = "INTPTLAT10";
/// Internal point longitude property.
pub const ZCTA_LON_PROPERTY: &str = "INTPTLON10";

/// The subset of a GeoJSON `FeatureCollection` the region loader reads.
#[derive(Debug, Deserialize)]
pub struct BoundaryCollection {
    #[serde(default)]
    pub features: Vec<BoundaryFeature>,
}

#[derive(Debug, Deserialize)]
pub struct BoundaryFeature {
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl BoundaryCollection {
    /// Parse a GeoJSON document. Geometry is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::BoundaryParse`] if the text is not a JSON object
    /// with a `features` array.
    pub fn from_json_str(raw: &str) -> Result<Self, SourceError> {
        serde_json::from_str(raw).map_err(SourceError::BoundaryParse)
    }
}

/// Assigns zero-based ids to the location source in its original order.
///
/// Each element must be a JSON object with a string `address_field`. A
/// pre-existing `id` key is replaced by the assigned id.
///
/// # Errors
///
/// Returns [`SourceError::NotAnObject`] for a non-object element and
/// [`SourceError::MissingAddress`] for an object without a string address.
pub fn assign_ids(records: Vec<Value>, address_field: &str) -> Result<Vec<Location>, SourceError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let mut fields = match record {
                Value::Object(fields) => fields,
                other => {
                    return Err(SourceError::NotAnObject {
                        index,
                        kind: value_kind(&other),
                    })
                }
            };

            let address = fields
                .get(address_field)
                .and_then(Value::as_str)
                .map(str::to_owned)
                .ok_or_else(|| SourceError::MissingAddress {
                    index,
                    field: address_field.to_string(),
                })?;

            if let Some(previous) = fields.remove("id") {
                tracing::warn!(index, previous = %previous, "location source already has an id; replacing it");
            }

            Ok(Location {
                id: index,
                address,
                fields,
            })
        })
        .collect()
}

/// Extracts regions whose code starts with `state_prefix`, in source order.
///
/// Features without a code are ignored silently; in-state features missing a
/// usable internal point are skipped with a warning so every returned region
/// has a non-empty origin.
#[must_use]
pub fn regions_from_boundaries(collection: &BoundaryCollection, state_prefix: &str) -> Vec<Region> {
    collection
        .features
        .iter()
        .filter_map(|feature| {
            let props = &feature.properties;
            let code = string_property(props, ZCTA_CODE_PROPERTY)?;
            if !code.starts_with(state_prefix) {
                return None;
            }

            let latitude = string_property(props, ZCTA_LAT_PROPERTY);
            let longitude = string_property(props, ZCTA_LON_PROPERTY);
            match (latitude, longitude) {
                (Some(latitude), Some(longitude)) => Some(Region {
                    code: code.to_string(),
                    latitude: latitude.to_string(),
                    longitude: longitude.to_string(),
                }),
                _ => {
                    tracing::warn!(region = code, "boundary feature has no internal point; skipping");
                    None
                }
            }
        })
        .collect()
}

fn string_property<'a>(props: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    props
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn feature(code: &str, lat: &str, lon: &str) -> Value {
        json!({
            "type": "Feature",
            "properties": {
                "ZCTA5CE10": code,
                "INTPTLAT10": lat,
                "INTPTLON10": lon,
                "ALAND10": 123_456
            },
            "geometry": null
        })
    }

    fn collection(features: Vec<Value>) -> BoundaryCollection {
        let doc = json!({ "type": "FeatureCollection", "features": features });
        BoundaryCollection::from_json_str(&doc.to_string()).expect("valid collection")
    }

    #[test]
    fn assign_ids_follows_source_order() {
        let source = vec![json!({"clinicAddress": "A"}), json!({"clinicAddress": "B"})];
        let locations = assign_ids(source, "clinicAddress").unwrap();

        assert_eq!(locations.len(), 2);
        assert_eq!(locations[0].id, 0);
        assert_eq!(locations[0].address, "A");
        assert_eq!(locations[1].id, 1);
        assert_eq!(
            serde_json::to_value(&locations).unwrap(),
            json!([{"id": 0, "clinicAddress": "A"}, {"id": 1, "clinicAddress": "B"}])
        );
    }

    #[test]
    fn assigned_id_is_the_first_serialized_key() {
        let source = vec![json!({"clinic": "Helena", "clinicAddress": "1 Main St"})];
        let locations = assign_ids(source, "clinicAddress").unwrap();
        let rendered = serde_json::to_string(&locations[0]).unwrap();
        assert_eq!(
            rendered,
            r#"{"id":0,"clinic":"Helena","clinicAddress":"1 Main St"}"#
        );
    }

    #[test]
    fn existing_id_is_replaced() {
        let source = vec![json!({"id": 99, "clinicAddress": "A"})];
        let locations = assign_ids(source, "clinicAddress").unwrap();
        assert_eq!(
            serde_json::to_value(&locations[0]).unwrap(),
            json!({"id": 0, "clinicAddress": "A"})
        );
    }

    #[test]
    fn missing_address_is_an_error() {
        let source = vec![json!({"clinicAddress": "A"}), json!({"name": "no address"})];
        let err = assign_ids(source, "clinicAddress").unwrap_err();
        assert!(matches!(err, SourceError::MissingAddress { index: 1, .. }));
    }

    #[test]
    fn non_object_record_is_an_error() {
        let err = assign_ids(vec![json!("A")], "clinicAddress").unwrap_err();
        assert!(matches!(
            err,
            SourceError::NotAnObject {
                index: 0,
                kind: "a string"
            }
        ));
    }

    #[test]
    fn regions_outside_state_prefix_are_dropped() {
        let c = collection(vec![
            feature("59001", "+45.5", "-109.4"),
            feature("82001", "+41.1", "-104.8"),
            feature("59911", "+48.1", "-114.0"),
        ]);
        let regions = regions_from_boundaries(&c, "59");
        let codes: Vec<&str> = regions.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, ["59001", "59911"]);
        assert_eq!(regions[0].latitude, "+45.5");
        assert_eq!(regions[0].longitude, "-109.4");
    }

    #[test]
    fn region_without_internal_point_is_skipped() {
        let c = collection(vec![feature("59001", "", "-109.4"), feature("59002", "+45.0", "-109.0")]);
        let regions = regions_from_boundaries(&c, "59");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].code, "59002");
    }

    #[test]
    fn feature_without_code_is_ignored() {
        let doc = json!({"features": [{"properties": {"NAME": "nowhere"}}]});
        let c = BoundaryCollection::from_json_str(&doc.to_string()).unwrap();
        assert!(regions_from_boundaries(&c, "59").is_empty());
    }

    #[test]
    fn invalid_boundary_json_is_an_error() {
        let err = BoundaryCollection::from_json_str("{\"features\": 7}").unwrap_err();
        assert!(matches!(err, SourceError::BoundaryParse(_)));
    }
}
