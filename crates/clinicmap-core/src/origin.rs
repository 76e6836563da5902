//! Origin resolution for distance-matrix requests.
//!
//! A region's origin is normally its census internal point. Some internal
//! points land where the provider cannot snap to a road, so a small table of
//! hand-picked street addresses replaces them.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::types::Region;
use crate::ConfigError;

/// Montana ZCTAs whose internal points the provider cannot route from.
const MONTANA_OVERRIDES: &[(&str, &str)] = &[
    ("59020", "Cooke City, MT 59020"),
    ("59028", "1049 Nye Rd, Fishtail, MT 59028"),
    ("59039", "403 1st Ave, Ingomar, MT 59039"),
    ("59061", "1982 Nye Rd, Nye, MT 59061"),
    ("59068", "6380 US-212, Red Lodge, MT 59068"),
    ("59311", "13681 US-212, Alzada, MT 59311"),
    ("59631", "Boulder River Rd, Basin, MT 59631"),
    ("59639", "4388 Snow Drift Ln, Lincoln, MT 59639"),
    ("59711", "50 Theater Ln, Anaconda, MT 59711"),
    (
        "59716",
        "47995 Gallatin Road Suite 101 Gallatin Gateway, Big Sky, MT 59716",
    ),
    ("59762", "Wise River, MT 59762"),
];

/// Region code → literal origin address used instead of the computed centroid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OriginOverrides {
    #[serde(default)]
    overrides: BTreeMap<String, String>,
}

impl OriginOverrides {
    /// The built-in override table for Montana.
    #[must_use]
    pub fn montana() -> Self {
        Self {
            overrides: MONTANA_OVERRIDES
                .iter()
                .map(|(code, address)| ((*code).to_string(), (*address).to_string()))
                .collect(),
        }
    }

    /// Load and validate an override table from a YAML file of the form
    /// `overrides: { "59020": "Cooke City, MT 59020" }`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read, parsed, or contains
    /// an empty code or address.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::OverridesFileIo {
            path: path.display().to_string(),
            source: e,
        })?;
        let parsed: OriginOverrides = serde_yaml::from_str(&content)?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Returns `self` with every entry of `other` added, replacing entries
    /// for codes present in both.
    #[must_use]
    pub fn merge(mut self, other: OriginOverrides) -> Self {
        self.overrides.extend(other.overrides);
        self
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&str> {
        self.overrides.get(code).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (code, address) in &self.overrides {
            if code.trim().is_empty() {
                return Err(ConfigError::InvalidOverride {
                    code: code.clone(),
                    reason: "region code is empty".to_string(),
                });
            }
            if address.trim().is_empty() {
                return Err(ConfigError::InvalidOverride {
                    code: code.clone(),
                    reason: "override address is empty".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for OriginOverrides
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            overrides: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Returns the origin string for `region`.
///
/// An override, when present, is used verbatim. Otherwise the result is
/// `"{lat},{lon}"` with a single leading `+` removed from the latitude. The
/// longitude is passed through untouched: in the Census ZCTA files western
/// longitudes are always negative, so only latitudes carry an explicit sign.
#[must_use]
pub fn resolve_origin(region: &Region, overrides: &OriginOverrides) -> String {
    if let Some(address) = overrides.get(&region.code) {
        return address.to_string();
    }
    let lat = region
        .latitude
        .strip_prefix('+')
        .unwrap_or(&region.latitude);
    format!("{lat},{}", region.longitude)
}
