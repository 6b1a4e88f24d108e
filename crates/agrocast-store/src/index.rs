//! # District Index
//!
//! Maps each region to its districts' numeric ids and to the file prefix of
//! its CSV tables. The on-disk form is a single JSON object:
//!
//! ```json
//! {
//!   "region_mapping": { "Пензенская область": "penza" },
//!   "Пензенская область": { "Башмаковский район": 1, "Бековский район": 2 }
//! }
//! ```
//!
//! Every other top-level key is a region. Key order is kept.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::StoreError;

const REGION_MAPPING_KEY: &str = "region_mapping";

#[derive(Debug, Clone, PartialEq)]
struct IndexedRegion {
    name: String,
    prefix: Option<String>,
    districts: Vec<(String, i64)>,
}

/// Region → district id table plus region → file prefix mapping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistrictIndex {
    regions: Vec<IndexedRegion>,
}

impl DistrictIndex {
    /// Parse the JSON form.
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(root) = value else {
            return Err(StoreError::MalformedIndex(
                "top level must be an object".into(),
            ));
        };
        let mapping = match root.get(REGION_MAPPING_KEY) {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(m)) => m.clone(),
            Some(_) => {
                return Err(StoreError::MalformedIndex(format!(
                    "{REGION_MAPPING_KEY} must be an object"
                )))
            }
        };

        let mut regions = Vec::new();
        for (name, districts) in root.iter().filter(|(k, _)| *k != REGION_MAPPING_KEY) {
            let Value::Object(districts) = districts else {
                return Err(StoreError::MalformedIndex(format!(
                    "region '{name}' must map district names to ids"
                )));
            };
            let mut ids = Vec::with_capacity(districts.len());
            for (district, id) in districts {
                let id = id.as_i64().ok_or_else(|| {
                    StoreError::MalformedIndex(format!(
                        "district '{district}' in '{name}' has a non-integer id"
                    ))
                })?;
                ids.push((district.clone(), id));
            }
            regions.push(IndexedRegion {
                name: name.clone(),
                prefix: mapping.get(name).and_then(Value::as_str).map(str::to_string),
                districts: ids,
            });
        }
        Ok(Self { regions })
    }

    /// Read and parse an index file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let json = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The numeric id of a district.
    pub fn district_id(&self, region: &str, district: &str) -> Option<i64> {
        self.region(region)?
            .districts
            .iter()
            .find(|(name, _)| name == district)
            .map(|(_, id)| *id)
    }

    /// The file prefix of a region's tables.
    pub fn prefix(&self, region: &str) -> Option<&str> {
        self.region(region)?.prefix.as_deref()
    }

    /// Region names with their district names, in document order.
    pub fn districts(&self) -> Vec<(String, Vec<String>)> {
        self.regions
            .iter()
            .map(|r| {
                let names = r.districts.iter().map(|(d, _)| d.clone()).collect();
                (r.name.clone(), names)
            })
            .collect()
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Whether no regions are indexed.
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    fn region(&self, region: &str) -> Option<&IndexedRegion> {
        self.regions.iter().find(|r| r.name == region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "region_mapping": {"Пензенская область": "penza", "Тамбовская область": "tambov"},
        "Тамбовская область": {"Уметский район": 12, "Гавриловский район": 1},
        "Пензенская область": {"Башмаковский район": 1}
    }"#;

    #[test]
    fn lookups() {
        let idx = DistrictIndex::from_json(SAMPLE).unwrap();
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.district_id("Тамбовская область", "Уметский район"), Some(12));
        assert_eq!(idx.district_id("Тамбовская область", "Башмаковский район"), None);
        assert_eq!(idx.district_id("region_mapping", "Пензенская область"), None);
        assert_eq!(idx.prefix("Пензенская область"), Some("penza"));
        assert_eq!(idx.prefix("Саратовская область"), None);
    }

    #[test]
    fn districts_skip_mapping_and_keep_order() {
        let idx = DistrictIndex::from_json(SAMPLE).unwrap();
        let all = idx.districts();
        assert_eq!(all[0].0, "Тамбовская область");
        assert_eq!(all[0].1, vec!["Уметский район", "Гавриловский район"]);
        assert_eq!(all[1].0, "Пензенская область");
    }

    #[test]
    fn region_without_prefix_is_still_indexed() {
        let idx = DistrictIndex::from_json(r#"{"A": {"a1": 1}}"#).unwrap();
        assert_eq!(idx.district_id("A", "a1"), Some(1));
        assert_eq!(idx.prefix("A"), None);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert!(matches!(
            DistrictIndex::from_json("[]"),
            Err(StoreError::MalformedIndex(_))
        ));
        assert!(matches!(
            DistrictIndex::from_json(r#"{"A": ["a1"]}"#),
            Err(StoreError::MalformedIndex(_))
        ));
        assert!(matches!(
            DistrictIndex::from_json(r#"{"A": {"a1": "one"}}"#),
            Err(StoreError::MalformedIndex(_))
        ));
        assert!(matches!(
            DistrictIndex::from_json("{"),
            Err(StoreError::IndexJson(_))
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let err = DistrictIndex::load(Path::new("/nonexistent/districts.json")).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
    }
}
