//! # Region → District Lookup Table
//!
//! An immutable mapping from region name to the ordered list of its
//! districts. The built-in table is constructed once per process and shared
//! through [`RegionDistrictMap::builtin`].
//!
//! ## Invariants
//!
//! - Region names are unique and non-empty.
//! - Every district list is non-empty and keeps display order.
//!
//! A lookup for an unknown or empty region returns `None`. That is an
//! ordinary negative result, not an error.

use std::sync::OnceLock;

use crate::error::CatalogError;

const PENZA_REGION: &str = "Пензенская область";

const PENZA_DISTRICTS: &[&str] = &[
    "Башмаковский район",
    "Бековский район",
    "Белинский район",
    "Бессоновский район",
    "Вадинский район",
    "Городищенский район",
    "Земетчинский район",
    "Иссинский район",
    "Каменский район",
    "Камешкирский район",
    "Колышлейский район",
    "Кондольский район",
    "Лопатинский район",
    "Лунинский район",
    "Малосердобинский район",
    "Мокшанский район",
    "Наровчатский район",
    "Неверкинский район",
    "Нижнеломовский район",
    "Никольский район",
    "Пачелмский район",
    "Пензенский район",
    "Сердобский район",
    "Сосновоборский район",
    "Спасский район",
    "Тамалинский район",
    "Шемышейский район",
];

const TAMBOV_REGION: &str = "Тамбовская область";

const TAMBOV_DISTRICTS: &[&str] = &[
    "Гавриловский район",
    "Жердевский район",
    "Знаменский район",
    "Инжавинский район",
    "Кирсановский район",
    "Мордовский район",
    "Мучкапский район",
    "Никифоровский район",
    "Ржаксинский район",
    "Сампурский район",
    "Токарёвский район",
    "Уметский район",
];

/// One region and its districts, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RegionEntry {
    name: String,
    districts: Vec<String>,
}

/// Immutable region → ordered districts table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionDistrictMap {
    entries: Vec<RegionEntry>,
}

impl RegionDistrictMap {
    /// Build a table from caller-supplied entries, validating the invariants.
    ///
    /// Entry order is kept as the region display order.
    pub fn new<I, R, D>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (R, Vec<D>)>,
        R: Into<String>,
        D: Into<String>,
    {
        let mut built: Vec<RegionEntry> = Vec::new();
        for (name, districts) in entries {
            let name = name.into();
            if name.trim().is_empty() {
                return Err(CatalogError::EmptyRegionName);
            }
            if built.iter().any(|e| e.name == name) {
                return Err(CatalogError::DuplicateRegion(name));
            }
            if districts.is_empty() {
                return Err(CatalogError::EmptyRegion(name));
            }
            built.push(RegionEntry {
                name,
                districts: districts.into_iter().map(Into::into).collect(),
            });
        }
        Ok(Self { entries: built })
    }

    /// The process-wide built-in table.
    pub fn builtin() -> &'static Self {
        static BUILTIN: OnceLock<RegionDistrictMap> = OnceLock::new();
        BUILTIN.get_or_init(|| Self {
            entries: vec![
                RegionEntry::from_static(PENZA_REGION, PENZA_DISTRICTS),
                RegionEntry::from_static(TAMBOV_REGION, TAMBOV_DISTRICTS),
            ],
        })
    }

    /// Districts of `region` in display order, or `None` if the region is
    /// unknown or empty.
    pub fn lookup(&self, region: &str) -> Option<&[String]> {
        if region.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.name == region)
            .map(|e| e.districts.as_slice())
    }

    /// Region names in display order.
    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Whether `district` belongs to `region`.
    pub fn contains_district(&self, region: &str, district: &str) -> bool {
        self.lookup(region)
            .is_some_and(|ds| ds.iter().any(|d| d == district))
    }

    /// Number of regions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no regions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RegionEntry {
    fn from_static(name: &str, districts: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            districts: districts.iter().map(|d| d.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_two_regions_in_order() {
        let map = RegionDistrictMap::builtin();
        let regions: Vec<&str> = map.regions().collect();
        assert_eq!(regions, vec!["Пензенская область", "Тамбовская область"]);
        assert_eq!(map.len(), 2);
        assert!(!map.is_empty());
    }

    #[test]
    fn penza_has_27_districts() {
        let ds = RegionDistrictMap::builtin()
            .lookup("Пензенская область")
            .unwrap();
        assert_eq!(ds.len(), 27);
        assert_eq!(ds.first().unwrap(), "Башмаковский район");
        assert_eq!(ds.last().unwrap(), "Шемышейский район");
    }

    #[test]
    fn tambov_has_12_districts() {
        let ds = RegionDistrictMap::builtin()
            .lookup("Тамбовская область")
            .unwrap();
        assert_eq!(ds.len(), 12);
        assert_eq!(ds.first().unwrap(), "Гавриловский район");
        assert_eq!(ds.last().unwrap(), "Уметский район");
    }

    #[test]
    fn builtin_districts_are_unique_per_region() {
        let map = RegionDistrictMap::builtin();
        for region in map.regions() {
            let ds = map.lookup(region).unwrap();
            let mut sorted: Vec<&String> = ds.iter().collect();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), ds.len(), "duplicates in {region}");
        }
    }

    #[test]
    fn unknown_and_empty_region_are_absent() {
        let map = RegionDistrictMap::builtin();
        assert!(map.lookup("").is_none());
        assert!(map.lookup("Саратовская область").is_none());
        assert!(map.lookup("пензенская область").is_none());
    }

    #[test]
    fn contains_district_checks_membership() {
        let map = RegionDistrictMap::builtin();
        assert!(map.contains_district("Пензенская область", "Белинский район"));
        assert!(!map.contains_district("Тамбовская область", "Белинский район"));
        assert!(!map.contains_district("", "Белинский район"));
    }

    #[test]
    fn new_rejects_duplicate_region() {
        let err = RegionDistrictMap::new(vec![("A", vec!["a1"]), ("A", vec!["a2"])]).unwrap_err();
        assert_eq!(err, CatalogError::DuplicateRegion("A".into()));
    }

    #[test]
    fn new_rejects_empty_district_list() {
        let err = RegionDistrictMap::new(vec![("A", Vec::<String>::new())]).unwrap_err();
        assert_eq!(err, CatalogError::EmptyRegion("A".into()));
    }

    #[test]
    fn new_rejects_blank_region_name() {
        let err = RegionDistrictMap::new(vec![("  ", vec!["a1"])]).unwrap_err();
        assert_eq!(err, CatalogError::EmptyRegionName);
    }

    #[test]
    fn new_keeps_caller_order() {
        let map =
            RegionDistrictMap::new(vec![("B", vec!["b2", "b1"]), ("A", vec!["a1"])]).unwrap();
        assert_eq!(map.regions().collect::<Vec<_>>(), vec!["B", "A"]);
        assert_eq!(map.lookup("B").unwrap(), &["b2".to_string(), "b1".to_string()]);
    }
}
