//! # Parameter Layout
//!
//! A meteo row is a flat vector holding `len_of_param` daily values for each
//! meteo parameter, parameter-major, in layout order. Stat parameters
//! (mean yield, trend, dispersion) are appended as constant rows only when a
//! model input is built.
//!
//! ## JSON form
//!
//! ```json
//! {
//!   "LIST_OF_PARAMS": { "ndvi": 1, "mean_temp": 40 },
//!   "LIST_OF_STAT_PARAMS": { "mean_prod": 80, "trend": 20, "disp": 6 },
//!   "LEN_OF_PARAM": 365,
//!   "CUT_START": 275,
//!   "CUT_END": 520
//! }
//! ```
//!
//! Either parameter list may also be a plain array of names, in which case
//! every coefficient is 1. `LIST_OF_PARAMS` is also accepted under a
//! `settings` object. Object key order is the parameter order.

use std::fmt;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::LayoutError;

/// Days per parameter per season when the layout does not say otherwise.
pub const DEFAULT_LEN_OF_PARAM: usize = 365;
/// Default start of the model window, in days from the previous season start.
pub const DEFAULT_CUT_START: usize = 275;
/// Default end (exclusive) of the model window.
pub const DEFAULT_CUT_END: usize = 520;

/// Name of the vegetation index parameter used for NDVI-max analytics.
pub const NDVI: &str = "ndvi";

/// Winter wheat meteo parameters and their normalization coefficients.
const WINTER_WHEAT_PARAMS: &[(&str, f64)] = &[
    ("ndvi", 1.0),
    ("ndvi_historical", 1.0),
    ("mean_temp", 40.0),
    ("mean_temp_historical", 40.0),
    ("mean_temp_acc", 5000.0),
    ("mean_temp_acc_historical", 5000.0),
    ("mean_prec", 10.0),
    ("mean_prec_historical", 10.0),
    ("mean_prec_acc", 1000.0),
    ("mean_prec_acc_historical", 1000.0),
    ("mean_rh", 100.0),
    ("mean_rh_historical", 100.0),
    ("mean_p", 1000.0),
    ("mean_snod", 1.0),
    ("mean_snod_historical", 1.0),
    ("mean_snowc", 100.0),
    ("mean_snowc_historical", 100.0),
    ("mean_sdswr", 400.0),
    ("mean_sdlwr", 400.0),
    ("mean_tmpgr10", 50.0),
    ("mean_soilw10", 50.0),
];

const WINTER_WHEAT_STATS: &[(&str, f64)] = &[("mean_prod", 80.0), ("trend", 20.0), ("disp", 6.0)];

/// A named parameter with its normalization coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Divisor applied during normalization.
    pub norm_coef: f64,
}

impl ParamSpec {
    /// A parameter with the given coefficient.
    pub fn new(name: impl Into<String>, norm_coef: f64) -> Self {
        Self {
            name: name.into(),
            norm_coef,
        }
    }
}

/// Ordered meteo and stat parameters plus the day geometry of a row.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamLayout {
    params: Vec<ParamSpec>,
    stat_params: Vec<ParamSpec>,
    len_of_param: usize,
    cut_start: usize,
    cut_end: usize,
}

impl ParamLayout {
    /// Build and validate a layout.
    pub fn new(
        params: Vec<ParamSpec>,
        stat_params: Vec<ParamSpec>,
        len_of_param: usize,
        cut_start: usize,
        cut_end: usize,
    ) -> Result<Self, LayoutError> {
        if params.is_empty() {
            return Err(LayoutError::NoParams);
        }
        if len_of_param == 0 {
            return Err(LayoutError::ZeroLength);
        }
        if cut_start >= cut_end || cut_end > 2 * len_of_param {
            return Err(LayoutError::InvalidCut {
                start: cut_start,
                end: cut_end,
                len: len_of_param,
            });
        }
        let mut seen: Vec<&str> = Vec::new();
        for spec in params.iter().chain(&stat_params) {
            if seen.contains(&spec.name.as_str()) {
                return Err(LayoutError::DuplicateParam(spec.name.clone()));
            }
            if spec.norm_coef == 0.0 || !spec.norm_coef.is_finite() {
                return Err(LayoutError::InvalidCoefficient {
                    name: spec.name.clone(),
                    coef: spec.norm_coef,
                });
            }
            seen.push(&spec.name);
        }
        Ok(Self {
            params,
            stat_params,
            len_of_param,
            cut_start,
            cut_end,
        })
    }

    /// The winter wheat layout: 21 meteo parameters, 3 stat parameters,
    /// 365 days per season, window 275..520.
    pub fn winter_wheat() -> Self {
        let to_specs = |list: &[(&str, f64)]| {
            list.iter()
                .map(|(name, coef)| ParamSpec::new(*name, *coef))
                .collect::<Vec<_>>()
        };
        Self {
            params: to_specs(WINTER_WHEAT_PARAMS),
            stat_params: to_specs(WINTER_WHEAT_STATS),
            len_of_param: DEFAULT_LEN_OF_PARAM,
            cut_start: DEFAULT_CUT_START,
            cut_end: DEFAULT_CUT_END,
        }
    }

    /// Parse a layout from its JSON document.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let raw: RawLayout = serde_json::from_str(json)?;
        let params = raw
            .list_of_params
            .or_else(|| raw.settings.and_then(|s| s.list_of_params))
            .map(|p| p.0)
            .unwrap_or_default();
        Self::new(
            params,
            raw.list_of_stat_params.map(|p| p.0).unwrap_or_default(),
            raw.len_of_param.unwrap_or(DEFAULT_LEN_OF_PARAM),
            raw.cut_start.unwrap_or(DEFAULT_CUT_START),
            raw.cut_end.unwrap_or(DEFAULT_CUT_END),
        )
    }

    /// Meteo parameters in row order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Stat parameters in row order.
    pub fn stat_params(&self) -> &[ParamSpec] {
        &self.stat_params
    }

    /// Meteo parameter names in row order.
    pub fn param_names(&self) -> Vec<String> {
        self.params.iter().map(|p| p.name.clone()).collect()
    }

    /// Position of a meteo parameter in the row, if known.
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Days per parameter per season.
    pub fn len_of_param(&self) -> usize {
        self.len_of_param
    }

    /// Expected length of one season's meteo row.
    pub fn row_len(&self) -> usize {
        self.params.len() * self.len_of_param
    }

    /// Model window `[start, end)` over the two-season day axis.
    pub fn cut(&self) -> (usize, usize) {
        (self.cut_start, self.cut_end)
    }

    /// Days in the model window.
    pub fn window_len(&self) -> usize {
        self.cut_end - self.cut_start
    }
}

impl Default for ParamLayout {
    fn default() -> Self {
        Self::winter_wheat()
    }
}

#[derive(Deserialize)]
struct RawSettings {
    #[serde(rename = "LIST_OF_PARAMS", default)]
    list_of_params: Option<ParamList>,
}

#[derive(Deserialize)]
struct RawLayout {
    #[serde(rename = "LIST_OF_PARAMS", default)]
    list_of_params: Option<ParamList>,
    #[serde(default)]
    settings: Option<RawSettings>,
    #[serde(rename = "LIST_OF_STAT_PARAMS", default)]
    list_of_stat_params: Option<ParamList>,
    #[serde(rename = "LEN_OF_PARAM", default)]
    len_of_param: Option<usize>,
    #[serde(rename = "CUT_START", default)]
    cut_start: Option<usize>,
    #[serde(rename = "CUT_END", default)]
    cut_end: Option<usize>,
}

/// A parameter list given either as names or as name → coefficient.
struct ParamList(Vec<ParamSpec>);

impl<'de> Deserialize<'de> for ParamList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ParamListVisitor;

        impl<'de> Visitor<'de> for ParamListVisitor {
            type Value = ParamList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of parameter names or a map of name to coefficient")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ParamList, A::Error> {
                let mut specs = Vec::new();
                while let Some(name) = seq.next_element::<String>()? {
                    specs.push(ParamSpec::new(name, 1.0));
                }
                Ok(ParamList(specs))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ParamList, A::Error> {
                let mut specs = Vec::new();
                while let Some((name, coef)) = map.next_entry::<String, f64>()? {
                    specs.push(ParamSpec::new(name, coef));
                }
                Ok(ParamList(specs))
            }

            fn visit_unit<E: de::Error>(self) -> Result<ParamList, E> {
                Ok(ParamList(Vec::new()))
            }
        }

        deserializer.deserialize_any(ParamListVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winter_wheat_shape() {
        let layout = ParamLayout::winter_wheat();
        assert_eq!(layout.params().len(), 21);
        assert_eq!(layout.stat_params().len(), 3);
        assert_eq!(layout.row_len(), 21 * 365);
        assert_eq!(layout.window_len(), 245);
        assert_eq!(layout.param_index("ndvi"), Some(0));
        assert_eq!(layout.param_index("mean_soilw10"), Some(20));
        assert_eq!(layout.param_index("mean_prod"), None);
    }

    #[test]
    fn winter_wheat_passes_validation() {
        let ww = ParamLayout::winter_wheat();
        let validated = ParamLayout::new(
            ww.params().to_vec(),
            ww.stat_params().to_vec(),
            ww.len_of_param(),
            ww.cut().0,
            ww.cut().1,
        )
        .unwrap();
        assert_eq!(validated, ww);
    }

    #[test]
    fn from_json_map_keeps_document_order() {
        let layout = ParamLayout::from_json(
            r#"{"LIST_OF_PARAMS": {"mean_temp": 40, "ndvi": 1, "mean_p": 1000},
                "LEN_OF_PARAM": 10, "CUT_START": 5, "CUT_END": 15}"#,
        )
        .unwrap();
        assert_eq!(layout.param_names(), vec!["mean_temp", "ndvi", "mean_p"]);
        assert_eq!(layout.params()[2].norm_coef, 1000.0);
        assert!(layout.stat_params().is_empty());
        assert_eq!(layout.cut(), (5, 15));
    }

    #[test]
    fn from_json_list_uses_unit_coefficients() {
        let layout = ParamLayout::from_json(
            r#"{"LIST_OF_PARAMS": ["ndvi", "mean_temp"], "LIST_OF_STAT_PARAMS": ["trend"]}"#,
        )
        .unwrap();
        assert!(layout.params().iter().all(|p| p.norm_coef == 1.0));
        assert_eq!(layout.stat_params()[0].name, "trend");
        assert_eq!(layout.len_of_param(), DEFAULT_LEN_OF_PARAM);
        assert_eq!(layout.cut(), (DEFAULT_CUT_START, DEFAULT_CUT_END));
    }

    #[test]
    fn from_json_reads_nested_settings() {
        let layout =
            ParamLayout::from_json(r#"{"settings": {"LIST_OF_PARAMS": ["ndvi"]}}"#).unwrap();
        assert_eq!(layout.param_names(), vec!["ndvi"]);
    }

    #[test]
    fn from_json_without_params_fails() {
        let err = ParamLayout::from_json(r#"{"LEN_OF_PARAM": 365}"#).unwrap_err();
        assert!(matches!(err, LayoutError::NoParams));
    }

    #[test]
    fn from_json_null_params_fails() {
        let err = ParamLayout::from_json(r#"{"LIST_OF_PARAMS": null}"#).unwrap_err();
        assert!(matches!(err, LayoutError::NoParams));
    }

    #[test]
    fn rejects_zero_coefficient() {
        let err = ParamLayout::from_json(r#"{"LIST_OF_PARAMS": {"ndvi": 0}}"#).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidCoefficient { .. }));
    }

    #[test]
    fn rejects_duplicate_across_lists() {
        let err = ParamLayout::new(
            vec![ParamSpec::new("trend", 1.0)],
            vec![ParamSpec::new("trend", 20.0)],
            10,
            0,
            10,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::DuplicateParam(name) if name == "trend"));
    }

    #[test]
    fn rejects_inverted_or_oversized_cut() {
        let params = || vec![ParamSpec::new("ndvi", 1.0)];
        assert!(matches!(
            ParamLayout::new(params(), vec![], 10, 8, 8),
            Err(LayoutError::InvalidCut { .. })
        ));
        assert!(matches!(
            ParamLayout::new(params(), vec![], 10, 0, 21),
            Err(LayoutError::InvalidCut { .. })
        ));
        assert!(ParamLayout::new(params(), vec![], 10, 0, 20).is_ok());
    }

    #[test]
    fn rejects_zero_length() {
        let err = ParamLayout::new(vec![ParamSpec::new("ndvi", 1.0)], vec![], 0, 0, 1).unwrap_err();
        assert!(matches!(err, LayoutError::ZeroLength));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = ParamLayout::from_json(r#"{"LIST_OF_PARAMS": 7}"#).unwrap_err();
        assert!(matches!(err, LayoutError::Json(_)));
    }
}
