//! # Cascading Region → District Select
//!
//! Keeps a dependent district control consistent with the value of an
//! independent region control. The transition on a region change is a pure
//! function ([`district_options`]); [`CascadingSelectBinder`] wraps it with
//! the selection state owned by one control pair.
//!
//! ## District control states
//!
//! ```text
//!            region known                 user picks district
//! Disabled ───────────────▶ EnabledEmpty ─────────────────────▶ EnabledSelected
//!    ▲                         ▲   ▲                                  │
//!    │  region empty/unknown   │   └────── user picks placeholder ────┘
//!    └─────────────────────────┴───────────── any region change ──────┘
//! ```
//!
//! Initial state is `Disabled`. There is no terminal state.

use serde::{Deserialize, Serialize};

use crate::catalog::RegionDistrictMap;
use crate::error::SelectError;

/// Placeholder shown first when a known region is selected.
pub const DISTRICT_PLACEHOLDER: &str = "Выберите район";

/// Sole option shown while no known region is selected.
pub const REGION_FIRST_PLACEHOLDER: &str = "Сначала выберите регион";

/// One `<option>` of the district control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    /// Submitted value. Empty for placeholders.
    pub value: String,
    /// Display text.
    pub text: String,
    /// Whether the option is currently selected.
    pub selected: bool,
}

impl SelectOption {
    fn placeholder(text: &str) -> Self {
        Self {
            value: String::new(),
            text: text.to_string(),
            selected: true,
        }
    }

    fn district(name: &str) -> Self {
        Self {
            value: name.to_string(),
            text: name.to_string(),
            selected: false,
        }
    }

    /// Whether this is a placeholder (empty value).
    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

/// Lifecycle state of the district control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistrictSelectState {
    /// No known region selected; control disabled.
    Disabled,
    /// Known region selected; placeholder selected.
    EnabledEmpty,
    /// Known region selected; a concrete district selected.
    EnabledSelected,
}

impl DistrictSelectState {
    /// Canonical state name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::EnabledEmpty => "enabled_empty",
            Self::EnabledSelected => "enabled_selected",
        }
    }
}

impl std::fmt::Display for DistrictSelectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Option list and enabled flag of the district control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistrictControl {
    /// Whether the control accepts input.
    pub enabled: bool,
    /// Current state.
    pub state: DistrictSelectState,
    /// Options in display order.
    pub options: Vec<SelectOption>,
}

impl DistrictControl {
    /// Value of the selected option (empty when a placeholder is selected).
    pub fn selected_value(&self) -> &str {
        self.options
            .iter()
            .find(|o| o.selected)
            .map_or("", |o| o.value.as_str())
    }

    /// Options excluding placeholders.
    pub fn districts(&self) -> impl Iterator<Item = &SelectOption> {
        self.options.iter().filter(|o| !o.is_placeholder())
    }
}

/// Compute the district control for a region change.
///
/// Clears the option list. A known, non-empty region enables the control with
/// the placeholder selected followed by every district in table order. An
/// empty or unknown region disables the control with a single placeholder.
pub fn district_options(map: &RegionDistrictMap, region: &str) -> DistrictControl {
    match map.lookup(region) {
        Some(districts) => {
            let mut options = Vec::with_capacity(districts.len() + 1);
            options.push(SelectOption::placeholder(DISTRICT_PLACEHOLDER));
            options.extend(districts.iter().map(|d| SelectOption::district(d)));
            DistrictControl {
                enabled: true,
                state: DistrictSelectState::EnabledEmpty,
                options,
            }
        }
        None => DistrictControl {
            enabled: false,
            state: DistrictSelectState::Disabled,
            options: vec![SelectOption::placeholder(REGION_FIRST_PLACEHOLDER)],
        },
    }
}

/// Currently chosen region and district. Either may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Selected region value.
    pub region: String,
    /// Selected district value; a member of the region's list or empty.
    pub district: String,
}

/// Binds a region control to a district control.
#[derive(Debug, Clone)]
pub struct CascadingSelectBinder<'a> {
    map: &'a RegionDistrictMap,
    region: String,
    control: DistrictControl,
}

impl<'a> CascadingSelectBinder<'a> {
    /// Start in the `Disabled` state with no region selected.
    pub fn new(map: &'a RegionDistrictMap) -> Self {
        Self {
            map,
            region: String::new(),
            control: district_options(map, ""),
        }
    }

    /// Handle a change of the region control.
    pub fn on_region_changed(&mut self, region: &str) -> &DistrictControl {
        self.region = region.to_string();
        self.control = district_options(self.map, region);
        &self.control
    }

    /// Handle the user picking an option of the district control.
    ///
    /// An empty value re-selects the placeholder.
    pub fn select_district(&mut self, value: &str) -> Result<&DistrictControl, SelectError> {
        if !self.control.enabled {
            return Err(SelectError::Disabled);
        }
        if !self.control.options.iter().any(|o| o.value == value) {
            return Err(SelectError::NotAnOption {
                region: self.region.clone(),
                district: value.to_string(),
            });
        }
        for option in &mut self.control.options {
            option.selected = option.value == value;
        }
        self.control.state = if value.is_empty() {
            DistrictSelectState::EnabledEmpty
        } else {
            DistrictSelectState::EnabledSelected
        };
        Ok(&self.control)
    }

    /// The district control as it currently stands.
    pub fn control(&self) -> &DistrictControl {
        &self.control
    }

    /// Current region/district selection.
    pub fn selection(&self) -> SelectionState {
        SelectionState {
            region: self.region.clone(),
            district: self.control.selected_value().to_string(),
        }
    }
}
