//! Declarative per-kind scoring configuration.
//!
//! Each item kind differs only in which sub-parameters feed each category,
//! the fixed weights among them, and which categories are entered directly.
//! The aggregator consumes these tables; nothing else branches on the kind.

mod builtin;

use crate::aggregate::check_weight_sum;
use crate::error::{RankerError, Result};
use crate::store::codec::RESERVED_COLUMNS;
use crate::types::config::KindOverride;
use crate::types::item::Item;
use crate::types::scoring::{Category, Score, RATING_MAX, RATING_MIN};
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Gripper,
    Sensor,
    TactileSensor,
    ProximitySensor,
}

impl ItemKind {
    pub const ALL: [ItemKind; 4] = [
        ItemKind::Gripper,
        ItemKind::Sensor,
        ItemKind::TactileSensor,
        ItemKind::ProximitySensor,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Gripper => "gripper",
            Self::Sensor => "sensor",
            Self::TactileSensor => "tactile_sensor",
            Self::ProximitySensor => "proximity_sensor",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Gripper => "Gripper",
            Self::Sensor => "Sensor",
            Self::TactileSensor => "Tactile Sensor",
            Self::ProximitySensor => "Proximity Sensor",
        }
    }

    /// Backing file name inside the data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Gripper => "grippers.csv",
            Self::Sensor => "sensors.csv",
            Self::TactileSensor => "tactile_sensors.csv",
            Self::ProximitySensor => "proximity_sensors.csv",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ItemKind {
    type Err = RankerError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.key() == normalized)
            .ok_or_else(|| RankerError::UnknownKind(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubParameter {
    pub name: String,
    pub weight: f64,
}

impl SubParameter {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CategorySource {
    /// Weighted mean of rated sub-parameters.
    Derived(Vec<SubParameter>),
    /// Entered as a single rating, falling back to `default`.
    Direct { default: Score },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategorySpec {
    pub category: Category,
    pub source: CategorySource,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KindProfile {
    pub kind: ItemKind,
    pub categories: Vec<CategorySpec>,
    /// Extraction vocabulary: (parameter name, sub-parameter name).
    pub extraction: Vec<(String, String)>,
    /// Items seeded into a store that does not exist yet.
    pub defaults: Vec<Item>,
}

impl KindProfile {
    pub fn builtin(kind: ItemKind) -> Self {
        builtin::profile(kind)
    }

    /// Built-in table for `kind` with any configured overrides applied.
    pub fn resolve(kind: ItemKind, overrides: Option<&KindOverride>) -> Result<Self> {
        let mut profile = Self::builtin(kind);
        if let Some(overrides) = overrides {
            profile.apply(overrides)?;
        }
        profile.validate()?;
        Ok(profile)
    }

    pub fn source(&self, category: Category) -> Option<&CategorySource> {
        self.categories
            .iter()
            .find(|spec| spec.category == category)
            .map(|spec| &spec.source)
    }

    /// Sub-parameter names in table order; these become the store's extra columns.
    pub fn sub_parameter_columns(&self) -> Vec<String> {
        self.categories
            .iter()
            .filter_map(|spec| match &spec.source {
                CategorySource::Derived(parameters) => Some(parameters),
                CategorySource::Direct { .. } => None,
            })
            .flatten()
            .map(|parameter| parameter.name.clone())
            .collect()
    }

    /// Case-insensitive lookup of a sub-parameter by name.
    pub fn locate(&self, name: &str) -> Option<(Category, &SubParameter)> {
        let wanted = name.trim();
        self.categories.iter().find_map(|spec| match &spec.source {
            CategorySource::Derived(parameters) => parameters
                .iter()
                .find(|parameter| parameter.name.eq_ignore_ascii_case(wanted))
                .map(|parameter| (spec.category, parameter)),
            CategorySource::Direct { .. } => None,
        })
    }

    /// Sub-parameter an extracted parameter rates, via the alias table or
    /// a direct name match.
    pub fn extraction_target(&self, parameter: &str) -> Option<&str> {
        let wanted = parameter.trim();
        let target = self
            .extraction
            .iter()
            .find(|(alias, _)| alias.eq_ignore_ascii_case(wanted))
            .map(|(_, target)| target.as_str())
            .unwrap_or(wanted);
        self.locate(target).map(|(_, found)| found.name.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        let kind = self.kind.key();
        for category in Category::ALL {
            let count = self
                .categories
                .iter()
                .filter(|spec| spec.category == category)
                .count();
            if count != 1 {
                return Err(RankerError::Configuration(format!(
                    "{kind}: category {category} must be configured exactly once (found {count})"
                )));
            }
        }

        let mut seen = HashSet::new();
        for spec in &self.categories {
            match &spec.source {
                CategorySource::Derived(parameters) => {
                    if parameters.is_empty() {
                        return Err(RankerError::Configuration(format!(
                            "{kind}: {} has no sub-parameters",
                            spec.category
                        )));
                    }
                    for parameter in parameters {
                        let name = parameter.name.trim();
                        if name.is_empty() {
                            return Err(RankerError::Configuration(format!(
                                "{kind}: {} has a sub-parameter with an empty name",
                                spec.category
                            )));
                        }
                        if RESERVED_COLUMNS
                            .iter()
                            .any(|reserved| reserved.eq_ignore_ascii_case(name))
                        {
                            return Err(RankerError::Configuration(format!(
                                "{kind}: sub-parameter name '{name}' is reserved"
                            )));
                        }
                        if !seen.insert(name.to_ascii_lowercase()) {
                            return Err(RankerError::Configuration(format!(
                                "{kind}: duplicate sub-parameter '{name}'"
                            )));
                        }
                        if !parameter.weight.is_finite() || parameter.weight < 0.0 {
                            return Err(RankerError::Configuration(format!(
                                "{kind}: weight for '{name}' must be a non-negative number"
                            )));
                        }
                    }
                    check_weight_sum(spec.category, parameters)?;
                }
                CategorySource::Direct { default } => {
                    if !(RATING_MIN..=RATING_MAX).contains(default) {
                        return Err(RankerError::Configuration(format!(
                            "{kind}: direct default for {} must be between {RATING_MIN} and {RATING_MAX}",
                            spec.category
                        )));
                    }
                }
            }
        }

        for (parameter, target) in &self.extraction {
            if self.locate(target).is_none() {
                return Err(RankerError::Configuration(format!(
                    "{kind}: extraction parameter '{parameter}' targets unknown sub-parameter '{target}'"
                )));
            }
        }
        Ok(())
    }

    fn apply(&mut self, overrides: &KindOverride) -> Result<()> {
        for (key, category_override) in &overrides.categories {
            let category: Category = key.parse()?;
            let source = match (
                &category_override.sub_parameters,
                category_override.direct_default,
            ) {
                (Some(parameters), None) => CategorySource::Derived(
                    parameters
                        .iter()
                        .map(|parameter| SubParameter::new(parameter.name.trim(), parameter.weight))
                        .collect(),
                ),
                (None, Some(default)) => CategorySource::Direct { default },
                _ => {
                    return Err(RankerError::ConfigParse(format!(
                        "kinds.{}.categories.{key} needs exactly one of sub_parameters or direct_default",
                        self.kind
                    )))
                }
            };
            match self
                .categories
                .iter_mut()
                .find(|spec| spec.category == category)
            {
                Some(spec) => spec.source = source,
                None => self.categories.push(CategorySpec { category, source }),
            }
        }

        // Built-in aliases into a replaced sub-parameter set no longer apply.
        let mut extraction = std::mem::take(&mut self.extraction);
        extraction.retain(|(_, target)| self.locate(target).is_some());
        self.extraction = extraction;

        for (parameter, target) in &overrides.extraction {
            match self
                .extraction
                .iter_mut()
                .find(|(alias, _)| alias.eq_ignore_ascii_case(parameter))
            {
                Some(existing) => existing.1 = target.clone(),
                None => self.extraction.push((parameter.clone(), target.clone())),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::config::{CategoryOverride, SubParameterConfig};
    use std::collections::BTreeMap;

    #[test]
    fn builtin_profiles_are_valid() {
        for kind in ItemKind::ALL {
            let profile = KindProfile::builtin(kind);
            profile
                .validate()
                .unwrap_or_else(|err| panic!("{kind} profile should validate: {err}"));
            assert!(!profile.defaults.is_empty());
        }
    }

    #[test]
    fn sensor_iso_is_derived_and_other_categories_are_direct() {
        let profile = KindProfile::builtin(ItemKind::Sensor);
        assert!(matches!(
            profile.source(Category::IsoCompliance),
            Some(CategorySource::Derived(parameters)) if parameters.len() == 3
        ));
        for category in [Category::Cost, Category::Safety, Category::Performance] {
            assert_eq!(
                profile.source(category),
                Some(&CategorySource::Direct { default: 5.0 })
            );
        }
    }

    #[test]
    fn locate_is_case_insensitive() {
        let profile = KindProfile::builtin(ItemKind::Gripper);
        let (category, parameter) = profile
            .locate("  response time ")
            .expect("sub-parameter should be found");
        assert_eq!(category, Category::Performance);
        assert_eq!(parameter.name, "Response Time");
        assert!(profile.locate("Sparkle").is_none());
    }

    #[test]
    fn extraction_target_follows_aliases_then_names() {
        let profile = KindProfile::builtin(ItemKind::Gripper);
        assert_eq!(profile.extraction_target("Payload capacity"), Some("Grip Versatility"));
        assert_eq!(profile.extraction_target("Control algorithm"), Some("Precision"));
        assert_eq!(profile.extraction_target("gripping material"), Some("Material"));
        assert_eq!(profile.extraction_target("Precision"), Some("Precision"));
        assert_eq!(profile.extraction_target("Colour"), None);
    }

    #[test]
    fn sub_parameter_columns_follow_table_order() {
        let profile = KindProfile::builtin(ItemKind::TactileSensor);
        assert_eq!(
            profile.sub_parameter_columns(),
            vec![
                "Accuracy Standard",
                "Compliance Protocol",
                "Certification Level",
                "Sensitivity",
                "Spatial Resolution",
                "Response Time",
            ]
        );
    }

    #[test]
    fn resolve_applies_category_override() {
        let mut categories = BTreeMap::new();
        categories.insert(
            "safety".to_string(),
            CategoryOverride {
                sub_parameters: Some(vec![
                    SubParameterConfig {
                        name: "Shielding".to_string(),
                        weight: 0.6,
                    },
                    SubParameterConfig {
                        name: "Watchdog".to_string(),
                        weight: 0.4,
                    },
                ]),
                direct_default: None,
            },
        );
        let overrides = KindOverride {
            categories,
            extraction: BTreeMap::from([("Shield rating".to_string(), "Shielding".to_string())]),
        };

        let profile = KindProfile::resolve(ItemKind::Sensor, Some(&overrides))
            .expect("override should resolve");
        assert_eq!(
            profile.locate("shielding").map(|(category, _)| category),
            Some(Category::Safety)
        );
        assert_eq!(profile.extraction_target("Shield rating"), Some("Shielding"));
    }

    #[test]
    fn replacing_sub_parameters_drops_stale_builtin_aliases() {
        let overrides = KindOverride {
            categories: BTreeMap::from([(
                "cost".to_string(),
                CategoryOverride {
                    sub_parameters: Some(vec![SubParameterConfig {
                        name: "Price".to_string(),
                        weight: 1.0,
                    }]),
                    direct_default: None,
                },
            )]),
            extraction: BTreeMap::new(),
        };

        let profile = KindProfile::resolve(ItemKind::Gripper, Some(&overrides))
            .expect("override should resolve");
        assert_eq!(profile.extraction_target("Gripping material"), None);
        assert_eq!(
            profile.extraction_target("Impact resistance"),
            Some("Impact Resistance")
        );
    }

    #[test]
    fn resolve_rejects_weights_that_do_not_sum_to_one() {
        let mut categories = BTreeMap::new();
        categories.insert(
            "cost".to_string(),
            CategoryOverride {
                sub_parameters: Some(vec![
                    SubParameterConfig {
                        name: "Price".to_string(),
                        weight: 0.5,
                    },
                    SubParameterConfig {
                        name: "Upkeep".to_string(),
                        weight: 0.4,
                    },
                ]),
                direct_default: None,
            },
        );
        let overrides = KindOverride {
            categories,
            extraction: BTreeMap::new(),
        };

        let err = KindProfile::resolve(ItemKind::Gripper, Some(&overrides))
            .expect_err("weights summing to 0.9 should be rejected");
        assert!(matches!(err, RankerError::Configuration(_)));
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn resolve_rejects_reserved_and_duplicate_names() {
        let reserved = KindOverride {
            categories: BTreeMap::from([(
                "cost".to_string(),
                CategoryOverride {
                    sub_parameters: Some(vec![SubParameterConfig {
                        name: "Total Score".to_string(),
                        weight: 1.0,
                    }]),
                    direct_default: None,
                },
            )]),
            extraction: BTreeMap::new(),
        };
        assert!(KindProfile::resolve(ItemKind::Gripper, Some(&reserved)).is_err());

        let duplicate = KindOverride {
            categories: BTreeMap::from([(
                "cost".to_string(),
                CategoryOverride {
                    sub_parameters: Some(vec![SubParameterConfig {
                        name: "Precision".to_string(),
                        weight: 1.0,
                    }]),
                    direct_default: None,
                },
            )]),
            extraction: BTreeMap::new(),
        };
        let err = KindProfile::resolve(ItemKind::Gripper, Some(&duplicate))
            .expect_err("duplicate names should be rejected");
        assert!(err.to_string().contains("duplicate sub-parameter"));
    }

    #[test]
    fn kind_parses_config_keys() {
        assert_eq!(
            "tactile-sensor".parse::<ItemKind>().expect("kind should parse"),
            ItemKind::TactileSensor
        );
        assert!(matches!(
            "camera".parse::<ItemKind>(),
            Err(RankerError::UnknownKind(_))
        ));
    }
}
