use crate::error::{RankerError, Result};
use crate::profile::{ItemKind, KindProfile};
use crate::types::scoring::{Category, WeightVector};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankerConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub kinds: BTreeMap<String, KindOverride>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoreConfig {
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RankingConfig {
    pub weights: Option<HashMap<String, f64>>,
    #[serde(default)]
    pub normalize_weights: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KindOverride {
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryOverride>,
    #[serde(default)]
    pub extraction: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryOverride {
    pub sub_parameters: Option<Vec<SubParameterConfig>>,
    pub direct_default: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubParameterConfig {
    pub name: String,
    pub weight: f64,
}

impl RankerConfig {
    pub const DEFAULT_LOG_LEVEL: &'static str = "warn";

    /// Configured ranking weights; missing keys fall back to 0.25.
    pub fn weights(&self) -> WeightVector {
        let defaults = WeightVector::default();
        match &self.ranking.weights {
            Some(weights) => {
                let pick = |category: Category| {
                    *weights
                        .get(category.key())
                        .unwrap_or(&defaults.get(category))
                };
                WeightVector::new(
                    pick(Category::Cost),
                    pick(Category::IsoCompliance),
                    pick(Category::Safety),
                    pick(Category::Performance),
                )
            }
            None => defaults,
        }
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .level
            .as_deref()
            .unwrap_or(Self::DEFAULT_LOG_LEVEL)
    }

    /// Scoring table for `kind`, built-in defaults plus any `[kinds.*]` override.
    pub fn profile(&self, kind: ItemKind) -> Result<KindProfile> {
        let overrides = self
            .kinds
            .iter()
            .find(|(key, _)| key.parse::<ItemKind>().ok() == Some(kind))
            .map(|(_, overrides)| overrides);
        KindProfile::resolve(kind, overrides)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(weights) = &self.ranking.weights {
            let unknown = weights
                .keys()
                .filter(|key| !Category::ALL.iter().any(|category| category.key() == key.as_str()))
                .cloned()
                .collect::<Vec<_>>();
            if !unknown.is_empty() {
                return Err(RankerError::ConfigParse(format!(
                    "ranking.weights contains unknown key(s): {}",
                    unknown.join(", ")
                )));
            }
        }
        self.weights().validate()?;
        if self.ranking.normalize_weights {
            self.weights().normalized()?;
        }

        for key in self.kinds.keys() {
            let kind: ItemKind = key.parse()?;
            self.profile(kind)?;
        }
        Ok(())
    }
}
