use crate::error::{RankerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub type Score = f64;

pub const RATING_MIN: Score = 1.0;
pub const RATING_MAX: Score = 10.0;
/// Neutral slider position used when a rating is not supplied.
pub const NEUTRAL_RATING: Score = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Cost")]
    Cost,
    #[serde(rename = "ISO Compliance")]
    IsoCompliance,
    #[serde(rename = "Safety")]
    Safety,
    #[serde(rename = "Performance")]
    Performance,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Cost,
        Category::IsoCompliance,
        Category::Safety,
        Category::Performance,
    ];

    /// Column header and display label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Cost => "Cost",
            Self::IsoCompliance => "ISO Compliance",
            Self::Safety => "Safety",
            Self::Performance => "Performance",
        }
    }

    /// Key used in `ranker.toml`.
    pub fn key(self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::IsoCompliance => "iso_compliance",
            Self::Safety => "safety",
            Self::Performance => "performance",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = RankerError;

    fn from_str(value: &str) -> Result<Self> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "cost" => Ok(Self::Cost),
            "iso" | "iso_compliance" | "isocompliance" => Ok(Self::IsoCompliance),
            "safety" => Ok(Self::Safety),
            "perf" | "performance" => Ok(Self::Performance),
            _ => Err(RankerError::ConfigParse(format!("unknown category: {value}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryScores {
    pub cost: Score,
    pub iso_compliance: Score,
    pub safety: Score,
    pub performance: Score,
}

impl CategoryScores {
    pub fn new(cost: Score, iso_compliance: Score, safety: Score, performance: Score) -> Self {
        Self {
            cost,
            iso_compliance,
            safety,
            performance,
        }
    }

    pub fn get(&self, category: Category) -> Score {
        match category {
            Category::Cost => self.cost,
            Category::IsoCompliance => self.iso_compliance,
            Category::Safety => self.safety,
            Category::Performance => self.performance,
        }
    }

    pub fn set(&mut self, category: Category, score: Score) {
        match category {
            Category::Cost => self.cost = score,
            Category::IsoCompliance => self.iso_compliance = score,
            Category::Safety => self.safety = score,
            Category::Performance => self.performance = score,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, Score)> + '_ {
        Category::ALL
            .into_iter()
            .map(move |category| (category, self.get(category)))
    }
}

/// User-supplied multipliers for the four categories. Scoped to one ranking
/// request and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub cost: f64,
    pub iso_compliance: f64,
    pub safety: f64,
    pub performance: f64,
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::uniform(0.25)
    }
}

impl WeightVector {
    pub fn new(cost: f64, iso_compliance: f64, safety: f64, performance: f64) -> Self {
        Self {
            cost,
            iso_compliance,
            safety,
            performance,
        }
    }

    pub fn uniform(weight: f64) -> Self {
        Self::new(weight, weight, weight, weight)
    }

    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Cost => self.cost,
            Category::IsoCompliance => self.iso_compliance,
            Category::Safety => self.safety,
            Category::Performance => self.performance,
        }
    }

    pub fn sum(&self) -> f64 {
        Category::ALL
            .iter()
            .map(|category| self.get(*category))
            .sum()
    }

    pub fn validate(&self) -> Result<()> {
        for category in Category::ALL {
            let weight = self.get(category);
            if !weight.is_finite() || weight < 0.0 {
                return Err(RankerError::InvalidWeights(format!(
                    "{} weight must be a non-negative number (found {weight})",
                    category.key()
                )));
            }
        }
        Ok(())
    }

    /// Rescales the vector so it sums to 1.0.
    pub fn normalized(&self) -> Result<Self> {
        self.validate()?;
        let sum = self.sum();
        if sum <= 0.0 {
            return Err(RankerError::InvalidWeights(
                "cannot normalize an all-zero weight vector".to_string(),
            ));
        }
        Ok(Self::new(
            self.cost / sum,
            self.iso_compliance / sum,
            self.safety / sum,
            self.performance / sum,
        ))
    }

    /// Σ categoryScore × weight, unrounded.
    pub fn weighted_total(&self, scores: &CategoryScores) -> Score {
        scores
            .iter()
            .map(|(category, score)| score * self.get(category))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_labels_and_keys() {
        let parse = |value: &str| value.parse::<Category>().expect("category should parse");
        assert_eq!(parse("ISO Compliance"), Category::IsoCompliance);
        assert_eq!(parse("iso"), Category::IsoCompliance);
        assert_eq!(parse("Performance"), Category::Performance);
        assert_eq!(parse("cost"), Category::Cost);
        assert!("comfort".parse::<Category>().is_err());
    }

    #[test]
    fn weighted_total_uses_raw_multipliers() {
        let scores = CategoryScores::new(6.0, 8.0, 9.0, 7.0);
        assert_eq!(WeightVector::default().weighted_total(&scores), 7.5);
        assert_eq!(
            WeightVector::new(1.0, 0.0, 0.0, 0.0).weighted_total(&scores),
            6.0
        );
        assert_eq!(WeightVector::uniform(1.0).weighted_total(&scores), 30.0);
    }

    #[test]
    fn validate_rejects_negative_and_non_finite_weights() {
        assert!(WeightVector::new(-0.1, 0.5, 0.3, 0.3).validate().is_err());
        assert!(WeightVector::new(f64::NAN, 0.5, 0.3, 0.3).validate().is_err());
        assert!(WeightVector::new(0.0, 0.0, 0.0, 0.0).validate().is_ok());
    }

    #[test]
    fn normalized_rescales_to_unit_sum() {
        let weights = WeightVector::new(2.0, 1.0, 1.0, 0.0)
            .normalized()
            .expect("weights should normalize");
        assert!((weights.sum() - 1.0).abs() < 1e-12);
        assert_eq!(weights.cost, 0.5);
        assert!(WeightVector::uniform(0.0).normalized().is_err());
    }
}
