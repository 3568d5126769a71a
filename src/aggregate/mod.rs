pub mod extraction;

use crate::error::{RankerError, Result};
use crate::profile::{CategorySource, KindProfile, SubParameter};
use crate::types::report::Warning;
use crate::types::scoring::{Category, CategoryScores, Score, RATING_MAX, RATING_MIN};
use std::collections::BTreeMap;

/// Allowed drift of a category's sub-parameter weights from 1.0.
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;
/// Decimal places kept on category and total scores.
pub const SCORE_DECIMALS: i32 = 2;
const TIE_EPSILON: f64 = 1e-9;

/// Ratings for one item before aggregation. Sub-rating keys must be the
/// profile's canonical sub-parameter names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingInput {
    pub sub_ratings: BTreeMap<String, Score>,
    pub direct: BTreeMap<Category, Score>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub scores: CategoryScores,
    /// Clamped sub-ratings that contributed to a derived category.
    pub sub_ratings: BTreeMap<String, Score>,
    pub warnings: Vec<Warning>,
}

/// Rounds half-to-even at `places` decimals. Values within 1e-9 of a decimal
/// tie count as ties, so 2.345 rounds to 2.34 and 2.355 to 2.36.
pub fn round_half_even(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let scaled = value * factor;
    let floor = scaled.floor();
    let rounded = if (scaled - floor - 0.5).abs() < TIE_EPSILON {
        if floor.rem_euclid(2.0) == 0.0 {
            floor
        } else {
            floor + 1.0
        }
    } else {
        scaled.round()
    };
    rounded / factor
}

pub fn round_score(value: f64) -> Score {
    round_half_even(value, SCORE_DECIMALS)
}

pub fn check_weight_sum(category: Category, parameters: &[SubParameter]) -> Result<()> {
    let sum: f64 = parameters.iter().map(|parameter| parameter.weight).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
        return Err(RankerError::Configuration(format!(
            "{category} sub-parameter weights must sum to 1.0 (found {sum:.6})"
        )));
    }
    Ok(())
}

/// Clamps a rating into [1, 10], recording a warning when it moved.
pub fn clamp_rating(name: &str, value: Score, warnings: &mut Vec<Warning>) -> Score {
    let clamped = value.clamp(RATING_MIN, RATING_MAX);
    if clamped != value {
        tracing::warn!(parameter = name, value, clamped, "rating outside [1, 10] clamped");
        warnings.push(Warning::new(
            "rating.clamped",
            format!("{name}: {value} is outside [{RATING_MIN}, {RATING_MAX}], clamped to {clamped}"),
        ));
    }
    clamped
}

/// round(Σ rating × weight) over the sub-parameters that have a rating.
/// Missing sub-parameters are excluded: their weight is not applied.
pub fn aggregate_category(
    category: Category,
    parameters: &[SubParameter],
    ratings: &BTreeMap<String, Score>,
    warnings: &mut Vec<Warning>,
) -> Result<Score> {
    check_weight_sum(category, parameters)?;
    let total: f64 = parameters
        .iter()
        .filter_map(|parameter| {
            ratings
                .get(&parameter.name)
                .map(|rating| clamp_rating(&parameter.name, *rating, warnings) * parameter.weight)
        })
        .sum();
    Ok(round_score(total))
}

pub fn aggregate(profile: &KindProfile, input: &RatingInput) -> Result<Aggregation> {
    for name in input.sub_ratings.keys() {
        if profile.locate(name).map(|(_, found)| found.name.as_str()) != Some(name.as_str()) {
            return Err(RankerError::UnknownSubParameter {
                kind: profile.kind.to_string(),
                name: name.clone(),
            });
        }
    }

    let mut scores = CategoryScores::default();
    let mut sub_ratings = BTreeMap::new();
    let mut warnings = Vec::new();

    for spec in &profile.categories {
        let score = match &spec.source {
            CategorySource::Derived(parameters) => {
                if input.direct.contains_key(&spec.category) {
                    return Err(RankerError::InvalidRating(format!(
                        "{} is derived from sub-parameters for {} and cannot be scored directly",
                        spec.category, profile.kind
                    )));
                }
                let score =
                    aggregate_category(spec.category, parameters, &input.sub_ratings, &mut warnings)?;
                for parameter in parameters {
                    if let Some(rating) = input.sub_ratings.get(&parameter.name) {
                        sub_ratings.insert(
                            parameter.name.clone(),
                            rating.clamp(RATING_MIN, RATING_MAX),
                        );
                    }
                }
                score
            }
            CategorySource::Direct { default } => {
                let rating = input.direct.get(&spec.category).copied().unwrap_or(*default);
                round_score(clamp_rating(spec.category.label(), rating, &mut warnings))
            }
        };
        scores.set(spec.category, score);
    }

    tracing::debug!(
        kind = %profile.kind,
        cost = scores.cost,
        iso_compliance = scores.iso_compliance,
        safety = scores.safety,
        performance = scores.performance,
        "aggregated category scores"
    );

    Ok(Aggregation {
        scores,
        sub_ratings,
        warnings,
    })
}
