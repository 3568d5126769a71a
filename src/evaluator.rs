use crate::aggregate::extraction::{ratings_from_parameters, ParameterMap};
use crate::aggregate::{self, RatingInput};
use crate::error::{RankerError, Result};
use crate::profile::{CategorySource, KindProfile};
use crate::rank;
use crate::store::RecordStore;
use crate::types::item::Item;
use crate::types::report::{RankingReport, Warning};
use crate::types::scoring::{Category, Score, WeightVector, NEUTRAL_RATING};
use chrono::Utc;
use std::collections::BTreeMap;

/// A manually entered item. Sub-parameter names are matched
/// case-insensitively; unrated ones take the neutral rating.
#[derive(Debug, Clone, Default)]
pub struct ManualEntry {
    pub name: String,
    pub ratings: Vec<(String, Score)>,
    pub direct: Vec<(Category, Score)>,
}

/// Scoring pipeline for one item kind: aggregate, append, rank.
pub struct Evaluator {
    profile: KindProfile,
    store: RecordStore,
    normalize_weights: bool,
}

impl Evaluator {
    pub fn new(profile: KindProfile, store: RecordStore, normalize_weights: bool) -> Self {
        Self {
            profile,
            store,
            normalize_weights,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Full ranked table and chart triples under `weights`.
    pub fn ranking(&self, weights: &WeightVector) -> Result<RankingReport> {
        let weights = self.effective_weights(weights)?;
        let items = self.store.load()?;
        Ok(self.report(&items, weights, Vec::new()))
    }

    pub fn add(&self, entry: &ManualEntry, weights: &WeightVector) -> Result<RankingReport> {
        let weights = self.effective_weights(weights)?;
        let name = validate_name(&entry.name)?;

        let mut sub_ratings = BTreeMap::new();
        for (raw_name, rating) in &entry.ratings {
            let (_, parameter) =
                self.profile
                    .locate(raw_name)
                    .ok_or_else(|| RankerError::UnknownSubParameter {
                        kind: self.profile.kind.to_string(),
                        name: raw_name.clone(),
                    })?;
            sub_ratings.insert(parameter.name.clone(), *rating);
        }
        for column in self.profile.sub_parameter_columns() {
            sub_ratings.entry(column).or_insert(NEUTRAL_RATING);
        }

        let input = RatingInput {
            sub_ratings,
            direct: entry.direct.iter().copied().collect(),
        };
        self.commit(name, &input, Vec::new(), weights)
    }

    /// Folds a completed extraction result into the store. Parameters that
    /// are missing or carry no number are excluded from their category.
    pub fn import(
        &self,
        name: &str,
        parameters: &ParameterMap,
        weights: &WeightVector,
    ) -> Result<RankingReport> {
        let weights = self.effective_weights(weights)?;
        let name = validate_name(name)?;
        let (sub_ratings, warnings) = ratings_from_parameters(&self.profile, parameters);
        if sub_ratings.is_empty() {
            tracing::warn!(name = %name, "no extracted parameter produced a rating");
        }

        let input = RatingInput {
            sub_ratings,
            direct: BTreeMap::new(),
        };
        self.commit(name, &input, warnings, weights)
    }

    /// Category → sub-parameters (or direct default) for display.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = vec![format!("{} ({})", self.profile.kind.label(), self.profile.kind)];
        for spec in &self.profile.categories {
            match &spec.source {
                CategorySource::Derived(parameters) => {
                    lines.push(format!("  {}:", spec.category));
                    for parameter in parameters {
                        lines.push(format!("    - {} ({:.3})", parameter.name, parameter.weight));
                    }
                }
                CategorySource::Direct { default } => {
                    lines.push(format!("  {}: direct (default {default})", spec.category));
                }
            }
        }
        for (parameter, target) in &self.profile.extraction {
            lines.push(format!("  extraction: {parameter} -> {target}"));
        }
        lines
    }

    fn commit(
        &self,
        name: String,
        input: &RatingInput,
        mut warnings: Vec<Warning>,
        weights: WeightVector,
    ) -> Result<RankingReport> {
        let aggregation = aggregate::aggregate(&self.profile, input)?;
        warnings.extend(aggregation.warnings);
        let item = Item::new(name, aggregation.scores).with_sub_ratings(aggregation.sub_ratings);
        let items = self.store.append(item)?;
        Ok(self.report(&items, weights, warnings))
    }

    fn effective_weights(&self, weights: &WeightVector) -> Result<WeightVector> {
        weights.validate()?;
        if self.normalize_weights {
            weights.normalized()
        } else {
            Ok(*weights)
        }
    }

    fn report(&self, items: &[Item], weights: WeightVector, warnings: Vec<Warning>) -> RankingReport {
        let rows = rank::rank_items(items, &weights);
        let chart = rank::chart_points(&rows);
        tracing::info!(kind = %self.profile.kind, items = rows.len(), "ranking computed");
        RankingReport {
            kind: self.profile.kind,
            generated_at: Utc::now().to_rfc3339(),
            weights,
            rows,
            chart,
            warnings,
        }
    }
}

fn validate_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RankerError::InvalidItem("item name must not be empty".to_string()));
    }
    Ok(trimmed.to_string())
}
