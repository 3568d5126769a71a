use crate::types::scoring::{CategoryScores, Score};
use serde::Serialize;
use std::collections::BTreeMap;

/// A named gripper or sensor with its four category scores. Names are for
/// display only and are not required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub name: String,
    pub scores: CategoryScores,
    /// Raw sub-ratings that fed the derived categories. Excluded parameters
    /// have no entry.
    pub sub_ratings: BTreeMap<String, Score>,
}

impl Item {
    pub fn new(name: impl Into<String>, scores: CategoryScores) -> Self {
        Self {
            name: name.into(),
            scores,
            sub_ratings: BTreeMap::new(),
        }
    }

    pub fn with_sub_ratings(mut self, sub_ratings: BTreeMap<String, Score>) -> Self {
        self.sub_ratings = sub_ratings;
        self
    }
}
