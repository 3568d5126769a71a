use crate::profile::ItemKind;
use crate::types::scoring::{Category, CategoryScores, Score, WeightVector};
use serde::Serialize;

/// A stored item plus its derived total and competition rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedItem {
    pub rank: usize,
    pub name: String,
    pub scores: CategoryScores,
    pub total_score: Score,
}

/// One melted (category, score, item) triple for grouped bar charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub category: Category,
    pub score: Score,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub id: String,
    pub body: String,
}

impl Warning {
    pub fn new(id: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            body: body.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub kind: ItemKind,
    pub generated_at: String,
    pub weights: WeightVector,
    pub rows: Vec<RankedItem>,
    /// `None` when there is nothing to plot.
    pub chart: Option<Vec<ChartPoint>>,
    pub warnings: Vec<Warning>,
}
