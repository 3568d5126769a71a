use crate::aggregate::round_score;
use crate::types::item::Item;
use crate::types::report::{ChartPoint, RankedItem};
use crate::types::scoring::{Category, WeightVector};

/// Scores every item under `weights` and orders them by descending total.
///
/// Ranks follow competition ranking: equal totals share the lowest rank of
/// their group and the next distinct total skips ahead by the group size
/// (1, 2, 2, 4). Ties keep insertion order.
pub fn rank_items(items: &[Item], weights: &WeightVector) -> Vec<RankedItem> {
    let mut scored = items
        .iter()
        .map(|item| (item, round_score(weights.weighted_total(&item.scores))))
        .collect::<Vec<_>>();
    scored.sort_by(|left, right| right.1.total_cmp(&left.1));

    let mut ranked: Vec<RankedItem> = Vec::with_capacity(scored.len());
    for (position, (item, total_score)) in scored.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(previous) if previous.total_score == total_score => previous.rank,
            _ => position + 1,
        };
        ranked.push(RankedItem {
            rank,
            name: item.name.clone(),
            scores: item.scores,
            total_score,
        });
    }
    ranked
}

/// Melts ranked rows into (category, score, name) triples, grouped by
/// category then rank order. `None` means there is nothing to chart.
pub fn chart_points(rows: &[RankedItem]) -> Option<Vec<ChartPoint>> {
    if rows.is_empty() {
        return None;
    }
    Some(
        Category::ALL
            .into_iter()
            .flat_map(|category| {
                rows.iter().map(move |row| ChartPoint {
                    category,
                    score: row.scores.get(category),
                    name: row.name.clone(),
                })
            })
            .collect(),
    )
}
