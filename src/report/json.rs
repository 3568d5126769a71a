use crate::types::report::RankingReport;

pub fn to_json(report: &RankingReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ItemKind;
    use crate::rank;
    use crate::types::item::Item;
    use crate::types::scoring::{CategoryScores, WeightVector};
    use serde_json::Value;

    fn report(items: &[Item]) -> RankingReport {
        let weights = WeightVector::default();
        let rows = rank::rank_items(items, &weights);
        RankingReport {
            kind: ItemKind::TactileSensor,
            generated_at: "2026-01-01T00:00:00+00:00".to_string(),
            weights,
            chart: rank::chart_points(&rows),
            rows,
            warnings: vec![],
        }
    }

    #[test]
    fn json_report_carries_rows_and_chart() {
        let rendered = to_json(&report(&[Item::new(
            "Tactile Sensor A",
            CategoryScores::new(6.0, 7.0, 9.0, 8.0),
        )]))
        .expect("json should serialize");

        let value: Value = serde_json::from_str(&rendered).expect("output should be json");
        assert_eq!(value["kind"], "tactile_sensor");
        assert_eq!(value["rows"][0]["rank"], 1);
        assert_eq!(value["rows"][0]["total_score"], 7.5);
        assert_eq!(value["rows"][0]["scores"]["iso_compliance"], 7.0);
        assert_eq!(value["chart"].as_array().map(Vec::len), Some(4));
        assert_eq!(value["chart"][0]["category"], "Cost");
    }

    #[test]
    fn json_chart_is_null_without_items() {
        let rendered = to_json(&report(&[])).expect("json should serialize");
        let value: Value = serde_json::from_str(&rendered).expect("output should be json");
        assert!(value["chart"].is_null());
        assert_eq!(value["rows"], Value::Array(vec![]));
    }
}
