use crate::types::report::{ChartPoint, RankingReport};
use crate::types::scoring::{Category, RATING_MAX};

const BAR_WIDTH: usize = 20;

pub fn to_markdown(report: &RankingReport) -> String {
    let mut output = String::new();
    output.push_str(&format!("# {} Ranking\n\n", report.kind.label()));
    output.push_str(&format!(
        "Weights: cost {}, iso_compliance {}, safety {}, performance {}\n\n",
        report.weights.cost,
        report.weights.iso_compliance,
        report.weights.safety,
        report.weights.performance
    ));

    output.push_str("| Rank | Name | Cost | ISO Compliance | Safety | Performance | Total Score |\n");
    output.push_str("|---:|---|---:|---:|---:|---:|---:|\n");
    for row in &report.rows {
        output.push_str(&format!(
            "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} |\n",
            row.rank,
            row.name.replace('|', "\\|"),
            row.scores.cost,
            row.scores.iso_compliance,
            row.scores.safety,
            row.scores.performance,
            row.total_score
        ));
    }
    output.push('\n');

    output.push_str("## Chart\n\n");
    match &report.chart {
        Some(points) => push_chart(&mut output, points),
        None => output.push_str("no chart\n"),
    }

    if !report.warnings.is_empty() {
        output.push_str("\n## Warnings\n\n");
        for warning in &report.warnings {
            output.push_str(&format!("- [{}] {}\n", warning.id, warning.body));
        }
    }

    output
}

/// One block per category, one bar per item, scaled against the rating ceiling.
fn push_chart(output: &mut String, points: &[ChartPoint]) {
    let name_width = points
        .iter()
        .map(|point| point.name.chars().count())
        .max()
        .unwrap_or(0);

    output.push_str("```text\n");
    for category in Category::ALL {
        output.push_str(&format!("{category}\n"));
        for point in points.iter().filter(|point| point.category == category) {
            output.push_str(&format!(
                "  {:<name_width$} | {:<BAR_WIDTH$} {:.2}\n",
                point.name,
                bar(point.score),
                point.score
            ));
        }
    }
    output.push_str("```\n");
}

fn bar(score: f64) -> String {
    let filled = (score.clamp(0.0, RATING_MAX) / RATING_MAX * BAR_WIDTH as f64).round() as usize;
    "#".repeat(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::ItemKind;
    use crate::rank;
    use crate::types::item::Item;
    use crate::types::report::Warning;
    use crate::types::scoring::{CategoryScores, WeightVector};

    fn report(items: &[Item], warnings: Vec<Warning>) -> RankingReport {
        let weights = WeightVector::default();
        let rows = rank::rank_items(items, &weights);
        RankingReport {
            kind: ItemKind::Gripper,
            generated_at: "2026-01-01T00:00:00+00:00".to_string(),
            weights,
            chart: rank::chart_points(&rows),
            rows,
            warnings,
        }
    }

    #[test]
    fn markdown_report_contains_table_and_chart() {
        let rendered = to_markdown(&report(
            &[
                Item::new("Vacuum Gripper", CategoryScores::new(6.0, 8.0, 9.0, 7.0)),
                Item::new("Soft Robotic Gripper", CategoryScores::new(7.0, 9.0, 8.0, 9.0)),
            ],
            vec![],
        ));

        assert!(rendered.starts_with("# Gripper Ranking"));
        assert!(rendered.contains("| 1 | Soft Robotic Gripper | 7.00 | 9.00 | 8.00 | 9.00 | 8.25 |"));
        assert!(rendered.contains("| 2 | Vacuum Gripper | 6.00 | 8.00 | 9.00 | 7.00 | 7.50 |"));
        assert!(rendered.contains("ISO Compliance\n"));
        assert!(rendered.contains(&format!("{} 9.00", "#".repeat(18))));
        assert!(!rendered.contains("## Warnings"));
    }

    #[test]
    fn markdown_report_without_items_says_no_chart() {
        let rendered = to_markdown(&report(&[], vec![]));
        assert!(rendered.contains("## Chart\n\nno chart\n"));
    }

    #[test]
    fn markdown_report_lists_warnings() {
        let rendered = to_markdown(&report(
            &[Item::new("Clamp", CategoryScores::new(10.0, 1.0, 1.0, 1.0))],
            vec![Warning::new("rating.clamped", "Payload: 12 is outside [1, 10], clamped to 10")],
        ));
        assert!(rendered.contains("## Warnings"));
        assert!(rendered.contains("- [rating.clamped] Payload: 12"));
    }

    #[test]
    fn bars_scale_to_rating_ceiling() {
        assert_eq!(bar(10.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(5.0), "#".repeat(BAR_WIDTH / 2));
        assert_eq!(bar(0.0), "");
    }
}
