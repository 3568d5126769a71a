pub mod json;
pub mod md;

use crate::error::RankerError;
use crate::types::report::RankingReport;

#[derive(Debug, Clone, Copy)]
pub enum OutputFormat {
    Json,
    Md,
}

pub fn render(report: &RankingReport, format: OutputFormat) -> Result<String, RankerError> {
    match format {
        OutputFormat::Json => json::to_json(report).map_err(RankerError::Json),
        OutputFormat::Md => Ok(md::to_markdown(report)),
    }
}
