use crate::error::{RankerError, Result};
use crate::types::item::Item;
use crate::types::scoring::{Category, CategoryScores, Score};
use std::collections::BTreeMap;
use std::io::{Read, Write};
use std::path::Path;

pub const NAME_COLUMN: &str = "Name";

/// Column names that can never be used for a sub-parameter.
pub const RESERVED_COLUMNS: [&str; 7] = [
    NAME_COLUMN,
    "Cost",
    "ISO Compliance",
    "Safety",
    "Performance",
    "Total Score",
    "Rank",
];

/// Derived columns written by older tools; never read back as sub-ratings.
fn is_derived_column(header: &str) -> bool {
    header == "Total Score" || header == "Rank" || header.ends_with(" Weighted")
}

/// Header row: name, the four categories, the profile's sub-parameter
/// columns, then any other sub-rating found on the items.
pub fn header(sub_columns: &[String], items: &[Item]) -> Vec<String> {
    let mut header = vec![NAME_COLUMN.to_string()];
    header.extend(Category::ALL.iter().map(|category| category.label().to_string()));
    header.extend(sub_columns.iter().cloned());
    for item in items {
        for key in item.sub_ratings.keys() {
            if !header.contains(key) {
                header.push(key.clone());
            }
        }
    }
    header
}

pub fn write_items<W: Write>(
    writer: W,
    sub_columns: &[String],
    items: &[Item],
) -> std::result::Result<(), csv::Error> {
    let header = header(sub_columns, items);
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&header)?;

    for item in items {
        let mut record = Vec::with_capacity(header.len());
        record.push(item.name.clone());
        record.extend(item.scores.iter().map(|(_, score)| format_number(score)));
        record.extend(header[1 + Category::ALL.len()..].iter().map(|column| {
            item.sub_ratings
                .get(column)
                .map(|rating| format_number(*rating))
                .unwrap_or_default()
        }));
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reads items by header name. Missing category columns read as 0 and empty
/// sub-rating cells as absent.
pub fn read_items<R: Read>(reader: R, path: &Path) -> Result<Vec<Item>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv_reader
        .headers()
        .map_err(|err| csv_error(path, err))?
        .clone();

    let name_index = headers
        .iter()
        .position(|header| header == NAME_COLUMN)
        .ok_or_else(|| format_error(path, format!("missing '{NAME_COLUMN}' column")))?;
    let category_indices = Category::ALL.map(|category| {
        headers
            .iter()
            .position(|header| header == category.label())
    });
    let sub_columns = headers
        .iter()
        .enumerate()
        .filter(|(index, header)| {
            *index != name_index
                && !category_indices.contains(&Some(*index))
                && !header.is_empty()
                && !is_derived_column(header)
        })
        .map(|(index, header)| (index, header.to_string()))
        .collect::<Vec<_>>();

    if category_indices.iter().any(Option::is_none) {
        tracing::debug!(path = %path.display(), "store is missing category columns, defaulting to 0");
    }

    let mut items = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record.map_err(|err| csv_error(path, err))?;
        let line = row + 2;

        let mut scores = CategoryScores::default();
        for (category, index) in Category::ALL.into_iter().zip(category_indices) {
            let cell = index.and_then(|index| record.get(index)).unwrap_or("");
            let score = parse_cell(cell, path, line, category.label())?.unwrap_or(0.0);
            scores.set(category, score);
        }

        let mut sub_ratings = BTreeMap::new();
        for (index, column) in &sub_columns {
            let cell = record.get(*index).unwrap_or("");
            if let Some(rating) = parse_cell(cell, path, line, column)? {
                sub_ratings.insert(column.clone(), rating);
            }
        }

        let name = record.get(name_index).unwrap_or("").to_string();
        items.push(Item::new(name, scores).with_sub_ratings(sub_ratings));
    }
    Ok(items)
}

fn parse_cell(cell: &str, path: &Path, line: usize, column: &str) -> Result<Option<Score>> {
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse::<Score>()
        .ok()
        .filter(|value| value.is_finite())
        .map(Some)
        .ok_or_else(|| {
            format_error(
                path,
                format!("line {line}, column '{column}': invalid number '{cell}'"),
            )
        })
}

fn format_number(value: Score) -> String {
    value.to_string()
}

/// Splits csv failures into io errors and malformed content.
pub fn csv_error(path: &Path, err: csv::Error) -> RankerError {
    let detail = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => RankerError::StoreIo {
            path: path.to_path_buf(),
            source,
        },
        _ => format_error(path, detail),
    }
}

fn format_error(path: &Path, detail: String) -> RankerError {
    RankerError::StoreFormat {
        path: path.to_path_buf(),
        detail,
    }
}
