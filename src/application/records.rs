//! Tree record parsing
//!
//! One record per line: `species,year,height,growth_rate`, e.g.
//! `Maple,2010,12.5,15`. Species outside the vocabulary become
//! `Species::Unknown`; numeric fields must parse.

use thiserror::Error;

use crate::domain::{Species, Tree};

const FIELD_COUNT: usize = 4;

/// A record line that could not be turned into a tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct RecordError {
    /// 1-based line number in the source
    pub line: usize,
    pub message: String,
}

/// Parse a single record line into a tree.
pub fn parse_record(line: &str) -> Result<Tree, String> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            FIELD_COUNT,
            fields.len()
        ));
    }

    let species = Species::from_name(fields[0]);
    let year_planting = fields[1]
        .parse::<i32>()
        .map_err(|e| format!("invalid planting year '{}': {}", fields[1], e))?;
    let height = fields[2]
        .parse::<f64>()
        .map_err(|e| format!("invalid height '{}': {}", fields[2], e))?;
    let growth_rate = fields[3]
        .parse::<f64>()
        .map_err(|e| format!("invalid growth rate '{}': {}", fields[3], e))?;

    Ok(Tree::new(species, year_planting, height, growth_rate))
}

/// Parse every non-blank line of `content`.
///
/// Returns the trees in source order together with the lines that were
/// rejected. A bad line never stops the rest from loading.
pub fn parse_records(content: &str) -> (Vec<Tree>, Vec<RecordError>) {
    let mut trees = Vec::new();
    let mut rejected = Vec::new();

    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line) {
            Ok(tree) => trees.push(tree),
            Err(message) => rejected.push(RecordError {
                line: i + 1,
                message,
            }),
        }
    }

    (trees, rejected)
}
