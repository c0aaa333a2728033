use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// ScoreValue – a single cell of a results table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell as found in the challenge result CSV files.
/// Ordered across variants: Null < Bool < Integer < Float < String.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ScoreValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Null,
}

impl Eq for ScoreValue {}

impl PartialOrd for ScoreValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoreValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use ScoreValue::*;
        fn discriminant(v: &ScoreValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => discriminant(self).cmp(&discriminant(other)),
        }
    }
}

impl fmt::Display for ScoreValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreValue::Integer(i) => write!(f, "{i}"),
            ScoreValue::Float(v) => write!(f, "{v}"),
            ScoreValue::Bool(b) => write!(f, "{b}"),
            ScoreValue::String(s) => write!(f, "{s}"),
            ScoreValue::Null => write!(f, "<null>"),
        }
    }
}

impl ScoreValue {
    /// Guess the cell type the way a CSV reader infers a column dtype.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() {
            return ScoreValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return ScoreValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return ScoreValue::Float(f);
        }
        match s {
            "true" | "True" => ScoreValue::Bool(true),
            "false" | "False" => ScoreValue::Bool(false),
            _ => ScoreValue::String(s.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Raw CSV contents
// ---------------------------------------------------------------------------

/// A CSV file read as a header plus typed rows, before any indexing.
///
/// `cells` keeps the trimmed text of every cell so index columns
/// (`Submission ID`, `ROI`, `Bundle`) are read back untouched: `007` stays
/// `007`.
#[derive(Debug, Clone, Default)]
pub struct ScoreSheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<ScoreValue>>,
    pub cells: Vec<Vec<String>>,
}

impl ScoreSheet {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell text as written in the file; empty for padded cells.
    pub fn text(&self, row: usize, col: usize) -> &str {
        self.cells
            .get(row)
            .and_then(|cells| cells.get(col))
            .map_or("", String::as_str)
    }
}

// ---------------------------------------------------------------------------
// PerformanceTable – submission scores indexed by id (and ROI / bundle)
// ---------------------------------------------------------------------------

/// One row of a performance table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub submission_id: String,
    /// ROI or bundle name for per-group tables; `None` for overall scores.
    pub group: Option<String>,
    pub scores: BTreeMap<String, ScoreValue>,
}

/// Scores of every submission, in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerformanceTable {
    /// Name of the secondary index column (`ROI`, `Bundle`), if any.
    pub group_column: Option<String>,
    /// Score columns in header order.
    pub score_columns: Vec<String>,
    pub records: Vec<PerformanceRecord>,
}

impl PerformanceTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct submission ids, sorted.
    pub fn submission_ids(&self) -> BTreeSet<&str> {
        self.records
            .iter()
            .map(|r| r.submission_id.as_str())
            .collect()
    }

    /// Look up one score by its index.
    pub fn get(&self, submission_id: &str, group: Option<&str>, score: &str) -> Option<&ScoreValue> {
        self.records
            .iter()
            .find(|r| r.submission_id == submission_id && r.group.as_deref() == group)
            .and_then(|r| r.scores.get(score))
    }

    /// Keep only records whose group is one of `groups`.
    pub fn retain_groups<S: AsRef<str>>(&mut self, groups: &[S]) {
        self.records.retain(|r| {
            r.group
                .as_deref()
                .is_some_and(|g| groups.iter().any(|wanted| wanted.as_ref() == g))
        });
    }
}
