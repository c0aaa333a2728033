//! ISMRM 2015 Tractography Challenge submission results.
//!
//! The results archive holds one overall CSV plus one angular-error CSV and
//! one individual-bundle CSV per submission. Per-submission files share a
//! common prefix and suffix; the submission id is whatever sits in between.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::debug;

use crate::data::loader::load_performance_csv;
use crate::data::model::{PerformanceRecord, PerformanceTable, ScoreSheet, ScoreValue};
use crate::data::subsequence::longest_common_subsequence;

pub const OVERALL_FILENAME_LABEL: &str = "overall";
pub const ANGULAR_ERROR_FILENAME_LABEL: &str = "angular_error";
pub const INDIVIDUAL_BUNDLE_FILENAME_LABEL: &str = "individual_bundle";

pub const SUBMISSION_ID_COLUMN: &str = "Submission ID";
pub const ROI_COLUMN: &str = "ROI";
pub const BUNDLE_COLUMN: &str = "Bundle";

/// Results files split by content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsFiles {
    pub overall: PathBuf,
    pub angular_error: Vec<PathBuf>,
    pub individual_bundle: Vec<PathBuf>,
}

/// Basename without its last extension.
fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Sort the results archive listing into overall, angular-error and
/// individual-bundle files. Input order is kept within each group.
pub fn classify_results_files(fnames: &[PathBuf]) -> Result<ResultsFiles> {
    let with_label = |label: &str| -> Vec<PathBuf> {
        fnames
            .iter()
            .filter(|f| stem(f).contains(label))
            .cloned()
            .collect()
    };

    let overall = with_label(OVERALL_FILENAME_LABEL)
        .into_iter()
        .next()
        .context("No overall results file among the submission results")?;

    let files = ResultsFiles {
        overall,
        angular_error: with_label(ANGULAR_ERROR_FILENAME_LABEL),
        individual_bundle: with_label(INDIVIDUAL_BUNDLE_FILENAME_LABEL),
    };
    debug!(
        "{} angular error and {} bundle results files",
        files.angular_error.len(),
        files.individual_bundle.len()
    );
    Ok(files)
}

/// Recover the submission id embedded in each filename.
///
/// The longest common substring of the stems is removed from every stem,
/// twice: the first pass takes the shared prefix, the second the shared
/// suffix.
pub fn submission_ids_from_filenames<P: AsRef<Path>>(fnames: &[P]) -> Vec<String> {
    let mut labels: Vec<String> = fnames.iter().map(|f| stem(f.as_ref())).collect();

    for _ in 0..2 {
        let common = longest_common_subsequence(&labels);
        if common.is_empty() {
            break;
        }
        for label in &mut labels {
            *label = label.replace(&common, "");
        }
    }

    labels
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn required_column(sheet: &ScoreSheet, name: &str, path: &Path) -> Result<usize> {
    sheet
        .column_index(name)
        .with_context(|| format!("'{name}' column missing from {}", path.display()))
}

/// Score columns to keep: every non-index column, or the requested ones.
fn score_columns(sheet: &ScoreSheet, index: &[&str], scores: &[&str], path: &Path) -> Result<Vec<String>> {
    if scores.is_empty() {
        return Ok(sheet
            .headers
            .iter()
            .filter(|h| !index.contains(&h.as_str()))
            .cloned()
            .collect());
    }
    for score in scores {
        if sheet.column_index(score).is_none() {
            bail!("Score '{score}' not found in {}", path.display());
        }
    }
    Ok(scores.iter().map(|s| s.to_string()).collect())
}

fn row_scores(sheet: &ScoreSheet, row: &[ScoreValue], columns: &[String]) -> BTreeMap<String, ScoreValue> {
    columns
        .iter()
        .map(|col| {
            let value = sheet
                .column_index(col)
                .and_then(|idx| row.get(idx).cloned())
                .unwrap_or(ScoreValue::Null);
            (col.clone(), value)
        })
        .collect()
}

/// Overall performance, one record per submission.
pub fn read_overall_performance(path: &Path, scores: &[&str]) -> Result<PerformanceTable> {
    let sheet = load_performance_csv(path)?;
    let id_idx = required_column(&sheet, SUBMISSION_ID_COLUMN, path)?;
    let columns = score_columns(&sheet, &[SUBMISSION_ID_COLUMN], scores, path)?;

    let records = sheet
        .rows
        .iter()
        .enumerate()
        .map(|(row_no, row)| PerformanceRecord {
            submission_id: sheet.text(row_no, id_idx).to_string(),
            group: None,
            scores: row_scores(&sheet, row, &columns),
        })
        .collect();

    Ok(PerformanceTable {
        group_column: None,
        score_columns: columns,
        records,
    })
}

/// Per-ROI angular error, indexed by submission id and ROI.
pub fn read_angular_performance(fnames: &[PathBuf], scores: &[&str], rois: &[&str]) -> Result<PerformanceTable> {
    read_grouped_performance(fnames, ROI_COLUMN, scores, rois)
}

/// Per-bundle scores, indexed by submission id and bundle.
pub fn read_bundle_performance(fnames: &[PathBuf], scores: &[&str], bundles: &[&str]) -> Result<PerformanceTable> {
    read_grouped_performance(fnames, BUNDLE_COLUMN, scores, bundles)
}

fn read_grouped_performance(
    fnames: &[PathBuf],
    group_column: &str,
    scores: &[&str],
    groups: &[&str],
) -> Result<PerformanceTable> {
    let ids = submission_ids_from_filenames(fnames);

    let mut columns: Option<Vec<String>> = None;
    let mut records = Vec::new();

    for (path, id) in fnames.iter().zip(ids) {
        let sheet = load_performance_csv(path)?;
        let group_idx = required_column(&sheet, group_column, path)?;
        let file_columns = score_columns(&sheet, &[group_column], scores, path)?;
        let columns = columns.get_or_insert(file_columns);

        for (row_no, row) in sheet.rows.iter().enumerate() {
            records.push(PerformanceRecord {
                submission_id: id.clone(),
                group: Some(sheet.text(row_no, group_idx).to_string()),
                scores: row_scores(&sheet, row, columns),
            });
        }
    }

    let mut table = PerformanceTable {
        group_column: Some(group_column.to_string()),
        score_columns: columns.unwrap_or_default(),
        records,
    };
    if !groups.is_empty() {
        table.retain_groups(groups);
    }
    Ok(table)
}
