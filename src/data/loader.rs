use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::{debug, warn};
use serde_json::{Map, Value as JsonValue};
use walkdir::WalkDir;

use super::model::{ScoreSheet, ScoreValue};

/// Licence file shipped inside some dataset archives.
pub const PERMISSION_FILENAME: &str = "COPYING";

/// Keys every bundle entry of a tracking evaluation configuration carries.
pub const TRACKING_CONFIG_REQUIRED_KEYS: &[&str] = &["cluster_threshold"];

// ---------------------------------------------------------------------------
// Dataset directory listing
// ---------------------------------------------------------------------------

/// List the files of an extracted dataset, sorted by path.
///
/// Sub-directories are walked (archives sometimes extract into a nested
/// folder). Dataset use permission files are left out.
pub fn list_dataset_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Dataset folder not found: {}", dir.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(false) {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    files.sort();

    let files = exclude_permission_files(&files, PERMISSION_FILENAME);
    debug!("{} files in {}", files.len(), dir.display());
    Ok(files)
}

/// Drop every path whose text contains `permission_fname`.
pub fn exclude_permission_files(fnames: &[PathBuf], permission_fname: &str) -> Vec<PathBuf> {
    fnames
        .iter()
        .filter(|f| {
            let permission = f.to_string_lossy().contains(permission_fname);
            if permission {
                warn!("Skipping dataset use permission file {}", f.display());
            }
            !permission
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tracking evaluation configuration (JSON)
// ---------------------------------------------------------------------------

/// Load a tracking evaluation configuration: one JSON object per bundle.
///
/// ```json
/// {
///   "CC": { "cluster_threshold": 6, "gt_mask": "...", ... },
///   ...
/// }
/// ```
pub fn load_tracking_evaluation_config(path: &Path) -> Result<Map<String, JsonValue>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading JSON file {}", path.display()))?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let config = match root {
        JsonValue::Object(map) => map,
        other => bail!(
            "Expected top-level JSON object in {}, got {}",
            path.display(),
            json_kind(&other)
        ),
    };

    for (bundle, entry) in &config {
        let fields = entry
            .as_object()
            .with_context(|| format!("Entry '{bundle}' is {}, expected an object", json_kind(entry)))?;
        for key in TRACKING_CONFIG_REQUIRED_KEYS {
            if !fields.contains_key(*key) {
                bail!("Entry '{bundle}' is missing '{key}'");
            }
        }
    }

    debug!("{} bundles in tracking evaluation config {}", config.len(), path.display());
    Ok(config)
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

// ---------------------------------------------------------------------------
// Performance CSV
// ---------------------------------------------------------------------------

/// Read a results CSV: a header row, then one typed cell per column.
///
/// Short rows are padded with `Null`; rows longer than the header are an
/// error.
pub fn load_performance_csv(path: &Path) -> Result<ScoreSheet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening CSV {}", path.display()))?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut cells = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() > headers.len() {
            bail!(
                "CSV row {row_no}: {} cells but {} columns",
                record.len(),
                headers.len()
            );
        }

        let mut text: Vec<String> = record.iter().map(|c| c.trim().to_string()).collect();
        text.resize(headers.len(), String::new());

        rows.push(text.iter().map(|c| ScoreValue::parse(c)).collect());
        cells.push(text);
    }

    debug!("{} rows read from {}", rows.len(), path.display());
    Ok(ScoreSheet { headers, rows, cells })
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn csv_rows_are_typed_and_padded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(&path, "Bundle,VC,OR,valid\nCA,0.5,2,true\nCC,0.25\n").unwrap();

        let sheet = load_performance_csv(&path).unwrap();
        assert_eq!(sheet.headers, vec!["Bundle", "VC", "OR", "valid"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0][2], ScoreValue::Integer(2));
        assert_eq!(sheet.rows[1][3], ScoreValue::Null);
        assert_eq!(sheet.text(1, 1), "0.25");
        assert_eq!(sheet.text(1, 3), "");
    }

    #[test]
    fn csv_text_keeps_numeric_looking_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overall.csv");
        fs::write(&path, "Submission ID,VB\n007,20\n1.10,22\n").unwrap();

        let sheet = load_performance_csv(&path).unwrap();
        assert_eq!(sheet.rows[0][0], ScoreValue::Integer(7));
        assert_eq!(sheet.text(0, 0), "007");
        assert_eq!(sheet.text(1, 0), "1.10");
    }

    #[test]
    fn csv_row_wider_than_header_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "a,b\n1,2,3\n").unwrap();
        assert!(load_performance_csv(&path).is_err());
    }

    #[test]
    fn config_must_be_an_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracking_evaluation_config.json");

        fs::write(&path, r#"{"CC": {"cluster_threshold": 6, "gt_mask": "CC.nii.gz"}}"#).unwrap();
        let config = load_tracking_evaluation_config(&path).unwrap();
        assert_eq!(config["CC"]["gt_mask"], "CC.nii.gz");

        fs::write(&path, "[1, 2]").unwrap();
        let err = load_tracking_evaluation_config(&path).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn config_entries_need_cluster_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tracking_evaluation_config.json");

        fs::write(&path, r#"{"CC": {"gt_mask": "CC.nii.gz"}}"#).unwrap();
        let err = load_tracking_evaluation_config(&path).unwrap_err();
        assert!(err.to_string().contains("cluster_threshold"));

        fs::write(&path, r#"{"CC": 3}"#).unwrap();
        assert!(load_tracking_evaluation_config(&path).is_err());
    }

    #[test]
    fn listing_skips_permission_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("sub01-T1w");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("sub01-T1w.nii.gz"), b"").unwrap();
        fs::write(nested.join(PERMISSION_FILENAME), b"").unwrap();
        fs::write(dir.path().join("a.trk"), b"").unwrap();

        let files = list_dataset_files(dir.path()).unwrap();
        assert_eq!(files, vec![dir.path().join("a.trk"), nested.join("sub01-T1w.nii.gz")]);

        assert!(list_dataset_files(&dir.path().join("missing")).is_err());
    }

    #[test]
    fn permission_files_match_by_substring() {
        let fnames = vec![
            PathBuf::from("/data/fibercup/COPYING"),
            PathBuf::from("/data/fibercup/COPYING.txt"),
            PathBuf::from("/data/fibercup/sub01-T1w.nii.gz"),
        ];
        assert_eq!(
            exclude_permission_files(&fnames, PERMISSION_FILENAME),
            vec![PathBuf::from("/data/fibercup/sub01-T1w.nii.gz")]
        );
    }
}
