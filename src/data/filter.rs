use std::path::Path;

use super::label::LabelKind;

// ---------------------------------------------------------------------------
// Substring filters over filename lists
// ---------------------------------------------------------------------------

/// Keep the items of `primary` that contain any of the `secondary` strings.
///
/// Original order is kept and an item appears at most once, however many
/// secondary strings it contains. An empty list is returned when nothing
/// matches.
pub fn filter_list_on_list<T, S>(primary: &[T], secondary: &[S]) -> Vec<T>
where
    T: AsRef<Path> + Clone,
    S: AsRef<str>,
{
    primary
        .iter()
        .filter(|item| {
            let path: &Path = item.as_ref();
            let name = path.to_string_lossy();
            secondary.iter().any(|needle| {
                let needle: &str = needle.as_ref();
                name.contains(needle)
            })
        })
        .cloned()
        .collect()
}

/// Keep the filenames carrying any of `values` for `kind`.
///
/// Each value is matched in turn against the full input through its
/// `marker-value` (or `value.surf`) token, and the per-value shortlists are
/// concatenated:
/// * the outer order follows `values`;
/// * within a value, the input order is kept;
/// * a filename matching two values appears twice.
///
/// Matching is plain substring containment, so `hemi-L` also matches
/// `hemi-Lx`.
pub fn filter_filenames_on_value<T, V>(fnames: &[T], kind: LabelKind, values: &[V]) -> Vec<T>
where
    T: AsRef<Path> + Clone,
    V: AsRef<str>,
{
    values
        .iter()
        .flat_map(|value| filter_list_on_list(fnames, &[kind.token(value.as_ref())]))
        .collect()
}
