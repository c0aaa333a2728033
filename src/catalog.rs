//! Dataset-reading layer over already resolved file lists.
//!
//! The `list_*` functions name what a dataset contains; the `select_*`
//! functions narrow a list with the label filters and key each remaining
//! path by its labels, ready to be handed to an image, tractogram or surface
//! reader.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::data::filter::filter_filenames_on_value;
use crate::data::keys::{build_bundle_endpoint_key, build_bundle_key, build_surface_key};
use crate::data::label::{extract_with, LabelKind, RootPolicy};

/// Root policy a kind is read with in this layer: surfaces sit inside a
/// dotted chain, everything else does not.
pub fn root_policy_for(kind: LabelKind) -> RootPolicy {
    match kind {
        LabelKind::Surface => RootPolicy::PreservePeriods,
        _ => RootPolicy::FirstPeriod,
    }
}

fn label_of(path: &Path, kind: LabelKind, policy: RootPolicy) -> Option<String> {
    let name = path.to_string_lossy();
    extract_with(&name, kind, policy).map(str::to_string)
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Value of `kind` for each file, `None` where the file does not carry it.
pub fn list_label_values(fnames: &[PathBuf], kind: LabelKind) -> Vec<Option<String>> {
    let policy = root_policy_for(kind);
    fnames.iter().map(|f| label_of(f, kind, policy)).collect()
}

pub fn list_dti_maps(fnames: &[PathBuf]) -> Vec<Option<String>> {
    list_label_values(fnames, LabelKind::Dti)
}

pub fn list_tissue_maps(fnames: &[PathBuf]) -> Vec<Option<String>> {
    list_label_values(fnames, LabelKind::Tissue)
}

pub fn list_exclude_include_maps(fnames: &[PathBuf]) -> Vec<Option<String>> {
    list_label_values(fnames, LabelKind::ExcludeInclude)
}

/// `bundle[,hemisphere]` for each file carrying a bundle label.
pub fn list_bundles(fnames: &[PathBuf]) -> Vec<String> {
    fnames.iter().filter_map(|f| bundle_key(f)).collect()
}

/// `bundle[,hemisphere],endpoint` for each file carrying both labels.
pub fn list_bundle_endpoints(fnames: &[PathBuf]) -> Vec<String> {
    fnames.iter().filter_map(|f| bundle_endpoint_key(f)).collect()
}

/// `surface[,hemisphere]` for each file carrying a surface type.
pub fn list_surfaces(fnames: &[PathBuf]) -> Vec<String> {
    fnames.iter().filter_map(|f| surface_key(f)).collect()
}

fn bundle_key(path: &Path) -> Option<String> {
    let Some(bundle) = label_of(path, LabelKind::Bundle, RootPolicy::FirstPeriod) else {
        warn!("No bundle label in {}", path.display());
        return None;
    };
    let hemisphere = label_of(path, LabelKind::Hemisphere, RootPolicy::FirstPeriod);
    Some(build_bundle_key(&bundle, hemisphere.as_deref()))
}

fn bundle_endpoint_key(path: &Path) -> Option<String> {
    let bundle = label_of(path, LabelKind::Bundle, RootPolicy::FirstPeriod);
    let endpoint = label_of(path, LabelKind::Endpoint, RootPolicy::FirstPeriod);
    let (Some(bundle), Some(endpoint)) = (bundle, endpoint) else {
        warn!("No bundle endpoint labels in {}", path.display());
        return None;
    };
    let hemisphere = label_of(path, LabelKind::Hemisphere, RootPolicy::FirstPeriod);
    Some(build_bundle_endpoint_key(&bundle, &endpoint, hemisphere.as_deref()))
}

fn surface_key(path: &Path) -> Option<String> {
    let policy = RootPolicy::PreservePeriods;
    let Some(surface_type) = label_of(path, LabelKind::Surface, policy) else {
        warn!("No surface type in {}", path.display());
        return None;
    };
    let hemisphere = label_of(path, LabelKind::Hemisphere, policy);
    Some(build_surface_key(&surface_type, hemisphere.as_deref()))
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// Apply `filter_filenames_on_value` unless `values` is empty (no constraint).
fn narrow(fnames: Vec<PathBuf>, kind: LabelKind, values: &[&str]) -> Vec<PathBuf> {
    if values.is_empty() {
        return fnames;
    }
    let shortlist = filter_filenames_on_value(&fnames, kind, values);
    debug!("{kind} {values:?}: {} of {} files kept", shortlist.len(), fnames.len());
    shortlist
}

fn keyed<F>(fnames: Vec<PathBuf>, key_of: F) -> BTreeMap<String, PathBuf>
where
    F: Fn(&Path) -> Option<String>,
{
    let mut selected = BTreeMap::new();
    for fname in fnames {
        let Some(key) = key_of(fname.as_path()) else {
            continue;
        };
        if let Some(previous) = selected.insert(key.clone(), fname) {
            warn!("{key} appears more than once; replacing {}", previous.display());
        }
    }
    selected
}

/// Bundle files keyed `bundle[,hemisphere]`, narrowed by bundle names and
/// then by hemispheres. Empty slices select everything.
pub fn select_bundles(
    fnames: &[PathBuf],
    bundle_names: &[&str],
    hemisphere_names: &[&str],
) -> BTreeMap<String, PathBuf> {
    let shortlist = narrow(fnames.to_vec(), LabelKind::Bundle, bundle_names);
    let shortlist = narrow(shortlist, LabelKind::Hemisphere, hemisphere_names);
    keyed(shortlist, bundle_key)
}

/// Bundle endpoint files keyed `bundle[,hemisphere],endpoint`.
pub fn select_bundle_endpoints(
    fnames: &[PathBuf],
    bundle_names: &[&str],
    hemisphere_names: &[&str],
    endpoint_names: &[&str],
) -> BTreeMap<String, PathBuf> {
    let shortlist = narrow(fnames.to_vec(), LabelKind::Bundle, bundle_names);
    let shortlist = narrow(shortlist, LabelKind::Hemisphere, hemisphere_names);
    let shortlist = narrow(shortlist, LabelKind::Endpoint, endpoint_names);
    keyed(shortlist, bundle_endpoint_key)
}

/// Surface files keyed `surface[,hemisphere]`, narrowed by hemispheres and
/// then by surface types.
pub fn select_surfaces(
    fnames: &[PathBuf],
    surface_types: &[&str],
    hemisphere_names: &[&str],
) -> BTreeMap<String, PathBuf> {
    let shortlist = narrow(fnames.to_vec(), LabelKind::Hemisphere, hemisphere_names);
    let shortlist = narrow(shortlist, LabelKind::Surface, surface_types);
    keyed(shortlist, surface_key)
}

/// Files keyed by their `kind` value (DTI maps, tissue maps,
/// exclude/include maps). Files without the label are skipped.
pub fn select_by_label(fnames: &[PathBuf], kind: LabelKind, values: &[&str]) -> BTreeMap<String, PathBuf> {
    let policy = root_policy_for(kind);
    let shortlist = narrow(fnames.to_vec(), kind, values);
    keyed(shortlist, |path| {
        let value = label_of(path, kind, policy);
        if value.is_none() {
            warn!("No {kind} label in {}", path.display());
        }
        value
    })
}
