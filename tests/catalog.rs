use std::fs;
use std::path::{Path, PathBuf};

use tractodata::catalog::{
    list_bundle_endpoints, list_bundles, list_dti_maps, list_exclude_include_maps, list_surfaces,
    list_tissue_maps, select_bundle_endpoints, select_bundles, select_by_label, select_surfaces,
};
use tractodata::data::loader::list_dataset_files;
use tractodata::LabelKind;

fn touch(dir: &Path, names: &[&str]) {
    fs::create_dir_all(dir).unwrap();
    for name in names {
        fs::write(dir.join(name), b"").unwrap();
    }
}

fn fibercup() -> tempfile::TempDir {
    let root = tempfile::tempdir().unwrap();
    let dir = root.path();
    touch(dir, &["COPYING"]);
    touch(
        &dir.join("tractography"),
        &[
            "sub01-dwi_space-orig_desc-synth_subset-CC_tractography.trk",
            "sub01-dwi_hemi-L_space-orig_desc-synth_subset-Cing_tractography.trk",
            "sub01-dwi_hemi-R_space-orig_desc-synth_subset-Cing_tractography.trk",
        ],
    );
    touch(
        &dir.join("endpoints"),
        &[
            "sub01-dwi_hemi-L_space-orig_desc-synth_subset-Cing_part-head_tractography.trk",
            "sub01-dwi_hemi-L_space-orig_desc-synth_subset-Cing_part-tail_tractography.trk",
            "sub01-dwi_space-orig_desc-synth_subset-CC_part-head_tractography.trk",
        ],
    );
    touch(
        &dir.join("surf"),
        &[
            "sub01-T1w_hemi-L_space-orig_pial.surf.vtk",
            "sub01-T1w_hemi-R_space-orig_pial.surf.vtk",
            "sub01-T1w_hemi-R_space-orig_wm.surf.vtk",
        ],
    );
    touch(
        &dir.join("dti"),
        &[
            "sub01-dwi_space-orig_model-DTI_label-FA.nii.gz",
            "sub01-dwi_space-orig_model-DTI_label-MD.nii.gz",
        ],
    );
    touch(
        &dir.join("anat"),
        &[
            "sub01-T1w_space-orig.nii.gz",
            "sub01-T1w_space-orig_label-GM_dseg.nii.gz",
            "sub01-T1w_space-orig_label-WM_dseg.nii.gz",
        ],
    );
    touch(
        &dir.join("roi"),
        &[
            "sub01-T1w_space-orig_label-exclude_probseg.nii.gz",
            "sub01-T1w_space-orig_label-include_probseg.nii.gz",
            "sub01-T1w_space-orig_label-interface.nii.gz",
        ],
    );
    root
}

fn names(paths: impl IntoIterator<Item = PathBuf>) -> Vec<String> {
    paths
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

#[test]
fn dataset_listing_is_sorted_and_skips_copying() {
    let root = fibercup();
    let files = list_dataset_files(root.path()).unwrap();
    assert_eq!(files.len(), 17);
    assert!(files.iter().all(|f| f.file_name().unwrap() != "COPYING"));
    assert!(files.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn bundles_are_keyed_with_optional_hemisphere() {
    let root = fibercup();
    let fnames = list_dataset_files(&root.path().join("tractography")).unwrap();

    assert_eq!(list_bundles(&fnames), vec!["Cing,L", "Cing,R", "CC"]);

    let selected = select_bundles(&fnames, &["Cing"], &["R"]);
    assert_eq!(selected.len(), 1);
    assert_eq!(
        names(selected.get("Cing,R").cloned()),
        vec!["sub01-dwi_hemi-R_space-orig_desc-synth_subset-Cing_tractography.trk"]
    );
}

#[test]
fn bundle_endpoints_end_with_the_endpoint() {
    let root = fibercup();
    let fnames = list_dataset_files(&root.path().join("endpoints")).unwrap();

    assert_eq!(
        list_bundle_endpoints(&fnames),
        vec!["Cing,L,head", "Cing,L,tail", "CC,head"]
    );

    let heads = select_bundle_endpoints(&fnames, &[], &[], &["head"]);
    assert_eq!(heads.keys().collect::<Vec<_>>(), vec!["CC,head", "Cing,L,head"]);

    let cing_tail = select_bundle_endpoints(&fnames, &["Cing"], &["L"], &["tail"]);
    assert_eq!(cing_tail.keys().collect::<Vec<_>>(), vec!["Cing,L,tail"]);
}

#[test]
fn surfaces_read_through_the_dotted_chain() {
    let root = fibercup();
    let fnames = list_dataset_files(&root.path().join("surf")).unwrap();

    assert_eq!(list_surfaces(&fnames), vec!["pial,L", "pial,R", "wm,R"]);

    let pial = select_surfaces(&fnames, &["pial"], &[]);
    assert_eq!(pial.keys().collect::<Vec<_>>(), vec!["pial,L", "pial,R"]);

    let right = select_surfaces(&fnames, &[], &["R"]);
    assert_eq!(right.keys().collect::<Vec<_>>(), vec!["pial,R", "wm,R"]);
}

#[test]
fn scalar_maps_are_keyed_by_their_label() {
    let root = fibercup();

    let dti = list_dataset_files(&root.path().join("dti")).unwrap();
    assert_eq!(list_dti_maps(&dti), vec![Some("FA".to_string()), Some("MD".to_string())]);
    let fa = select_by_label(&dti, LabelKind::Dti, &["FA"]);
    assert_eq!(
        names(fa.into_values()),
        vec!["sub01-dwi_space-orig_model-DTI_label-FA.nii.gz"]
    );

    let anat = list_dataset_files(&root.path().join("anat")).unwrap();
    assert_eq!(
        list_tissue_maps(&anat),
        vec![None, Some("GM".to_string()), Some("WM".to_string())]
    );
    let tissues = select_by_label(&anat, LabelKind::Tissue, &[]);
    assert_eq!(tissues.keys().collect::<Vec<_>>(), vec!["GM", "WM"]);
}

#[test]
fn exclude_include_maps_need_a_trailing_separator() {
    let root = fibercup();
    let fnames = list_dataset_files(&root.path().join("roi")).unwrap();

    assert_eq!(
        list_exclude_include_maps(&fnames),
        vec![Some("exclude".to_string()), Some("include".to_string()), None]
    );

    let selected = select_by_label(&fnames, LabelKind::ExcludeInclude, &["include", "interface"]);
    assert_eq!(selected.keys().collect::<Vec<_>>(), vec!["include"]);
    assert_eq!(
        names(selected.into_values()),
        vec!["sub01-T1w_space-orig_label-include_probseg.nii.gz"]
    );
}
