//! Tractography dataset conventions: BIDS-like filename labels, label
//! filtering, bundle/surface keys and challenge submission results.

pub mod catalog;
pub mod config;
pub mod data;
pub mod submission;

pub use config::TractodataConfig;
pub use data::filter::{filter_filenames_on_value, filter_list_on_list};
pub use data::keys::{build_bundle_endpoint_key, build_bundle_key, build_surface_key};
pub use data::label::{extract, extract_with, LabelError, LabelKind, RootPolicy};
pub use data::subsequence::{is_subsequence, is_subsequence_of_all, longest_common_subsequence};
