//! Dictionary keys for per-bundle, per-endpoint and per-surface results.
//!
//! Keys are built as `name[,hemisphere][,endpoint]`. The hemisphere is only
//! appended when present; an endpoint key always ends with its endpoint.

pub const KEY_SEPARATOR: char = ',';

/// `bundle` or `bundle,hemisphere`.
pub fn build_bundle_key(bundle: &str, hemisphere: Option<&str>) -> String {
    let mut key = bundle.to_string();
    push_part(&mut key, hemisphere);
    key
}

/// `bundle,endpoint` or `bundle,hemisphere,endpoint`.
pub fn build_bundle_endpoint_key(bundle: &str, endpoint: &str, hemisphere: Option<&str>) -> String {
    let mut key = build_bundle_key(bundle, hemisphere);
    push_part(&mut key, Some(endpoint));
    key
}

/// `surface` or `surface,hemisphere`.
pub fn build_surface_key(surface_type: &str, hemisphere: Option<&str>) -> String {
    let mut key = surface_type.to_string();
    push_part(&mut key, hemisphere);
    key
}

/// Split a key back into its parts.
pub fn split_key(key: &str) -> Vec<&str> {
    key.split(KEY_SEPARATOR).collect()
}

fn push_part(key: &mut String, part: Option<&str>) {
    if let Some(part) = part {
        key.push(KEY_SEPARATOR);
        key.push_str(part);
    }
}
