use std::fmt;
use std::str::FromStr;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Filename vocabulary
// ---------------------------------------------------------------------------

pub const BUNDLE_MARKER: &str = "subset";
pub const ENDPOINT_MARKER: &str = "part";
pub const HEMISPHERE_MARKER: &str = "hemi";
/// Shared by tissue, DTI map and exclude/include labels.
pub const GENERAL_MARKER: &str = "label";
pub const SURFACE_MARKER: &str = "surf";

pub const LABEL_VALUE_SEPARATOR: char = '-';
pub const TOKEN_SEPARATOR: char = '_';

pub const DISCRETE_SEGMENTATION: &str = "dseg";
pub const PROBABILISTIC_SEGMENTATION: &str = "probseg";

pub const ENDPOINTS: &[&str] = &["head", "tail"];
pub const HEMISPHERES: &[&str] = &["L", "R"];
pub const TISSUES: &[&str] = &["CSF", "GM", "WM"];
pub const SURFACE_TYPES: &[&str] = &["inflated", "mid", "pial", "white", "wm"];
pub const DTI_MAPS: &[&str] = &["AD", "FA", "MD", "RD", "RGB"];
pub const EXCLUDE_INCLUDE: &[&str] = &["exclude", "include", "interface"];

const SEGMENTATIONS: &[&str] = &[DISCRETE_SEGMENTATION, PROBABILISTIC_SEGMENTATION];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("Unknown label.\nProvided: {provided}; Available: {available}")]
    UnknownLabel { provided: String, available: String },
}

// ---------------------------------------------------------------------------
// Filename roots
// ---------------------------------------------------------------------------

/// How the extension is removed from a basename before a grammar runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootPolicy {
    /// Cut at the first period: `a_b.nii.gz` → `a_b`.
    #[default]
    FirstPeriod,
    /// Cut only the final extension: `a_pial.surf.vtk` → `a_pial.surf`.
    /// Needed wherever a label sits inside a dotted chain (surfaces).
    PreservePeriods,
}

impl RootPolicy {
    pub fn from_has_period(has_period: bool) -> Self {
        if has_period {
            RootPolicy::PreservePeriods
        } else {
            RootPolicy::FirstPeriod
        }
    }
}

/// Final path segment of `fname`.
pub fn basename(fname: &str) -> &str {
    fname
        .rsplit_once(std::path::is_separator)
        .map_or(fname, |(_, base)| base)
}

/// Basename of `fname` with its extension removed according to `policy`.
pub fn filename_root(fname: &str, policy: RootPolicy) -> &str {
    let base = basename(fname);
    match policy {
        RootPolicy::FirstPeriod => base.split_once('.').map_or(base, |(root, _)| root),
        RootPolicy::PreservePeriods => match base.rfind('.') {
            // A leading period marks a hidden file, not an extension.
            Some(0) | None => base,
            Some(idx) => &base[..idx],
        },
    }
}

// ---------------------------------------------------------------------------
// Grammars
// ---------------------------------------------------------------------------

/// What has to follow a `_marker-value` label for it to count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// An explicit `_`. A value that ends the root is not a match.
    Separator,
    /// `_` immediately followed by one of the listed tokens.
    SeparatorThen(&'static [&'static str]),
    /// `_` or the end of the root.
    SeparatorOrEnd,
}

/// Layout of one label kind inside a filename root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grammar {
    /// `_<marker>-<value>` then `boundary`. `None` vocabulary accepts any
    /// value up to the next `_`.
    Prefixed {
        marker: &'static str,
        vocabulary: Option<&'static [&'static str]>,
        boundary: Boundary,
    },
    /// `_<value>.<marker>` then `.` or the end of the root.
    Suffixed {
        marker: &'static str,
        vocabulary: &'static [&'static str],
    },
}

impl Grammar {
    /// Scan `root` for the first occurrence satisfying the grammar.
    pub fn find<'a>(&self, root: &'a str) -> Option<&'a str> {
        match *self {
            Grammar::Prefixed {
                marker,
                vocabulary,
                boundary,
            } => {
                let needle = format!("{TOKEN_SEPARATOR}{marker}{LABEL_VALUE_SEPARATOR}");
                root.match_indices(needle.as_str()).find_map(|(idx, _)| {
                    let rest = &root[idx + needle.len()..];
                    let (value, after) = match rest.split_once(TOKEN_SEPARATOR) {
                        Some((value, after)) => (value, Some(after)),
                        None => (rest, None),
                    };
                    let bounded = match boundary {
                        Boundary::Separator => after.is_some(),
                        Boundary::SeparatorThen(suffixes) => after
                            .is_some_and(|after| suffixes.iter().any(|s| after.starts_with(s))),
                        Boundary::SeparatorOrEnd => true,
                    };
                    let known = vocabulary.map_or(true, |vocab| vocab.contains(&value));
                    (bounded && known).then_some(value)
                })
            }
            Grammar::Suffixed { marker, vocabulary } => {
                let needle = format!(".{marker}");
                root.match_indices(needle.as_str()).find_map(|(idx, _)| {
                    let after = &root[idx + needle.len()..];
                    if !(after.is_empty() || after.starts_with('.')) {
                        return None;
                    }
                    let (_, value) = root[..idx].rsplit_once(TOKEN_SEPARATOR)?;
                    vocabulary.contains(&value).then_some(value)
                })
            }
        }
    }

    /// The literal token a filename carries for `value`.
    pub fn token(&self, value: &str) -> String {
        match *self {
            Grammar::Prefixed { marker, .. } => format!("{marker}{LABEL_VALUE_SEPARATOR}{value}"),
            Grammar::Suffixed { marker, .. } => format!("{value}.{marker}"),
        }
    }
}

// ---------------------------------------------------------------------------
// LabelKind – the closed set of labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LabelKind {
    Bundle,
    Endpoint,
    Hemisphere,
    Tissue,
    Surface,
    Dti,
    ExcludeInclude,
}

impl LabelKind {
    pub const ALL: [LabelKind; 7] = [
        LabelKind::Bundle,
        LabelKind::Endpoint,
        LabelKind::Hemisphere,
        LabelKind::Tissue,
        LabelKind::Surface,
        LabelKind::Dti,
        LabelKind::ExcludeInclude,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LabelKind::Bundle => "bundle",
            LabelKind::Endpoint => "endpoint",
            LabelKind::Hemisphere => "hemisphere",
            LabelKind::Tissue => "tissue",
            LabelKind::Surface => "surface",
            LabelKind::Dti => "dti",
            LabelKind::ExcludeInclude => "exclude_include",
        }
    }

    pub fn grammar(self) -> Grammar {
        match self {
            LabelKind::Bundle => Grammar::Prefixed {
                marker: BUNDLE_MARKER,
                vocabulary: None,
                boundary: Boundary::Separator,
            },
            LabelKind::Endpoint => Grammar::Prefixed {
                marker: ENDPOINT_MARKER,
                vocabulary: Some(ENDPOINTS),
                boundary: Boundary::Separator,
            },
            LabelKind::Hemisphere => Grammar::Prefixed {
                marker: HEMISPHERE_MARKER,
                vocabulary: Some(HEMISPHERES),
                boundary: Boundary::Separator,
            },
            LabelKind::Tissue => Grammar::Prefixed {
                marker: GENERAL_MARKER,
                vocabulary: Some(TISSUES),
                boundary: Boundary::SeparatorThen(SEGMENTATIONS),
            },
            LabelKind::Surface => Grammar::Suffixed {
                marker: SURFACE_MARKER,
                vocabulary: SURFACE_TYPES,
            },
            LabelKind::Dti => Grammar::Prefixed {
                marker: GENERAL_MARKER,
                vocabulary: Some(DTI_MAPS),
                boundary: Boundary::SeparatorOrEnd,
            },
            LabelKind::ExcludeInclude => Grammar::Prefixed {
                marker: GENERAL_MARKER,
                vocabulary: Some(EXCLUDE_INCLUDE),
                boundary: Boundary::Separator,
            },
        }
    }

    /// Token whose presence in a filename marks `value` for this kind.
    pub fn token(self, value: &str) -> String {
        self.grammar().token(value)
    }

    fn available() -> String {
        LabelKind::ALL
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for LabelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LabelKind {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        LabelKind::ALL
            .into_iter()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| LabelError::UnknownLabel {
                provided: s.to_string(),
                available: LabelKind::available(),
            })
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Value of `kind` carried by `fname`, using the first-period root.
///
/// `None` means the filename does not carry the label. That is the normal
/// outcome for, e.g., a whole-brain tractogram asked for its hemisphere.
pub fn extract(fname: &str, kind: LabelKind) -> Option<&str> {
    extract_with(fname, kind, RootPolicy::FirstPeriod)
}

/// Value of `kind` carried by `fname`, computing the root with `policy`.
///
/// Labels positioned as the last token of the root are only found when the
/// kind's boundary accepts the end of the root (DTI maps). Every other kind
/// requires a trailing `_`.
pub fn extract_with(fname: &str, kind: LabelKind, policy: RootPolicy) -> Option<&str> {
    kind.grammar().find(filename_root(fname, policy))
}
