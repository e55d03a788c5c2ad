//! Folding of boundary-source state names onto canonical repository keys.
//!
//! Boundary datasets lag administrative changes: renamed states keep their
//! old names and Jammu & Kashmir is still drawn as one pre-2019 polygon.
//! Matching is exact; there is no case folding or fuzzy matching.

use log::debug;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

/// Every state or territory name used as a repository key.
pub static CANONICAL_NAMES: &[&str] = &[
    "Andhra Pradesh",
    "Arunachal Pradesh",
    "Assam",
    "Bihar",
    "Chhattisgarh",
    "Delhi",
    "Goa",
    "Gujarat",
    "Haryana",
    "Himachal Pradesh",
    "Jammu and Kashmir",
    "Jharkhand",
    "Karnataka",
    "Kerala",
    "Ladakh",
    "Madhya Pradesh",
    "Maharashtra",
    "Manipur",
    "Meghalaya",
    "Mizoram",
    "Nagaland",
    "Odisha",
    "Punjab",
    "Rajasthan",
    "Sikkim",
    "Tamil Nadu",
    "Telangana",
    "Tripura",
    "Uttar Pradesh",
    "Uttarakhand",
    "West Bengal",
];

static CANONICAL: LazyLock<BTreeSet<&'static str>> =
    LazyLock::new(|| CANONICAL_NAMES.iter().copied().collect());

/// Non-canonical spellings mapped to their canonical key.
static ALIASES: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        // undivided J&K boundary folds onto the J&K key
        ("Jammu & Kashmir", "Jammu and Kashmir"),
        ("Jammu & Kashmiradesh", "Jammu and Kashmir"),
        // renamed 2007
        ("Uttaranchal", "Uttarakhand"),
        // renamed 2011
        ("Orissa", "Odisha"),
        // official long form
        ("NCT of Delhi", "Delhi"),
    ])
});

/// Feature property keys that may carry the state name, in precedence order.
pub const NAME_PROPERTIES: [&str; 4] = ["NAME_1", "name", "ST_NM", "state"];

/// Returns true when `name` is already a canonical key.
pub fn is_canonical(name: &str) -> bool {
    CANONICAL.contains(name)
}

/// Resolves a raw boundary name to its canonical key.
///
/// Unknown names pass through unchanged and simply miss the repository
/// later on.
pub fn resolve(raw_name: &str) -> &str {
    if is_canonical(raw_name) {
        return raw_name;
    }
    match ALIASES.get(raw_name) {
        Some(canonical) => *canonical,
        None => {
            debug!("No alias registered for '{}', passing through", raw_name);
            raw_name
        }
    }
}

/// Picks the raw state name out of a boundary feature's properties.
///
/// `property` looks up one key; the first non-empty value among
/// [`NAME_PROPERTIES`] wins, otherwise the empty string.
pub fn feature_name<'a, F>(property: F) -> &'a str
where
    F: Fn(&str) -> Option<&'a str>,
{
    NAME_PROPERTIES
        .iter()
        .copied()
        .filter_map(|key| property(key))
        .find(|value| !value.is_empty())
        .unwrap_or("")
}

/// Resolves a feature's name in one step.
pub fn resolve_feature<'a, F>(property: F) -> &'a str
where
    F: Fn(&str) -> Option<&'a str>,
{
    resolve(feature_name(property))
}

/// True for the two territories drawn inside the single pre-2019 Jammu &
/// Kashmir polygon. Presentation attaches a boundary disclaimer to these.
pub fn inside_undivided_boundary(canonical_name: &str) -> bool {
    matches!(canonical_name, "Jammu and Kashmir" | "Ladakh")
}
