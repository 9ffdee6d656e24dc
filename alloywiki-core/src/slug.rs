//! Document keys and private-name detection.

use std::ffi::OsStr;

/// Compute the key for a document name. The key names the output page.
///
/// Rules:
/// - Keep alphanumeric characters and hyphens
/// - Drop everything else, whitespace included
/// - Preserve case
///
/// Link lookups compare the lowercased form, see [`link_key`].
///
/// # Examples
///
/// ```
/// use alloywiki_core::document_key;
///
/// assert_eq!(document_key("HOTG1 DSC"), "HOTG1DSC");
/// assert_eq!(document_key("Lauren's Alloy"), "LaurensAlloy");
/// assert_eq!(document_key("Co-Fe (2.5)"), "Co-Fe25");
/// ```
pub fn document_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric() || *c == '-')
        .collect()
}

/// Case-insensitive identity used to match `[[wikilink]]` targets against
/// documents, so `[[feco alloy]]` finds `FeCo Alloy.md`.
///
/// ```
/// use alloywiki_core::slug::link_key;
///
/// assert_eq!(link_key("FeCo Alloy"), link_key("feco alloy"));
/// assert_eq!(link_key("HOTG1 DSC"), "hotg1dsc");
/// ```
pub fn link_key(name: &str) -> String {
    document_key(name).to_lowercase()
}

/// Names starting with `_` or `.` are drafts or tool state and never publish.
pub fn is_private_name(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.starts_with('_') || name.starts_with('.')
}
