//! Document metadata lookup.
//!
//! Metadata arrives as a `Metadata` element whose children are `MetaKey`
//! elements. Keys are compared in normalized form: lowercase with all
//! whitespace removed, so `Base Header Level` and `baseheaderlevel` match.

use super::{ElementId, ElementKind, ElementTree};

/// Keys that tune rendering without asking for a complete document.
pub const IGNORABLE_KEYS: &[&str] = &[
    "baseheaderlevel",
    "htmlheaderlevel",
    "latexheaderlevel",
    "language",
    "quoteslanguage",
    "latexmode",
];

/// Normalize a metadata key.
pub fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Check if a key only tunes rendering.
pub fn is_ignorable_key(key: &str) -> bool {
    IGNORABLE_KEYS.contains(&normalize_key(key).as_str())
}

/// One metadata entry.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaEntry {
    /// Normalized key
    pub key: String,
    /// The `MetaKey` element
    pub id: ElementId,
    /// Plain text of the value, trimmed
    pub value: String,
}

/// First top-level metadata block, if any.
pub fn find_block(tree: &ElementTree) -> Option<ElementId> {
    tree.roots()
        .iter()
        .copied()
        .find(|id| tree.kind(*id) == ElementKind::Metadata)
}

/// Entries of a metadata block in document order.
pub fn entries(tree: &ElementTree, block: ElementId) -> Vec<MetaEntry> {
    tree.children(block)
        .iter()
        .copied()
        .filter(|id| tree.kind(*id) == ElementKind::MetaKey)
        .map(|id| MetaEntry {
            key: normalize_key(tree.text(id)),
            id,
            value: tree.plain_text(tree.children(id)).trim().to_string(),
        })
        .collect()
}

/// Check if the document's metadata asks for header/footer wrapping.
///
/// True when a metadata block exists and at least one of its keys is not
/// in [`IGNORABLE_KEYS`].
pub fn requests_complete_document(tree: &ElementTree) -> bool {
    find_block(tree)
        .map(|block| {
            entries(tree, block)
                .iter()
                .any(|entry| !IGNORABLE_KEYS.contains(&entry.key.as_str()))
        })
        .unwrap_or(false)
}

/// Plain-text value of a metadata key.
pub fn extract(tree: &ElementTree, key: &str) -> Option<String> {
    let wanted = normalize_key(key);
    let block = find_block(tree)?;
    entries(tree, block)
        .into_iter()
        .find(|entry| entry.key == wanted)
        .map(|entry| entry.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key() {
        assert_eq!(normalize_key("Base Header Level"), "baseheaderlevel");
        assert_eq!(normalize_key("XHTML\tHeader"), "xhtmlheader");
    }

    #[test]
    fn test_complete_document_detection() {
        let mut tree = ElementTree::new();
        let meta = tree.metadata(&[("Base Header Level", "2"), ("language", "fr")]);
        tree.push_root(meta);
        assert!(!requests_complete_document(&tree));

        let mut tree = ElementTree::new();
        let meta = tree.metadata(&[("language", "fr"), ("Title", "Doc")]);
        tree.push_root(meta);
        assert!(requests_complete_document(&tree));

        assert!(!requests_complete_document(&ElementTree::new()));
    }

    #[test]
    fn test_extract() {
        let mut tree = ElementTree::new();
        let meta = tree.metadata(&[("Title", "  My Doc "), ("Author", "Ann")]);
        tree.push_root(meta);
        assert_eq!(extract(&tree, "title").as_deref(), Some("My Doc"));
        assert_eq!(extract(&tree, "AUTHOR").as_deref(), Some("Ann"));
        assert_eq!(extract(&tree, "date"), None);
    }
}
