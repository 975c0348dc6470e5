//! Grouping of sibling runs into nested heading sections.
//!
//! A heading section is a heading plus every following sibling that is
//! nested more deeply, up to the next heading of equal or shallower depth.

use crate::model::ElementId;

/// A heading with its body and nested subsections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// The heading element
    pub heading: ElementId,
    /// Effective depth of the heading
    pub level: u8,
    /// Content between the heading and its first subsection
    pub body: Vec<ElementId>,
    /// Deeper sections in document order
    pub subsections: Vec<Section>,
}

/// A sibling run split into leading content and sections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    /// Content before the first heading
    pub preamble: Vec<ElementId>,
    /// Top-level sections
    pub sections: Vec<Section>,
}

/// Split `ids` into heading sections.
///
/// `level_of` gives the depth of heading elements and `None` for anything
/// else. Headings deeper than `max_depth` are kept as ordinary body content.
pub fn outline<F>(ids: &[ElementId], max_depth: u8, level_of: F) -> Outline
where
    F: Fn(ElementId) -> Option<u8>,
{
    let level = |id: ElementId| level_of(id).filter(|l| *l <= max_depth);

    let mut pos = 0;
    let mut preamble = Vec::new();
    while pos < ids.len() && level(ids[pos]).is_none() {
        preamble.push(ids[pos]);
        pos += 1;
    }

    let sections = collect(ids, &mut pos, 0, &level);
    Outline { preamble, sections }
}

fn collect<F>(ids: &[ElementId], pos: &mut usize, parent: u8, level: &F) -> Vec<Section>
where
    F: Fn(ElementId) -> Option<u8>,
{
    let mut sections = Vec::new();
    while let Some(&heading) = ids.get(*pos) {
        let depth = match level(heading) {
            Some(depth) if depth > parent => depth,
            _ => break,
        };
        *pos += 1;

        let mut body = Vec::new();
        while let Some(&id) = ids.get(*pos) {
            if level(id).is_some() {
                break;
            }
            body.push(id);
            *pos += 1;
        }

        let subsections = collect(ids, pos, depth, level);
        sections.push(Section {
            heading,
            level: depth,
            body,
            subsections,
        });
    }
    sections
}
