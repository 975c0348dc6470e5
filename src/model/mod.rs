//! Document tree types.
//!
//! This module defines the element tree handed over by the markdown parser.
//! The tree is an arena of [`Element`]s addressed by [`ElementId`], so a
//! footnote or citation body can be shared by several reference sites
//! without reference counting.

mod element;
pub mod json;
pub mod metadata;
mod tree;

pub use element::{Alignment, Attribute, Content, Element, ElementId, ElementKind, LinkData};
pub use json::{from_json, to_json, JsonFormat};
pub use tree::ElementTree;
