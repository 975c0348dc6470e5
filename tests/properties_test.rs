//! Cross-format properties of rendered output.

use multimark::render::escape;
use multimark::{
    label_from_text, render, render_batch, ElementId, ElementKind, ElementTree, OutputFormat,
    RenderOptions,
};

/// A document using every construct all formats can render.
fn sample_tree() -> ElementTree {
    let mut tree = ElementTree::new();
    let mut roots = Vec::new();

    roots.push(tree.heading(1, "Overview"));
    let note_body = tree.para("A note body.");
    let note = tree.node(ElementKind::Note, vec![note_body]);
    let mut words = tree.words("Some text");
    words.push(note);
    roots.push(tree.node(ElementKind::Para, words));

    roots.push(tree.heading(2, "Details"));
    let items: Vec<ElementId> = ["first", "second"]
        .iter()
        .map(|text| {
            let p = tree.para(text);
            tree.node(ElementKind::ListItem, vec![p])
        })
        .collect();
    roots.push(tree.node(ElementKind::BulletList, items));

    let quoted = tree.para("Quoted words");
    roots.push(tree.node(ElementKind::BlockQuote, vec![quoted]));
    roots.push(tree.leaf(ElementKind::Verbatim, "let x = 1;\n"));
    roots.push(tree.marker(ElementKind::HRule));

    roots.push(tree.heading(3, "Closing"));
    roots.push(tree.para("Last paragraph"));

    tree.set_roots(roots);
    tree
}

fn note_markers(html: &str) -> Vec<u32> {
    html.split("class=\"footnote\">[")
        .skip(1)
        .map(|rest| {
            let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().unwrap()
        })
        .collect()
}

#[test]
fn test_padding_never_exceeds_two_blank_lines() {
    let tree = sample_tree();
    for format in OutputFormat::ALL {
        let out = render(&tree, format, &RenderOptions::default()).unwrap();
        assert!(!out.starts_with('\n'), "{} output starts with a blank line", format);
        assert!(!out.contains("\n\n\n"), "{} output has too many blank lines", format);
    }
}

#[test]
fn test_note_numbers_follow_first_encounter() {
    let mut tree = ElementTree::new();
    let notes: Vec<ElementId> = ["one", "two", "three"]
        .iter()
        .map(|text| {
            let body = tree.para(text);
            tree.node(ElementKind::Note, vec![body])
        })
        .collect();
    let order = [notes[1], notes[0], notes[1], notes[2], notes[0]];
    let p = tree.node(ElementKind::Para, order.to_vec());
    tree.push_root(p);

    let out = render(&tree, OutputFormat::Html, &RenderOptions::default()).unwrap();
    assert_eq!(note_markers(&out), vec![1, 2, 1, 3, 2]);

    // Endnotes come out in first-encounter order.
    let two = out.find("<p>two").unwrap();
    let one = out.find("<p>one").unwrap();
    let three = out.find("<p>three").unwrap();
    assert!(two < one && one < three);
}

#[test]
fn test_identical_headings_share_labels() {
    let mut tree = ElementTree::new();
    let a = tree.heading(2, "Same Title");
    let b = tree.heading(2, "Same Title");
    tree.set_roots(vec![a, b]);

    let out = render(&tree, OutputFormat::Html, &RenderOptions::default()).unwrap();
    assert_eq!(out.matches("<h2 id=\"same-title\">").count(), 2);
    assert_eq!(label_from_text("Same Title"), label_from_text("Same Title"));
    assert_eq!(label_from_text(""), "");
}

#[test]
fn test_heading_depth_is_clamped() {
    let mut tree = ElementTree::new();
    let h = tree.heading(6, "Deep");
    tree.push_root(h);
    let options = RenderOptions::new().with_base_header_level(3);

    assert_eq!(
        render(&tree, OutputFormat::Html, &options).unwrap(),
        "<h6 id=\"deep\">Deep</h6>"
    );
    assert_eq!(
        render(&tree, OutputFormat::Latex, &options).unwrap(),
        "{\\itshape Deep}\n\\label{deep}"
    );
}

#[test]
fn test_escaping_leaves_plain_text_alone() {
    let plain = "Plain words 123";
    assert_eq!(escape::html(plain), plain);
    assert_eq!(escape::latex(plain), plain);
    assert_eq!(escape::groff(plain), plain);
    assert_eq!(escape::opml(plain), plain);
}

#[test]
fn test_batch_contexts_are_independent() {
    let trees = vec![sample_tree(), sample_tree()];
    let options = RenderOptions::default();

    let results = render_batch(&trees, OutputFormat::Html, &options);
    let single = render(&trees[0], OutputFormat::Html, &options).unwrap();
    for result in results {
        let out = result.unwrap();
        assert_eq!(out, single);
        assert_eq!(note_markers(&out), vec![1]);
    }
}
