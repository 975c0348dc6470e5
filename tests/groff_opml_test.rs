//! Integration tests for groff-mm and OPML outputs.

use multimark::{
    render, Content, Element, ElementKind, ElementTree, Error, LinkData, OutputFormat,
    RenderOptions,
};

fn groff(tree: &ElementTree) -> multimark::Result<String> {
    render(tree, OutputFormat::GroffMm, &RenderOptions::default())
}

fn opml(tree: &ElementTree) -> String {
    render(tree, OutputFormat::Opml, &RenderOptions::default()).unwrap()
}

#[test]
fn test_groff_document() {
    let mut tree = ElementTree::new();
    let h = tree.heading(1, "Guide");
    let word = tree.str("Read");
    let space = tree.space();
    let emph_word = tree.str("this");
    let emph = tree.node(ElementKind::Emph, vec![emph_word]);
    let p = tree.node(ElementKind::Para, vec![word, space, emph]);
    let quote_body = tree.para("Quoted");
    let quote = tree.node(ElementKind::BlockQuote, vec![quote_body]);
    let code = tree.leaf(ElementKind::Verbatim, "x = 1\n");
    let rule = tree.marker(ElementKind::HRule);
    tree.set_roots(vec![h, p, quote, code, rule]);

    assert_eq!(
        groff(&tree).unwrap(),
        ".H 1 \"Guide\"\n\
         .P\nRead \\fIthis\\fR\n\
         .DS I\n.P\nQuoted\n.DE\n\
         .VERBON 2\nx = 1\n.VERBOFF\n\
         \\l'\\n(.lu*8u/10u'"
    );
}

#[test]
fn test_groff_link_and_image() {
    let mut tree = ElementTree::new();
    let label = tree.words("home page");
    let link = tree.push_link(ElementKind::Link, LinkData::new("http://example.com", label));
    let alt = tree.words("logo");
    let image = tree.push_link(ElementKind::Image, LinkData::new("logo.png", alt));
    let space = tree.space();
    let p = tree.node(ElementKind::Para, vec![link, space, image]);
    tree.push_root(p);

    assert_eq!(
        groff(&tree).unwrap(),
        ".P\nhome page (http://example.com) [IMAGE: logo]"
    );
}

#[test]
fn test_groff_rejects_citations() {
    let mut tree = ElementTree::new();
    let body = tree.para("Entry");
    let cite = tree.push(Element {
        kind: ElementKind::Citation,
        content: Content::Text("doe".to_string()),
        children: vec![body],
    });
    let p = tree.node(ElementKind::Para, vec![cite]);
    tree.push_root(p);

    match groff(&tree) {
        Err(Error::UnhandledElement { format, kind }) => {
            assert_eq!(format, OutputFormat::GroffMm);
            assert_eq!(kind, ElementKind::Citation);
        }
        other => panic!("expected unhandled element, got {:?}", other),
    }
}

#[test]
fn test_groff_heading_clamp() {
    let mut tree = ElementTree::new();
    let h = tree.heading(6, "Deep");
    tree.push_root(h);

    let options = RenderOptions::new().with_base_header_level(3);
    assert_eq!(
        render(&tree, OutputFormat::GroffMm, &options).unwrap(),
        ".H 6 \"Deep\""
    );
}

#[test]
fn test_opml_nesting_follows_heading_depth() {
    let mut tree = ElementTree::new();
    let a = tree.heading(1, "A");
    let a1 = tree.heading(2, "A1");
    let a1_body = tree.para("inside");
    let b = tree.heading(1, "B");
    tree.set_roots(vec![a, a1, a1_body, b]);

    let out = opml(&tree);
    assert!(out.contains(
        "<outline text=\"A\">\n<outline text=\"A1\" _note=\"inside\">\n</outline>\n</outline>\n<outline text=\"B\">\n</outline>\n"
    ));
    assert!(out.ends_with("</body>\n</opml>\n"));
}

#[test]
fn test_opml_skips_tables_without_failing() {
    let mut tree = ElementTree::new();
    let h = tree.heading(1, "Data");
    let sep = tree.leaf(ElementKind::TableSeparator, "l");
    let table = tree.node(ElementKind::Table, vec![sep]);
    let p = tree.para("after");
    tree.set_roots(vec![h, table, p]);

    let out = opml(&tree);
    assert!(out.contains("<outline text=\"Data\" _note=\"after\">"));
}

#[test]
fn test_opml_escapes_quotes_in_notes() {
    let mut tree = ElementTree::new();
    let h = tree.heading(1, "Say \"hi\"");
    let word = tree.str("it");
    let quoted = tree.node(ElementKind::DoubleQuoted, vec![word]);
    let p = tree.node(ElementKind::Para, vec![quoted]);
    tree.set_roots(vec![h, p]);

    let out = opml(&tree);
    assert!(out.contains("<outline text=\"Say &quot;hi&quot;\" _note=\"&quot;it&quot;\">"));
}
