//! Integration tests for the LaTeX family of outputs.

use multimark::{
    render, render_with_stats, Content, Element, ElementId, ElementKind, ElementTree, LinkData,
    OutputFormat, RenderOptions,
};

fn latex(tree: &ElementTree) -> String {
    render(tree, OutputFormat::Latex, &RenderOptions::default()).unwrap()
}

fn citation(tree: &mut ElementTree, key: &str, entry: &str) -> ElementId {
    let body = tree.para(entry);
    tree.push(Element {
        kind: ElementKind::Citation,
        content: Content::Text(key.to_string()),
        children: vec![body],
    })
}

#[test]
fn test_table_column_spec_from_separator() {
    let mut tree = ElementTree::new();
    let sep = tree.leaf(ElementKind::TableSeparator, "lcr");

    let cell = |tree: &mut ElementTree, text: &str| {
        let word = tree.str(text);
        tree.node(ElementKind::TableCell, vec![word])
    };
    let h1 = cell(&mut tree, "Name");
    let h2 = cell(&mut tree, "Qty");
    let h3 = cell(&mut tree, "Price");
    let head_row = tree.node(ElementKind::TableRow, vec![h1, h2, h3]);
    let head = tree.node(ElementKind::TableHead, vec![head_row]);

    let span = tree.leaf(ElementKind::CellSpan, "|");
    let wide_text = tree.str("Total");
    let wide = tree.node(ElementKind::TableCell, vec![span, wide_text]);
    let last = cell(&mut tree, "9");
    let body_row = tree.node(ElementKind::TableRow, vec![wide, last]);
    let body = tree.node(ElementKind::TableBody, vec![body_row]);

    let caption_text = tree.str("Prices");
    let caption = tree.node(ElementKind::TableCaption, vec![caption_text]);
    let table = tree.node(ElementKind::Table, vec![sep, head, body, caption]);
    tree.push_root(table);

    assert_eq!(
        latex(&tree),
        "\\begin{table}[htbp]\n\\begin{minipage}{\\linewidth}\n\\centering\n\
         \\begin{tabulary}{\\linewidth}{@{}lcr@{}} \\toprule\n\
         Name & Qty & Price \\\\\n\
         \\midrule\n\
         \\multicolumn{2}{l}{Total} & 9 \\\\\n\
         \\bottomrule\n\\end{tabulary}\n\
         \\caption{Prices}\n\\label{prices}\n\
         \\end{minipage}\n\\end{table}"
    );
}

#[test]
fn test_repeated_citation_gives_one_bibitem() {
    let mut tree = ElementTree::new();
    let cite = citation(&mut tree, "doe", "Doe, J. A Book.");
    let p = tree.node(ElementKind::Para, vec![cite, cite]);
    tree.push_root(p);

    assert_eq!(
        latex(&tree),
        "~\\cite{doe}~\\cite{doe}\n\n\
         \\begin{thebibliography}{0}\n\
         \\bibitem{doe}\nDoe, J. A Book.\n\
         \\end{thebibliography}"
    );
}

#[test]
fn test_nocite_lists_without_printing() {
    let mut tree = ElementTree::new();
    let cite = citation(&mut tree, "roe", "Roe, R. Papers.");
    let nocite = tree.node(ElementKind::NoCitation, vec![cite]);
    let p = tree.node(ElementKind::Para, vec![nocite]);
    tree.push_root(p);

    let out = latex(&tree);
    assert!(out.starts_with("\\nocite{roe}"));
    assert_eq!(out.matches("\\bibitem{roe}").count(), 1);
}

#[test]
fn test_glossary_definitions_follow_body() {
    let mut tree = ElementTree::new();
    let term = tree.leaf(ElementKind::GlossaryTerm, "API");
    let description = tree.para("Application interface");
    let entry = tree.node(ElementKind::Glossary, vec![term, description]);
    let word = tree.str("Use");
    let space = tree.space();
    let p = tree.node(ElementKind::Para, vec![word, space, entry]);
    tree.push_root(p);

    assert_eq!(
        latex(&tree),
        "Use \\gls{api}\n\n\\newglossaryentry{api}{name={API},description={Application interface}}"
    );
}

#[test]
fn test_link_forms() {
    let mut tree = ElementTree::new();
    let bare_label = tree.words("http://example.com");
    let bare = tree.push_link(ElementKind::Link, LinkData::new("http://example.com", bare_label));
    let space = tree.space();
    let general_label = tree.words("the docs");
    let general = tree.push_link(
        ElementKind::Link,
        LinkData::new("http://example.com/a_b#x", general_label),
    );
    let p = tree.node(ElementKind::Para, vec![bare, space, general]);
    tree.push_root(p);

    assert_eq!(
        latex(&tree),
        "\\url{http://example.com} \\href{http://example.com/a_b\\#x}{the docs}\
         \\footnote{\\href{http://example.com/a_b\\#x}{http:\\slash{}\\slash{}example.com\\slash{}a\\_b\\#x}}"
    );
}

#[test]
fn test_latexmode_switches_to_memoir() {
    let mut tree = ElementTree::new();
    let meta = tree.metadata(&[("LaTeX Mode", "memoir")]);
    let h = tree.heading(1, "Book");
    tree.set_roots(vec![meta, h]);

    let result = render_with_stats(&tree, OutputFormat::Latex, &RenderOptions::default()).unwrap();
    assert_eq!(result.format, OutputFormat::Memoir);
    assert_eq!(result.content, "\\part{Book}\n\\label{book}");
}

#[test]
fn test_latex_header_level_metadata() {
    let mut tree = ElementTree::new();
    let meta = tree.metadata(&[("LaTeX Header Level", "2"), ("HTML Header Level", "4")]);
    let h = tree.heading(1, "Intro");
    tree.set_roots(vec![meta, h]);

    assert_eq!(latex(&tree), "\\subsection{Intro}\n\\label{intro}");
}

#[test]
fn test_complete_document_macros() {
    let mut tree = ElementTree::new();
    let meta = tree.metadata(&[
        ("Title", "Report"),
        ("Author", "A. Writer"),
        ("LaTeX Input", "mmd-article-header"),
        ("LaTeX Footer", "mmd-article-footer"),
    ]);
    let p = tree.para("Body");
    tree.set_roots(vec![meta, p]);

    assert_eq!(
        latex(&tree),
        "\\def\\mytitle{Report}\n\\def\\myauthor{A. Writer}\n\\input{mmd-article-header}\n\n\
         Body\n\n\\input{mmd-article-footer}"
    );
}

#[test]
fn test_beamer_from_metadata() {
    let mut tree = ElementTree::new();
    let meta = tree.metadata(&[("latexmode", "beamer")]);
    let h = tree.heading(3, "Slide");
    let p = tree.para("Point");
    tree.set_roots(vec![meta, h, p]);

    let out = latex(&tree);
    assert_eq!(
        out,
        "\\begin{frame}[fragile]\n\\frametitle{Slide}\n\\label{slide}\n\nPoint\n\n\\end{frame}"
    );
}

fn nested_citations(tree: &mut ElementTree) -> ElementId {
    let inner = citation(tree, "inner", "Inner.");
    let text = tree.str("Outer, see also");
    let outer_body = tree.node(ElementKind::Para, vec![text, inner]);
    tree.push(Element {
        kind: ElementKind::Citation,
        content: Content::Text("outer".to_string()),
        children: vec![outer_body],
    })
}

#[test]
fn test_citation_inside_bibliography_entry_is_listed() {
    let mut tree = ElementTree::new();
    let outer = nested_citations(&mut tree);
    let p = tree.node(ElementKind::Para, vec![outer]);
    tree.push_root(p);

    assert_eq!(
        latex(&tree),
        "~\\cite{outer}\n\n\
         \\begin{thebibliography}{0}\n\
         \\bibitem{outer}\nOuter, see also~\\cite{inner}\n\
         \\bibitem{inner}\nInner.\n\
         \\end{thebibliography}"
    );
}

#[test]
fn test_beamer_bibliography_lists_nested_citations() {
    let mut tree = ElementTree::new();
    let outer = nested_citations(&mut tree);
    let p = tree.node(ElementKind::Para, vec![outer]);
    tree.push_root(p);

    let out = render(&tree, OutputFormat::Beamer, &RenderOptions::default()).unwrap();
    assert!(out.contains("\\bibitem{outer}"));
    assert!(out.contains("\\bibitem{inner}"));
    assert!(out.ends_with("\\end{thebibliography}\n\\end{frame}"));
}

#[test]
fn test_glossary_inside_bibliography_entry_is_defined() {
    let mut tree = ElementTree::new();
    let term = tree.leaf(ElementKind::GlossaryTerm, "API");
    let description = tree.para("Application interface");
    let entry = tree.node(ElementKind::Glossary, vec![term, description]);
    let text = tree.str("About the");
    let space = tree.space();
    let body = tree.node(ElementKind::Para, vec![text, space, entry]);
    let cite = tree.push(Element {
        kind: ElementKind::Citation,
        content: Content::Text("doe".to_string()),
        children: vec![body],
    });
    let p = tree.node(ElementKind::Para, vec![cite]);
    tree.push_root(p);

    let out = latex(&tree);
    assert!(out.contains("\\bibitem{doe}\nAbout the \\gls{api}\n\\end{thebibliography}"));
    assert!(out.ends_with(
        "\\end{thebibliography}\n\n\\newglossaryentry{api}{name={API},description={Application interface}}"
    ));
}

#[test]
fn test_bibtex_replaces_inline_bibliography() {
    let mut tree = ElementTree::new();
    let meta = tree.metadata(&[("BibTeX", "refs")]);
    let cite = citation(&mut tree, "doe", "Doe, J. A Book.");
    let p = tree.node(ElementKind::Para, vec![cite]);
    tree.set_roots(vec![meta, p]);

    let out = latex(&tree);
    assert!(out.starts_with("\\def\\bibliocommand{\\bibliography{refs}}\n"));
    assert!(!out.contains("thebibliography"));
    assert!(out.ends_with("~\\cite{doe}\n\n\\bibliocommand"));
}

#[test]
fn test_bibtex_leaves_bibliography_to_footer() {
    let mut tree = ElementTree::new();
    let meta = tree.metadata(&[("BibTeX", "refs"), ("LaTeX Footer", "mmd-footer")]);
    let cite = citation(&mut tree, "doe", "Doe, J. A Book.");
    let p = tree.node(ElementKind::Para, vec![cite]);
    tree.set_roots(vec![meta, p]);

    let out = latex(&tree);
    assert_eq!(out.matches("\\bibliocommand").count(), 1);
    assert!(out.ends_with("~\\cite{doe}\n\n\\input{mmd-footer}"));
}
