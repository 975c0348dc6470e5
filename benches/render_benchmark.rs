//! Benchmarks for multimark rendering performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks render synthetic element trees of growing size.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use multimark::{ElementKind, ElementTree, OutputFormat, RenderOptions};

/// Creates a tree with `section_count` sections, each with a footnote and a
/// small bullet list.
fn create_test_tree(section_count: usize) -> ElementTree {
    let mut tree = ElementTree::new();
    let mut roots = Vec::new();

    for i in 0..section_count {
        roots.push(tree.heading(1 + (i % 3) as u8, &format!("Section {}", i + 1)));

        let note_body = tree.para("Benchmark footnote with some & special < characters.");
        let note = tree.node(ElementKind::Note, vec![note_body]);
        let mut words = tree.words("Benchmark test content for multimark performance measurement.");
        words.push(note);
        roots.push(tree.node(ElementKind::Para, words));

        let items = (0..3)
            .map(|n| {
                let p = tree.para(&format!("item {}", n));
                tree.node(ElementKind::ListItem, vec![p])
            })
            .collect();
        roots.push(tree.node(ElementKind::BulletList, items));
    }

    tree.set_roots(roots);
    tree
}

/// Benchmark each output format on the same tree.
fn bench_formats(c: &mut Criterion) {
    let tree = create_test_tree(20);
    let options = RenderOptions::default();
    let mut group = c.benchmark_group("formats");

    for format in OutputFormat::ALL {
        group.bench_function(format.name(), |b| {
            b.iter(|| multimark::render(black_box(&tree), format, &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark HTML rendering at various sizes.
fn bench_tree_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_size");
    let options = RenderOptions::default();

    for section_count in [10, 100, 1000].iter() {
        let tree = create_test_tree(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| multimark::render(black_box(&tree), OutputFormat::Html, &options).unwrap());
        });
    }

    group.finish();
}

/// Benchmark parallel batch rendering.
fn bench_batch(c: &mut Criterion) {
    let trees: Vec<ElementTree> = (0..32).map(|_| create_test_tree(20)).collect();
    let options = RenderOptions::default();

    c.bench_function("batch_32_latex", |b| {
        b.iter(|| multimark::render_batch(black_box(&trees), OutputFormat::Latex, &options));
    });
}

criterion_group!(benches, bench_formats, bench_tree_size, bench_batch);
criterion_main!(benches);
