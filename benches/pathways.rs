use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pathway_viz::config::{LayoutConfig, Padding};
use pathway_viz::highlight::{EdgeLookup, project};
use pathway_viz::ir::{Link, Node};
use pathway_viz::layout::{Canvas, compute_layout};
use pathway_viz::paths::find_paths_through_required;
use std::collections::BTreeSet;
use std::hint::black_box;

/// `steps` layers of `width` alternative enzymes, every node of one layer
/// feeding every node of the next.
fn layered_module(steps: usize, width: usize) -> (Vec<Node>, Vec<Link>) {
    let mut nodes = vec![Node::new("START", 0, 1.0)];
    let mut links = Vec::new();
    let mut previous = vec!["START".to_string()];
    for step in 1..=steps {
        let mut current = Vec::new();
        for alt in 0..width {
            let id = format!("K{:05}_{step}", alt + step * 10);
            nodes.push(Node::new(id.clone(), step as i64, 1.0 / (alt + 1) as f64));
            for from in &previous {
                links.push(Link::new(from.clone(), id.clone()).with_occurrence(0.5));
            }
            current.push(id);
        }
        previous = current;
    }
    nodes.push(Node::new("SINK", steps as i64 + 1, 1.0));
    for from in &previous {
        links.push(Link::new(from.clone(), "SINK"));
    }
    (nodes, links)
}

fn bench_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("paths");
    for (steps, width) in [(4, 2), (6, 3), (8, 3)] {
        let (nodes, links) = layered_module(steps, width);
        let required: BTreeSet<String> = BTreeSet::from([nodes[1].id.clone()]);
        let lookup = EdgeLookup::new(&links);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{steps}x{width}")),
            &links,
            |b, links| {
                b.iter(|| {
                    let paths =
                        find_paths_through_required(black_box(links), &required, "START", "SINK");
                    let highlight = project(&paths, &lookup);
                    black_box(highlight.edges.len());
                });
            },
        );
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    let canvas = Canvas::new(1750.0, 1200.0, Padding::default());
    for (steps, width) in [(4, 2), (8, 4)] {
        let (nodes, links) = layered_module(steps, width);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{steps}x{width}")),
            &(nodes, links),
            |b, (nodes, links)| {
                b.iter(|| {
                    let mut nodes = nodes.clone();
                    let layout = compute_layout(&mut nodes, black_box(links), canvas, &config);
                    black_box(layout.layers.len());
                });
            },
        );
    }
    group.finish();
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_paths, bench_layout
);
criterion_main!(benches);
