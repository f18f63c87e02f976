// Copyright 2025 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use arbor_editor::{EditorConfig, Headless, MemoryStore, Modifiers, Session};
use arbor_projector::{PlaneProjector, ViewParams};
use arbor_tree::query::nearest_in_plane;
use arbor_tree::{NeuriteTree, NodeData, NodeId, VoxelPoint};
use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// A random arbor of `n` nodes: mostly chains, branching with probability `branch`,
/// drifting a few voxels per step and one plane every few steps.
fn gen_arbor(n: usize, branch: f64, seed: u64) -> NeuriteTree {
    let mut rng = Rng::new(seed);
    let mut tree = NeuriteTree::new();
    let mut tips = vec![
        tree.add_child(NodeId::ROOT, NodeData::at(VoxelPoint::new(512.0, 512.0, 32)))
            .unwrap(),
    ];
    while tree.len() < n {
        let i = rng.below(tips.len());
        let parent = tips[i];
        let p = tree.get(parent).unwrap().position();
        let dz = match rng.below(6) {
            0 => -1,
            1 => 1,
            _ => 0,
        };
        let next = VoxelPoint::new(
            p.x + (rng.next_f64() - 0.5) * 8.0,
            p.y + (rng.next_f64() - 0.5) * 8.0,
            (p.z + dz).clamp(0, 63),
        );
        let child = tree.add_child(parent, NodeData::at(next)).unwrap();
        if rng.next_f64() < branch {
            tips.push(child);
        } else {
            tips[i] = child;
        }
    }
    tree
}

fn bench_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("segments");
    for &n in &[1_000_usize, 10_000, 50_000] {
        let tree = gen_arbor(n, 0.05, 0xCAFE_F00D_DEAD_BEEF);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(format!("partition_n{}", n), |b| {
            b.iter(|| black_box(tree.segments()));
        });
    }
    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let mut group = c.benchmark_group("project");
    for &n in &[1_000_usize, 10_000, 50_000] {
        let tree = gen_arbor(n, 0.05, 0xBADC_F00D_1234_5678);
        group.throughput(Throughput::Elements(n as u64));
        for (label, viewport) in [
            ("full", Rect::new(0.0, 0.0, 1024.0, 1024.0)),
            ("zoomed", Rect::new(448.0, 448.0, 576.0, 576.0)),
        ] {
            let projector = PlaneProjector::new(ViewParams::new(32, 3.0, viewport));
            group.bench_function(format!("{}_n{}", label, n), |b| {
                b.iter(|| black_box(projector.project(&tree, Some(NodeId::ROOT))));
            });
        }
    }
    group.finish();
}

fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest_in_plane");
    for &n in &[1_000_usize, 10_000, 50_000] {
        let tree = gen_arbor(n, 0.05, 0xC1A5_7E55_9999_ABCD);
        let mut rng = Rng::new(0xFACE_FEED_CAFE_BABE);
        let cursors: Vec<Point> = (0..64)
            .map(|_| Point::new(448.0 + rng.next_f64() * 128.0, 448.0 + rng.next_f64() * 128.0))
            .collect();
        group.throughput(Throughput::Elements(cursors.len() as u64));
        group.bench_function(format!("pick64_n{}", n), |b| {
            b.iter(|| {
                for &p in &cursors {
                    black_box(nearest_in_plane(&tree, p, 32, 10.0));
                }
            });
        });
    }
    group.finish();
}

fn bench_trace_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");
    let n = 2_000_usize;
    group.throughput(Throughput::Elements(n as u64));
    group.bench_function(format!("add_marker_chain_n{}", n), |b| {
        b.iter_batched(
            || Session::new(EditorConfig::default(), MemoryStore::new()),
            |mut session| {
                for i in 0..n {
                    let p = Point::new(i as f64, (i % 17) as f64);
                    session
                        .add_marker(0, p, (i / 50) as i32, Modifiers::empty(), &mut Headless)
                        .unwrap();
                }
                black_box(session.counts())
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_segments,
    bench_project,
    bench_nearest,
    bench_trace_session
);
criterion_main!(benches);
