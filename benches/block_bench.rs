//! Block storage and label lookup benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use blockframe::{
    AxisIndex, Block, HLoc, IlocKey, IndexHierarchy, Label, LocKey, TypedBlockSet,
};

/// Alternating int and float columns, each in its own block
fn fragmented(rows: usize, cols: usize) -> TypedBlockSet {
    let blocks = (0..cols)
        .map(|c| {
            if c % 4 < 2 {
                Block::from_vec((0..rows as i64).map(|r| r * c as i64).collect::<Vec<_>>())
            } else {
                Block::from_vec((0..rows).map(|r| r as f64 * 0.5).collect::<Vec<_>>())
            }
        })
        .collect();
    TypedBlockSet::from_blocks(blocks).unwrap()
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    for rows in [1_000usize, 100_000] {
        let set = fragmented(rows, 16);
        group.bench_with_input(BenchmarkId::new("column", rows), &set, |b, set| {
            b.iter(|| set.extract(&IlocKey::All, black_box(&IlocKey::Position(9))).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("row", rows), &set, |b, set| {
            b.iter(|| set.extract(black_box(&IlocKey::Position(rows / 2)), &IlocKey::All).unwrap())
        });
        let picks: Vec<usize> = (0..rows).step_by(7).collect();
        group.bench_with_input(BenchmarkId::new("row_list", rows), &set, |b, set| {
            b.iter(|| set.take_rows(black_box(&picks)))
        });
    }
    group.finish();
}

fn bench_consolidate(c: &mut Criterion) {
    let mut group = c.benchmark_group("consolidate");
    for cols in [8usize, 64] {
        let set = fragmented(10_000, cols);
        group.bench_with_input(BenchmarkId::from_parameter(cols), &set, |b, set| {
            b.iter(|| set.consolidate().unwrap())
        });
    }
    group.finish();
}

fn bench_hierarchy_loc(c: &mut Criterion) {
    let outer: Vec<Label> = (0..100i64).map(Label::Int).collect();
    let middle: Vec<Label> = (0..20).map(|i| Label::from(format!("m{}", i))).collect();
    let inner: Vec<Label> = vec![Label::from("a"), Label::from("b"), Label::from("c")];
    let index = AxisIndex::from(IndexHierarchy::from_product(vec![outer, middle, inner]).unwrap());

    let point = LocKey::HLoc(HLoc::new(vec![
        LocKey::label(57),
        LocKey::label("m3"),
        LocKey::label("b"),
    ]));
    let fan_out = LocKey::HLoc(HLoc::new(vec![
        LocKey::slice(10, 60),
        LocKey::list(vec!["m1", "m7"]),
        LocKey::label("c"),
    ]));

    let mut group = c.benchmark_group("hierarchy_loc");
    group.bench_function("position", |b| {
        b.iter(|| index.loc_to_iloc(black_box(&point)).unwrap())
    });
    group.bench_function("fan_out", |b| {
        b.iter(|| index.loc_to_iloc(black_box(&fan_out)).unwrap())
    });
    group.finish();
}

criterion_group!(benches, bench_extract, bench_consolidate, bench_hierarchy_loc);
criterion_main!(benches);
