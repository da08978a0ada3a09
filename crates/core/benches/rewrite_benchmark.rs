//! Benchmarks for fragment rewriting
//!
//! Run with: cargo bench -p demacro-core

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use demacro_core::MacroRewriter;

/// A macro-dense markdown cell
const MACRO_HEAVY_CELL: &str = r"## The IND-CPA experiment

The challenger samples $b \sample \{0,1\}$ and runs \algo{KeyGen}(\secparam)
to obtain (\pk, \sk). The adversary \adv plays \game{\algo{Exp}^{ind-cpa}}{\adv}
and we bound \pr{b' = b} - 1/2 \defeq \negl(\secpar).

\pcif b = 1 \pcthen \pcreturn \var{guess} \gets \adv(\pk, c)

Group setup: \gparam \gets \grgen(\secpar) with \GG of prime order $p \in \NN$.";

/// A prose cell with no macros at all
const PLAIN_CELL: &str = r"## Background

Public-key encryption lets two parties communicate privately without a shared
secret. This section reviews the textbook constructions, their security notions,
and the standard reductions between them. No formal notation appears here; the
games are introduced one chapter later, after the group-theoretic background.";

fn bench_rewrite(c: &mut Criterion) {
    let rewriter = MacroRewriter::new().expect("standard rules should compile");
    let mut group = c.benchmark_group("rewrite");

    group.throughput(Throughput::Bytes(MACRO_HEAVY_CELL.len() as u64));
    group.bench_function("macro_heavy", |b| {
        b.iter(|| {
            let out = rewriter.rewrite_fragment(black_box(MACRO_HEAVY_CELL));
            black_box(out.len())
        })
    });

    group.throughput(Throughput::Bytes(PLAIN_CELL.len() as u64));
    group.bench_function("plain_prose", |b| {
        b.iter(|| {
            let out = rewriter.rewrite_fragment(black_box(PLAIN_CELL));
            black_box(out.len())
        })
    });

    group.finish();
}

fn bench_scaling(c: &mut Criterion) {
    let rewriter = MacroRewriter::new().expect("standard rules should compile");
    let mut group = c.benchmark_group("scaling");

    for size in [1, 4, 16].iter() {
        let cell: String = MACRO_HEAVY_CELL.repeat(*size);
        group.throughput(Throughput::Bytes(cell.len() as u64));

        group.bench_with_input(BenchmarkId::new("macro_heavy", size), &cell, |b, cell| {
            b.iter(|| {
                let out = rewriter.rewrite_fragment(black_box(cell));
                black_box(out.len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rewrite, bench_scaling);
criterion_main!(benches);
