use criterion::{black_box, criterion_group, criterion_main, Criterion};
use talus_automata::{Automaton, RuleKind, Scheduling, Symmetry};

fn run(value: i64, dimension: usize, symmetry: Symmetry, steps: u32) -> i64 {
    let mut automaton = Automaton::<i64>::new(
        value,
        dimension,
        symmetry,
        Scheduling::Synchronous,
        RuleKind::Aether,
    )
    .unwrap();
    for _ in 0..steps {
        automaton.advance().unwrap();
    }
    automaton.total_value()
}

fn bench_advance(c: &mut Criterion) {
    c.bench_function("aether 2d folded 50 steps", |b| {
        b.iter(|| run(black_box(1_000_000), 2, Symmetry::Isotropic, 50))
    });

    c.bench_function("aether 2d full 50 steps", |b| {
        b.iter(|| run(black_box(1_000_000), 2, Symmetry::Full, 50))
    });

    c.bench_function("aether 3d folded 20 steps", |b| {
        b.iter(|| run(black_box(1_000_000), 3, Symmetry::Isotropic, 20))
    });
}

criterion_group!(benches, bench_advance);
criterion_main!(benches);
