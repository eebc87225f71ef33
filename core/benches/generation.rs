use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use sapper_core::{ClusteredGenerator, Difficulty, Game, Minefield, MinefieldGenerator};

fn bench_generate_hard(c: &mut Criterion) {
    let hard = Difficulty::hard();
    let mut seed = 0u64;
    c.bench_function("generate_hard", |b| {
        b.iter(|| {
            seed = seed.wrapping_add(1);
            ClusteredGenerator::new(seed).generate(&hard)
        })
    });
}

fn bench_full_flood_fill(c: &mut Criterion) {
    // one far-corner mine, so the opening flood clears the whole board
    let field = Minefield::from_mine_indices((16, 30), &[479]).unwrap();
    c.bench_function("flood_fill_hard_board", |b| {
        b.iter_batched(
            || Game::new(field.clone(), 0),
            |mut game| game.open(0),
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_generate_hard, bench_full_flood_fill);
criterion_main!(benches);
