use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pmc::{MatrixBuilder, SparseMatrix};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random stochastic-looking matrix with `per_row` entries in every row
fn random_matrix(rows: usize, per_row: usize, seed: u64) -> SparseMatrix<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut builder = MatrixBuilder::new().with_dimensions(rows, rows, rows * per_row);
    let mut columns = Vec::with_capacity(per_row);
    for row in 0..rows {
        columns.clear();
        columns.extend((0..per_row).map(|_| rng.gen_range(0..rows)));
        columns.sort_unstable();
        columns.dedup();
        let weight = 1.0 / columns.len() as f64;
        for &column in &columns {
            builder
                .add_next_value(row, column, weight)
                .expect("columns are sorted");
        }
    }
    builder.build().expect("dimensions are consistent")
}

fn bench_multiply(c: &mut Criterion) {
    let mut group = c.benchmark_group("multiply_with_vector");

    for &rows in &[1_000usize, 20_000, 200_000] {
        let matrix = random_matrix(rows, 8, 0x42);
        let mut rng = StdRng::seed_from_u64(7);
        let vector: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>()).collect();

        group.bench_with_input(BenchmarkId::new("sequential", rows), &rows, |b, _| {
            b.iter(|| black_box(matrix.multiply_with_vector_sequential(black_box(&vector))))
        });
        for block_rows in [10usize, 256] {
            group.bench_with_input(
                BenchmarkId::new(format!("parallel/{block_rows}"), rows),
                &rows,
                |b, _| {
                    b.iter(|| {
                        black_box(matrix.multiply_with_vector_parallel(black_box(&vector), block_rows))
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let matrix = random_matrix(50_000, 8, 0x1234);
    c.bench_function("transpose_50k", |b| {
        b.iter(|| black_box(matrix.transpose(false)))
    });
}

criterion_group!(benches, bench_multiply, bench_transpose);
criterion_main!(benches);
