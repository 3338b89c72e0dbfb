// Credential pool benchmarks.
//
// Covers registration of coordinator responses, single-threaded padding at
// various widths, and padding under contention from several threads.

use std::sync::Arc;
use std::thread;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use wabisabi_pool::{Amount, Credential, CredentialPool, PoolConfig};

fn pool(width: usize) -> CredentialPool {
    CredentialPool::new(PoolConfig::with_credential_number(width)).unwrap()
}

fn bench_register(c: &mut Criterion) {
    let pool = pool(2);

    c.bench_function("pool/register_mixed_response", |b| {
        b.iter(|| {
            let valuable = pool.register_zero_value_credentials(vec![
                Credential::zero(),
                Credential::new(Amount::new(50_000), Vec::new()),
            ]);
            // Keep the pool from growing without bound.
            pool.discard_all();
            valuable
        });
    });
}

fn bench_complete(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/complete");

    for width in [2, 4, 8, 16] {
        let pool = pool(width);
        group.throughput(Throughput::Elements(width as u64));
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| {
                pool.register_zero_value_credentials((0..width - 1).map(|_| Credential::zero()));
                pool.complete_with_zero_credentials(vec![Credential::zero()])
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_contended_complete(c: &mut Criterion) {
    let mut group = c.benchmark_group("pool/contended_complete");

    for threads in [2, 4, 8] {
        group.throughput(Throughput::Elements(threads as u64 * 100));
        group.bench_with_input(
            BenchmarkId::from_parameter(threads),
            &threads,
            |b, &threads| {
                b.iter(|| {
                    let pool = Arc::new(pool(2));
                    pool.register_zero_value_credentials(
                        (0..threads * 200).map(|_| Credential::zero()),
                    );
                    let handles: Vec<_> = (0..threads)
                        .map(|_| {
                            let pool = Arc::clone(&pool);
                            thread::spawn(move || {
                                for _ in 0..100 {
                                    pool.complete_with_zero_credentials(Vec::new()).unwrap();
                                }
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.join().unwrap();
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_register,
    bench_complete,
    bench_contended_complete,
);
criterion_main!(benches);
