//! End-to-end tests for the zero-credential pool.
//!
//! These walk the pool through the same sequences a wallet sees across
//! coordinator rounds: issuance, registration, padding, and many rounds
//! hammering one pool at once. Each test builds its own pool.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use wabisabi_pool::{
    Amount, Credential, CredentialId, CredentialPool, PoolConfig, PoolError, ZeroValue,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn pool(width: usize) -> CredentialPool {
    CredentialPool::new(PoolConfig::with_credential_number(width)).expect("valid width")
}

fn value(sats: u64) -> Credential {
    Credential::new(Amount::new(sats), vec![0x5A; 32])
}

fn zeros(n: usize) -> Vec<Credential> {
    (0..n).map(|_| Credential::zero()).collect()
}

fn ids<'a>(creds: impl IntoIterator<Item = &'a Credential>) -> Vec<CredentialId> {
    creds.into_iter().map(Credential::id).collect()
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn mixed_registration_then_padding() {
    // N=3; register [Z1, V1, Z2] -> [V1]; complete([V2]) -> [Z1, Z2, V2].
    let pool = pool(3);
    let z1 = Credential::zero();
    let v1 = value(10_000);
    let z2 = Credential::zero();
    let (z1_id, v1_id, z2_id) = (z1.id(), v1.id(), z2.id());

    let valuable = pool.register_zero_value_credentials(vec![z1, v1, z2]);
    assert_eq!(ids(&valuable), vec![v1_id]);
    assert_eq!(pool.len(), 2);

    let v2 = value(20_000);
    let v2_id = v2.id();
    let vector = pool
        .complete_with_zero_credentials(vec![v2])
        .expect("pool covers padding");

    assert_eq!(ids(&vector), vec![z1_id, z2_id, v2_id]);
    assert!(pool.is_empty());
}

#[test]
fn full_width_request_bypasses_pool() {
    let pool = pool(3);
    let creds = vec![value(1), value(2), value(3)];
    let expected = ids(&creds);

    let vector = pool.complete_with_zero_credentials(creds).unwrap();
    assert_eq!(ids(&vector), expected);
    assert_eq!(pool.stats().consumed_total, 0);
}

#[test]
fn exhaustion_is_a_defined_failure() {
    // Pool holds one filler, N=3, no real credentials: must fail, not spin
    // and not return a short vector.
    let pool = pool(3);
    pool.register_zero_value_credentials(zeros(1));

    match pool.complete_with_zero_credentials(Vec::new()) {
        Err(PoolError::PoolExhausted {
            required,
            available,
            credentials,
        }) => {
            assert_eq!(required, 3);
            assert_eq!(available, 1);
            assert!(credentials.is_empty());
        }
        other => panic!("expected PoolExhausted, got {:?}", other),
    }
    assert_eq!(pool.len(), 1);

    // Top the pool up and the same request goes through.
    pool.register_zero_value_credentials(zeros(2));
    let vector = pool.complete_with_zero_credentials(Vec::new()).unwrap();
    assert_eq!(vector.zero_count(), 3);
}

#[test]
fn every_k_produces_width_n_with_trailing_reals() {
    for width in 1..=5 {
        for k in 0..=width {
            let pool = pool(width);
            pool.register_zero_value_credentials(zeros(width));

            let reals: Vec<Credential> = (0..k).map(|i| value(100 + i as u64)).collect();
            let expected = ids(&reals);

            let vector = pool.complete_with_zero_credentials(reals).unwrap();
            assert_eq!(vector.width(), width, "width={} k={}", width, k);
            assert_eq!(ids(&vector.as_slice()[width - k..]), expected);
            assert!(vector.as_slice()[..width - k].iter().all(ZeroValue::is_zero));
            assert_eq!(pool.len(), k);
        }
    }
}

#[test]
fn fillers_are_consumed_in_registration_order() {
    let pool = pool(2);
    let batch_a = zeros(2);
    let batch_b = zeros(2);
    let mut expected = ids(&batch_a);
    expected.extend(ids(&batch_b));

    pool.register_zero_value_credentials(batch_a);
    pool.register_zero_value_credentials(batch_b);

    let mut seen = Vec::new();
    for _ in 0..4 {
        let real = value(1);
        let vector = pool.complete_with_zero_credentials(vec![real]).unwrap();
        seen.push(vector.as_slice()[0].id());
    }
    assert_eq!(seen, expected);
}

#[test]
fn multi_round_lifecycle() {
    // Round 1: null request, coordinator answers with two zero credentials.
    let pool = pool(2);
    assert!(pool.register_zero_value_credentials(zeros(2)).is_empty());

    // Round 2: present two fillers, receive one real balance and one zero.
    let request = pool.complete_with_zero_credentials(Vec::new()).unwrap();
    assert_eq!(request.zero_count(), 2);
    let response = vec![value(50_000), Credential::zero()];
    let valuable = pool.register_zero_value_credentials(response);
    assert_eq!(valuable.len(), 1);

    // Round 3: spend the balance padded with the zero just issued.
    let request = pool.complete_with_zero_credentials(valuable).unwrap();
    assert_eq!(request.zero_count(), 1);
    assert_eq!(request.as_slice()[1].amount(), Amount::new(50_000));
    assert!(pool.is_empty());
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn concurrent_rounds_receive_disjoint_fillers() {
    const THREADS: usize = 8;
    const CALLS_PER_THREAD: usize = 50;
    const WIDTH: usize = 2;

    let pool = pool(WIDTH);
    // Exactly enough fillers for every call to pad one slot.
    pool.register_zero_value_credentials(zeros(THREADS * CALLS_PER_THREAD));

    let mut all_fillers: Vec<CredentialId> = Vec::new();
    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                let pool = &pool;
                s.spawn(move || {
                    let mut fillers = Vec::with_capacity(CALLS_PER_THREAD);
                    for i in 0..CALLS_PER_THREAD {
                        let real = value((t * CALLS_PER_THREAD + i + 1) as u64);
                        let vector = pool.complete_with_zero_credentials(vec![real]).unwrap();
                        fillers.push(vector.as_slice()[0].id());
                    }
                    fillers
                })
            })
            .collect();

        for handle in handles {
            all_fillers.extend(handle.join().unwrap());
        }
    });

    let unique: HashSet<_> = all_fillers.iter().copied().collect();
    assert_eq!(all_fillers.len(), THREADS * CALLS_PER_THREAD);
    assert_eq!(unique.len(), all_fillers.len(), "a filler was handed out twice");
    assert!(pool.is_empty());
}

#[test]
fn concurrent_producers_and_consumers_conserve_credentials() {
    const PRODUCERS: usize = 4;
    const CONSUMERS: usize = 4;
    const BATCHES: usize = 100;
    const WIDTH: usize = 2;

    let pool = pool(WIDTH);

    let consumed: usize = thread::scope(|s| {
        for _ in 0..PRODUCERS {
            let pool = &pool;
            s.spawn(move || {
                for _ in 0..BATCHES {
                    let out = pool.register_zero_value_credentials(vec![
                        Credential::zero(),
                        value(1),
                        Credential::zero(),
                    ]);
                    assert_eq!(out.len(), 1);
                }
            });
        }

        let consumers: Vec<_> = (0..CONSUMERS)
            .map(|_| {
                let pool = &pool;
                s.spawn(move || {
                    let mut taken = 0;
                    for _ in 0..BATCHES {
                        match pool.complete_with_zero_credentials(Vec::new()) {
                            Ok(vector) => taken += vector.zero_count(),
                            Err(err) => assert!(err.is_exhausted()),
                        }
                    }
                    taken
                })
            })
            .collect();

        consumers.into_iter().map(|h| h.join().unwrap()).sum()
    });

    let stats = pool.stats();
    assert_eq!(stats.registered_total, (PRODUCERS * BATCHES * 2) as u64);
    assert_eq!(stats.consumed_total, consumed as u64);
    assert_eq!(pool.len() + consumed, PRODUCERS * BATCHES * 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_async_rounds_share_one_pool() {
    const ROUNDS: usize = 32;

    let pool = Arc::new(pool(3));
    pool.register_zero_value_credentials(zeros(ROUNDS * 2));

    let mut handles = Vec::with_capacity(ROUNDS);
    for round in 0..ROUNDS {
        let pool = Arc::clone(&pool);
        handles.push(tokio::spawn(async move {
            tokio::task::yield_now().await;
            let real = value(round as u64 + 1);
            let vector = pool.complete_with_zero_credentials(vec![real]).unwrap();
            ids(&vector.as_slice()[..2])
        }));
    }

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.await.unwrap() {
            assert!(seen.insert(id), "filler {} reused across rounds", id);
        }
    }
    assert_eq!(seen.len(), ROUNDS * 2);
    assert!(pool.is_empty());
}
