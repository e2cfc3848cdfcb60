use contention::{ConfigError, CounterBank, CounterConfig, Error, SharedCounter, WorkerCounter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

const WORKERS: usize = 4;
const COUNT_TARGET: usize = 1_000_000;

fn count_with<C: WorkerCounter>(counter: &C, workers: usize, per_worker: usize) {
    thread::scope(|s| {
        for worker in 0..workers {
            s.spawn(move || {
                for _ in 0..per_worker {
                    counter.increment(worker);
                }
            });
        }
    });
}

#[test]
fn four_workers_count_to_a_million_each() {
    let bank = CounterBank::new(WORKERS).unwrap();
    count_with(&bank, WORKERS, COUNT_TARGET);

    assert_eq!(bank.total(), WORKERS * COUNT_TARGET);
    for worker in 0..WORKERS {
        assert_eq!(bank.read_slot(worker), COUNT_TARGET);
    }
}

#[test]
fn shared_counter_matches_bank() {
    let shared = SharedCounter::new();
    count_with(&shared, WORKERS, 100_000);
    assert_eq!(shared.read(), WORKERS * 100_000);
}

#[test]
fn unbounded_bank_exceeds_default_bound() {
    let workers = 24;
    assert!(matches!(
        CounterBank::new(workers),
        Err(Error::InvalidConfiguration(ConfigError::CapacityExceeded { requested: 24, max: 16 }))
    ));

    let bank = CounterBank::unbounded(workers).unwrap();
    count_with(&bank, workers, 1_000);
    assert_eq!(bank.total(), workers * 1_000);
}

#[test]
fn custom_bound_is_honoured() {
    let config = CounterConfig {
        capacity: 3,
        max_capacity: Some(2),
    };
    assert_eq!(
        CounterBank::with_config(config).unwrap_err(),
        Error::InvalidConfiguration(ConfigError::CapacityExceeded { requested: 3, max: 2 })
    );
}

#[test]
fn uneven_workloads_sum_exactly() {
    let bank = CounterBank::new(5).unwrap();
    thread::scope(|s| {
        for worker in 0..5 {
            let bank = &bank;
            s.spawn(move || {
                for _ in 0..(worker + 1) * 1_000 {
                    bank.increment(worker);
                }
            });
        }
    });

    assert_eq!(bank.snapshot(), vec![1_000, 2_000, 3_000, 4_000, 5_000]);
    assert_eq!(bank.total(), 15_000);
}

#[test]
fn concurrent_readers_see_monotonic_slots_and_totals() {
    let bank = CounterBank::new(2).unwrap();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let (bank, done) = (&bank, &done);
        s.spawn(move || {
            for _ in 0..200_000 {
                bank.increment(0);
            }
            done.store(true, Ordering::Release);
        });
        s.spawn(move || {
            for _ in 0..200_000 {
                bank.increment(1);
            }
        });

        s.spawn(move || {
            let mut last_slot = 0;
            let mut last_total = 0;
            while !done.load(Ordering::Acquire) {
                let slot = bank.read_slot(0);
                let total = bank.total();
                assert!(slot >= last_slot, "slot went backwards: {slot} < {last_slot}");
                assert!(total >= last_total, "total went backwards: {total} < {last_total}");
                last_slot = slot;
                last_total = total;
            }
        });
    });

    assert_eq!(bank.total(), 400_000);
}

#[test]
fn owner_always_sees_its_own_increments() {
    let bank = CounterBank::new(3).unwrap();
    thread::scope(|s| {
        for worker in 0..3 {
            let bank = &bank;
            s.spawn(move || {
                for issued in 1..=10_000 {
                    bank.increment(worker);
                    assert!(bank.read_slot(worker) >= issued);
                    assert!(bank.total() >= issued);
                }
            });
        }
    });
}

#[test]
#[should_panic(expected = "out of range")]
fn read_slot_out_of_range_panics() {
    let bank = CounterBank::new(1).unwrap();
    let _ = bank.read_slot(1);
}
