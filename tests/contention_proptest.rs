use contention::{CounterBank, CounterConfig, LockCoupledList, SharedCounter, DEFAULT_MAX_WORKERS};
use proptest::prelude::*;
use std::thread;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn bank_total_is_sum_of_worker_increments(
        increments in proptest::collection::vec(0usize..2_000, 1..=DEFAULT_MAX_WORKERS)
    ) {
        let bank = CounterBank::new(increments.len()).unwrap();

        thread::scope(|s| {
            for (worker, &count) in increments.iter().enumerate() {
                let bank = &bank;
                s.spawn(move || {
                    for _ in 0..count {
                        bank.increment(worker);
                    }
                });
            }
        });

        prop_assert_eq!(bank.snapshot(), increments.clone());
        prop_assert_eq!(bank.total(), increments.iter().sum::<usize>());
    }

    #[test]
    fn capacity_validation_matches_bound(capacity in 0usize..64, max in proptest::option::of(0usize..64)) {
        let config = CounterConfig { capacity, max_capacity: max };
        let accepted = capacity >= 1 && max.map_or(true, |max| capacity <= max);
        prop_assert_eq!(CounterBank::with_config(config).is_ok(), accepted);
    }

    #[test]
    fn shared_counter_counts_sequential_increments(m in 0usize..5_000) {
        let counter = SharedCounter::new();
        for _ in 0..m {
            counter.increment();
        }
        prop_assert_eq!(counter.read(), m);
    }

    #[test]
    fn list_preserves_insertion_order(keys in proptest::collection::vec(any::<i64>(), 0..200)) {
        let list = LockCoupledList::new();
        for &key in &keys {
            list.append(key).unwrap();
        }

        let mut visited = Vec::with_capacity(keys.len());
        list.traverse(|key| visited.push(*key));
        prop_assert_eq!(&visited, &keys);
        prop_assert_eq!(list.keys().collect::<Vec<_>>(), keys.clone());
        prop_assert_eq!(list.len(), keys.len());
    }
}
