//! The driver side: spawn workers, time them, and check the results.

use anyhow::{bail, Context, Result};
use contention::{CounterBank, LockCoupledList, SharedCounter, WorkerCounter};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, info_span};

use crate::config::HarnessConfig;

/// Runs `config.threads` workers, each incrementing `counter` `config.count`
/// times, and returns the wall time for the whole run.
fn count_with<C: WorkerCounter>(counter: &C, config: &HarnessConfig, label: &str) -> Result<Duration> {
    let overall = Instant::now();
    thread::scope(|s| -> Result<()> {
        for worker in 0..config.threads {
            let count = config.count;
            thread::Builder::new()
                .name(format!("{label}-{worker}"))
                .spawn_scoped(s, move || {
                    let start = Instant::now();
                    for _ in 0..count {
                        counter.increment(worker);
                    }
                    info!(worker, count, elapsed = ?start.elapsed(), "worker finished counting");
                })
                .with_context(|| format!("failed to spawn worker {worker}"))?;
        }
        Ok(())
    })?;
    Ok(overall.elapsed())
}

/// Total work for `threads` workers doing `per_worker` units each.
fn expected_total(threads: usize, per_worker: usize) -> Result<usize> {
    match threads.checked_mul(per_worker) {
        Some(total) => Ok(total),
        None => bail!("{threads} workers x {per_worker} per worker overflows usize"),
    }
}

fn check_total(label: &str, total: usize, expected: usize) -> Result<()> {
    println!("{label}: total {total}, expected {expected}");
    if total != expected {
        bail!("{label} lost increments: counted {total}, expected {expected}");
    }
    Ok(())
}

pub fn counter_bank(config: &HarnessConfig, unbounded: bool) -> Result<()> {
    let mut bank_config = config.counter_config();
    if unbounded {
        bank_config.max_capacity = None;
    }
    let bounded = bank_config.max_capacity.is_some();
    let label = if bounded { "bounded bank" } else { "unbounded bank" };
    let _span = info_span!("counter_bank", threads = config.threads, bounded).entered();
    let expected = expected_total(config.threads, config.count)?;

    let bank = CounterBank::with_config(bank_config)
        .with_context(|| format!("cannot build a counter bank for {} workers", config.threads))?;

    println!(
        "=== {label}: {} workers counting to {} ===",
        config.threads, config.count
    );
    let elapsed = count_with(&bank, config, "bank")?;
    info!(elapsed = ?elapsed, "all workers joined");
    println!("{label}: completed in {elapsed:.2?}");

    for (worker, count) in bank.snapshot().into_iter().enumerate() {
        println!("  worker {worker}: {count}");
    }
    check_total(label, bank.total(), expected)
}

pub fn shared_counter(config: &HarnessConfig) -> Result<()> {
    let _span = info_span!("shared_counter", threads = config.threads).entered();
    let expected = expected_total(config.threads, config.count)?;
    let counter = SharedCounter::new();

    println!(
        "=== shared counter: {} workers counting to {} ===",
        config.threads, config.count
    );
    let elapsed = count_with(&counter, config, "shared")?;
    info!(elapsed = ?elapsed, "all workers joined");
    println!("shared counter: completed in {elapsed:.2?}");
    check_total("shared counter", counter.read(), expected)
}

pub fn list(config: &HarnessConfig) -> Result<()> {
    let _span = info_span!("lock_coupled_list", threads = config.threads).entered();
    let list = LockCoupledList::new();
    let per_worker = config.keys_per_worker;
    // Keys run 0..expected, so no per-key arithmetic can overflow once this holds.
    let expected = expected_total(config.threads, per_worker)?;

    println!(
        "=== lock-coupled list: {} workers appending {} keys each ===",
        config.threads, per_worker
    );
    let start = Instant::now();
    thread::scope(|s| -> Result<()> {
        let handles: Vec<_> = (0..config.threads)
            .map(|worker| {
                let list = &list;
                s.spawn(move || -> contention::Result<()> {
                    for i in 0..per_worker {
                        list.append(worker * per_worker + i)?;
                    }
                    Ok(())
                })
            })
            .collect();
        for handle in handles {
            match handle.join() {
                Ok(appended) => appended.context("append failed")?,
                Err(_) => bail!("list worker panicked"),
            }
        }
        Ok(())
    })?;
    let elapsed = start.elapsed();
    info!(elapsed = ?elapsed, nodes = list.len(), "all appenders joined");

    let mut visited = 0usize;
    list.traverse(|key| {
        if config.print_keys {
            println!("{key}");
        }
        visited += 1;
    });
    println!("lock-coupled list: {visited} nodes in {elapsed:.2?}");

    if visited != expected {
        bail!("traversal visited {visited} nodes, expected {expected}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_total_multiplies() {
        assert_eq!(expected_total(4, 1_000_000).unwrap(), 4_000_000);
    }

    #[test]
    fn expected_total_rejects_overflow() {
        let err = expected_total(4, usize::MAX / 2).unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn oversized_count_fails_before_spawning() {
        let config = HarnessConfig {
            threads: 2,
            count: usize::MAX,
            ..HarnessConfig::default()
        };
        assert!(shared_counter(&config).is_err());
        assert!(counter_bank(&config, true).is_err());
    }

    #[test]
    fn null_bound_runs_as_unbounded_bank() {
        let config = HarnessConfig {
            threads: 2,
            count: 10,
            max_workers: None,
            ..HarnessConfig::default()
        };
        counter_bank(&config, false).unwrap();
    }

    #[test]
    fn oversized_key_range_is_rejected() {
        let config = HarnessConfig {
            threads: 3,
            keys_per_worker: usize::MAX / 2,
            ..HarnessConfig::default()
        };
        assert!(list(&config).is_err());
    }
}
