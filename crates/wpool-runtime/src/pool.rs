//! The worker pool: fixed-size collection of workers, round-robin
//! dispatch, and the startup/shutdown handshakes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use wpool_core::{plog_info, PoolConfig, PoolError, PoolResult, Task, Variant};

use crate::startup::StartupGate;
use crate::worker::{spawn_worker, WorkerHandle};

pub struct Pool {
    workers: Vec<WorkerHandle>,
    rr_cursor: AtomicUsize,
    variant: Variant,
    shutdown: Arc<AtomicBool>,
    thread_count: usize,
}

impl Pool {
    /// Validate `config`, spawn every worker, and block until all of them
    /// have reached `Idle` for the first time.
    pub fn create(config: PoolConfig) -> PoolResult<Pool> {
        config.validate()?;

        let thread_count = config.thread_count;
        let per_worker_capacity = config.per_worker_capacity();
        let shutdown = Arc::new(AtomicBool::new(false));
        let ready = Arc::new(StartupGate::new());

        let mut workers = Vec::with_capacity(thread_count);
        for index in 0..thread_count {
            match spawn_worker(
                index,
                config.variant,
                per_worker_capacity,
                config.idle_spins,
                config.park_timeout,
                Arc::clone(&shutdown),
                Arc::clone(&ready),
            ) {
                Ok(handle) => workers.push(handle),
                Err(_) => {
                    // Workers spawned so far register readiness and move
                    // straight into their idle loop on their own - they
                    // never block waiting on each other - so `shutdown`
                    // plus `abort` (to release anyone still inside
                    // `wait_ready` elsewhere) is enough to let every
                    // `join()` below return.
                    shutdown.store(true, Ordering::Release);
                    ready.abort();
                    for mut handle in workers {
                        handle.queue.wake_one();
                        handle.join();
                    }
                    return Err(PoolError::SpawnFailed);
                }
            }
        }

        ready.wait_ready(thread_count);
        plog_info!("pool created: {} workers, variant {:?}", thread_count, config.variant);

        // `thread_count - 1` so the first `fetch_add` in `enqueue` lands on 0.
        Ok(Pool {
            workers,
            rr_cursor: AtomicUsize::new(thread_count - 1),
            variant: config.variant,
            shutdown,
            thread_count,
        })
    }

    /// Select the next worker round-robin and attempt to enqueue `task`.
    /// The caller must be single-threaded: concurrent callers would race
    /// both this cursor and the target worker's producer-private index.
    pub fn enqueue(&self, task: Task) -> PoolResult<()> {
        // Pre-increment semantics: the cursor starts at `thread_count - 1`
        // so the first dispatch (new value == thread_count) lands on 0.
        let target = (self.rr_cursor.fetch_add(1, Ordering::Relaxed) + 1) % self.thread_count;
        let worker = &self.workers[target];

        match worker.queue.try_enqueue(task) {
            Ok(was_empty) => {
                if self.variant == Variant::SignalWakeup && was_empty {
                    worker.queue.wake_one();
                }
                Ok(())
            }
            Err(_task) => Err(PoolError::QueueFull),
        }
    }

    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Signal shutdown, wake every worker, and join all worker threads.
    /// Consumes the pool: it cannot be destroyed twice.
    pub fn destroy(mut self) {
        self.shutdown.store(true, Ordering::Release);
        for worker in &self.workers {
            worker.queue.wake_one();
        }
        for worker in &mut self.workers {
            worker.join();
        }
        plog_info!("pool destroyed");
    }
}

/// Thin wrapper building a default-variant `PoolConfig`.
pub fn pool_create(thread_count: usize, queue_size: usize) -> PoolResult<Pool> {
    let config = PoolConfig::new()
        .thread_count(thread_count)
        .queue_size(queue_size);
    Pool::create(config)
}

pub fn pool_enqueue(pool: &Pool, task: Task) -> PoolResult<()> {
    pool.enqueue(task)
}

pub fn pool_destroy(pool: Pool) {
    pool.destroy()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize as AU;
    use std::time::Duration;

    fn config(thread_count: usize, queue_size: usize, variant: Variant) -> PoolConfig {
        PoolConfig::new()
            .thread_count(thread_count)
            .queue_size(queue_size)
            .variant(variant)
            .park_timeout(Duration::from_millis(20))
    }

    #[test]
    fn test_round_robin_fairness_per_worker_logs() {
        for variant in [Variant::Polling, Variant::MutexCondvar, Variant::SignalWakeup] {
            let pool = Pool::create(config(4, 16, variant)).unwrap();
            let per_worker_hits = Arc::new((0..4).map(|_| AU::new(0)).collect::<Vec<_>>());

            for i in 0..8 {
                // The cursor starts at thread_count - 1, so dispatch order
                // is simply worker 0, 1, 2, 3, 0, 1, ...
                let target = i % 4;
                let hits = Arc::clone(&per_worker_hits);
                pool.enqueue(Task::new(move || {
                    hits[target].fetch_add(1, Ordering::Relaxed);
                }))
                .unwrap();
            }

            std::thread::sleep(Duration::from_millis(100));
            for hits in per_worker_hits.iter() {
                assert_eq!(hits.load(Ordering::Relaxed), 2);
            }
            pool.destroy();
        }
    }

    #[test]
    fn test_queue_full_rejects() {
        let pool = Pool::create(config(1, 4, Variant::Polling)).unwrap();
        let release = Arc::new(AtomicBool::new(false));
        let r = Arc::clone(&release);
        pool.enqueue(Task::new(move || {
            while !r.load(Ordering::Acquire) {
                std::hint::spin_loop();
            }
        }))
        .unwrap();

        for _ in 0..4 {
            pool.enqueue(Task::new(|| {})).unwrap();
        }
        assert_eq!(pool.enqueue(Task::new(|| {})), Err(PoolError::QueueFull));

        release.store(true, Ordering::Release);
        pool.destroy();
    }

    #[test]
    fn test_startup_barrier_ready_immediately() {
        let pool = Pool::create(config(4, 16, Variant::Polling)).unwrap();
        let counter = Arc::new(AU::new(0));
        for _ in 0..4 {
            let c = Arc::clone(&counter);
            pool.enqueue(Task::new(move || {
                c.fetch_add(1, Ordering::Relaxed);
            }))
            .unwrap();
        }
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(counter.load(Ordering::Relaxed), 4);
        pool.destroy();
    }

    #[test]
    fn test_invalid_config_rejected_before_spawn() {
        let result = Pool::create(config(4, 2, Variant::Polling));
        assert!(result.is_err());
    }

    #[test]
    fn test_high_volume_no_loss() {
        let pool = Pool::create(config(4, 64, Variant::SignalWakeup)).unwrap();
        let counter = Arc::new(AU::new(0));
        let total = 100_000;
        let mut sent = 0;
        while sent < total {
            let c = Arc::clone(&counter);
            match pool.enqueue(Task::new(move || {
                c.fetch_add(1, Ordering::Relaxed);
            })) {
                Ok(()) => sent += 1,
                Err(PoolError::QueueFull) => std::hint::spin_loop(),
                Err(e) => panic!("unexpected error: {:?}", e),
            }
        }
        while counter.load(Ordering::Relaxed) < total {
            std::thread::yield_now();
        }
        assert_eq!(counter.load(Ordering::Relaxed), total);
        pool.destroy();
    }
}
