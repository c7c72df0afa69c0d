//! Parallel loops over index ranges.
//!
//! Worker threads are spawned per call and joined before the call returns,
//! so the closure may borrow from the caller's stack. Two schedules are
//! available:
//!
//! * `StaticSplit` cuts the range into one contiguous chunk per thread. Cheap,
//!   but a thread that drew expensive indices holds everyone up.
//! * `AtomicSeize` lets threads pull the next index off a shared counter until
//!   the range is exhausted, which balances uneven work.
use std::cmp;
use std::ops::Range;
use std::panic;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::Error;

/// Whether a loop may run on worker threads at all.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExecutionPolicy {
    Serial,
    Parallel,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Schedule {
    StaticSplit,
    AtomicSeize,
}

impl Default for Schedule {
    fn default() -> Schedule {
        Schedule::AtomicSeize
    }
}

impl FromStr for Schedule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Schedule, Error> {
        match s {
            "static" => Ok(Schedule::StaticSplit),
            "seize" | "dynamic" => Ok(Schedule::AtomicSeize),
            _ => Err(Error::invalid_parameter(
                "schedule",
                format!("\"{}\" is not one of static, seize", s),
            )),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParallelOptions {
    pub threads: usize,
    pub schedule: Schedule,
}

impl ParallelOptions {
    pub fn new(threads: usize, schedule: Schedule) -> ParallelOptions {
        assert!(threads > 0, "need at least one worker thread");
        ParallelOptions { threads, schedule }
    }
}

impl Default for ParallelOptions {
    fn default() -> ParallelOptions {
        ParallelOptions::new(num_system_cores(), Schedule::default())
    }
}

pub fn num_system_cores() -> usize {
    cmp::max(1, num_cpus::get())
}

/// Run `func(i)` for every `i` in `[start, end)` with the default options.
/// `start > end` is treated as an empty range.
pub fn parallel_for<F>(start: usize, end: usize, func: F, policy: ExecutionPolicy)
where
    F: Fn(usize) + Sync,
{
    parallel_for_with(&ParallelOptions::default(), start, end, func, policy);
}

pub fn parallel_for_with<F>(
    options: &ParallelOptions,
    start: usize,
    end: usize,
    func: F,
    policy: ExecutionPolicy,
) where
    F: Fn(usize) + Sync,
{
    if start >= end {
        return;
    }
    match policy {
        ExecutionPolicy::Serial => (start..end).for_each(&func),
        ExecutionPolicy::Parallel => {
            let n_threads = cmp::min(cmp::max(1, options.threads), end - start);
            debug!(
                slog_scope::logger(),
                "parallel_for [{}, {}) on {} threads, {:?}",
                start,
                end,
                n_threads,
                options.schedule
            );
            if n_threads == 1 {
                (start..end).for_each(&func);
                return;
            }
            match options.schedule {
                Schedule::StaticSplit => static_split(start, end, n_threads, &func),
                Schedule::AtomicSeize => atomic_seize(start, end, n_threads, &func),
            }
        }
    }
}

/// Like `parallel_for()`, but hands out blocks of `grain_size` consecutive
/// indices at a time. The last block may be shorter.
pub fn parallel_for_chunked<F>(
    start: usize,
    end: usize,
    grain_size: usize,
    func: F,
    policy: ExecutionPolicy,
) where
    F: Fn(Range<usize>) + Sync,
{
    parallel_for_chunked_with(
        &ParallelOptions::default(),
        start,
        end,
        grain_size,
        func,
        policy,
    );
}

pub fn parallel_for_chunked_with<F>(
    options: &ParallelOptions,
    start: usize,
    end: usize,
    grain_size: usize,
    func: F,
    policy: ExecutionPolicy,
) where
    F: Fn(Range<usize>) + Sync,
{
    assert!(grain_size > 0, "grain size must be positive");
    if start >= end {
        return;
    }
    let n_chunks = (end - start - 1) / grain_size + 1;
    parallel_for_with(
        options,
        0,
        n_chunks,
        |c| {
            let lo = start + c * grain_size;
            func(lo..lo + cmp::min(grain_size, end - lo))
        },
        policy,
    );
}

/// The part of `[start, end)` that thread `thread_index` out of `n_threads`
/// gets under the static schedule. Leftover indices go one each to the first
/// threads.
pub fn static_chunk(start: usize, end: usize, n_threads: usize, thread_index: usize) -> Range<usize> {
    assert!(thread_index < n_threads);
    let n_task = end.saturating_sub(start);
    let base = n_task / n_threads;
    let remainder = n_task % n_threads;
    let lo = start + thread_index * base + cmp::min(thread_index, remainder);
    let hi = lo + base + if thread_index < remainder { 1 } else { 0 };
    lo..hi
}

fn static_split<F>(start: usize, end: usize, n_threads: usize, func: &F)
where
    F: Fn(usize) + Sync,
{
    let res = crossbeam::scope(|s| {
        for t in 0..n_threads {
            let range = static_chunk(start, end, n_threads, t);
            s.spawn(move |_| range.for_each(func));
        }
    });
    if let Err(e) = res {
        panic::resume_unwind(e);
    }
}

fn atomic_seize<F>(start: usize, end: usize, n_threads: usize, func: &F)
where
    F: Fn(usize) + Sync,
{
    let task_index = AtomicUsize::new(start);
    let res = crossbeam::scope(|s| {
        for _ in 0..n_threads {
            // The counter never moves past `end`, so it cannot wrap
            s.spawn(|_| {
                while let Ok(index) = task_index.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |i| {
                    if i < end {
                        Some(i + 1)
                    } else {
                        None
                    }
                }) {
                    func(index);
                }
            });
        }
    });
    if let Err(e) = res {
        panic::resume_unwind(e);
    }
}
