use std::panic;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rand::{rngs::StdRng, Rng, SeedableRng};

use raysampler::atomic::{AtomicDouble, AtomicFloat};
use raysampler::barrier::Barrier;
use raysampler::parallel::{
    parallel_for_chunked_with, parallel_for_with, static_chunk, ExecutionPolicy,
    ParallelOptions, Schedule,
};

const SCHEDULES: [Schedule; 2] = [Schedule::StaticSplit, Schedule::AtomicSeize];

fn visit_counts(options: &ParallelOptions, start: usize, end: usize, policy: ExecutionPolicy) -> Vec<usize> {
    let counts: Vec<AtomicUsize> = (0..end.max(start)).map(|_| AtomicUsize::new(0)).collect();
    parallel_for_with(
        options,
        start,
        end,
        |i| {
            counts[i].fetch_add(1, Ordering::Relaxed);
        },
        policy,
    );
    counts.into_iter().map(|c| c.into_inner()).collect()
}

#[test]
fn every_index_visited_once() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let start: usize = rng.gen_range(0..20);
        let end: usize = start + rng.gen_range(0..200);
        let threads: usize = rng.gen_range(1..12);
        for &schedule in &SCHEDULES {
            for &policy in &[ExecutionPolicy::Serial, ExecutionPolicy::Parallel] {
                let counts = visit_counts(&ParallelOptions::new(threads, schedule), start, end, policy);
                for (i, c) in counts.iter().enumerate() {
                    let expected = if i >= start && i < end { 1 } else { 0 };
                    assert_eq!(*c, expected, "index {} with {:?} / {:?}", i, schedule, policy);
                }
            }
        }
    }
}

#[test]
fn empty_and_reversed_ranges_do_nothing() {
    for &schedule in &SCHEDULES {
        let options = ParallelOptions::new(4, schedule);
        let calls = AtomicUsize::new(0);
        for &(start, end) in &[(5, 5), (9, 3)] {
            parallel_for_with(
                &options,
                start,
                end,
                |_| {
                    calls.fetch_add(1, Ordering::Relaxed);
                },
                ExecutionPolicy::Parallel,
            );
        }
        assert_eq!(calls.load(Ordering::Relaxed), 0);
    }
}

#[test]
fn serial_policy_runs_in_order() {
    let seen = Mutex::new(Vec::new());
    parallel_for_with(
        &ParallelOptions::new(8, Schedule::AtomicSeize),
        3,
        10,
        |i| seen.lock().unwrap().push(i),
        ExecutionPolicy::Serial,
    );
    assert_eq!(seen.into_inner().unwrap(), (3..10).collect::<Vec<_>>());
}

#[test]
fn chunks_tile_the_range() {
    for &schedule in &SCHEDULES {
        for &grain in &[1, 3, 7, 64] {
            let chunks = Mutex::new(Vec::new());
            parallel_for_chunked_with(
                &ParallelOptions::new(3, schedule),
                2,
                47,
                grain,
                |r| chunks.lock().unwrap().push(r),
                ExecutionPolicy::Parallel,
            );
            let mut chunks = chunks.into_inner().unwrap();
            chunks.sort_by_key(|r| r.start);
            assert_eq!(chunks[0].start, 2);
            assert_eq!(chunks.last().unwrap().end, 47);
            for pair in chunks.windows(2) {
                assert_eq!(pair[0].end, pair[1].start);
                assert_eq!(pair[0].len(), grain);
            }
        }
    }
}

#[test]
fn static_chunks_are_balanced() {
    for n_threads in 1..9 {
        let lens: Vec<usize> = (0..n_threads).map(|t| static_chunk(0, 23, n_threads, t).len()).collect();
        let max = *lens.iter().max().unwrap();
        let min = *lens.iter().min().unwrap();
        assert!(max - min <= 1);
        assert_eq!(lens.iter().sum::<usize>(), 23);
    }
}

#[test]
fn worker_panic_reaches_caller() {
    for &schedule in &SCHEDULES {
        let res = panic::catch_unwind(|| {
            parallel_for_with(
                &ParallelOptions::new(4, schedule),
                0,
                100,
                |i| {
                    if i == 42 {
                        panic!("bad index");
                    }
                },
                ExecutionPolicy::Parallel,
            );
        });
        assert!(res.is_err());
    }
}

#[test]
fn atomic_sums_from_parallel_loop() {
    let sum = AtomicFloat::new(0.0);
    let dsum = AtomicDouble::new(0.0);
    parallel_for_with(
        &ParallelOptions::new(6, Schedule::StaticSplit),
        0,
        4096,
        |_| {
            sum.add(0.5);
            dsum.add(0.25);
        },
        ExecutionPolicy::Parallel,
    );
    assert_eq!(sum.load(), 2048.0);
    assert_eq!(dsum.load(), 1024.0);
}

#[test]
fn barrier_separates_phases() {
    let n_threads = 5;
    let barrier = Barrier::new(n_threads);
    let arrived = AtomicUsize::new(0);
    let res = crossbeam::scope(|s| {
        for _ in 0..n_threads {
            s.spawn(|_| {
                arrived.fetch_add(1, Ordering::SeqCst);
                barrier.wait();
                // Nobody gets past until everybody has arrived
                assert_eq!(arrived.load(Ordering::SeqCst), n_threads);
            });
        }
    });
    assert!(res.is_ok());
    assert_eq!(barrier.remaining(), 0);
}

#[test]
fn grain_larger_than_range_gives_one_chunk() {
    for &schedule in &SCHEDULES {
        for &policy in &[ExecutionPolicy::Serial, ExecutionPolicy::Parallel] {
            let chunks = Mutex::new(Vec::new());
            parallel_for_chunked_with(
                &ParallelOptions::new(2, schedule),
                0,
                10,
                usize::MAX,
                |r| chunks.lock().unwrap().push(r),
                policy,
            );
            assert_eq!(chunks.into_inner().unwrap(), vec![0..10]);
        }
    }
}

#[test]
fn chunks_at_top_of_index_range() {
    let chunks = Mutex::new(Vec::new());
    parallel_for_chunked_with(
        &ParallelOptions::new(2, Schedule::AtomicSeize),
        usize::MAX - 5,
        usize::MAX,
        4,
        |r| chunks.lock().unwrap().push(r),
        ExecutionPolicy::Parallel,
    );
    let mut chunks = chunks.into_inner().unwrap();
    chunks.sort_by_key(|r| r.start);
    assert_eq!(chunks, vec![usize::MAX - 5..usize::MAX - 1, usize::MAX - 1..usize::MAX]);
}

#[test]
fn seize_near_usize_max_stays_in_range() {
    let start = usize::MAX - 4;
    for &schedule in &SCHEDULES {
        let seen = Mutex::new(Vec::new());
        parallel_for_with(
            &ParallelOptions::new(4, schedule),
            start,
            usize::MAX,
            |i| {
                assert!(i >= start, "index {} outside range", i);
                seen.lock().unwrap().push(i);
            },
            ExecutionPolicy::Parallel,
        );
        let mut seen = seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, (start..usize::MAX).collect::<Vec<_>>());
    }
}
