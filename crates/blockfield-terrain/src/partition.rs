//! Splitting grid work into disjoint contiguous x-row ranges for worker threads.

use std::ops::Range;

use crate::error::TerrainError;

/// Resolve a configured worker count; `0` means one per logical CPU.
pub fn worker_count(requested: usize) -> usize {
    if requested == 0 {
        num_cpus::get().max(1)
    } else {
        requested
    }
}

/// Cut `0..rows` into at most `workers` contiguous, non-empty, ascending ranges.
pub fn row_ranges(rows: usize, workers: usize) -> Vec<Range<usize>> {
    if rows == 0 {
        return Vec::new();
    }
    let workers = workers.clamp(1, rows);
    let base = rows / workers;
    let extra = rows % workers;

    let mut ranges = Vec::with_capacity(workers);
    let mut start = 0;
    for i in 0..workers {
        let len = base + usize::from(i < extra);
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

/// A vector of `len` copies of `value`, reserved in one exact allocation.
///
/// # Errors
///
/// Returns [`TerrainError::OutOfMemory`] naming `what` if the reservation fails.
pub fn try_filled_vec<T: Clone>(
    what: &'static str,
    len: usize,
    value: T,
) -> Result<Vec<T>, TerrainError> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| TerrainError::OutOfMemory {
            what,
            requested: len as u128,
        })?;
    out.resize(len, value);
    Ok(out)
}

/// Split `data` into consecutive sub-slices of the given lengths.
///
/// The lengths must not sum past `data.len()`; any remainder is dropped.
pub fn split_spans<T>(
    mut data: &mut [T],
    spans: impl IntoIterator<Item = usize>,
) -> Vec<&mut [T]> {
    let mut parts = Vec::new();
    for len in spans {
        let (head, tail) = std::mem::take(&mut data).split_at_mut(len);
        parts.push(head);
        data = tail;
    }
    parts
}

/// Run every job, on scoped worker threads when there is more than one.
///
/// A single job runs on the calling thread. Results come back in job order.
pub fn run_jobs<J: Send, R: Send>(jobs: Vec<J>, work: impl Fn(J) -> R + Sync) -> Vec<R> {
    if jobs.len() <= 1 {
        return jobs.into_iter().map(work).collect();
    }

    let work = &work;
    std::thread::scope(|scope| {
        let handles: Vec<_> = jobs
            .into_iter()
            .map(|job| {
                std::thread::Builder::new()
                    .name("terrain-gen-worker".into())
                    .spawn_scoped(scope, move || work(job))
                    .expect("Failed to spawn terrain generation worker thread")
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_row_ranges_cover_all_rows_in_order() {
        for rows in 1..40 {
            for workers in 1..9 {
                let ranges = row_ranges(rows, workers);
                assert!(ranges.len() <= workers);
                assert_eq!(ranges.first().map(|r| r.start), Some(0));
                assert_eq!(ranges.last().map(|r| r.end), Some(rows));
                for pair in ranges.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
                assert!(ranges.iter().all(|r| !r.is_empty()));
            }
        }
    }

    #[test]
    fn test_more_workers_than_rows() {
        let ranges = row_ranges(3, 16);
        assert_eq!(ranges, vec![0..1, 1..2, 2..3]);
    }

    #[test]
    fn test_no_rows_means_no_ranges() {
        assert!(row_ranges(0, 4).is_empty());
    }

    #[test]
    fn test_split_spans_is_disjoint_and_ordered() {
        let mut data: Vec<u32> = (0..10).collect();
        let parts = split_spans(&mut data, [3, 0, 5, 2]);
        assert_eq!(parts.len(), 4);
        assert_eq!(&*parts[0], &[0, 1, 2]);
        assert!(parts[1].is_empty());
        assert_eq!(&*parts[2], &[3, 4, 5, 6, 7]);
        assert_eq!(&*parts[3], &[8, 9]);
    }

    #[test]
    fn test_run_jobs_runs_every_job_once() {
        let hits = AtomicUsize::new(0);
        let mut out = vec![0_usize; 8];
        let jobs: Vec<_> = out.iter_mut().enumerate().collect();
        run_jobs(jobs, |(i, slot)| {
            *slot = i * 10;
            hits.fetch_add(1, Ordering::Relaxed);
        });
        assert_eq!(hits.load(Ordering::Relaxed), 8);
        assert_eq!(out, vec![0, 10, 20, 30, 40, 50, 60, 70]);
    }

    #[test]
    fn test_run_jobs_returns_results_in_job_order() {
        for jobs in [vec![7], (0..6).collect()] {
            let expected: Vec<_> = jobs.iter().map(|j| j * 2).collect();
            assert_eq!(run_jobs(jobs, |j: usize| j * 2), expected);
        }
    }

    #[test]
    fn test_filled_vec_has_exact_length() {
        let v = try_filled_vec("test", 5, 7_u8).unwrap();
        assert_eq!(v, vec![7; 5]);
        assert_eq!(v.capacity(), 5);
    }

    #[test]
    fn test_filled_vec_reports_failed_reservation() {
        let result = try_filled_vec("row counts", usize::MAX, 0_u64);
        assert!(matches!(
            result,
            Err(TerrainError::OutOfMemory {
                what: "row counts",
                requested,
            }) if requested == usize::MAX as u128
        ));
    }

    #[test]
    fn test_worker_count_zero_uses_cpus() {
        assert!(worker_count(0) >= 1);
        assert_eq!(worker_count(3), 3);
    }
}
