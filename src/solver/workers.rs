use crate::barrier::{AbortOnUnwind, Barrier};
use crate::error::{Result, SolveError};

/// What one worker did during one iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WorkerReport {
    pub worker_index: usize,
    /// Sum over all phases of the worker's `|new - old|`.
    pub local_difference: f64,
    pub cells_updated: usize,
}

/// Run one scoped thread per task and join them all.
///
/// If a thread cannot be launched, or a worker panics, the barrier is
/// aborted so the others stop waiting, everything launched is joined,
/// and the root cause is returned.
pub(crate) fn run_workers<'env, T, F>(
    label: &str,
    barrier: &'env Barrier,
    tasks: Vec<T>,
    work: F,
) -> Result<Vec<WorkerReport>>
where
    T: Send + 'env,
    F: Fn(T) -> Result<WorkerReport> + Sync + 'env,
{
    debug_assert_eq!(tasks.len(), barrier.capacity());
    std::thread::scope(|s| {
        let work = &work;
        let mut handles = Vec::with_capacity(tasks.len());
        let mut error = None;

        for (worker_index, task) in tasks.into_iter().enumerate() {
            let spawned = std::thread::Builder::new()
                .name(format!("{label}_worker_{worker_index}"))
                .spawn_scoped(s, move || {
                    let _guard = AbortOnUnwind::new(barrier);
                    work(task)
                });
            match spawned {
                Ok(handle) => handles.push((worker_index, handle)),
                Err(e) => {
                    tracing::error!(worker_index, "cannot create thread: {e}");
                    barrier.abort();
                    error = Some(SolveError::ThreadSpawn(e));
                    break;
                }
            }
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (worker_index, handle) in handles {
            match handle.join() {
                Ok(Ok(report)) => reports.push(report),
                Ok(Err(e)) => keep_root_cause(&mut error, e),
                Err(_) => keep_root_cause(
                    &mut error,
                    SolveError::WorkerPanicked {
                        worker: worker_index,
                    },
                ),
            }
        }

        match error {
            Some(e) => Err(e),
            None => Ok(reports),
        }
    })
}

/// An aborted barrier is a symptom; prefer whatever caused the abort.
fn keep_root_cause(slot: &mut Option<SolveError>, e: SolveError) {
    match slot {
        None | Some(SolveError::BarrierAborted) => *slot = Some(e),
        Some(_) => {}
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn reports_in_order_test() {
        let barrier = Barrier::new(4);
        let reports = run_workers("test", &barrier, vec![10, 20, 30, 40], |v| {
            barrier.arrive_and_wait()?;
            Ok(WorkerReport {
                worker_index: v / 10 - 1,
                local_difference: v as f64,
                cells_updated: v,
            })
        })
        .unwrap();
        let indices: Vec<_> = reports.iter().map(|r| r.worker_index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert_eq!(barrier.generation(), 1);
    }

    #[test]
    fn panic_releases_others_test() {
        let barrier = Barrier::new(3);
        let result = run_workers("test", &barrier, vec![0, 1, 2], |v| {
            if v == 1 {
                panic!("worker {v} failed");
            }
            barrier.arrive_and_wait()?;
            Ok(WorkerReport::default())
        });
        assert!(matches!(
            result,
            Err(SolveError::WorkerPanicked { worker: 1 })
        ));
    }

    #[test]
    fn root_cause_test() {
        let mut slot = None;
        keep_root_cause(&mut slot, SolveError::BarrierAborted);
        keep_root_cause(&mut slot, SolveError::WorkerPanicked { worker: 2 });
        keep_root_cause(&mut slot, SolveError::BarrierAborted);
        assert!(matches!(slot, Some(SolveError::WorkerPanicked { worker: 2 })));
    }
}
