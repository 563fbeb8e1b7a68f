use std::{
    panic::{catch_unwind, AssertUnwindSafe},
    thread,
};

use rand::{rngs::SmallRng, SeedableRng};

use crate::Error;

// -------------------------------------------------------------------------------------------------

/// Run `count` independent render jobs in parallel, using at most one thread per CPU.
///
/// See [`render_candidates_with_threads`].
pub fn render_candidates<T, F>(
    count: usize,
    base_seed: u64,
    job: F,
) -> Result<Vec<Result<T, Error>>, Error>
where
    T: Send,
    F: Fn(usize, &mut SmallRng) -> Result<T, Error> + Sync,
{
    render_candidates_with_threads(count, base_seed, num_cpus::get(), job)
}

/// Run `count` independent render jobs on at most `thread_count` worker threads.
///
/// Each job gets its index and its own random generator, seeded with `base_seed + index`, so
/// results are reproducible no matter which worker runs a job. Jobs never share state besides
/// what the job closure itself borrows, which therefore must be safe for concurrent read-only
/// access.
///
/// Failures are isolated per job: errors are returned as the job's result, panics are caught and
/// reported as [`Error::WorkerError`]. Results are returned in job order. The outer result only
/// fails when no worker thread could be spawned.
pub fn render_candidates_with_threads<T, F>(
    count: usize,
    base_seed: u64,
    thread_count: usize,
    job: F,
) -> Result<Vec<Result<T, Error>>, Error>
where
    T: Send,
    F: Fn(usize, &mut SmallRng) -> Result<T, Error> + Sync,
{
    if count == 0 {
        return Ok(Vec::new());
    }
    let thread_count = thread_count.clamp(1, count);

    let (job_sender, job_receiver) = crossbeam_channel::unbounded::<usize>();
    let (result_sender, result_receiver) = crossbeam_channel::unbounded();
    for index in 0..count {
        // the receiver is alive, so this can't fail
        let _ = job_sender.send(index);
    }
    drop(job_sender);

    let job = &job;
    let spawned = thread::scope(|scope| {
        let mut spawned = 0;
        for worker_id in 0..thread_count {
            let job_receiver = job_receiver.clone();
            let result_sender = result_sender.clone();
            let worker = thread::Builder::new()
                .name(format!("grainsmith-render-worker-{worker_id}"))
                .spawn_scoped(scope, move || {
                    log::debug!("Render worker #{worker_id} started");
                    for index in job_receiver {
                        let result = run_job(index, base_seed, job);
                        if result_sender.send((index, result)).is_err() {
                            break;
                        }
                    }
                });
            match worker {
                Ok(_) => spawned += 1,
                Err(err) => log::error!("Failed to spawn render worker #{worker_id}: {err}"),
            }
        }
        spawned
    });
    drop(result_sender);
    if spawned == 0 {
        return Err(Error::WorkerError(
            "Failed to spawn any render worker thread".to_string(),
        ));
    }

    let mut results = (0..count).map(|_| None).collect::<Vec<_>>();
    for (index, result) in result_receiver {
        results[index] = Some(result);
    }
    Ok(results
        .into_iter()
        .enumerate()
        .map(|(index, result)| {
            result.unwrap_or_else(|| {
                Err(Error::WorkerError(format!(
                    "Render job #{index} did not complete"
                )))
            })
        })
        .collect())
}

// -------------------------------------------------------------------------------------------------

fn run_job<T, F>(index: usize, base_seed: u64, job: &F) -> Result<T, Error>
where
    F: Fn(usize, &mut SmallRng) -> Result<T, Error>,
{
    let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(index as u64));
    match catch_unwind(AssertUnwindSafe(|| job(index, &mut rng))) {
        Ok(Ok(result)) => {
            log::info!("Render job #{index} finished");
            Ok(result)
        }
        Ok(Err(err)) => {
            log::error!("Render job #{index} failed: {err}");
            Err(err)
        }
        Err(payload) => {
            let message = panic_message::panic_message(&payload).to_string();
            log::error!("Ouch. Render job #{index} panicked: {message}");
            Err(Error::WorkerError(format!(
                "Render job #{index} panicked: {message}"
            )))
        }
    }
}

// -------------------------------------------------------------------------------------------------
