//! Ordered fan-out / fan-in over worker pools
//!
//! Items are split into chunks, each chunk is processed by one worker, and
//! results are put back in chunk order regardless of completion order. The
//! first failing chunk aborts the batch and its error is returned unchanged.

mod apply;
mod config;

pub use config::{ParallelConfig, PoolKind};

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Apply `f` to every item on the pool described by `config`
///
/// The output has one result per item, in item order.
pub fn map_ordered<T, R, F>(items: Vec<T>, f: F, config: &ParallelConfig) -> Result<Vec<R>>
where
    T: Serialize + DeserializeOwned + Send + Sync,
    R: Serialize + DeserializeOwned + Send,
    F: Fn(&T) -> Result<R> + Sync,
{
    config.validate()?;
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let chunks = items.len().div_ceil(config.chunk_size);
    log::debug!(
        "dispatching {} items in {} chunks to a {:?} pool of {} workers",
        items.len(),
        chunks,
        config.kind,
        config.workers()
    );
    match config.kind {
        PoolKind::Thread => run_threads(&items, &f, config),
        PoolKind::Isolated => run_isolated(&items, &f, config),
    }
}

fn run_threads<T, R, F>(items: &[T], f: &F, config: &ParallelConfig) -> Result<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers())
        .build()
        .map_err(|e| Error::Parallel(e.to_string()))?;
    let chunks: Result<Vec<Vec<R>>> = pool.install(|| {
        items
            .par_chunks(config.chunk_size)
            .map(|chunk| chunk.iter().map(f).collect::<Result<Vec<R>>>())
            .collect()
    });
    match chunks {
        Ok(chunks) => Ok(chunks.into_iter().flatten().collect()),
        Err(e) => {
            log::warn!("parallel batch aborted: {}", e);
            Err(e)
        }
    }
}

/// Deserialize one chunk, process it and serialize the results
fn process_payload<T, R, F>(payload: &str, f: &F) -> Result<String>
where
    T: DeserializeOwned,
    R: Serialize,
    F: Fn(&T) -> Result<R>,
{
    let chunk: Vec<T> = serde_json::from_str(payload)?;
    let results = chunk.iter().map(f).collect::<Result<Vec<R>>>()?;
    Ok(serde_json::to_string(&results)?)
}

fn run_isolated<T, R, F>(items: &[T], f: &F, config: &ParallelConfig) -> Result<Vec<R>>
where
    T: Serialize + DeserializeOwned,
    R: DeserializeOwned + Serialize,
    F: Fn(&T) -> Result<R> + Sync,
{
    let payloads = items
        .chunks(config.chunk_size)
        .map(serde_json::to_string)
        .collect::<std::result::Result<Vec<String>, _>>()?;
    let count = payloads.len();

    let (task_tx, task_rx) = crossbeam_channel::unbounded::<(usize, String)>();
    let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, Result<String>)>();
    for task in payloads.into_iter().enumerate() {
        task_tx
            .send(task)
            .map_err(|e| Error::Parallel(e.to_string()))?;
    }
    drop(task_tx);

    let cancel = AtomicBool::new(false);
    let workers = config.workers().min(count);
    let mut slots: Vec<Option<String>> = vec![None; count];
    let mut failure: Option<(usize, Error)> = None;

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let cancel = &cancel;
            scope.spawn(move || {
                while let Ok((id, payload)) = task_rx.recv() {
                    if cancel.load(Ordering::Relaxed) {
                        break;
                    }
                    let outcome = process_payload::<T, R, F>(&payload, f);
                    if outcome.is_err() {
                        cancel.store(true, Ordering::Relaxed);
                    }
                    if result_tx.send((id, outcome)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(result_tx);
        for (id, outcome) in result_rx.iter() {
            match outcome {
                Ok(payload) => slots[id] = Some(payload),
                Err(e) => {
                    if failure.as_ref().map_or(true, |(first, _)| id < *first) {
                        failure = Some((id, e));
                    }
                }
            }
        }
    });

    if let Some((id, e)) = failure {
        log::warn!("parallel batch aborted by chunk {}: {}", id, e);
        return Err(e);
    }
    let mut out = Vec::with_capacity(items.len());
    for (id, slot) in slots.into_iter().enumerate() {
        let payload =
            slot.ok_or_else(|| Error::Parallel(format!("chunk {} returned no result", id)))?;
        let results: Vec<R> = serde_json::from_str(&payload)?;
        out.extend(results);
    }
    Ok(out)
}
