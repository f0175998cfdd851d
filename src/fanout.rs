//! Primary-then-dependent fetch with per-item failure isolation.
//!
//! All secondary fetches are issued together and joined with a full barrier;
//! each one that fails is replaced by a fallback value so a single bad record
//! never aborts or reorders the batch. There is no cancellation and no timeout
//! here; both belong to the transport.

use std::fmt::Display;
use std::future::Future;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::error::{ClientError, ClientResult};
use crate::proposal::{EvaluatedRecord, EvaluationData, Record};

/// Run `fetch` for every item concurrently and wait for all of them.
/// Output order follows `items`; failures resolve to `fallback(item)`.
pub async fn gather_isolated<I, T, E, F, Fut, D>(items: &[I], fetch: F, fallback: D) -> Vec<T>
where
    F: Fn(&I) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
    D: Fn(&I) -> T,
{
    let settled = join_all(items.iter().map(&fetch)).await;
    let mut failed = 0usize;
    let out: Vec<T> = items
        .iter()
        .zip(settled)
        .enumerate()
        .map(|(idx, (item, outcome))| match outcome {
            Ok(v) => v,
            Err(e) => {
                failed += 1;
                warn!(target: "fanout", index = idx, error = %e, "isolated fetch failure; using fallback");
                fallback(item)
            }
        })
        .collect();
    debug!(target: "fanout", issued = items.len(), failed, "gather settled");
    out
}

/// Fetch the primary records, then each record's evaluation.
///
/// A failed primary fetch fails the whole call. A failed evaluation fetch
/// leaves that record with [`EvaluationData::default`].
pub async fn aggregate<P, PF, PE, S, SF, SE>(primary: P, secondary: S) -> ClientResult<Vec<EvaluatedRecord>>
where
    P: FnOnce() -> PF,
    PF: Future<Output = Result<Vec<Record>, PE>>,
    PE: Display,
    S: Fn(&Record) -> SF,
    SF: Future<Output = Result<EvaluationData, SE>>,
    SE: Display,
{
    let records = primary().await.map_err(|e| {
        warn!(target: "fanout", error = %e, "primary fetch failed");
        ClientError::primary_fetch(e.to_string())
    })?;

    let evaluations = gather_isolated(
        &records,
        |record| {
            let record_id = record.id.clone();
            let pending = secondary(record);
            async move {
                pending
                    .await
                    .map_err(|e| ClientError::SecondaryFetch { record_id, message: e.to_string() })
            }
        },
        |_| EvaluationData::default(),
    )
    .await;

    Ok(records.into_iter().zip(evaluations).map(|(r, e)| EvaluatedRecord::new(r, e)).collect())
}
