//! Batch scoring: fans one `ScoringModel::score` call out per item, then ranks.
//!
//! Every spawned call is awaited (or aborted on cancellation) before anything is
//! sorted, so completion order never leaks into output order.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::scoring::cancel::CancelToken;
use crate::scoring::model::{ensure_scorable, ScoreResult, ScoringError, ScoringModel, Verdict};

/// One unit of work. `position` is the item's place in the caller's input and is
/// the tie-breaker when scores are equal.
#[derive(Debug, Clone)]
pub struct ScoringTask {
    pub position: usize,
    pub label: String,
    pub context: Arc<str>,
    pub target: String,
}

/// Everything that settled before the batch finished or was cancelled.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub scored: Vec<(usize, Verdict)>,
    pub failed: usize,
    pub attempted: usize,
    pub cancelled: bool,
}

impl BatchOutcome {
    /// Successful items, highest score first, ties by input position.
    pub fn ranked(mut self) -> Vec<(usize, Verdict)> {
        sort_ranked(&mut self.scored);
        self.scored
    }

    /// Applies the batch failure policy and maps positions back to ids.
    ///
    /// - some items scored → ranked results (cancelled or not)
    /// - cancelled with nothing scored → `Cancelled`
    /// - everything failed → whatever `unavailable(failed, attempted)` builds
    pub fn settle<I>(
        self,
        id_of: impl Fn(usize) -> I,
        unavailable: impl FnOnce(usize, usize) -> ScoringError,
    ) -> Result<Vec<ScoreResult<I>>, ScoringError> {
        let (failed, attempted, cancelled) = (self.failed, self.attempted, self.cancelled);
        let ranked = self.ranked();

        if ranked.is_empty() && attempted > 0 {
            return Err(if cancelled {
                ScoringError::Cancelled
            } else {
                unavailable(failed, attempted)
            });
        }

        Ok(ranked
            .into_iter()
            .map(|(position, verdict)| ScoreResult::from_verdict(id_of(position), verdict))
            .collect())
    }
}

type Joined = Result<(usize, Result<Verdict, ScoringError>), tokio::task::JoinError>;

fn record<'a>(outcome: &mut BatchOutcome, joined: Joined, label_of: &impl Fn(usize) -> &'a str) {
    match joined {
        Ok((position, Ok(verdict))) => {
            debug!("Scored '{}': {:.3}", label_of(position), verdict.score());
            outcome.scored.push((position, verdict));
        }
        Ok((position, Err(ScoringError::ModelContractViolation { reason, raw }))) => {
            warn!(
                "Dropping '{}': scoring model contract violation ({reason}); raw response: {raw}",
                label_of(position)
            );
            outcome.failed += 1;
        }
        Ok((position, Err(e))) => {
            warn!("Dropping '{}': {e}", label_of(position));
            outcome.failed += 1;
        }
        Err(join_err) => {
            warn!("Scoring task did not complete: {join_err}");
            outcome.failed += 1;
        }
    }
}

/// Descending by score; equal scores keep input order.
pub fn sort_ranked(items: &mut [(usize, Verdict)]) {
    items.sort_by(|(pos_a, a), (pos_b, b)| {
        b.score()
            .total_cmp(&a.score())
            .then_with(|| pos_a.cmp(pos_b))
    });
}

/// Scores every task, at most `concurrency` at a time (`None` = unbounded).
///
/// Per-item failures are logged and counted, never returned. When `cancel` fires,
/// unsettled calls are aborted and the outcome is flagged `cancelled`.
pub async fn score_batch(
    model: Arc<dyn ScoringModel>,
    tasks: Vec<ScoringTask>,
    concurrency: Option<usize>,
    mut cancel: CancelToken,
) -> BatchOutcome {
    let limiter = concurrency.map(|n| Arc::new(Semaphore::new(n.max(1))));
    let mut outcome = BatchOutcome {
        attempted: tasks.len(),
        ..BatchOutcome::default()
    };
    if cancel.is_cancelled() {
        warn!("Scoring batch cancelled before start: {} items not attempted", tasks.len());
        outcome.cancelled = true;
        return outcome;
    }

    let mut labels = Vec::with_capacity(tasks.len());
    let mut set = JoinSet::new();

    for task in tasks {
        labels.push((task.position, task.label.clone()));

        if let Err(e) = ensure_scorable(&task.context, &task.target) {
            warn!("Skipping '{}': {e}", task.label);
            outcome.failed += 1;
            continue;
        }

        let model = Arc::clone(&model);
        let limiter = limiter.clone();
        set.spawn(async move {
            let _permit = match limiter {
                Some(sem) => match sem.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => {
                        return (
                            task.position,
                            Err(ScoringError::Backend("scoring limiter closed".to_string())),
                        )
                    }
                },
                None => None,
            };
            let result = model.score(&task.context, &task.target).await;
            (task.position, result)
        });
    }

    let label_of = |position: usize| {
        labels
            .iter()
            .find(|(p, _)| *p == position)
            .map(|(_, l)| l.as_str())
            .unwrap_or("?")
    };

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                outcome.cancelled = true;
                break;
            }
            joined = set.join_next() => match joined {
                None => break,
                Some(joined) => record(&mut outcome, joined, &label_of),
            }
        }
    }

    if outcome.cancelled {
        // Aborting a finished task is a no-op, so draining still yields every
        // result that settled before the cutoff.
        set.abort_all();
        let mut abandoned = 0;
        while let Some(joined) = set.join_next().await {
            match joined {
                Err(e) if e.is_cancelled() => abandoned += 1,
                joined => record(&mut outcome, joined, &label_of),
            }
        }
        warn!(
            "Scoring batch cancelled: {} settled, {} abandoned",
            outcome.scored.len() + outcome.failed,
            abandoned
        );
    }

    outcome
}
