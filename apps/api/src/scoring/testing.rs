//! Deterministic `ScoringModel` stubs for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::scoring::facts::{self, parse_facts, split_list};
use crate::scoring::model::{ScoringError, ScoringModel, Verdict};

/// Scores by the first key contained in the target; `fallback` otherwise.
pub struct FixedScores {
    scores: Vec<(String, f64)>,
    fallback: Option<f64>,
}

impl FixedScores {
    pub fn new<const N: usize>(scores: [(&str, f64); N]) -> Self {
        Self {
            scores: scores.iter().map(|(k, s)| (k.to_string(), *s)).collect(),
            fallback: None,
        }
    }

    pub fn uniform(score: f64) -> Self {
        Self {
            scores: Vec::new(),
            fallback: Some(score),
        }
    }
}

#[async_trait]
impl ScoringModel for FixedScores {
    async fn score(&self, _context: &str, target: &str) -> Result<Verdict, ScoringError> {
        let score = self
            .scores
            .iter()
            .find(|(key, _)| target.contains(key.as_str()))
            .map(|(_, s)| *s)
            .or(self.fallback)
            .ok_or_else(|| ScoringError::Backend(format!("no fixed score for {target:?}")))?;
        Verdict::new(score, "fixed")
    }

    fn backend(&self) -> &'static str {
        "fixed"
    }
}

/// Wraps another stub and fails for targets containing any of `keys`.
pub struct FailingOn<M> {
    inner: M,
    keys: Vec<String>,
    violation: bool,
}

impl<M> FailingOn<M> {
    pub fn new<const N: usize>(inner: M, keys: [&str; N]) -> Self {
        Self {
            inner,
            keys: keys.iter().map(|k| k.to_string()).collect(),
            violation: false,
        }
    }

    /// Fail with a contract violation instead of a backend error.
    pub fn as_violation(mut self) -> Self {
        self.violation = true;
        self
    }
}

#[async_trait]
impl<M: ScoringModel> ScoringModel for FailingOn<M> {
    async fn score(&self, context: &str, target: &str) -> Result<Verdict, ScoringError> {
        if self.keys.iter().any(|k| target.contains(k.as_str())) {
            return Err(if self.violation {
                ScoringError::ModelContractViolation {
                    reason: "score 7 is outside [0, 1]".to_string(),
                    raw: r#"{"score": 7}"#.to_string(),
                }
            } else {
                ScoringError::Backend("stub backend down".to_string())
            });
        }
        self.inner.score(context, target).await
    }

    fn backend(&self) -> &'static str {
        self.inner.backend()
    }
}

/// Sleeps per target before answering. Unknown targets answer immediately.
pub struct SlowScorer {
    entries: Vec<(String, f64, Duration)>,
}

impl SlowScorer {
    pub fn new<const N: usize>(entries: [(&str, f64, Duration); N]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(k, s, d)| (k.to_string(), *s, *d))
                .collect(),
        }
    }
}

#[async_trait]
impl ScoringModel for SlowScorer {
    async fn score(&self, _context: &str, target: &str) -> Result<Verdict, ScoringError> {
        let (score, delay) = self
            .entries
            .iter()
            .find(|(k, _, _)| target.contains(k.as_str()))
            .map(|(_, s, d)| (*s, *d))
            .unwrap_or((0.5, Duration::ZERO));
        tokio::time::sleep(delay).await;
        Verdict::new(score, "slow")
    }

    fn backend(&self) -> &'static str {
        "slow"
    }
}

/// Counts calls and the peak number of calls in flight.
pub struct TrackingScorer {
    score: f64,
    delay: Duration,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl TrackingScorer {
    pub fn new(score: f64, delay: Duration) -> Self {
        Self {
            score,
            delay,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringModel for TrackingScorer {
    async fn score(&self, _context: &str, _target: &str) -> Result<Verdict, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Verdict::new(self.score, "tracked")
    }

    fn backend(&self) -> &'static str {
        "tracking"
    }
}

/// Skill-overlap fraction × GPA-met indicator, read from the fact sheets.
pub struct SkillOverlapStub;

#[async_trait]
impl ScoringModel for SkillOverlapStub {
    async fn score(&self, context: &str, target: &str) -> Result<Verdict, ScoringError> {
        let ctx = parse_facts(context);
        let tgt = parse_facts(target);
        let get = |m: &std::collections::HashMap<String, String>, k: &str| {
            m.get(&k.to_lowercase()).cloned().unwrap_or_default()
        };

        let have: Vec<String> = split_list(&get(&ctx, facts::SKILLS))
            .into_iter()
            .map(|s| s.to_lowercase())
            .collect();
        let want = split_list(&get(&tgt, facts::REQUIRED_SKILLS));
        let overlap = if want.is_empty() {
            1.0
        } else {
            want.iter()
                .filter(|w| have.contains(&w.to_lowercase()))
                .count() as f64
                / want.len() as f64
        };

        let gpa: f64 = get(&ctx, facts::GPA).parse().unwrap_or(0.0);
        let required: f64 = get(&tgt, facts::REQUIRED_GPA).parse().unwrap_or(0.0);
        let gpa_met = if gpa >= required { 1.0 } else { 0.0 };

        Verdict::new(overlap * gpa_met, format!("overlap {overlap:.2}, gpa met {gpa_met}"))
    }

    fn backend(&self) -> &'static str {
        "skill-overlap"
    }
}
