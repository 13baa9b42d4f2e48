//! Decision engine orchestrating analyze, match, recommend and decide

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::cache::{CacheLookup, ResultCache, cache_key};
use super::types::{ActiveOperation, MatchOptions, MatchingResult, MatchingStatistics, OperationStatus};
use super::{decide, recommend};
use crate::collaborators::{ContextAnalyzer, ContextMatcher};
use crate::config::MatchingConfig;
use crate::error::{ArbiterError, ArbiterResult};
use crate::events::{Event, EventBus};
use crate::types::{Match, RawContext};

/// Shared decision engine
pub type SharedDecisionEngine = Arc<DecisionEngine>;

#[derive(Debug, Default)]
struct Counters {
    total_requests: u64,
    completed: u64,
    failures: u64,
    total_processing_ms: u64,
}

/// Runs the matching pipeline for raw contexts
///
/// Each request moves through `pending → analyzing → matching →
/// recommending → deciding` and ends `completed` or `failed`. In-flight
/// requests are visible through [`DecisionEngine::active_matches`] until they
/// finish.
pub struct DecisionEngine {
    config: MatchingConfig,
    analyzer: Arc<dyn ContextAnalyzer>,
    matcher: Arc<dyn ContextMatcher>,
    events: EventBus,
    cache: Mutex<ResultCache>,
    active: RwLock<HashMap<String, ActiveOperation>>,
    counters: Mutex<Counters>,
}

impl DecisionEngine {
    pub fn new(
        config: MatchingConfig,
        analyzer: Arc<dyn ContextAnalyzer>,
        matcher: Arc<dyn ContextMatcher>,
    ) -> Self {
        let cache = ResultCache::new(config.cache_size, config.cache_ttl);
        Self {
            config,
            analyzer,
            matcher,
            events: EventBus::default(),
            cache: Mutex::new(cache),
            active: RwLock::new(HashMap::new()),
            counters: Mutex::new(Counters::default()),
        }
    }

    /// Publish notifications on a shared bus
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Produce a ranked decision for a raw context.
    ///
    /// Results are cached by context content. Any analyzer or matcher error
    /// aborts the request; no partial result is returned.
    pub async fn match_patterns(
        &self,
        raw_context: &RawContext,
        options: &MatchOptions,
    ) -> ArbiterResult<MatchingResult> {
        let started = Instant::now();
        let key = cache_key(raw_context);
        self.counters.lock().total_requests += 1;

        if !options.skip_cache {
            let lookup = self.cache.lock().get(&key);
            match lookup {
                CacheLookup::Hit(result) => {
                    let mut result = *result;
                    result.cached = true;
                    tracing::debug!(
                        operation_id = %result.operation_id,
                        cache_key = %key,
                        "matching result served from cache"
                    );
                    self.events.publish(Event::PatternsMatched {
                        operation_id: result.operation_id.clone(),
                        recommendation_count: result.recommendations.len(),
                        decision: result.decision.decision_type.to_string(),
                        cached: true,
                    });
                    return Ok(result);
                }
                CacheLookup::Expired => {
                    tracing::debug!(cache_key = %key, "cached matching result expired")
                }
                CacheLookup::Miss => {}
            }
        }

        let operation_id = uuid::Uuid::new_v4().to_string();
        self.active.write().insert(
            operation_id.clone(),
            ActiveOperation {
                operation_id: operation_id.clone(),
                status: OperationStatus::Pending,
                cache_key: key.clone(),
                started_at: Utc::now(),
            },
        );
        tracing::debug!(operation_id = %operation_id, "matching operation started");

        match self.run_pipeline(&operation_id, raw_context, options, started).await {
            Ok(result) => {
                self.active.write().remove(&operation_id);
                self.complete(key, &result);
                Ok(result)
            }
            Err(err) => {
                self.fail(&operation_id, &err);
                Err(err)
            }
        }
    }

    async fn run_pipeline(
        &self,
        operation_id: &str,
        raw_context: &RawContext,
        options: &MatchOptions,
        started: Instant,
    ) -> ArbiterResult<MatchingResult> {
        self.set_status(operation_id, OperationStatus::Analyzing);
        let analysis = match self
            .analyzer
            .analyze_context(raw_context, &options.analysis_options)
            .await
        {
            Ok(analysis) => analysis,
            Err(err) => {
                self.events.publish(Event::ContextAnalysisFailed {
                    operation_id: operation_id.to_string(),
                    error: err.to_string(),
                });
                return Err(err);
            }
        };
        self.events.publish(Event::ContextAnalyzed {
            operation_id: operation_id.to_string(),
            quality: analysis.quality.overall_score,
            risk_count: analysis.risks.len(),
        });

        self.set_status(operation_id, OperationStatus::Matching);
        let match_set = match self
            .matcher
            .match_context_with_patterns(&analysis, &options.matching_options)
            .await
        {
            Ok(match_set) => match_set,
            Err(err) => {
                self.events.publish(Event::ContextMatchingFailed {
                    operation_id: operation_id.to_string(),
                    error: err.to_string(),
                });
                return Err(err);
            }
        };
        self.events.publish(Event::ContextMatched {
            operation_id: operation_id.to_string(),
            match_count: match_set.matches.len(),
        });

        self.set_status(operation_id, OperationStatus::Recommending);
        let matches = finite_matches(operation_id, match_set.matches);
        let max_recommendations = options
            .max_recommendations
            .unwrap_or(self.config.max_recommendations);
        let recommendations = recommend::generate(
            &analysis,
            &matches,
            max_recommendations,
            self.config.context_quality_threshold,
        );

        self.set_status(operation_id, OperationStatus::Deciding);
        let decision = decide::decide(&analysis, &recommendations, &self.config);

        self.set_status(operation_id, OperationStatus::Completed);
        Ok(MatchingResult {
            operation_id: operation_id.to_string(),
            analysis,
            matches,
            recommendations,
            decision,
            processing_time_ms: started.elapsed().as_millis() as u64,
            cached: false,
            timestamp: Utc::now(),
        })
    }

    fn complete(&self, key: String, result: &MatchingResult) {
        if let Some(evicted) = self.cache.lock().insert(key, result.clone()) {
            tracing::debug!(evicted_key = %evicted, "matching cache full, evicted oldest entry");
        }
        {
            let mut counters = self.counters.lock();
            counters.completed += 1;
            counters.total_processing_ms += result.processing_time_ms;
        }

        tracing::info!(
            operation_id = %result.operation_id,
            decision = %result.decision.decision_type,
            confidence = result.decision.confidence,
            recommendations = result.recommendations.len(),
            processing_time_ms = result.processing_time_ms,
            "patterns matched"
        );
        self.events.publish(Event::PatternsMatched {
            operation_id: result.operation_id.clone(),
            recommendation_count: result.recommendations.len(),
            decision: result.decision.decision_type.to_string(),
            cached: false,
        });
    }

    fn fail(&self, operation_id: &str, err: &ArbiterError) {
        self.set_status(operation_id, OperationStatus::Failed);
        self.active.write().remove(operation_id);
        self.counters.lock().failures += 1;

        tracing::warn!(operation_id = %operation_id, error = %err, "pattern matching failed");
        self.events.publish(Event::PatternMatchingFailed {
            operation_id: operation_id.to_string(),
            error: err.to_string(),
        });
    }

    fn set_status(&self, operation_id: &str, status: OperationStatus) {
        if let Some(operation) = self.active.write().get_mut(operation_id) {
            tracing::trace!(operation_id = %operation_id, from = ?operation.status, to = ?status, "operation status");
            operation.status = status;
        }
    }

    /// Snapshot of in-flight requests, oldest first
    pub fn active_matches(&self) -> Vec<ActiveOperation> {
        let mut operations: Vec<_> = self.active.read().values().cloned().collect();
        operations.sort_by_key(|op| op.started_at);
        operations
    }

    pub fn statistics(&self) -> MatchingStatistics {
        let cache = self.cache.lock().stats();
        let counters = self.counters.lock();
        let average_processing_ms = if counters.completed == 0 {
            0.0
        } else {
            counters.total_processing_ms as f64 / counters.completed as f64
        };

        MatchingStatistics {
            total_requests: counters.total_requests,
            completed: counters.completed,
            failures: counters.failures,
            cache_hits: cache.hits,
            cache_misses: cache.misses,
            cache_evictions: cache.evictions,
            cache_entries: cache.entries,
            active_operations: self.active.read().len(),
            average_processing_ms,
        }
    }

    /// Drop every cached result
    pub fn clear_cache(&self) -> usize {
        let entries = self.cache.lock().clear();
        tracing::info!(entries, "matching cache cleared");
        self.events.publish(Event::CacheCleared { entries });
        entries
    }
}

/// Drop matches carrying NaN or infinite scores
fn finite_matches(operation_id: &str, matches: Vec<Match>) -> Vec<Match> {
    matches
        .into_iter()
        .filter(|m| {
            let finite = m.is_finite();
            if !finite {
                tracing::warn!(
                    operation_id = %operation_id,
                    pattern_id = %m.pattern_id,
                    "dropping match with non-finite scores"
                );
            }
            finite
        })
        .collect()
}

impl std::fmt::Debug for DecisionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecisionEngine")
            .field("config", &self.config)
            .field("statistics", &self.statistics())
            .finish()
    }
}
