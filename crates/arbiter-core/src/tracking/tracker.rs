//! Confidence tracker

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::time::Instant;

use super::analytics::{self, AnalyticsInput};
use super::export;
use super::history::BoundedHistory;
use super::statistics;
use super::types::*;
use crate::collaborators::{ConfidenceCalculator, PatternStore};
use crate::config::TrackerConfig;
use crate::error::{ArbiterError, ArbiterResult};
use crate::events::{AnomalySeverity, Event, EventBus};
use crate::types::{Pattern, PatternId, RawContext};

/// Shared confidence tracker
pub type SharedConfidenceTracker = Arc<ConfidenceTracker>;

#[derive(Debug, Clone)]
struct CachedAnalytics {
    analytics: ConfidenceAnalytics,
    computed_at: Instant,
}

/// Maintains bounded confidence and adaptation histories per pattern
///
/// Locks are held only for synchronous bookkeeping and are always released
/// before awaiting a collaborator.
pub struct ConfidenceTracker {
    config: TrackerConfig,
    calculator: Arc<dyn ConfidenceCalculator>,
    store: Arc<dyn PatternStore>,
    events: EventBus,
    histories: Mutex<HashMap<PatternId, BoundedHistory<TrackingEntry>>>,
    adaptations: Mutex<HashMap<PatternId, BoundedHistory<AdaptationEvent>>>,
    analytics_cache: Mutex<HashMap<PatternId, HashMap<AnalyticsOptions, CachedAnalytics>>>,
}

impl ConfidenceTracker {
    /// Create a tracker with its own event bus
    pub fn new(
        config: TrackerConfig,
        calculator: Arc<dyn ConfidenceCalculator>,
        store: Arc<dyn PatternStore>,
    ) -> Self {
        Self {
            config,
            calculator,
            store,
            events: EventBus::default(),
            histories: Mutex::new(HashMap::new()),
            adaptations: Mutex::new(HashMap::new()),
            analytics_cache: Mutex::new(HashMap::new()),
        }
    }

    /// Publish notifications on a shared bus
    pub fn with_event_bus(mut self, events: EventBus) -> Self {
        self.events = events;
        self
    }

    /// Subscribe to tracker notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Record a new confidence data point for a pattern
    pub async fn track_confidence(
        &self,
        pattern: &Pattern,
        context: &RawContext,
        options: &TrackOptions,
    ) -> ArbiterResult<TrackingEntry> {
        let calculation = self
            .calculator
            .calculate_confidence(pattern, context, options)
            .await?;

        if !calculation.score.is_finite() {
            return Err(ArbiterError::invalid_input_field(
                format!(
                    "calculator returned non-finite confidence for pattern {}",
                    pattern.id
                ),
                "confidence_score",
            ));
        }

        let (entry, recent) = {
            let mut histories = self.histories.lock();
            let history = histories
                .entry(pattern.id.clone())
                .or_insert_with(|| BoundedHistory::new(self.config.max_history_size));

            let previous_confidence = history.last().map(|e| e.confidence_score);
            let entry = TrackingEntry {
                timestamp: Utc::now(),
                pattern_id: pattern.id.clone(),
                confidence_score: calculation.score,
                factors: calculation.factors,
                calculation_method: calculation.calculation_method,
                previous_confidence,
                confidence_change: previous_confidence
                    .map(|previous| calculation.score - previous)
                    .unwrap_or(0.0),
                source: options.source.clone(),
            };
            history.push(entry.clone());

            let recent: Vec<f64> = history
                .tail(self.config.volatility_window)
                .map(|e| e.confidence_score)
                .collect();
            (entry, recent)
        };

        self.detect_anomalies(&entry, &recent);
        self.invalidate_analytics(&pattern.id);

        tracing::debug!(
            pattern_id = %pattern.id,
            confidence = entry.confidence_score,
            change = entry.confidence_change,
            "confidence tracked"
        );
        self.events.publish(Event::ConfidenceTracked {
            pattern_id: pattern.id.clone(),
            confidence: entry.confidence_score,
            change: entry.confidence_change,
        });

        Ok(entry)
    }

    /// Adapt a pattern's stored confidence after it was applied
    pub async fn update_confidence_from_outcome(
        &self,
        pattern_id: &PatternId,
        success: bool,
        quality_impact: f64,
        context: &RawContext,
    ) -> ArbiterResult<AdaptationEvent> {
        if !quality_impact.is_finite() {
            return Err(ArbiterError::invalid_input_field(
                "quality impact must be a finite number",
                "quality_impact",
            ));
        }

        let mut pattern = self
            .store
            .get_pattern(pattern_id)
            .await?
            .ok_or_else(|| ArbiterError::pattern_not_found(pattern_id.as_str()))?;

        let update = self
            .calculator
            .update_confidence_from_outcome(&pattern, success, quality_impact, context)
            .await?;

        if !update.new_confidence.is_finite() {
            return Err(ArbiterError::invalid_input_field(
                format!(
                    "calculator returned non-finite confidence for pattern {}",
                    pattern_id
                ),
                "new_confidence",
            ));
        }
        let new_confidence = update
            .new_confidence
            .clamp(self.config.min_confidence, self.config.max_confidence);

        let trigger = OutcomeTrigger::from(success);
        let event = AdaptationEvent {
            timestamp: Utc::now(),
            pattern_id: pattern_id.clone(),
            trigger,
            previous_confidence: update.previous_confidence,
            new_confidence,
            quality_impact,
            factors: update.factors,
        };

        pattern.confidence_score = new_confidence;
        pattern.record_outcome(success);
        self.store.update_pattern(&pattern).await?;

        self.track_confidence(&pattern, context, &TrackOptions::outcome(trigger))
            .await?;

        // Recorded only once the new confidence is persisted and tracked
        self.adaptations
            .lock()
            .entry(pattern_id.clone())
            .or_insert_with(|| BoundedHistory::new(self.config.max_history_size))
            .push(event.clone());

        tracing::info!(
            pattern_id = %pattern_id,
            trigger = %trigger,
            previous = event.previous_confidence,
            new = new_confidence,
            "confidence adapted from outcome"
        );
        self.events.publish(Event::ConfidenceAdapted {
            pattern_id: pattern_id.clone(),
            success,
            previous_confidence: event.previous_confidence,
            new_confidence,
        });

        Ok(event)
    }

    /// Windowed analytics for a pattern.
    ///
    /// `None` if the pattern has no history, or if `options.days` is set and
    /// no entry falls inside that range. Results are cached per pattern and
    /// options until the TTL passes or a new data point is tracked for the
    /// pattern.
    pub fn get_confidence_analytics(
        &self,
        pattern_id: &PatternId,
        options: &AnalyticsOptions,
    ) -> Option<ConfidenceAnalytics> {
        if let Some(cached) = self
            .analytics_cache
            .lock()
            .get(pattern_id)
            .and_then(|entries| entries.get(options))
        {
            if cached.computed_at.elapsed() < self.config.analytics_cache_ttl {
                tracing::trace!(pattern_id = %pattern_id, "analytics served from cache");
                return Some(cached.analytics.clone());
            }
        }

        // Cached under the histories lock so a concurrent track cannot slip
        // in between computing and caching
        let histories = self.histories.lock();
        let analytics = self.analytics_from(&histories, pattern_id, options)?;
        self.analytics_cache
            .lock()
            .entry(pattern_id.clone())
            .or_default()
            .insert(
                *options,
                CachedAnalytics {
                    analytics: analytics.clone(),
                    computed_at: Instant::now(),
                },
            );

        Some(analytics)
    }

    /// Compute analytics without consulting the cache
    pub fn calculate_confidence_analytics(
        &self,
        pattern_id: &PatternId,
        options: &AnalyticsOptions,
    ) -> Option<ConfidenceAnalytics> {
        let histories = self.histories.lock();
        self.analytics_from(&histories, pattern_id, options)
    }

    fn analytics_from(
        &self,
        histories: &HashMap<PatternId, BoundedHistory<TrackingEntry>>,
        pattern_id: &PatternId,
        options: &AnalyticsOptions,
    ) -> Option<ConfidenceAnalytics> {
        let history = histories.get(pattern_id)?;
        let cutoff = options
            .days
            .map(|days| Utc::now() - chrono::Duration::days(i64::from(days)));

        let adaptation_events = self
            .adaptations
            .lock()
            .get(pattern_id)
            .map(|events| match cutoff {
                Some(cutoff) => events.iter().filter(|e| e.timestamp >= cutoff).count(),
                None => events.len(),
            })
            .unwrap_or(0);

        let window: Vec<&TrackingEntry> = match cutoff {
            Some(cutoff) => history.iter().filter(|e| e.timestamp >= cutoff).collect(),
            None => history.tail(self.config.analytics_window).collect(),
        };

        analytics::build_analytics(AnalyticsInput {
            pattern_id,
            window: &window,
            total_tracking_points: history.len(),
            adaptation_events,
            volatility_threshold: self.config.volatility_threshold,
        })
    }

    /// Forecast future confidence for a pattern
    pub async fn predict_future_confidence(
        &self,
        pattern_id: &PatternId,
        steps: usize,
    ) -> ArbiterResult<ConfidencePrediction> {
        let pattern = self
            .store
            .get_pattern(pattern_id)
            .await?
            .ok_or_else(|| ArbiterError::pattern_not_found(pattern_id.as_str()))?;

        let forecast = self
            .calculator
            .predict_future_confidence(&pattern, steps)
            .await?;
        let history_points = self.history_len(pattern_id);

        Ok(ConfidencePrediction {
            pattern_id: pattern_id.clone(),
            current_confidence: pattern.confidence_score,
            predictions: forecast.predictions,
            method: forecast.method,
            history_points,
            reliability: PredictionReliability::from_history_len(history_points),
        })
    }

    /// Purge entries older than the configured retention
    pub fn cleanup(&self) -> usize {
        let retention = chrono::Duration::from_std(self.config.retention)
            .unwrap_or_else(|_| chrono::Duration::days(36500));
        self.cleanup_older_than(Utc::now() - retention)
    }

    /// Purge tracking entries and adaptation events recorded before `cutoff`.
    ///
    /// Clears the whole analytics cache and returns the number of purged items.
    pub fn cleanup_older_than(&self, cutoff: DateTime<Utc>) -> usize {
        let mut removed = 0;
        {
            let mut histories = self.histories.lock();
            for history in histories.values_mut() {
                removed += history.retain(|e| e.timestamp >= cutoff);
            }
            histories.retain(|_, history| !history.is_empty());
        }
        {
            let mut adaptations = self.adaptations.lock();
            for events in adaptations.values_mut() {
                removed += events.retain(|e| e.timestamp >= cutoff);
            }
            adaptations.retain(|_, events| !events.is_empty());
        }
        self.analytics_cache.lock().clear();

        tracing::info!(removed, cutoff = %cutoff, "tracking history cleanup completed");
        self.events.publish(Event::CleanupCompleted { removed });
        removed
    }

    /// Serialize a pattern's history as JSON or CSV
    pub fn export_tracking_data(
        &self,
        pattern_id: &PatternId,
        format: ExportFormat,
    ) -> ArbiterResult<String> {
        let history = self.confidence_history(pattern_id, None);
        match format {
            ExportFormat::Json => {
                let adaptations = self.adaptation_history(pattern_id);
                export::to_json(pattern_id, &history, &adaptations)
            }
            ExportFormat::Csv => Ok(export::to_csv(&history)),
        }
    }

    /// Tracking entries for a pattern, oldest first, optionally only the newest `limit`
    pub fn confidence_history(&self, pattern_id: &PatternId, limit: Option<usize>) -> Vec<TrackingEntry> {
        self.histories
            .lock()
            .get(pattern_id)
            .map(|history| {
                history
                    .tail(limit.unwrap_or(usize::MAX))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Adaptation events for a pattern, oldest first
    pub fn adaptation_history(&self, pattern_id: &PatternId) -> Vec<AdaptationEvent> {
        self.adaptations
            .lock()
            .get(pattern_id)
            .map(|events| events.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Patterns with at least one tracking entry, sorted by id
    pub fn tracked_patterns(&self) -> Vec<PatternId> {
        let mut ids: Vec<_> = self.histories.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn statistics(&self) -> TrackerStatistics {
        let histories = self.histories.lock();
        let adaptations = self.adaptations.lock();
        let cache = self.analytics_cache.lock();
        TrackerStatistics {
            tracked_patterns: histories.len(),
            total_entries: histories.values().map(BoundedHistory::len).sum(),
            total_adaptations: adaptations.values().map(BoundedHistory::len).sum(),
            cached_analytics: cache.values().map(HashMap::len).sum(),
        }
    }

    fn history_len(&self, pattern_id: &PatternId) -> usize {
        self.histories
            .lock()
            .get(pattern_id)
            .map(BoundedHistory::len)
            .unwrap_or(0)
    }

    fn invalidate_analytics(&self, pattern_id: &PatternId) {
        self.analytics_cache.lock().remove(pattern_id);
    }

    /// Single-step anomaly and recent-volatility checks for a new entry
    fn detect_anomalies(&self, entry: &TrackingEntry, recent: &[f64]) {
        let magnitude = entry.confidence_change.abs();
        if magnitude > self.config.anomaly_threshold {
            let severity = if magnitude > self.config.high_anomaly_threshold {
                AnomalySeverity::High
            } else {
                AnomalySeverity::Medium
            };
            tracing::warn!(
                pattern_id = %entry.pattern_id,
                change = entry.confidence_change,
                severity = %severity,
                "significant confidence change detected"
            );
            self.events.publish(Event::ConfidenceAnomalyDetected {
                pattern_id: entry.pattern_id.clone(),
                change: entry.confidence_change,
                severity,
            });
        }

        if recent.len() >= self.config.volatility_min_points {
            let volatility = statistics::volatility(recent);
            if volatility > self.config.volatility_threshold {
                tracing::warn!(
                    pattern_id = %entry.pattern_id,
                    volatility,
                    "high confidence volatility detected"
                );
                self.events.publish(Event::ConfidenceVolatilityDetected {
                    pattern_id: entry.pattern_id.clone(),
                    volatility,
                });
            }
        }
    }
}

impl std::fmt::Debug for ConfidenceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfidenceTracker")
            .field("config", &self.config)
            .field("statistics", &self.statistics())
            .finish()
    }
}
