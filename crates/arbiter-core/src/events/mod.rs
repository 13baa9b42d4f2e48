//! Notification channel for tracker and engine activity
//!
//! Notifications are a side channel: every operation returns its result
//! directly and additionally publishes an [`Event`] on the [`EventBus`].
//! Publishing never blocks and never fails; with no subscribers the event is
//! simply dropped.

use serde::Serialize;
use tokio::sync::broadcast;

use crate::types::PatternId;

/// Severity of a single-step confidence anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalySeverity {
    Medium,
    High,
}

impl std::fmt::Display for AnomalySeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Events published by the tracker and the decision engine
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    // ========== Confidence Tracking ==========
    /// A new confidence data point was recorded
    ConfidenceTracked {
        pattern_id: PatternId,
        confidence: f64,
        change: f64,
    },

    /// An outcome changed a pattern's stored confidence
    ConfidenceAdapted {
        pattern_id: PatternId,
        success: bool,
        previous_confidence: f64,
        new_confidence: f64,
    },

    /// A single data point moved confidence by more than the anomaly threshold
    ConfidenceAnomalyDetected {
        pattern_id: PatternId,
        change: f64,
        severity: AnomalySeverity,
    },

    /// Recent confidence deltas are unusually spread out
    ConfidenceVolatilityDetected {
        pattern_id: PatternId,
        volatility: f64,
    },

    /// Old history entries were purged
    CleanupCompleted { removed: usize },

    // ========== Decision Pipeline ==========
    /// The analyzer produced a context analysis
    ContextAnalyzed {
        operation_id: String,
        quality: f64,
        risk_count: usize,
    },

    /// The analyzer failed
    ContextAnalysisFailed { operation_id: String, error: String },

    /// The matcher produced raw matches
    ContextMatched {
        operation_id: String,
        match_count: usize,
    },

    /// The matcher failed
    ContextMatchingFailed { operation_id: String, error: String },

    /// A matching result was delivered, fresh or from cache
    PatternsMatched {
        operation_id: String,
        recommendation_count: usize,
        decision: String,
        cached: bool,
    },

    /// The pipeline aborted
    PatternMatchingFailed { operation_id: String, error: String },

    /// The result cache was emptied
    CacheCleared { entries: usize },
}

impl Event {
    /// Get the event type name
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ConfidenceTracked { .. } => "confidence_tracked",
            Self::ConfidenceAdapted { .. } => "confidence_adapted",
            Self::ConfidenceAnomalyDetected { .. } => "confidence_anomaly_detected",
            Self::ConfidenceVolatilityDetected { .. } => "confidence_volatility_detected",
            Self::CleanupCompleted { .. } => "cleanup_completed",
            Self::ContextAnalyzed { .. } => "context_analyzed",
            Self::ContextAnalysisFailed { .. } => "context_analysis_failed",
            Self::ContextMatched { .. } => "context_matched",
            Self::ContextMatchingFailed { .. } => "context_matching_failed",
            Self::PatternsMatched { .. } => "patterns_matched",
            Self::PatternMatchingFailed { .. } => "pattern_matching_failed",
            Self::CacheCleared { .. } => "cache_cleared",
        }
    }
}

/// Broadcast bus for [`Event`]s
///
/// Each subscriber receives a copy of every event published after it
/// subscribed. Slow subscribers lose the oldest events once `capacity` is
/// exceeded.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    capacity: usize,
}

impl EventBus {
    /// Create a new event bus with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender, capacity }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of receivers the event was delivered to.
    pub fn publish(&self, event: Event) -> usize {
        tracing::trace!(event = event.event_type(), "publishing event");
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to events published from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Get the channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Drain every event currently buffered for a receiver.
///
/// Lagged notifications are skipped; a closed channel ends the drain.
pub fn drain(receiver: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => events.push(event),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    events
}
