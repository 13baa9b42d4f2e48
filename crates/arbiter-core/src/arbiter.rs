//! Tracker and decision engine wired to one event bus

use std::sync::Arc;
use tokio::sync::broadcast;

use crate::collaborators::{ConfidenceCalculator, ContextAnalyzer, ContextMatcher, PatternStore};
use crate::config::ArbiterConfig;
use crate::decision::DecisionEngine;
use crate::error::ArbiterResult;
use crate::events::{Event, EventBus};
use crate::tracking::ConfidenceTracker;

/// The external collaborators an [`Arbiter`] is built from
pub struct Collaborators {
    pub analyzer: Arc<dyn ContextAnalyzer>,
    pub matcher: Arc<dyn ContextMatcher>,
    pub calculator: Arc<dyn ConfidenceCalculator>,
    pub store: Arc<dyn PatternStore>,
}

/// Decision engine and confidence tracker sharing configuration and notifications
#[derive(Debug, Clone)]
pub struct Arbiter {
    engine: Arc<DecisionEngine>,
    tracker: Arc<ConfidenceTracker>,
    events: EventBus,
}

impl Arbiter {
    /// Validate the configuration and build both components
    pub fn new(config: ArbiterConfig, collaborators: Collaborators) -> ArbiterResult<Self> {
        config.validate()?;
        let events = EventBus::new(config.event_capacity);

        let engine = DecisionEngine::new(
            config.matching,
            collaborators.analyzer,
            collaborators.matcher,
        )
        .with_event_bus(events.clone());
        let tracker = ConfidenceTracker::new(
            config.tracker,
            collaborators.calculator,
            collaborators.store,
        )
        .with_event_bus(events.clone());

        tracing::debug!(capacity = events.capacity(), "arbiter initialized");
        Ok(Self {
            engine: Arc::new(engine),
            tracker: Arc::new(tracker),
            events,
        })
    }

    pub fn engine(&self) -> &Arc<DecisionEngine> {
        &self.engine
    }

    pub fn tracker(&self) -> &Arc<ConfidenceTracker> {
        &self.tracker
    }

    /// Receive notifications from both components
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}
