//! Fan-out of zone snapshots and render features
//!
//! Snapshot consumers hear about committed geometry and selection changes;
//! feature sinks redraw on anything visible, hover included.

mod features;

pub use features::{CONNECTOR_FEATURE_ID, RenderFeatures, ZoneFeature};

use crate::zone::ZoneSnapshot;

/// Receives a snapshot after each committed change that affects the query
pub trait SnapshotConsumer {
    fn on_snapshot(&mut self, snapshot: &ZoneSnapshot);
}

impl<F> SnapshotConsumer for F
where
    F: FnMut(&ZoneSnapshot),
{
    fn on_snapshot(&mut self, snapshot: &ZoneSnapshot) {
        self(snapshot)
    }
}

/// Receives the render view after every visible change
pub trait FeatureSink {
    fn on_features(&mut self, features: &RenderFeatures);
}

impl<F> FeatureSink for F
where
    F: FnMut(&RenderFeatures),
{
    fn on_features(&mut self, features: &RenderFeatures) {
        self(features)
    }
}

/// Registry of snapshot consumers and feature sinks
#[derive(Default)]
pub struct SnapshotPublisher {
    consumers: Vec<Box<dyn SnapshotConsumer>>,
    sinks: Vec<Box<dyn FeatureSink>>,
    published: u64,
}

impl SnapshotPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, consumer: impl SnapshotConsumer + 'static) {
        self.consumers.push(Box::new(consumer));
        tracing::debug!("Snapshot consumer registered ({} total)", self.consumers.len());
    }

    pub fn attach_sink(&mut self, sink: impl FeatureSink + 'static) {
        self.sinks.push(Box::new(sink));
        tracing::debug!("Feature sink registered ({} total)", self.sinks.len());
    }

    /// Deliver `snapshot` to every consumer in registration order
    pub fn publish(&mut self, snapshot: &ZoneSnapshot) {
        self.published += 1;
        tracing::debug!(
            "Publishing snapshot rev {} to {} consumer(s)",
            snapshot.revision,
            self.consumers.len()
        );
        for consumer in &mut self.consumers {
            consumer.on_snapshot(snapshot);
        }
    }

    pub fn render(&mut self, features: &RenderFeatures) {
        for sink in &mut self.sinks {
            sink.on_features(features);
        }
    }

    /// Number of snapshots published so far
    pub fn published_count(&self) -> u64 {
        self.published
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    pub fn sink_count(&self) -> usize {
        self.sinks.len()
    }
}

impl std::fmt::Debug for SnapshotPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotPublisher")
            .field("consumers", &self.consumers.len())
            .field("sinks", &self.sinks.len())
            .field("published", &self.published)
            .finish()
    }
}
