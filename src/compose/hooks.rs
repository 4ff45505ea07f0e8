use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::model::{request::ComposeRequest, template::TemplateId};

/// What happened to a composed postcard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A postcard was composed successfully.
    Generate,
    /// The caller reported that the user saved the result.
    Download,
}

/// Analytics payload delivered to every [`CompositionObserver`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositionEvent {
    /// Event type.
    pub kind: EventKind,
    /// Template the postcard was composed from.
    pub template_id: TemplateId,
    /// Display name from the request metadata.
    pub display_name: String,
    /// College from the request metadata.
    pub college: String,
    /// Graduation year from the request metadata.
    pub graduation_year: String,
}

impl CompositionEvent {
    /// Event of `kind` describing `request`.
    pub fn from_request(kind: EventKind, request: &ComposeRequest) -> Self {
        Self {
            kind,
            template_id: request.template.id.clone(),
            display_name: request.meta.display_name.clone(),
            college: request.meta.college.clone(),
            graduation_year: request.meta.graduation_year.clone(),
        }
    }
}

/// Receiver for post-composition events.
///
/// Delivery is fire-and-forget: errors are logged by the compositor and never change the
/// result of the call that emitted the event.
pub trait CompositionObserver: Send + Sync {
    /// Handle one event.
    fn notify(&self, event: &CompositionEvent) -> anyhow::Result<()>;
}

/// Observer that keeps every event in memory, for tests and debugging.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<CompositionEvent>>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events in delivery order.
    pub fn events(&self) -> Vec<CompositionEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl CompositionObserver for RecordingObserver {
    fn notify(&self, event: &CompositionEvent) -> anyhow::Result<()> {
        self.events
            .lock()
            .map_err(|_| anyhow::anyhow!("event log poisoned"))?
            .push(event.clone());
        Ok(())
    }
}

pub(crate) fn dispatch(observers: &[Arc<dyn CompositionObserver>], event: &CompositionEvent) {
    for observer in observers {
        if let Err(error) = observer.notify(event) {
            tracing::warn!(
                kind = ?event.kind,
                template = %event.template_id,
                error = %error,
                "composition observer failed"
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/hooks.rs"]
mod tests;
