use tracing::{debug, warn};
use crate::domain::events::DomainEvent;

/// Forwards domain events to NATS when a connection is configured.
///
/// Publishing is best effort: a failed publish is logged and never fails the
/// request that raised the event.
#[derive(Clone, Default)]
pub struct EventPublisher {
    nats: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn new(nats: Option<async_nats::Client>) -> Self { Self { nats } }

    pub fn disabled() -> Self { Self::default() }

    pub async fn publish(&self, events: Vec<DomainEvent>) {
        for event in events {
            let subject = event.subject();
            debug!(%subject, ?event, "domain event");
            let Some(client) = &self.nats else { continue };
            let payload = match event.payload() {
                Ok(payload) => payload,
                Err(e) => { warn!(%subject, error = %e, "failed to encode event"); continue; }
            };
            if let Err(e) = client.publish(subject.clone(), payload.into()).await {
                warn!(%subject, error = %e, "failed to publish event");
            }
        }
    }
}
