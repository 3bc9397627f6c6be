//! Domain event publication over NATS.

use tracing::{debug, info, warn};

use crate::domain::events::DomainEvent;

/// Publishes domain events when a NATS connection is configured; otherwise a no-op.
///
/// Publishing happens after the write is committed, so failures are logged
/// and never reported back to the caller.
#[derive(Clone, Default)]
pub struct EventPublisher {
    client: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn disabled() -> Self { Self::default() }

    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else { return Self::disabled() };
        match async_nats::connect(url).await {
            Ok(client) => {
                info!(%url, "Connected to NATS");
                Self { client: Some(client) }
            }
            Err(e) => {
                warn!(error = %e, %url, "NATS unavailable, domain events will not be published");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool { self.client.is_some() }

    pub async fn publish(&self, event: &DomainEvent) {
        let Some(client) = &self.client else { return };
        let payload = match serde_json::to_vec(event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!(error = %e, subject = event.subject(), "Failed to encode domain event");
                return;
            }
        };
        match client.publish(event.subject().to_string(), payload.into()).await {
            Ok(()) => debug!(subject = event.subject(), "Published domain event"),
            Err(e) => warn!(error = %e, subject = event.subject(), "Failed to publish domain event"),
        }
    }
}
