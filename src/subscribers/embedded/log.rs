//! # LogWriter - registry event logger
//!
//! A minimal subscriber that forwards registry events to `tracing` at `info`
//! level (subscriber health at `warn`).
//!
//! ## Example output
//! ```text
//! INFO targetvisor: suspend state changed suspended=true
//! INFO targetvisor: page event kind=MainFrameNavigated target=1 data="https://example.test/"
//! WARN targetvisor: subscriber overflow subscriber="metrics" reason="full"
//! ```

use async_trait::async_trait;
use tracing::{info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::SuspendStateChanged => {
                info!(target: "targetvisor", suspended = ?e.suspended, "suspend state changed");
            }
            EventKind::TargetDisposed => {
                info!(
                    target: "targetvisor",
                    target_id = ?e.target.map(|t| t.as_u64()),
                    "target disposed"
                );
            }
            EventKind::MainFrameNavigated
            | EventKind::Load
            | EventKind::PageReloadRequested
            | EventKind::WillReloadPage => {
                info!(
                    target: "targetvisor",
                    kind = ?e.kind,
                    target_id = ?e.target.map(|t| t.as_u64()),
                    data = ?e.data,
                    "page event"
                );
            }
            EventKind::SubscriberOverflow => {
                warn!(
                    target: "targetvisor",
                    subscriber = ?e.subscriber,
                    reason = ?e.reason,
                    "subscriber overflow"
                );
            }
            EventKind::SubscriberPanicked => {
                warn!(
                    target: "targetvisor",
                    subscriber = e.subscriber.unwrap_or("unknown"),
                    info = e.reason.as_deref().unwrap_or("unknown"),
                    "subscriber panicked"
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::targets::TargetId;

    #[tokio::test]
    async fn test_handles_every_event_kind() {
        let writer = LogWriter::new();
        let events = [
            Event::suspend_state_changed(true),
            Event::target_disposed(TargetId::from_raw(1)),
            Event::new(EventKind::MainFrameNavigated)
                .with_target(TargetId::from_raw(1))
                .with_data("https://example.test/"),
            Event::new(EventKind::Load),
            Event::new(EventKind::PageReloadRequested),
            Event::new(EventKind::WillReloadPage),
            Event::subscriber_overflow("metrics", "full"),
            Event::subscriber_panicked("metrics", "boom".to_string()),
        ];
        for ev in &events {
            writer.on_event(ev).await;
        }
        assert_eq!(writer.name(), "log-writer");
    }
}
