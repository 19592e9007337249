//! Broadcast pump
//!
//! Bridges the transport's stream of unsolicited console lines to typed events. The
//! classifier is shared read-only, so several pumps can run off one instance.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::BroadcastClassifier;
use crate::types::Event;

/// Counters reported when a pump stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpStats {
    pub lines: u64,
    pub events: u64,
    pub unmatched: u64,
}

/// Classify lines from `lines` and forward matches on `events`.
///
/// The task ends when the line channel closes or the event receiver is dropped.
pub fn spawn_broadcast_pump(
    classifier: Arc<BroadcastClassifier>,
    mut lines: mpsc::Receiver<String>,
    events: mpsc::Sender<Event>,
) -> JoinHandle<PumpStats> {
    tokio::spawn(async move {
        let mut stats = PumpStats::default();

        while let Some(line) = lines.recv().await {
            stats.lines += 1;
            let Some(event) = classifier.classify(&line) else {
                stats.unmatched += 1;
                continue;
            };
            stats.events += 1;
            if events.send(event).await.is_err() {
                tracing::debug!("event receiver dropped, stopping pump");
                break;
            }
        }

        tracing::debug!(
            lines = stats.lines,
            events = stats.events,
            unmatched = stats.unmatched,
            "broadcast pump stopped"
        );
        stats
    })
}
