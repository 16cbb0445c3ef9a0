use crate::infrastructure::db::stores::change_feed::{ChangeFeed, ChangeNotice};
use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tracing::warn;

/// In-process change feed. Publish through the notifier returned by `channel`.
pub struct MemoryChangeFeed {
    rx: broadcast::Receiver<ChangeNotice>,
}

#[derive(Clone)]
pub struct MemoryChangeNotifier {
    tx: broadcast::Sender<ChangeNotice>,
}

impl MemoryChangeNotifier {
    pub fn publish(&self, table: &str) {
        // No subscribers is fine; nobody is watching yet.
        let _ = self.tx.send(ChangeNotice::new(table));
    }

    pub fn subscribe(&self) -> MemoryChangeFeed {
        MemoryChangeFeed {
            rx: self.tx.subscribe(),
        }
    }
}

impl MemoryChangeFeed {
    pub fn channel(capacity: usize) -> (MemoryChangeNotifier, MemoryChangeFeed) {
        let (tx, rx) = broadcast::channel(capacity.max(1));
        (MemoryChangeNotifier { tx }, MemoryChangeFeed { rx })
    }
}

#[async_trait]
impl ChangeFeed for MemoryChangeFeed {
    async fn next(&mut self) -> Option<ChangeNotice> {
        match self.rx.recv().await {
            Ok(notice) => Some(notice),
            // A full reload covers whatever was skipped.
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "change_feed_lagged");
                Some(ChangeNotice::new("jobs"))
            }
            Err(RecvError::Closed) => None,
        }
    }
}
