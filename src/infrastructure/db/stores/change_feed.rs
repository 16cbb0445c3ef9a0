use async_trait::async_trait;

/// Push notification that a row changed somewhere in the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeNotice {
    /// Table that changed (`jobs`, `vehicles`).
    pub table: String,
}

impl ChangeNotice {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }
}

/// Source of change notices. Consumers reload in full on each notice; nothing is merged.
#[async_trait]
pub trait ChangeFeed: Send {
    /// Wait for the next notice. `None` means the feed is closed for good.
    async fn next(&mut self) -> Option<ChangeNotice>;
}
