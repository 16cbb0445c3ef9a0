use crate::infrastructure::db::database::DatabaseError;
use crate::infrastructure::db::postgres::PostgresDatabase;
use crate::infrastructure::db::stores::change_feed::{ChangeFeed, ChangeNotice};
use async_trait::async_trait;
use sqlx::postgres::PgListener;
use std::time::Duration;
use tracing::warn;

/// Channel the `notify_row_change` trigger publishes on; the payload is the table name.
pub const CHANGE_CHANNEL: &str = "garage_desk_changes";

const RETRY_DELAY: Duration = Duration::from_secs(1);
const MAX_CONSECUTIVE_ERRORS: u32 = 30;

/// Change feed backed by Postgres LISTEN/NOTIFY.
pub struct ChangeFeedPostgres {
    listener: PgListener,
}

impl ChangeFeedPostgres {
    pub async fn connect(db: &PostgresDatabase) -> Result<Self, DatabaseError> {
        let listener = db.listen(CHANGE_CHANNEL).await?;
        Ok(Self { listener })
    }
}

#[async_trait]
impl ChangeFeed for ChangeFeedPostgres {
    async fn next(&mut self) -> Option<ChangeNotice> {
        // The listener reconnects on the call after a failure; give up only after a long outage.
        let mut errors = 0;
        loop {
            match self.listener.recv().await {
                Ok(notification) => {
                    let table = notification.payload().trim();
                    let table = if table.is_empty() { "jobs" } else { table };
                    return Some(ChangeNotice::new(table));
                }
                Err(err) => {
                    errors += 1;
                    warn!(error = %err, attempt = errors, "change_feed_recv_failed");
                    if errors >= MAX_CONSECUTIVE_ERRORS {
                        return None;
                    }
                    tokio::time::sleep(RETRY_DELAY).await;
                }
            }
        }
    }
}
