// Application service: turn change notices into full reloads.

use crate::application::services::job_board::JobBoard;
use crate::application::services::vehicle_service::VehicleService;
use crate::infrastructure::db::stores::change_feed::ChangeFeed;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

pub struct ChangeWatcher;

impl ChangeWatcher {
    /// Consume `feed` until it closes, reloading the board (or the vehicle view) on each notice.
    pub async fn run<F>(mut feed: F, board: Arc<JobBoard>, vehicles: Arc<VehicleService>)
    where
        F: ChangeFeed,
    {
        while let Some(notice) = feed.next().await {
            debug!(table = %notice.table, "change_notice");
            match notice.table.as_str() {
                "vehicles" => {
                    vehicles.refresh().await;
                }
                _ => {
                    board.refresh().await;
                }
            }
        }
        info!("change_feed_closed");
    }

    pub fn spawn<F>(feed: F, board: Arc<JobBoard>, vehicles: Arc<VehicleService>) -> JoinHandle<()>
    where
        F: ChangeFeed + 'static,
    {
        tokio::spawn(Self::run(feed, board, vehicles))
    }
}
